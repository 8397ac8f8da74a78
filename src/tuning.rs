//! Data-driven simulation parameters
//!
//! Every field falls back to the matching `consts` default, so a partial JSON
//! document only overrides what it names.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Simulation tuning (canvas, player physics, projectile and goal geometry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub canvas_width: f32,
    /// Canvas height doubles as the floor line
    pub canvas_height: f32,
    pub spawn_x: f32,
    /// Spawn y is `floor - spawn_drop`
    pub spawn_drop: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub gravity: f32,
    pub jump_power: f32,
    pub max_jumps: u8,
    pub projectile_radius: f32,
    pub goal_width: f32,
    pub goal_height: f32,
    /// Goal x is `canvas_width - goal_inset`
    pub goal_inset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            spawn_x: SPAWN_X,
            spawn_drop: SPAWN_DROP,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            gravity: PLAYER_GRAVITY,
            jump_power: PLAYER_JUMP_POWER,
            max_jumps: MAX_JUMPS,
            projectile_radius: PROJECTILE_RADIUS,
            goal_width: GOAL_WIDTH,
            goal_height: GOAL_HEIGHT,
            goal_inset: GOAL_INSET,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        positive("gravity", self.gravity)?;
        positive("projectile_radius", self.projectile_radius)?;
        positive("goal_width", self.goal_width)?;
        positive("goal_height", self.goal_height)?;

        if !(self.jump_power.is_finite() && self.jump_power < 0.0) {
            return Err(ConfigError::Invalid {
                field: "jump_power",
                reason: "must be negative (upward)",
            });
        }
        if !(self.player_speed.is_finite() && self.player_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "player_speed",
                reason: "must be zero or positive",
            });
        }
        Ok(())
    }

    /// Floor line (bottom edge of the canvas)
    #[inline]
    pub fn floor(&self) -> f32 {
        self.canvas_height
    }

    /// Player spawn position
    #[inline]
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.floor() - self.spawn_drop)
    }

    /// Goal top-left corner
    #[inline]
    pub fn goal_pos(&self) -> Vec2 {
        Vec2::new(
            self.canvas_width - self.goal_inset,
            self.floor() - self.goal_height,
        )
    }
}
