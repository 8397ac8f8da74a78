//! Game state and core simulation types
//!
//! All state the frame loop mutates lives in `GameState`; there are no
//! free-standing globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::stages::{StageRegistry, load_stage};
use crate::tuning::Tuning;

/// Fill color of an entity (mapped to RGBA by the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Red,
    Green,
    Blue,
    Purple,
}

/// Back-and-forth motion along one axis
///
/// The coordinate oscillates within `[initial, initial + range]`; the
/// direction flips once a step lands strictly outside the band, so a single
/// step of overshoot is possible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub initial: f32,
    pub range: f32,
    pub speed: f32,
    /// +1.0 or -1.0
    pub direction: f32,
}

impl Oscillation {
    pub fn new(initial: f32, range: f32, speed: f32, direction: f32) -> Self {
        Self {
            initial,
            range,
            speed,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
        }
    }

    /// Signed displacement of the next step
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.speed * self.direction
    }

    /// Reject a band, speed or direction that breaks the oscillation
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.initial.is_finite() {
            return Err("oscillation start must be finite");
        }
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err("oscillation range must be positive");
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err("oscillation speed must be positive");
        }
        if self.direction != 1.0 && self.direction != -1.0 {
            return Err("oscillation direction must be 1 or -1");
        }
        Ok(())
    }

    /// Advance `coord` one step and reverse at the band edges
    pub fn step(&mut self, coord: &mut f32) {
        *coord += self.velocity();
        if *coord > self.initial + self.range || *coord < self.initial {
            self.direction = -self.direction;
        }
    }
}

/// Periodic projectile emitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shooter {
    /// Minimum wall-clock gap between shots (ms)
    pub interval_ms: f64,
    /// Leftward projectile speed (pixels per tick)
    pub projectile_speed: f32,
    /// Wall-clock time of the last shot (ms)
    #[serde(default)]
    pub last_shot_ms: f64,
}

impl Shooter {
    pub fn new(interval_ms: f64, projectile_speed: f32) -> Self {
        Self {
            interval_ms,
            projectile_speed,
            last_shot_ms: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.interval_ms.is_finite() && self.interval_ms > 0.0) {
            return Err("shot interval must be positive");
        }
        if !(self.projectile_speed.is_finite() && self.projectile_speed > 0.0) {
            return Err("projectile speed must be positive");
        }
        Ok(())
    }

    /// True once strictly more than `interval_ms` has passed since the last shot
    #[inline]
    pub fn is_ready(&self, now_ms: f64) -> bool {
        now_ms - self.last_shot_ms > self.interval_ms
    }
}

/// A rectangle in the stage
///
/// Capabilities compose: any obstacle may be a platform, move on either or
/// both axes, and shoot. Without `platform` it is lethal on contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub color: Color,
    /// Walkable top surface instead of lethal contact
    #[serde(default)]
    pub platform: bool,
    #[serde(default)]
    pub horizontal: Option<Oscillation>,
    #[serde(default)]
    pub vertical: Option<Oscillation>,
    #[serde(default)]
    pub shooter: Option<Shooter>,
}

impl Obstacle {
    /// Static red obstacle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            color: Color::Red,
            platform: false,
            horizontal: None,
            vertical: None,
            shooter: None,
        }
    }

    /// Make this obstacle a landable platform
    pub fn as_platform(mut self) -> Self {
        self.platform = true;
        self
    }

    /// Oscillate horizontally starting from the current x
    pub fn with_horizontal(mut self, range: f32, speed: f32, direction: f32) -> Self {
        self.horizontal = Some(Oscillation::new(self.pos.x, range, speed, direction));
        self
    }

    /// Oscillate vertically starting from the current y
    pub fn with_vertical(mut self, range: f32, speed: f32, direction: f32) -> Self {
        self.vertical = Some(Oscillation::new(self.pos.y, range, speed, direction));
        self
    }

    /// Emit projectiles every `interval_ms`
    pub fn with_shooter(mut self, interval_ms: f64, projectile_speed: f32) -> Self {
        self.shooter = Some(Shooter::new(interval_ms, projectile_speed));
        self
    }

    /// Check geometry and every attached capability
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.pos.is_finite() {
            return Err("position must be finite");
        }
        if !(self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0) {
            return Err("size must be positive");
        }
        for osc in [&self.horizontal, &self.vertical].into_iter().flatten() {
            osc.validate()?;
        }
        if let Some(shooter) = &self.shooter {
            shooter.validate()?;
        }
        Ok(())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-tick velocity; x comes from move intents, y from gravity/jumps
    pub vel: Vec2,
    pub speed: f32,
    pub gravity: f32,
    pub jump_power: f32,
    pub is_jumping: bool,
    /// Jumps used since last landing
    pub jump_count: u8,
    pub max_jumps: u8,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.spawn_point(),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            vel: Vec2::ZERO,
            speed: tuning.player_speed,
            gravity: tuning.gravity,
            jump_power: tuning.jump_power,
            is_jumping: false,
            jump_count: 0,
            max_jumps: tuning.max_jumps,
        }
    }

    pub fn move_right(&mut self) {
        self.vel.x = self.speed;
    }

    pub fn move_left(&mut self) {
        self.vel.x = -self.speed;
    }

    pub fn stop(&mut self) {
        self.vel.x = 0.0;
    }

    /// Jump (mid-air included) while the jump budget lasts.
    /// Returns false when the budget is spent.
    pub fn jump(&mut self) -> bool {
        if self.jump_count >= self.max_jumps {
            return false;
        }
        self.is_jumping = true;
        self.vel.y = self.jump_power;
        self.jump_count += 1;
        true
    }

    /// Stand on a surface whose top is at `surface_y`
    pub fn land_on(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.size.y;
        self.vel.y = 0.0;
        self.is_jumping = false;
        self.jump_count = 0;
    }

    /// Move back to spawn, keeping velocity and jump state (lethal hits)
    pub fn respawn(&mut self, spawn: Vec2) {
        self.pos = spawn;
    }

    /// Move back to spawn and clear all motion (stage loads)
    pub fn reset(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.is_jumping = false;
        self.jump_count = 0;
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// A projectile emitted by a shooter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub vel: Vec2,
}

impl Projectile {
    /// Top-left corner of the bounding box
    #[inline]
    pub fn bounds_pos(&self) -> Vec2 {
        self.pos - Vec2::splat(self.radius)
    }

    #[inline]
    pub fn bounds_size(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }
}

/// Stage exit zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
}

impl Goal {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.goal_pos(),
            size: Vec2::new(tuning.goal_width, tuning.goal_height),
            color: Color::Green,
        }
    }
}

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Obstacle,
    Projectile,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A stage was (re)loaded
    StageLoaded { index: usize },
    /// The last stage was cleared; play restarts from stage 0
    AllStagesCleared,
    /// Lethal contact; player sent back to spawn
    PlayerKilled { cause: DeathCause },
    /// A shooter emitted a projectile
    ProjectileFired,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub stages: StageRegistry,
    /// Current stage (0-based)
    pub stage_index: usize,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub goal: Goal,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game at stage 0
    pub fn new(tuning: Tuning, stages: StageRegistry) -> Self {
        let mut state = Self {
            player: Player::new(&tuning),
            goal: Goal::new(&tuning),
            tuning,
            stages,
            stage_index: 0,
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
        };
        load_stage(&mut state, 0);
        state
    }

    /// Number of stages in the registry
    #[inline]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Player spawn position
    #[inline]
    pub fn spawn_point(&self) -> Vec2 {
        self.tuning.spawn_point()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for GameState {
    fn default() -> Self {
        let tuning = Tuning::default();
        let stages = StageRegistry::builtin(&tuning);
        Self::new(tuning, stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_budget() {
        let mut player = Player::new(&Tuning::default());
        assert!(player.jump());
        assert!(player.jump());
        assert!(player.jump());
        assert!(!player.jump());
        assert_eq!(player.jump_count, 3);
        assert!(player.is_jumping);
    }

    #[test]
    fn test_move_intents_persist() {
        let mut player = Player::new(&Tuning::default());
        player.move_right();
        assert_eq!(player.vel.x, player.speed);
        player.move_left();
        assert_eq!(player.vel.x, -player.speed);
        player.stop();
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_respawn_keeps_motion() {
        let mut player = Player::new(&Tuning::default());
        player.move_right();
        player.jump();
        player.pos = Vec2::new(400.0, 10.0);

        player.respawn(Vec2::new(50.0, 250.0));
        assert_eq!(player.pos, Vec2::new(50.0, 250.0));
        assert!(player.is_jumping);
        assert_eq!(player.jump_count, 1);
        assert_eq!(player.vel.x, player.speed);

        player.reset(Vec2::new(50.0, 250.0));
        assert!(!player.is_jumping);
        assert_eq!(player.jump_count, 0);
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_oscillation_reverses_outside_band() {
        let mut osc = Oscillation::new(0.0, 2.0, 1.0, 1.0);
        let mut x = 0.0;
        osc.step(&mut x); // 1
        osc.step(&mut x); // 2, still inside
        assert_eq!(osc.direction, 1.0);
        osc.step(&mut x); // 3, outside
        assert_eq!(x, 3.0);
        assert_eq!(osc.direction, -1.0);
        osc.step(&mut x);
        assert_eq!(x, 2.0);
    }

    #[test]
    fn test_obstacle_validation() {
        let ok = Obstacle::new(100.0, 200.0, 20.0, 30.0)
            .with_horizontal(50.0, 1.0, -1.0)
            .with_shooter(2000.0, 2.0);
        assert!(ok.validate().is_ok());

        let mut stalled = ok.clone();
        stalled.horizontal = Some(Oscillation {
            direction: 0.0,
            ..Oscillation::new(100.0, 50.0, 1.0, 1.0)
        });
        assert!(stalled.validate().is_err());

        let mut fast = ok.clone();
        fast.horizontal = Some(Oscillation {
            direction: 3.0,
            ..Oscillation::new(100.0, 50.0, 1.0, 1.0)
        });
        assert!(fast.validate().is_err());

        assert!(Obstacle::new(0.0, 0.0, -20.0, 20.0).validate().is_err());
        assert!(Obstacle::new(0.0, 0.0, 20.0, 20.0)
            .with_vertical(0.0, 1.0, 1.0)
            .validate()
            .is_err());
        assert!(Obstacle::new(0.0, 0.0, 20.0, 20.0)
            .with_shooter(0.0, 2.0)
            .validate()
            .is_err());
        assert!(Obstacle::new(0.0, 0.0, 20.0, 20.0)
            .with_shooter(2000.0, -1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_shooter_ready_is_strict() {
        let shooter = Shooter::new(2000.0, 2.0);
        assert!(!shooter.is_ready(2000.0));
        assert!(shooter.is_ready(2000.5));
    }

    #[test]
    fn test_new_state_starts_at_stage_zero() {
        let mut state = GameState::default();
        assert_eq!(state.stage_index, 0);
        assert_eq!(state.obstacles, state.stages.get(0).unwrap().obstacles);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::StageLoaded { index: 0 }]
        );
        assert!(state.events.is_empty());
    }
}
