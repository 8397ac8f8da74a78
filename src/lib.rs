//! Stage Runner - A stage-based 2D platformer
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, stages, game state)
//! - `driver`: Per-frame orchestration over renderer/clock/notifier seams
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven simulation parameters
//! - `settings`: Key bindings and log level, loaded from LocalStorage or a file

pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use settings::{KeyBindings, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Canvas dimensions in pixels (floor is the bottom edge)
    pub const CANVAS_WIDTH: f32 = 1000.0;
    pub const CANVAS_HEIGHT: f32 = 300.0;

    /// Player spawn: x, and drop above the floor
    pub const SPAWN_X: f32 = 50.0;
    pub const SPAWN_DROP: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Downward acceleration per tick while airborne
    pub const PLAYER_GRAVITY: f32 = 0.2;
    /// Vertical velocity applied on jump (negative is up)
    pub const PLAYER_JUMP_POWER: f32 = -7.5;
    /// Jumps allowed before landing (triple jump)
    pub const MAX_JUMPS: u8 = 3;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 5.0;

    /// Goal zone, inset from the right edge and sitting on the floor
    pub const GOAL_WIDTH: f32 = 50.0;
    pub const GOAL_HEIGHT: f32 = 80.0;
    pub const GOAL_INSET: f32 = 80.0;
}

/// Axis-aligned rectangle overlap test (strict, touching edges do not overlap)
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}
