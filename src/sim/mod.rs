//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One unit step per tick (no delta-time scaling)
//! - Wall-clock time enters only through `tick`'s `now_ms`
//! - Stable iteration order (template order for obstacles, spawn order for
//!   projectiles)

pub mod collision;
pub mod motion;
pub mod physics;
pub mod stages;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, resolve_collisions};
pub use motion::{update_hazards, update_obstacles, update_projectiles};
pub use physics::integrate;
pub use stages::{StageRegistry, StageTemplate, advance_stage, load_stage};
pub use state::{
    Color, DeathCause, GameEvent, GameState, Goal, Obstacle, Oscillation, Player, Projectile,
    Shooter,
};
pub use tick::{Intent, TickInput, apply_intent, tick};
