//! Per-frame simulation tick
//!
//! Order within a tick: apply buffered intents, integrate the player, resolve
//! collisions, move hazards, move projectiles. One tick is one unit step.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionReport, resolve_collisions};
use super::motion::update_hazards;
use super::physics::integrate;
use super::state::GameState;

/// A player command from the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveRight,
    MoveLeft,
    Stop,
    Jump,
}

/// Input buffered between ticks, applied in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    /// Clear one-shot input after a tick consumed it
    pub fn clear(&mut self) {
        self.intents.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Apply one intent to the player
pub fn apply_intent(state: &mut GameState, intent: Intent) {
    let player = &mut state.player;
    match intent {
        Intent::MoveRight => player.move_right(),
        Intent::MoveLeft => player.move_left(),
        Intent::Stop => player.stop(),
        Intent::Jump => {
            if !player.jump() {
                log::trace!("Jump ignored, budget spent");
            }
        }
    }
}

/// Advance the game state by one frame
///
/// `now_ms` is wall-clock time, used only for shooter cadence.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> CollisionReport {
    for &intent in &input.intents {
        apply_intent(state, intent);
    }

    state.time_ticks += 1;

    let floor = state.tuning.floor();
    integrate(&mut state.player, floor);

    let report = resolve_collisions(state);

    update_hazards(state, now_ms);

    report
}
