//! Frame driver
//!
//! Runs one animation frame: clear and draw the current state, tick the
//! simulation, surface notices, then tell the host whether to schedule the
//! next frame. The host owns the actual scheduling primitive
//! (requestAnimationFrame on the web, a plain loop natively).

use crate::sim::{GameEvent, GameState, Intent, TickInput, tick};

/// Message shown when the last stage is cleared
pub const ALL_CLEARED_NOTICE: &str = "All Stages Cleared! Restarting from Stage 1!";

/// Draws the game state
pub trait Renderer {
    /// Clear the frame
    fn clear(&mut self);
    /// Draw player, obstacles, goal and projectiles
    fn draw(&mut self, state: &GameState);
}

/// Wall-clock source (milliseconds)
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Blocking user-visible message
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// Owns the game state and the collaborators for the frame loop
pub struct FrameDriver<R, C, N> {
    pub state: GameState,
    pub renderer: R,
    pub clock: C,
    pub notifier: N,
    /// Intents received since the last frame
    input: TickInput,
    running: bool,
}

impl<R: Renderer, C: Clock, N: Notifier> FrameDriver<R, C, N> {
    pub fn new(state: GameState, renderer: R, clock: C, notifier: N) -> Self {
        Self {
            state,
            renderer,
            clock,
            notifier,
            input: TickInput::default(),
            running: true,
        }
    }

    /// Buffer an intent for the next frame
    pub fn push_intent(&mut self, intent: Intent) {
        self.input.push(intent);
    }

    /// Stop the loop; subsequent frames do nothing
    pub fn cancel(&mut self) {
        if self.running {
            log::info!("Frame loop cancelled after {} ticks", self.state.time_ticks);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one frame and report whether to reschedule
    pub fn frame(&mut self) -> FrameStatus {
        if !self.running {
            return FrameStatus::Stopped;
        }

        self.renderer.clear();
        self.renderer.draw(&self.state);

        let now = self.clock.now_ms();
        tick(&mut self.state, &self.input, now);
        self.input.clear();

        for event in self.state.drain_events() {
            match event {
                GameEvent::AllStagesCleared => self.notifier.notify(ALL_CLEARED_NOTICE),
                GameEvent::StageLoaded { index } => {
                    log::info!("Stage {} of {}", index + 1, self.state.stage_count());
                }
                GameEvent::PlayerKilled { cause } => log::debug!("Player killed by {:?}", cause),
                GameEvent::ProjectileFired => {}
            }
        }

        if self.running {
            FrameStatus::Continue
        } else {
            FrameStatus::Stopped
        }
    }
}
