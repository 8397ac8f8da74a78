//! Player integration
//!
//! One call advances the player by one frame. There is no delta-time scaling:
//! velocities are in pixels per tick.

use super::state::Player;

/// Advance the player by one tick and clamp to the floor
///
/// Horizontal motion is unbounded; the player may walk off either side.
pub fn integrate(player: &mut Player, floor: f32) {
    player.pos.x += player.vel.x;

    if player.is_jumping {
        player.vel.y += player.gravity;
        player.pos.y += player.vel.y;
    }

    if player.bottom() > floor {
        player.land_on(floor);
    }
}
