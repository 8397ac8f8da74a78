//! Scene assembly: game state to a triangle list

use super::shapes::{circle, rect, tint};
use super::vertex::{Vertex, colors, rgba};
use crate::sim::GameState;

/// Segments per projectile circle
const PROJECTILE_SEGMENTS: u32 = 12;

/// Build the vertices for one frame in draw order: player, obstacles, goal,
/// projectiles
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        6 * (2 + state.obstacles.len())
            + 3 * PROJECTILE_SEGMENTS as usize * state.projectiles.len(),
    );

    vertices.extend(rect(state.player.pos, state.player.size, colors::BLUE));

    for obstacle in &state.obstacles {
        let mut color = rgba(obstacle.color);
        if obstacle.platform {
            color = tint(color, colors::PLATFORM_TINT);
        }
        vertices.extend(rect(obstacle.pos, obstacle.size, color));
    }

    vertices.extend(rect(state.goal.pos, state.goal.size, rgba(state.goal.color)));

    for p in &state.projectiles {
        vertices.extend(circle(p.pos, p.radius, rgba(p.color), PROJECTILE_SEGMENTS));
    }

    vertices
}
