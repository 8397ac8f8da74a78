//! Collision detection and response
//!
//! Resolution order per tick is fixed: obstacles, then projectiles, then the
//! goal. Every test is an axis-aligned box overlap.

use super::stages::advance_stage;
use super::state::{DeathCause, GameEvent, GameState, Obstacle, Player, Projectile};
use crate::aabb_overlap;

/// What the resolver did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Lethal obstacle overlaps
    pub obstacle_hits: u32,
    /// Platform landings
    pub landings: u32,
    /// Projectiles that hit the player (and were removed)
    pub projectile_hits: u32,
    /// Goal reached; the next stage has been loaded
    pub goal_reached: bool,
}

#[inline]
fn player_overlaps_obstacle(player: &Player, obstacle: &Obstacle) -> bool {
    aabb_overlap(player.pos, player.size, obstacle.pos, obstacle.size)
}

/// Circle approximated by its bounding box
#[inline]
fn player_overlaps_projectile(player: &Player, projectile: &Projectile) -> bool {
    aabb_overlap(
        player.pos,
        player.size,
        projectile.bounds_pos(),
        projectile.bounds_size(),
    )
}

/// True when the player was above the platform top on the previous tick and
/// is moving down
#[inline]
fn is_landing_on(player: &Player, platform: &Obstacle) -> bool {
    player.vel.y > 0.0 && player.bottom() - player.vel.y <= platform.pos.y
}

/// Resolve player vs obstacles, projectiles and goal
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    let spawn = state.spawn_point();

    // Obstacles: every overlap is applied, later ones overwrite earlier ones
    for obstacle in &state.obstacles {
        if !player_overlaps_obstacle(&state.player, obstacle) {
            continue;
        }

        if obstacle.platform {
            if is_landing_on(&state.player, obstacle) {
                state.player.land_on(obstacle.pos.y);
                // Ride along with a vertically moving platform
                if let Some(osc) = obstacle.vertical.as_ref().filter(|osc| osc.range != 0.0) {
                    state.player.pos.y += osc.velocity();
                }
                report.landings += 1;
            }
        } else {
            state.player.respawn(spawn);
            report.obstacle_hits += 1;
            state.events.push(GameEvent::PlayerKilled {
                cause: DeathCause::Obstacle,
            });
        }
    }

    // Projectiles: each one is tested against the player's current position
    let player = &mut state.player;
    let events = &mut state.events;
    state.projectiles.retain(|p| {
        if player_overlaps_projectile(player, p) {
            player.respawn(spawn);
            report.projectile_hits += 1;
            events.push(GameEvent::PlayerKilled {
                cause: DeathCause::Projectile,
            });
            false
        } else {
            true
        }
    });

    if report.obstacle_hits + report.projectile_hits > 0 {
        log::debug!(
            "Player hit ({} obstacle, {} projectile) - back to spawn",
            report.obstacle_hits,
            report.projectile_hits
        );
    }

    // Goal
    let goal = &state.goal;
    if aabb_overlap(state.player.pos, state.player.size, goal.pos, goal.size) {
        log::info!("Goal reached on stage {}", state.stage_index + 1);
        report.goal_reached = true;
        advance_stage(state);
    }

    report
}
