//! Obstacle motion, hazard firing and projectile movement

use glam::Vec2;

use super::state::{Color, GameEvent, GameState, Obstacle, Projectile};

/// Advance moving obstacles and fire any shooter whose interval has elapsed
///
/// Both motion axes update independently. Shooter cadence follows the wall
/// clock (`now_ms`), not the frame count. Returns the number of projectiles
/// fired.
pub fn update_obstacles(
    obstacles: &mut [Obstacle],
    projectiles: &mut Vec<Projectile>,
    projectile_radius: f32,
    now_ms: f64,
) -> usize {
    let mut fired = 0;

    for obstacle in obstacles.iter_mut() {
        if let Some(osc) = obstacle.horizontal.as_mut() {
            osc.step(&mut obstacle.pos.x);
        }
        if let Some(osc) = obstacle.vertical.as_mut() {
            osc.step(&mut obstacle.pos.y);
        }

        let center = obstacle.center();
        if let Some(shooter) = obstacle.shooter.as_mut() {
            if shooter.is_ready(now_ms) {
                projectiles.push(Projectile {
                    pos: center,
                    radius: projectile_radius,
                    color: Color::Purple,
                    vel: Vec2::new(-shooter.projectile_speed, 0.0),
                });
                shooter.last_shot_ms = now_ms;
                fired += 1;
            }
        }
    }

    fired
}

/// Advance projectiles and drop those outside `[0, canvas_width]`
pub fn update_projectiles(projectiles: &mut Vec<Projectile>, canvas_width: f32) {
    projectiles.retain_mut(|p| {
        p.pos += p.vel;
        p.pos.x >= 0.0 && p.pos.x <= canvas_width
    });
}

/// Run the hazard and projectile updates for a whole game state
pub fn update_hazards(state: &mut GameState, now_ms: f64) {
    let fired = update_obstacles(
        &mut state.obstacles,
        &mut state.projectiles,
        state.tuning.projectile_radius,
        now_ms,
    );
    for _ in 0..fired {
        log::debug!("Projectile fired at {:.0} ms", now_ms);
        state.events.push(GameEvent::ProjectileFired);
    }
    update_projectiles(&mut state.projectiles, state.tuning.canvas_width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn projectile_at(x: f32, speed: f32) -> Projectile {
        Projectile {
            pos: Vec2::new(x, 100.0),
            radius: 5.0,
            color: Color::Purple,
            vel: Vec2::new(-speed, 0.0),
        }
    }

    #[test]
    fn test_static_obstacles_do_not_move() {
        let mut obstacles = vec![Obstacle::new(10.0, 20.0, 30.0, 40.0)];
        let mut projectiles = Vec::new();
        update_obstacles(&mut obstacles, &mut projectiles, 5.0, 10_000.0);
        assert_eq!(obstacles[0].pos, Vec2::new(10.0, 20.0));
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_empty_sets_are_fine() {
        let mut obstacles: Vec<Obstacle> = Vec::new();
        let mut projectiles = Vec::new();
        assert_eq!(update_obstacles(&mut obstacles, &mut projectiles, 5.0, 0.0), 0);
        update_projectiles(&mut projectiles, 1000.0);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_both_axes_move_independently() {
        let mut obstacles = vec![
            Obstacle::new(100.0, 100.0, 10.0, 10.0)
                .with_horizontal(50.0, 2.0, 1.0)
                .with_vertical(20.0, 1.0, -1.0),
        ];
        let mut projectiles = Vec::new();
        update_obstacles(&mut obstacles, &mut projectiles, 5.0, 0.0);
        assert_eq!(obstacles[0].pos, Vec2::new(102.0, 99.0));
        // Vertical stepped below its band and reversed; horizontal did not
        assert_eq!(obstacles[0].vertical.unwrap().direction, 1.0);
        assert_eq!(obstacles[0].horizontal.unwrap().direction, 1.0);
    }

    #[test]
    fn test_shooter_fires_from_center_on_wall_clock() {
        let mut obstacles = vec![Obstacle::new(800.0, 210.0, 50.0, 90.0).with_shooter(2000.0, 2.0)];
        let mut projectiles = Vec::new();

        // Not yet: 2000 - 0 is not strictly greater than 2000
        assert_eq!(update_obstacles(&mut obstacles, &mut projectiles, 5.0, 2000.0), 0);

        assert_eq!(update_obstacles(&mut obstacles, &mut projectiles, 5.0, 2001.0), 1);
        let p = &projectiles[0];
        assert_eq!(p.pos, Vec2::new(825.0, 255.0));
        assert_eq!(p.radius, 5.0);
        assert_eq!(p.color, Color::Purple);
        assert_eq!(p.vel, Vec2::new(-2.0, 0.0));
        assert_eq!(obstacles[0].shooter.unwrap().last_shot_ms, 2001.0);

        // Many frames inside the interval fire nothing
        for t in 0..100 {
            update_obstacles(&mut obstacles, &mut projectiles, 5.0, 2001.0 + t as f64 * 16.0);
        }
        assert_eq!(projectiles.len(), 1);

        update_obstacles(&mut obstacles, &mut projectiles, 5.0, 4002.0);
        assert_eq!(projectiles.len(), 2);
    }

    #[test]
    fn test_projectiles_pruned_at_both_edges() {
        let mut projectiles = vec![
            projectile_at(1.0, 2.0),
            projectile_at(500.0, 2.0),
            Projectile {
                vel: Vec2::new(3.0, 0.0),
                ..projectile_at(999.0, 0.0)
            },
            projectile_at(0.5, 2.0),
        ];
        update_projectiles(&mut projectiles, 1000.0);
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].pos.x, 498.0);
    }

    #[test]
    fn test_projectile_kept_on_exact_edge() {
        let mut projectiles = vec![projectile_at(2.0, 2.0)];
        update_projectiles(&mut projectiles, 1000.0);
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].pos.x, 0.0);
        update_projectiles(&mut projectiles, 1000.0);
        assert!(projectiles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_oscillation_stays_in_band(
            initial in 0.0f32..500.0,
            range in 1.0f32..300.0,
            speed in 0.1f32..5.0,
            negative in any::<bool>(),
            ticks in 1usize..2000,
        ) {
            let direction = if negative { -1.0 } else { 1.0 };
            let mut obstacles = vec![
                Obstacle::new(initial, 0.0, 10.0, 10.0).with_horizontal(range, speed, direction),
            ];
            let mut projectiles = Vec::new();
            let slack = speed + 1e-3;
            for _ in 0..ticks {
                update_obstacles(&mut obstacles, &mut projectiles, 5.0, 0.0);
                let x = obstacles[0].pos.x;
                prop_assert!(x >= initial - slack && x <= initial + range + slack);
            }
        }

        #[test]
        fn prop_vertical_oscillation_stays_in_band(
            initial in 0.0f32..300.0,
            range in 1.0f32..200.0,
            speed in 0.1f32..5.0,
            negative in any::<bool>(),
            ticks in 1usize..2000,
        ) {
            let direction = if negative { -1.0 } else { 1.0 };
            let mut obstacles = vec![
                Obstacle::new(0.0, initial, 10.0, 10.0).with_vertical(range, speed, direction),
            ];
            let mut projectiles = Vec::new();
            let slack = speed + 1e-3;
            for _ in 0..ticks {
                update_obstacles(&mut obstacles, &mut projectiles, 5.0, 0.0);
                let y = obstacles[0].pos.y;
                prop_assert!(y >= initial - slack && y <= initial + range + slack);
                prop_assert_eq!(obstacles[0].pos.x, 0.0);
            }
        }

        #[test]
        fn prop_both_axes_stay_in_their_bands(
            x0 in 0.0f32..500.0,
            y0 in 0.0f32..300.0,
            range_x in 1.0f32..300.0,
            range_y in 1.0f32..200.0,
            speed_x in 0.1f32..5.0,
            speed_y in 0.1f32..5.0,
            ticks in 1usize..2000,
        ) {
            let mut obstacles = vec![
                Obstacle::new(x0, y0, 10.0, 10.0)
                    .with_horizontal(range_x, speed_x, 1.0)
                    .with_vertical(range_y, speed_y, -1.0),
            ];
            let mut projectiles = Vec::new();
            for _ in 0..ticks {
                update_obstacles(&mut obstacles, &mut projectiles, 5.0, 0.0);
                let pos = obstacles[0].pos;
                prop_assert!(pos.x >= x0 - speed_x - 1e-3 && pos.x <= x0 + range_x + speed_x + 1e-3);
                prop_assert!(pos.y >= y0 - speed_y - 1e-3 && pos.y <= y0 + range_y + speed_y + 1e-3);
            }
        }

        #[test]
        fn prop_projectile_moves_by_speed(start in 100.0f32..900.0, speed in 0.5f32..4.0) {
            let mut projectiles = vec![projectile_at(start, speed)];
            let mut last = start;
            while let Some(p) = projectiles.first() {
                prop_assert!(p.pos.x >= 0.0);
                let before = last;
                update_projectiles(&mut projectiles, 1000.0);
                match projectiles.first() {
                    Some(p) => {
                        prop_assert!((before - p.pos.x - speed).abs() < 1e-3);
                        last = p.pos.x;
                    }
                    None => prop_assert!(before - speed < 0.0),
                }
            }
        }
    }
}
