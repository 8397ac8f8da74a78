//! Stage registry and stage lifecycle
//!
//! Stages form a fixed cycle: the goal advances one stage, and passing the
//! last stage wraps back to the first with an `AllStagesCleared` event.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, Obstacle};
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// One level layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTemplate {
    pub name: String,
    pub obstacles: Vec<Obstacle>,
}

impl StageTemplate {
    /// Validate every obstacle; `stage` is only used in the error
    pub fn validate(&self, stage: usize) -> Result<(), ConfigError> {
        for (obstacle, o) in self.obstacles.iter().enumerate() {
            o.validate().map_err(|reason| ConfigError::InvalidObstacle {
                stage,
                obstacle,
                reason,
            })?;
        }
        Ok(())
    }
}

/// Ordered, non-empty list of stage templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StageTemplate>", into = "Vec<StageTemplate>")]
pub struct StageRegistry {
    stages: Vec<StageTemplate>,
}

impl TryFrom<Vec<StageTemplate>> for StageRegistry {
    type Error = ConfigError;

    fn try_from(stages: Vec<StageTemplate>) -> Result<Self, Self::Error> {
        Self::new(stages)
    }
}

impl From<StageRegistry> for Vec<StageTemplate> {
    fn from(registry: StageRegistry) -> Self {
        registry.stages
    }
}

impl StageRegistry {
    /// Build a registry, rejecting an empty list or any invalid obstacle
    pub fn new(stages: Vec<StageTemplate>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::EmptyStages);
        }
        for (stage, template) in stages.iter().enumerate() {
            template.validate(stage)?;
        }
        Ok(Self { stages })
    }

    /// Parse a JSON array of stage templates (absolute coordinates)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let stages: Vec<StageTemplate> = serde_json::from_str(json)?;
        Self::new(stages)
    }

    /// The six built-in stages, laid out against the tuning's floor
    pub fn builtin(tuning: &Tuning) -> Self {
        let floor = tuning.floor();
        // Obstacle standing on the floor
        let block = |x: f32, w: f32, h: f32| Obstacle::new(x, floor - h, w, h);

        let stages = vec![
            StageTemplate {
                name: "Stage 1".into(),
                obstacles: vec![
                    block(200.0, 50.0, 70.0),
                    block(400.0, 50.0, 120.0),
                    block(600.0, 80.0, 60.0),
                ],
            },
            StageTemplate {
                name: "Stage 2".into(),
                obstacles: vec![
                    block(150.0, 30.0, 50.0),
                    block(300.0, 40.0, 100.0),
                    block(500.0, 60.0, 70.0),
                    block(700.0, 40.0, 90.0),
                ],
            },
            StageTemplate {
                name: "Stage 3".into(),
                obstacles: vec![
                    block(250.0, 50.0, 150.0),
                    block(450.0, 70.0, 100.0),
                    block(650.0, 40.0, 70.0),
                    block(720.0, 30.0, 120.0),
                ],
            },
            StageTemplate {
                name: "Stage 4 (Moving Obstacle)".into(),
                obstacles: vec![
                    block(200.0, 50.0, 70.0).with_horizontal(150.0, 1.0, 1.0),
                    block(500.0, 50.0, 100.0),
                ],
            },
            StageTemplate {
                name: "Stage 5 (Two Moving Obstacles)".into(),
                obstacles: vec![
                    block(150.0, 40.0, 80.0).with_horizontal(100.0, 0.8, 1.0),
                    block(400.0, 60.0, 120.0).with_horizontal(200.0, 1.2, -1.0),
                    block(700.0, 50.0, 60.0),
                ],
            },
            StageTemplate {
                name: "Stage 6 (Shooting Obstacle)".into(),
                obstacles: vec![
                    block(200.0, 50.0, 100.0),
                    block(400.0, 50.0, 70.0),
                    block(600.0, 50.0, 120.0),
                    block(800.0, 50.0, 90.0).with_shooter(2000.0, 2.0),
                ],
            },
        ];

        Self { stages }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when there are no stages
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StageTemplate> {
        self.stages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageTemplate> {
        self.stages.iter()
    }
}

/// Load a stage by index, wrapping to stage 0 past the end
///
/// Replaces the obstacle set with a fresh copy of the template and fully
/// resets the player. Active projectiles are left alone.
pub fn load_stage(state: &mut GameState, index: usize) {
    let index = if index < state.stages.len() {
        index
    } else {
        log::info!("All stages cleared! Restarting from stage 1");
        state.events.push(GameEvent::AllStagesCleared);
        0
    };

    // Registry is non-empty, so index 0 always exists
    if let Some(template) = state.stages.get(index) {
        state.obstacles.clear();
        state.obstacles.extend(template.obstacles.iter().cloned());
        log::info!(
            "Loaded stage {} ({}) with {} obstacles",
            index + 1,
            template.name,
            state.obstacles.len()
        );
    }

    state.stage_index = index;
    let spawn = state.spawn_point();
    state.player.reset(spawn);
    state.events.push(GameEvent::StageLoaded { index });
}

/// Move on to the next stage (goal reached)
pub fn advance_stage(state: &mut GameState) {
    let next = state.stage_index + 1;
    load_stage(state, next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_builtin_has_six_stages() {
        let registry = StageRegistry::builtin(&Tuning::default());
        assert_eq!(registry.len(), 6);
        assert!(!registry.is_empty());

        let first = &registry.get(0).unwrap().obstacles[0];
        assert_eq!(first.pos, Vec2::new(200.0, 230.0));
        assert_eq!(first.size, Vec2::new(50.0, 70.0));

        let shooters = registry
            .iter()
            .flat_map(|s| s.obstacles.iter())
            .filter(|o| o.shooter.is_some())
            .count();
        assert_eq!(shooters, 1);
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(matches!(
            StageRegistry::new(Vec::new()),
            Err(ConfigError::EmptyStages)
        ));
        assert!(matches!(
            StageRegistry::from_json("[]"),
            Err(ConfigError::EmptyStages)
        ));
    }

    #[test]
    fn test_invalid_obstacles_rejected() {
        let stage = |obstacle: &str| format!(r#"[{{ "name": "Bad", "obstacles": [{}] }}]"#, obstacle);
        let bad = [
            r#"{ "pos": [300.0, 250.0], "size": [20.0, 20.0],
                 "horizontal": { "initial": 300.0, "range": 100.0, "speed": 1.0, "direction": 0.0 } }"#,
            r#"{ "pos": [500.0, 250.0], "size": [20.0, 20.0],
                 "horizontal": { "initial": 500.0, "range": 100.0, "speed": 1.0, "direction": 3.0 } }"#,
            r#"{ "pos": [700.0, 250.0], "size": [-20.0, 20.0] }"#,
            r#"{ "pos": [700.0, 250.0], "size": [20.0, 20.0],
                 "vertical": { "initial": 250.0, "range": -10.0, "speed": 1.0, "direction": 1.0 } }"#,
            r#"{ "pos": [800.0, 210.0], "size": [50.0, 90.0],
                 "shooter": { "interval_ms": 0.0, "projectile_speed": 2.0 } }"#,
        ];
        for obstacle in bad {
            assert!(
                matches!(
                    StageRegistry::from_json(&stage(obstacle)),
                    Err(ConfigError::InvalidObstacle { stage: 0, obstacle: 0, .. })
                ),
                "accepted {}",
                obstacle
            );
        }

        // Valid first stage does not hide a bad second one
        let templates = vec![
            StageTemplate {
                name: "Fine".into(),
                obstacles: vec![Obstacle::new(100.0, 250.0, 20.0, 50.0)],
            },
            StageTemplate {
                name: "Broken".into(),
                obstacles: vec![
                    Obstacle::new(100.0, 250.0, 20.0, 50.0),
                    Obstacle::new(300.0, 250.0, 0.0, 50.0),
                ],
            },
        ];
        assert!(matches!(
            StageRegistry::new(templates),
            Err(ConfigError::InvalidObstacle { stage: 1, obstacle: 1, .. })
        ));
    }

    #[test]
    fn test_builtin_stages_pass_validation() {
        let builtin = StageRegistry::builtin(&Tuning::default());
        let stages: Vec<StageTemplate> = builtin.iter().cloned().collect();
        assert_eq!(StageRegistry::new(stages).unwrap(), builtin);
    }

    #[test]
    fn test_registry_from_json() {
        let json = r#"[
            { "name": "Tiny", "obstacles": [
                { "pos": [100.0, 250.0], "size": [20.0, 50.0] },
                { "pos": [300.0, 200.0], "size": [80.0, 10.0], "platform": true,
                  "vertical": { "initial": 200.0, "range": 40.0, "speed": 1.0, "direction": 1.0 } }
            ] }
        ]"#;
        let registry = StageRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 1);
        let stage = registry.get(0).unwrap();
        assert_eq!(stage.obstacles.len(), 2);
        assert!(stage.obstacles[1].platform);
        assert!(stage.obstacles[1].vertical.is_some());
        assert!(stage.obstacles[0].shooter.is_none());
    }

    #[test]
    fn test_load_stage_copies_template_and_resets_player() {
        let mut state = GameState::default();
        state.player.pos = Vec2::new(700.0, 10.0);
        state.player.vel = Vec2::new(3.0, -2.0);
        state.player.jump_count = 2;
        state.player.is_jumping = true;

        load_stage(&mut state, 2);
        assert_eq!(state.stage_index, 2);
        assert_eq!(state.obstacles, state.stages.get(2).unwrap().obstacles);
        assert_eq!(state.player.pos, Vec2::new(50.0, 250.0));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.player.jump_count, 0);
        assert!(!state.player.is_jumping);
    }

    #[test]
    fn test_template_not_mutated_by_play() {
        let mut state = GameState::default();
        load_stage(&mut state, 3);
        state.obstacles[0].pos.x += 40.0;
        assert_eq!(state.stages.get(3).unwrap().obstacles[0].pos.x, 200.0);

        load_stage(&mut state, 3);
        assert_eq!(state.obstacles[0].pos.x, 200.0);
    }

    #[test]
    fn test_advance_past_last_wraps() {
        let mut state = GameState::default();
        let last = state.stage_count() - 1;
        load_stage(&mut state, last);
        state.drain_events();

        advance_stage(&mut state);
        assert_eq!(state.stage_index, 0);
        assert_eq!(state.obstacles, state.stages.get(0).unwrap().obstacles);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::AllStagesCleared,
                GameEvent::StageLoaded { index: 0 }
            ]
        );
    }
}
