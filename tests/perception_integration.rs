//! Perception agent integration tests: vision steps, memory, concealment

use glam::Vec3;

use hideout::core::config::PerceptionConfig;
use hideout::core::types::{EntityId, Pose, Seconds};
use hideout::host::ScriptedNavigator;
use hideout::perception::{
    AgentRegistry, DetectionAggregator, PerceptionAgent, PursuitState, TargetView, VisionOutcome,
};
use hideout::spatial::{Obstacle, ObstacleField};

struct Scene {
    player: EntityId,
    agent: PerceptionAgent,
    nav: ScriptedNavigator,
    walls: ObstacleField,
}

impl Scene {
    fn new() -> Self {
        let player = EntityId::new();
        Self {
            player,
            agent: PerceptionAgent::new(Pose::IDENTITY, PerceptionConfig::default(), Some(player), 42),
            nav: ScriptedNavigator::new(),
            walls: ObstacleField::new(),
        }
    }

    fn view(&self, position: Vec3, concealed: bool) -> TargetView {
        TargetView::new(self.player, position, concealed)
    }

    fn tick(&mut self, now: Seconds, view: Option<TargetView>) {
        self.agent.tick(now, view.as_ref(), &self.walls, &mut self.nav);
    }
}

fn in_view() -> Vec3 {
    Vec3::new(0.0, 0.0, 8.0)
}

fn behind() -> Vec3 {
    Vec3::new(0.0, 0.0, -8.0)
}

#[test]
fn test_scenario_target_beyond_view_distance() {
    let mut scene = Scene::new();
    let far = scene.view(Vec3::new(0.0, 0.0, 20.0), false);

    scene.tick(0.0, Some(far));
    assert_eq!(scene.agent.last_outcome(), VisionOutcome::TooFar);
    assert!(!scene.agent.detected());
}

#[test]
fn test_scenario_wall_blocks_sight() {
    let mut scene = Scene::new();
    scene.walls.add(Obstacle::centered(
        Vec3::new(0.0, 1.0, 4.0),
        Vec3::new(2.0, 2.0, 0.1),
    ));

    let view = scene.view(in_view(), false);
    scene.tick(0.0, Some(view));
    assert_eq!(scene.agent.last_outcome(), VisionOutcome::Occluded);
    assert_eq!(scene.agent.state(), PursuitState::Patrolling);
}

#[test]
fn test_detection_memory_window() {
    let mut scene = Scene::new();

    // Seen every 0.1s until t=10.0, then out of sight
    let mut t = 9.0;
    while t <= 10.0 + 1e-9 {
        let view = scene.view(in_view(), false);
        scene.tick(t, Some(view));
        t += 0.1;
    }
    scene.tick(10.0, Some(scene.view(in_view(), false)));
    assert_eq!(scene.agent.last_seen(), 10.0);

    scene.tick(12.9, Some(scene.view(behind(), false)));
    assert!(scene.agent.detected());
    assert_eq!(scene.agent.state(), PursuitState::Chasing);

    scene.tick(13.1, Some(scene.view(behind(), false)));
    assert!(!scene.agent.detected());
    assert_eq!(scene.agent.state(), PursuitState::Patrolling);
}

#[test]
fn test_chase_steers_to_target_each_tick() {
    let mut scene = Scene::new();
    scene.tick(0.0, Some(scene.view(in_view(), false)));
    assert_eq!(scene.nav.target_of(scene.agent.id()).unwrap().position, in_view());

    // Out of sight but remembered: still chasing the current position
    let moved = Vec3::new(0.0, 0.0, -6.0);
    scene.tick(1.0, Some(scene.view(moved, false)));
    assert_eq!(scene.agent.state(), PursuitState::Chasing);
    assert_eq!(scene.nav.target_of(scene.agent.id()).unwrap().position, moved);
}

#[test]
fn test_concealment_overrides_geometry() {
    let mut scene = Scene::new();

    scene.tick(0.0, Some(scene.view(in_view(), true)));
    assert_eq!(scene.agent.last_outcome(), VisionOutcome::Concealed);
    assert!(!scene.agent.detected());
}

#[test]
fn test_scenario_grace_window_after_hiding() {
    let mut scene = Scene::new();

    // Chasing since t=0 with the target in plain view
    let mut tick = 0;
    loop {
        let now = tick as f64 * 0.1;
        if now >= 1.0 - 1e-9 {
            break;
        }
        scene.tick(now, Some(scene.view(in_view(), false)));
        tick += 1;
    }
    assert_eq!(scene.agent.state(), PursuitState::Chasing);

    // Target hides at t=1.0 without moving
    scene.tick(1.0, Some(scene.view(in_view(), true)));
    assert!(scene.agent.last_outcome().is_visible());

    scene.tick(1.1, Some(scene.view(in_view(), true)));
    assert!(scene.agent.last_outcome().is_visible());

    scene.tick(1.3, Some(scene.view(in_view(), true)));
    assert_eq!(scene.agent.last_outcome(), VisionOutcome::Concealed);

    // Still remembered, forgotten after forget_time since the last sighting
    assert!(scene.agent.detected());
    scene.tick(4.0, Some(scene.view(in_view(), true)));
    assert!(scene.agent.detected());
    scene.tick(4.2, Some(scene.view(in_view(), true)));
    assert!(!scene.agent.detected());
}

#[test]
fn test_hiding_unseen_is_immediate() {
    let mut scene = Scene::new();
    scene.tick(0.0, Some(scene.view(behind(), false)));
    scene.tick(0.1, Some(scene.view(in_view(), true)));
    assert_eq!(scene.agent.last_outcome(), VisionOutcome::Concealed);
}

#[test]
fn test_revealing_resets_grace() {
    let mut scene = Scene::new();
    scene.tick(0.0, Some(scene.view(in_view(), false)));
    scene.tick(0.1, Some(scene.view(in_view(), true)));
    scene.tick(0.5, Some(scene.view(in_view(), true)));
    assert_eq!(scene.agent.last_outcome(), VisionOutcome::Concealed);

    scene.tick(0.6, Some(scene.view(in_view(), false)));
    assert!(scene.agent.last_outcome().is_visible());
}

#[test]
fn test_missing_target_keeps_patrolling() {
    let mut scene = Scene::new();
    for i in 0..50 {
        scene.tick(i as f64 * 0.1, None);
    }
    assert_eq!(scene.agent.state(), PursuitState::Patrolling);
    assert!(!scene.agent.detected());
    assert!(!scene.nav.history().is_empty());
}

#[test]
fn test_memory_expires_when_target_drops_out() {
    let mut scene = Scene::new();
    scene.tick(10.0, Some(scene.view(in_view(), false)));
    assert_eq!(scene.agent.state(), PursuitState::Chasing);

    // Host stops offering a view of the target
    scene.tick(12.9, None);
    assert!(scene.agent.detected());
    assert_eq!(scene.agent.state(), PursuitState::Chasing);

    scene.tick(13.1, None);
    assert!(!scene.agent.detected());
    assert_eq!(scene.agent.state(), PursuitState::Patrolling);
    assert_eq!(scene.agent.last_outcome(), VisionOutcome::NoTarget);
}

#[test]
fn test_aggregator_ors_every_agent() {
    let player = EntityId::new();
    let mut registry = AgentRegistry::new();
    let mut nav = ScriptedNavigator::new();
    let walls = ObstacleField::new();

    assert!(!DetectionAggregator::any_detected(&registry));

    let watcher = registry.spawn(PerceptionAgent::new(
        Pose::IDENTITY,
        PerceptionConfig::default(),
        Some(player),
        1,
    ));
    registry.spawn(PerceptionAgent::new(
        Pose::from_yaw(Vec3::ZERO, std::f32::consts::PI),
        PerceptionConfig::default(),
        Some(player),
        2,
    ));

    let view = TargetView::new(player, in_view(), false);
    for agent in registry.iter_mut() {
        agent.tick(0.0, Some(&view), &walls, &mut nav);
    }
    assert!(DetectionAggregator::any_detected(&registry));
    assert_eq!(DetectionAggregator::detecting_count(&registry), 1);

    registry.despawn(watcher);
    assert!(!DetectionAggregator::any_detected(&registry));
}
