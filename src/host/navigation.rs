//! Navigation collaborator
//!
//! Pathfinding lives in the host engine. Agents only ask for reachable
//! points and hand over steering targets.

use ahash::AHashMap;
use glam::Vec3;

use crate::core::types::{AgentId, Pose};

pub trait NavigationService {
    /// Snap a point to the navigable surface, searching within `radius`
    fn find_reachable_point(&mut self, center: Vec3, radius: f32) -> Option<Pose>;

    /// Ask the steering layer to move `agent` towards `target`
    fn set_steering_target(&mut self, agent: AgentId, target: Pose);

    /// Whether `agent` currently has an active path
    fn has_path(&self, agent: AgentId) -> bool;
}

/// Navigation double that records requests instead of moving anything
///
/// Every point is reachable unless `reachable` is cleared. Paths stay active
/// until [`ScriptedNavigator::arrive`] is called.
#[derive(Debug, Clone)]
pub struct ScriptedNavigator {
    pub reachable: bool,
    targets: AHashMap<AgentId, Pose>,
    history: Vec<(AgentId, Pose)>,
}

impl Default for ScriptedNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedNavigator {
    pub fn new() -> Self {
        Self {
            reachable: true,
            targets: AHashMap::new(),
            history: Vec::new(),
        }
    }

    /// Navigator on which every reachability query fails
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    /// Current steering target for an agent
    pub fn target_of(&self, agent: AgentId) -> Option<Pose> {
        self.targets.get(&agent).copied()
    }

    /// Every steering request in order
    pub fn history(&self) -> &[(AgentId, Pose)] {
        &self.history
    }

    /// Mark the agent's current path as finished
    pub fn arrive(&mut self, agent: AgentId) {
        self.targets.remove(&agent);
    }
}

impl NavigationService for ScriptedNavigator {
    fn find_reachable_point(&mut self, center: Vec3, _radius: f32) -> Option<Pose> {
        self.reachable.then(|| Pose::at(center))
    }

    fn set_steering_target(&mut self, agent: AgentId, target: Pose) {
        self.targets.insert(agent, target);
        self.history.push((agent, target));
    }

    fn has_path(&self, agent: AgentId) -> bool {
        self.targets.contains_key(&agent)
    }
}
