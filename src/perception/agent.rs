//! Per-enemy perception and pursuit
//!
//! Each agent runs the vision test once per tick against the target it was
//! given at construction, remembers its last positive sighting for
//! `forget_time`, and either chases the target or wanders around its
//! current position. Movement itself belongs to the host: the agent only
//! hands steering targets to a [`NavigationService`].

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::config::PerceptionConfig;
use crate::core::types::{AgentId, EntityId, Pose, Seconds};
use crate::host::navigation::NavigationService;
use crate::perception::vision::{TargetView, VisionCone, VisionOutcome};
use crate::spatial::OcclusionProbe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PursuitState {
    #[default]
    Patrolling,
    Chasing,
}

/// Perception notifications
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PerceptionEvent {
    /// Agent started chasing
    Spotted { agent: AgentId },
    /// Forget window elapsed; agent went back to patrolling
    Lost { agent: AgentId },
    /// Agent reached an unconcealed target
    Caught { agent: AgentId },
}

impl PerceptionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PerceptionEvent::Spotted { .. } => "spotted",
            PerceptionEvent::Lost { .. } => "lost",
            PerceptionEvent::Caught { .. } => "caught",
        }
    }

    pub fn agent(&self) -> AgentId {
        match *self {
            PerceptionEvent::Spotted { agent }
            | PerceptionEvent::Lost { agent }
            | PerceptionEvent::Caught { agent } => agent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PerceptionAgent {
    id: AgentId,
    pose: Pose,
    config: PerceptionConfig,
    cone: VisionCone,
    /// Injected target handle; `None` disables vision entirely
    target: Option<EntityId>,
    state: PursuitState,
    last_seen: Seconds,
    next_wander_at: Seconds,
    /// Last wander attempt found no reachable point
    wander_failed: bool,
    detected: bool,
    /// Concealment override deadline, fixed when the target is first
    /// observed concealed and cleared once it is not
    conceal_deadline: Option<Seconds>,
    in_contact: bool,
    last_outcome: VisionOutcome,
    rng: ChaCha8Rng,
}

impl PerceptionAgent {
    pub fn new(
        pose: Pose,
        config: PerceptionConfig,
        target: Option<EntityId>,
        seed: u64,
    ) -> Self {
        Self {
            id: AgentId::new(),
            pose,
            cone: VisionCone::from_config(&config),
            config,
            target,
            state: PursuitState::Patrolling,
            last_seen: Seconds::NEG_INFINITY,
            next_wander_at: 0.0,
            wander_failed: false,
            detected: false,
            conceal_deadline: None,
            in_contact: false,
            last_outcome: VisionOutcome::NoTarget,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Hosts move agents; push the current pose before each tick
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn state(&self) -> PursuitState {
        self.state
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    pub fn last_seen(&self) -> Seconds {
        self.last_seen
    }

    pub fn next_wander_at(&self) -> Seconds {
        self.next_wander_at
    }

    /// Outcome of the most recent vision test
    pub fn last_outcome(&self) -> VisionOutcome {
        self.last_outcome
    }

    /// Run the vision test without changing any state
    pub fn can_see(
        &self,
        now: Seconds,
        view: &TargetView,
        occlusion: &dyn OcclusionProbe,
    ) -> VisionOutcome {
        let concealment_applies = view.concealed && now > self.deadline_for(now);
        self.cone.test(&self.pose, view, occlusion, concealment_applies)
    }

    fn deadline_for(&self, onset: Seconds) -> Seconds {
        if let Some(deadline) = self.conceal_deadline {
            return deadline;
        }

        // A sighting within the grace window of the target hiding keeps it
        // visible until the window closes; otherwise hiding works at once.
        if onset - self.last_seen <= self.config.conceal_grace_window {
            onset + self.config.conceal_grace_window
        } else {
            Seconds::NEG_INFINITY
        }
    }

    /// Advance one tick at absolute time `now`
    ///
    /// `view` is the current view of the target, or `None` if the host has
    /// no target to offer. Views of entities other than the injected target
    /// are ignored.
    pub fn tick(
        &mut self,
        now: Seconds,
        view: Option<&TargetView>,
        occlusion: &dyn OcclusionProbe,
        nav: &mut dyn NavigationService,
    ) -> Vec<PerceptionEvent> {
        let mut events = Vec::new();
        let view = view.filter(|v| Some(v.entity) == self.target);

        if let Some(view) = view {
            if view.concealed {
                self.conceal_deadline = Some(self.deadline_for(now));
            } else {
                self.conceal_deadline = None;
            }

            let outcome = self.can_see(now, view, occlusion);
            self.last_outcome = outcome;
            self.update_memory(now, outcome.is_visible(), &mut events);
            self.update_contact(view, &mut events);
        } else {
            // Nothing to look at still counts as not seeing it
            self.last_outcome = VisionOutcome::NoTarget;
            self.update_memory(now, false, &mut events);
        }

        match (self.state, view) {
            (PursuitState::Chasing, Some(view)) => {
                nav.set_steering_target(self.id, Pose::new(view.position, self.pose.rotation));
            }
            _ => {
                if now >= self.next_wander_at || (!nav.has_path(self.id) && !self.wander_failed) {
                    self.wander(now, nav);
                }
            }
        }

        events
    }

    fn update_memory(&mut self, now: Seconds, visible: bool, events: &mut Vec<PerceptionEvent>) {
        if visible {
            self.last_seen = now;
            self.detected = true;
            if self.state != PursuitState::Chasing {
                tracing::debug!(agent = ?self.id, "Target spotted");
                self.state = PursuitState::Chasing;
                events.push(PerceptionEvent::Spotted { agent: self.id });
            }
        } else if now - self.last_seen > self.config.forget_time {
            self.detected = false;
            if self.state != PursuitState::Patrolling {
                tracing::debug!(agent = ?self.id, "Target lost");
                self.state = PursuitState::Patrolling;
                events.push(PerceptionEvent::Lost { agent: self.id });
            }
        }
    }

    fn update_contact(&mut self, view: &TargetView, events: &mut Vec<PerceptionEvent>) {
        let touching = !view.concealed
            && self.pose.position.distance(view.position) <= self.config.catch_radius;

        if touching && !self.in_contact {
            tracing::debug!(agent = ?self.id, "Target caught");
            events.push(PerceptionEvent::Caught { agent: self.id });
        }
        self.in_contact = touching;
    }

    fn wander(&mut self, now: Seconds, nav: &mut dyn NavigationService) {
        let radius = self.config.wander_radius.max(0.0);
        let sample = self.pose.position + self.random_in_unit_sphere() * radius;

        match nav.find_reachable_point(sample, radius) {
            Some(point) => {
                nav.set_steering_target(self.id, point);
                self.wander_failed = false;
            }
            None => {
                tracing::trace!(agent = ?self.id, "No reachable wander point");
                self.wander_failed = true;
            }
        }

        self.next_wander_at = now + self.config.wander_interval;
    }

    fn random_in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let candidate = Vec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            );
            if candidate.length_squared() <= 1.0 {
                return candidate;
            }
        }
    }
}
