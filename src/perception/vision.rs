//! Vision cone test
//!
//! Steps, in order: distance, cone angle, occlusion, concealment. The first
//! failing step decides the outcome.

use glam::Vec3;
use serde::Serialize;

use crate::core::config::PerceptionConfig;
use crate::core::types::{EntityId, Pose};
use crate::spatial::{angle_between_degrees, OcclusionProbe};

/// What an agent is allowed to know about its target this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub entity: EntityId,
    pub position: Vec3,
    /// Whether the target's concealment controller reports it as concealed
    pub concealed: bool,
}

impl TargetView {
    pub fn new(entity: EntityId, position: Vec3, concealed: bool) -> Self {
        Self {
            entity,
            position,
            concealed,
        }
    }
}

/// Result of a single vision test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionOutcome {
    Visible,
    TooFar,
    OutsideCone,
    Occluded,
    Concealed,
    /// No test was run (no target)
    #[default]
    NoTarget,
}

impl VisionOutcome {
    pub fn is_visible(&self) -> bool {
        matches!(self, VisionOutcome::Visible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionCone {
    pub view_distance: f32,
    /// Half of the full cone width (degrees)
    pub half_angle: f32,
    pub eye_height: f32,
}

impl VisionCone {
    pub fn from_config(config: &PerceptionConfig) -> Self {
        Self {
            view_distance: config.view_distance,
            half_angle: config.view_angle * 0.5,
            eye_height: config.eye_height,
        }
    }

    /// Geometry-only part of the test (distance, angle, occlusion)
    pub fn test_geometry(
        &self,
        eye: &Pose,
        target: &TargetView,
        occlusion: &dyn OcclusionProbe,
    ) -> VisionOutcome {
        let delta = target.position - eye.position;
        let distance = delta.length();

        if distance > self.view_distance {
            return VisionOutcome::TooFar;
        }

        if angle_between_degrees(eye.forward(), delta) > self.half_angle {
            return VisionOutcome::OutsideCone;
        }

        let origin = eye.position + Vec3::Y * self.eye_height;
        if occlusion
            .first_blocking_hit(origin, delta, distance, Some(target.entity))
            .is_some()
        {
            return VisionOutcome::Occluded;
        }

        VisionOutcome::Visible
    }

    /// Full test; `concealment_applies` is whether the concealment override
    /// is in force for this observer right now
    pub fn test(
        &self,
        eye: &Pose,
        target: &TargetView,
        occlusion: &dyn OcclusionProbe,
        concealment_applies: bool,
    ) -> VisionOutcome {
        match self.test_geometry(eye, target, occlusion) {
            VisionOutcome::Visible if concealment_applies => VisionOutcome::Concealed,
            outcome => outcome,
        }
    }
}
