//! Concealment spots - static level data describing where the player can hide

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::core::types::{Pose, SpotId};
use crate::spatial::turned_around;

/// Shape of a hide spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotKind {
    /// Open cover (under a bed, behind a curtain)
    #[default]
    Open,
    /// Door-type enclosure (closet, locker); the hidden player faces outward
    Enclosure,
}

/// Descriptor of a place the player can hide
///
/// Created at level load and never mutated afterwards. A spot without an
/// anchor is invalid and must never be offered as a hide target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcealmentSpot {
    pub id: SpotId,
    #[serde(default)]
    pub kind: SpotKind,
    /// Target pose when fully concealed
    pub anchor: Option<Pose>,
    /// Traversed in order before the anchor
    #[serde(default)]
    pub entry_waypoints: Vec<Pose>,
    /// Traversed in order on the way out
    #[serde(default)]
    pub exit_waypoints: Vec<Pose>,
    /// Observation pose for spots that support peeking
    #[serde(default)]
    pub peek_pose: Option<Pose>,
    /// Orientation that wins over the anchor's own orientation
    #[serde(default)]
    pub facing_override: Option<Quat>,
    /// Camera field of view while hidden here
    #[serde(default)]
    pub hide_fov: Option<f32>,
}

impl ConcealmentSpot {
    pub fn new(id: SpotId, anchor: Pose) -> Self {
        Self {
            id,
            kind: SpotKind::Open,
            anchor: Some(anchor),
            entry_waypoints: Vec::new(),
            exit_waypoints: Vec::new(),
            peek_pose: None,
            facing_override: None,
            hide_fov: None,
        }
    }

    /// A spot with no anchor (invalid; useful for level validation paths)
    pub fn without_anchor(id: SpotId) -> Self {
        Self {
            anchor: None,
            ..Self::new(id, Pose::IDENTITY)
        }
    }

    /// Door-type enclosure such as a closet
    pub fn enclosure(id: SpotId, anchor: Pose) -> Self {
        Self {
            kind: SpotKind::Enclosure,
            ..Self::new(id, anchor)
        }
    }

    pub fn with_entry_waypoints(mut self, waypoints: Vec<Pose>) -> Self {
        self.entry_waypoints = waypoints;
        self
    }

    pub fn with_exit_waypoints(mut self, waypoints: Vec<Pose>) -> Self {
        self.exit_waypoints = waypoints;
        self
    }

    pub fn with_peek_pose(mut self, pose: Pose) -> Self {
        self.peek_pose = Some(pose);
        self
    }

    pub fn with_facing_override(mut self, facing: Quat) -> Self {
        self.facing_override = Some(facing);
        self
    }

    pub fn with_hide_fov(mut self, fov: f32) -> Self {
        self.hide_fov = Some(fov);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn supports_peek(&self) -> bool {
        self.peek_pose.is_some()
    }

    /// Orientation to face while moving into the spot
    ///
    /// Priority: first entry waypoint, facing override, anchor, and finally
    /// the requester's own orientation.
    pub fn entry_facing(&self, requester: Quat) -> Quat {
        self.entry_waypoints
            .first()
            .map(|p| p.rotation)
            .or(self.facing_override)
            .or(self.anchor.map(|a| a.rotation))
            .unwrap_or(requester)
    }

    /// Base orientation while concealed
    ///
    /// Facing override beats the anchor's orientation; enclosures are
    /// turned around so the player looks out through the door.
    pub fn concealed_orientation(&self) -> Option<Quat> {
        let base = self
            .facing_override
            .or(self.anchor.map(|a| a.rotation))?;

        Some(match self.kind {
            SpotKind::Open => base,
            SpotKind::Enclosure => turned_around(base),
        })
    }

    /// Anchor position with the concealed orientation
    pub fn concealed_pose(&self) -> Option<Pose> {
        let anchor = self.anchor?;
        let rotation = self.concealed_orientation()?;
        Some(Pose::new(anchor.position, rotation))
    }

    /// Leg targets for entering: entry waypoints, then the concealed pose
    ///
    /// Empty for invalid spots.
    pub fn entry_chain(&self) -> Vec<Pose> {
        let Some(concealed) = self.concealed_pose() else {
            return Vec::new();
        };

        let mut chain = self.entry_waypoints.clone();
        chain.push(concealed);
        chain
    }

    /// Leg targets for exiting: exit waypoints, then the saved pre-entry pose
    pub fn exit_chain(&self, saved: Pose) -> Vec<Pose> {
        let mut chain = self.exit_waypoints.clone();
        chain.push(saved);
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn anchor() -> Pose {
        Pose::from_yaw(Vec3::new(1.0, 0.0, 2.0), 0.5)
    }

    #[test]
    fn test_entry_facing_priority() {
        let requester = Quat::from_rotation_y(2.0);
        let waypoint = Pose::from_yaw(Vec3::ZERO, 1.0);
        let facing = Quat::from_rotation_y(1.5);

        let spot = ConcealmentSpot::new(SpotId(1), anchor())
            .with_entry_waypoints(vec![waypoint])
            .with_facing_override(facing);
        assert_eq!(spot.entry_facing(requester), waypoint.rotation);

        let spot = ConcealmentSpot::new(SpotId(1), anchor()).with_facing_override(facing);
        assert_eq!(spot.entry_facing(requester), facing);

        let spot = ConcealmentSpot::new(SpotId(1), anchor());
        assert_eq!(spot.entry_facing(requester), anchor().rotation);

        let spot = ConcealmentSpot::without_anchor(SpotId(1));
        assert_eq!(spot.entry_facing(requester), requester);
    }

    #[test]
    fn test_enclosure_faces_outward() {
        let spot = ConcealmentSpot::enclosure(SpotId(2), Pose::at(Vec3::ZERO));
        let forward = spot.concealed_orientation().unwrap() * Vec3::Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_facing_override_wins_over_anchor() {
        let facing = Quat::from_rotation_y(1.2);
        let spot = ConcealmentSpot::new(SpotId(3), anchor()).with_facing_override(facing);
        assert_eq!(spot.concealed_orientation(), Some(facing));
        assert_eq!(spot.concealed_pose().unwrap().position, anchor().position);
    }

    #[test]
    fn test_entry_chain_order() {
        let a = Pose::at(Vec3::X);
        let b = Pose::at(Vec3::Y);
        let spot = ConcealmentSpot::new(SpotId(4), anchor()).with_entry_waypoints(vec![a, b]);

        let chain = spot.entry_chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], a);
        assert_eq!(chain[1], b);
        assert_eq!(chain[2], spot.concealed_pose().unwrap());
    }

    #[test]
    fn test_invalid_spot_has_no_chain() {
        let spot = ConcealmentSpot::without_anchor(SpotId(5));
        assert!(!spot.is_valid());
        assert!(spot.entry_chain().is_empty());
        assert!(spot.concealed_pose().is_none());
    }

    #[test]
    fn test_exit_chain_ends_at_saved_pose() {
        let saved = Pose::at(Vec3::new(9.0, 0.0, 9.0));
        let out = Pose::at(Vec3::new(3.0, 0.0, 3.0));

        let direct = ConcealmentSpot::new(SpotId(6), anchor());
        assert_eq!(direct.exit_chain(saved), vec![saved]);

        let routed = ConcealmentSpot::new(SpotId(6), anchor()).with_exit_waypoints(vec![out]);
        assert_eq!(routed.exit_chain(saved), vec![out, saved]);
    }

    #[test]
    fn test_spot_deserializes_with_defaults() {
        let spot: ConcealmentSpot = serde_json::from_str(
            r#"{
                "id": 7,
                "anchor": { "position": [1.0, 0.0, 1.0], "rotation": [0.0, 0.0, 0.0, 1.0] }
            }"#,
        )
        .unwrap();
        assert!(spot.is_valid());
        assert_eq!(spot.kind, SpotKind::Open);
        assert!(spot.entry_waypoints.is_empty());
        assert!(!spot.supports_peek());
    }
}
