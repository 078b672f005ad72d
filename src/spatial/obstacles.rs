//! Occlusion probing
//!
//! Agents never own level geometry. They ask an [`OcclusionProbe`] whether a
//! segment is blocked; hosts back it with their physics engine. The
//! [`ObstacleField`] here is a small box-based probe used by tests and the
//! headless runner.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::EntityId;

/// Closest blocking hit along a probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcclusionHit {
    /// Distance from the probe origin
    pub distance: f32,
    /// Entity owning the collider that was hit, if any
    pub owner: Option<EntityId>,
}

/// Line-of-sight query against level geometry
pub trait OcclusionProbe {
    /// First hit along `direction` from `origin` within `max_distance`,
    /// skipping colliders owned by `ignore_owner`.
    ///
    /// `direction` need not be normalized.
    fn first_blocking_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore_owner: Option<EntityId>,
    ) -> Option<OcclusionHit>;
}

/// Axis-aligned box obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub min: Vec3,
    pub max: Vec3,
    pub owner: Option<EntityId>,
}

impl Obstacle {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            owner: None,
        }
    }

    /// Box centered on `center` with the given half extents
    pub fn centered(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn owned_by(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Slab test; returns the entry distance along a normalized direction
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let inv_dir = direction.recip();

        let t1 = (self.min - origin) * inv_dir;
        let t2 = (self.max - origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // Behind the origin, or missed
        if tmax < 0.0 || tmin > tmax || tmin.is_nan() || tmax.is_nan() {
            None
        } else if tmin < 0.0 {
            // Origin is inside the box
            Some(0.0)
        } else {
            Some(tmin)
        }
    }
}

/// Collection of box obstacles usable as an occlusion probe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.add(obstacle);
        self
    }

    /// Remove every obstacle owned by `owner`
    pub fn remove_owned_by(&mut self, owner: EntityId) {
        self.obstacles.retain(|o| o.owner != Some(owner));
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl OcclusionProbe for ObstacleField {
    fn first_blocking_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore_owner: Option<EntityId>,
    ) -> Option<OcclusionHit> {
        let direction = direction.try_normalize()?;

        self.obstacles
            .iter()
            .filter(|o| ignore_owner.is_none() || o.owner != ignore_owner)
            .filter_map(|o| {
                let distance = o.ray_distance(origin, direction)?;
                (distance <= max_distance).then_some(OcclusionHit {
                    distance,
                    owner: o.owner,
                })
            })
            .min_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Probe for open levels with nothing to hide behind
impl OcclusionProbe for () {
    fn first_blocking_hit(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        _max_distance: f32,
        _ignore_owner: Option<EntityId>,
    ) -> Option<OcclusionHit> {
        None
    }
}
