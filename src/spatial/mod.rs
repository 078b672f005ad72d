//! Geometry helpers shared by perception and concealment
//!
//! - Easing curves for transits
//! - Occlusion probing (trait + box-based implementation)
//! - Angle helpers for vision cones and bounded look

pub mod easing;
pub mod obstacles;

pub use easing::Easing;
pub use obstacles::{Obstacle, ObstacleField, OcclusionHit, OcclusionProbe};

use glam::{Quat, Vec3};

/// Angle between two vectors in degrees; 0 if either is degenerate
pub fn angle_between_degrees(a: Vec3, b: Vec3) -> f32 {
    let (Some(a), Some(b)) = (a.try_normalize(), b.try_normalize()) else {
        return 0.0;
    };
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Rotation of `degrees` about +Y
pub fn yaw_rotation(degrees: f32) -> Quat {
    Quat::from_rotation_y(degrees.to_radians())
}

/// Turn an orientation around to face the opposite way
pub fn turned_around(rotation: Quat) -> Quat {
    rotation * Quat::from_rotation_y(std::f32::consts::PI)
}
