//! Player avatar collaborator (locomotion + camera rig)

use crate::core::types::Pose;

/// Capabilities the concealment controller needs from the player rig
pub trait Avatar {
    fn pose(&self) -> Pose;

    fn set_pose(&mut self, pose: Pose);

    /// Enable or suppress free locomotion input
    fn set_locomotion_enabled(&mut self, enabled: bool);

    /// Camera pitch relative to the body (degrees)
    fn set_camera_local_pitch(&mut self, degrees: f32);

    /// Temporary field-of-view override; `None` restores the rig's own FOV
    fn set_fov_override(&mut self, _fov: Option<f32>) {}
}

/// Plain in-memory avatar
///
/// Useful for headless hosts and tests: it stores whatever the controller
/// pushes into it.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicAvatar {
    pub pose: Pose,
    pub locomotion_enabled: bool,
    pub camera_pitch: f32,
    pub fov_override: Option<f32>,
}

impl KinematicAvatar {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            locomotion_enabled: true,
            camera_pitch: 0.0,
            fov_override: None,
        }
    }
}

impl Default for KinematicAvatar {
    fn default() -> Self {
        Self::new(Pose::IDENTITY)
    }
}

impl Avatar for KinematicAvatar {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn set_locomotion_enabled(&mut self, enabled: bool) {
        self.locomotion_enabled = enabled;
    }

    fn set_camera_local_pitch(&mut self, degrees: f32) {
        self.camera_pitch = degrees;
    }

    fn set_fov_override(&mut self, fov: Option<f32>) {
        self.fov_override = fov;
    }
}

impl<A: Avatar + ?Sized> Avatar for Box<A> {
    fn pose(&self) -> Pose {
        (**self).pose()
    }

    fn set_pose(&mut self, pose: Pose) {
        (**self).set_pose(pose)
    }

    fn set_locomotion_enabled(&mut self, enabled: bool) {
        (**self).set_locomotion_enabled(enabled)
    }

    fn set_camera_local_pitch(&mut self, degrees: f32) {
        (**self).set_camera_local_pitch(degrees)
    }

    fn set_fov_override(&mut self, fov: Option<f32>) {
        (**self).set_fov_override(fov)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_boxed_avatar_forwards() {
        let mut avatar: Box<dyn Avatar> = Box::new(KinematicAvatar::default());
        let pose = Pose::at(Vec3::new(1.0, 2.0, 3.0));

        avatar.set_pose(pose);
        avatar.set_locomotion_enabled(false);
        assert_eq!(avatar.pose(), pose);
    }
}
