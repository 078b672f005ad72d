//! Player concealment state machine
//!
//! One controller per player. It moves the avatar into and out of hide
//! spots along waypoint chains, suppresses locomotion while hidden, bounds
//! the player's look while concealed and handles the optional peek.
//!
//! Transitions:
//!
//! ```text
//! Revealed --enter--> EnteringConceal --transit done--> Concealed
//! Concealed --peek(on)--> Peeking --peek(off), transit done--> Concealed
//! Concealed/Peeking/EnteringConceal --exit--> ExitingConceal --transit done--> Revealed
//! ```
//!
//! Requests that are not valid from the current state are ignored.

use glam::Quat;
use serde::Serialize;

use crate::concealment::spot::ConcealmentSpot;
use crate::concealment::transit::{Transit, TransitKind};
use crate::core::config::ConcealmentConfig;
use crate::core::types::{Pose, SpotId};
use crate::host::avatar::{Avatar, KinematicAvatar};
use crate::spatial::yaw_rotation;

/// Concealment state; exactly one is active at any tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConcealState {
    #[default]
    Revealed,
    EnteringConceal,
    Concealed,
    Peeking,
    ExitingConceal,
}

impl ConcealState {
    /// Whether enemies must treat the player as hidden
    ///
    /// False while entering or exiting: the player is still visibly moving.
    pub fn is_concealed(&self) -> bool {
        matches!(self, ConcealState::Concealed | ConcealState::Peeking)
    }

    /// Whether free locomotion is suppressed
    pub fn suppresses_locomotion(&self) -> bool {
        !matches!(self, ConcealState::Revealed)
    }
}

/// Transition notifications for audio/VFX/UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ConcealmentEvent {
    EnterStarted { spot: SpotId, facing: Quat },
    FullyConcealed { spot: SpotId },
    ExitStarted { spot: SpotId },
    Exited { spot: SpotId },
    PeekStarted { spot: SpotId },
    PeekEnded { spot: SpotId },
}

impl ConcealmentEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ConcealmentEvent::EnterStarted { .. } => "enter_started",
            ConcealmentEvent::FullyConcealed { .. } => "fully_concealed",
            ConcealmentEvent::ExitStarted { .. } => "exit_started",
            ConcealmentEvent::Exited { .. } => "exited",
            ConcealmentEvent::PeekStarted { .. } => "peek_started",
            ConcealmentEvent::PeekEnded { .. } => "peek_ended",
        }
    }

    pub fn spot(&self) -> SpotId {
        match *self {
            ConcealmentEvent::EnterStarted { spot, .. }
            | ConcealmentEvent::FullyConcealed { spot }
            | ConcealmentEvent::ExitStarted { spot }
            | ConcealmentEvent::Exited { spot }
            | ConcealmentEvent::PeekStarted { spot }
            | ConcealmentEvent::PeekEnded { spot } => spot,
        }
    }
}

/// Look angles while hidden (degrees), relative to the rest orientation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundedLook {
    pub yaw: f32,
    pub pitch: f32,
}

impl BoundedLook {
    /// Accumulate raw look deltas, clamped to the configured limits
    pub fn apply(&mut self, delta_yaw: f32, delta_pitch: f32, config: &ConcealmentConfig) {
        let yaw_limit = config.look_yaw_limit.max(0.0);
        let pitch_limit = config.look_pitch_limit.max(0.0);

        self.yaw = (self.yaw + delta_yaw * config.look_sensitivity).clamp(-yaw_limit, yaw_limit);
        self.pitch =
            (self.pitch - delta_pitch * config.look_sensitivity).clamp(-pitch_limit, pitch_limit);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct ConcealmentController<A: Avatar = KinematicAvatar> {
    config: ConcealmentConfig,
    avatar: Option<A>,
    state: ConcealState,
    /// Held only while not Revealed
    spot: Option<ConcealmentSpot>,
    /// Pose to restore on exit; held only while not Revealed
    saved_pose: Option<Pose>,
    /// Pose that bounded look is composed on
    rest_pose: Pose,
    look: BoundedLook,
    transit: Option<Transit>,
    events: Vec<ConcealmentEvent>,
}

impl<A: Avatar> ConcealmentController<A> {
    pub fn new(config: ConcealmentConfig, avatar: A) -> Self {
        Self {
            avatar: Some(avatar),
            ..Self::without_avatar(config)
        }
    }

    /// Controller with no avatar attached; every request is a no-op until
    /// one is attached
    pub fn without_avatar(config: ConcealmentConfig) -> Self {
        Self {
            config,
            avatar: None,
            state: ConcealState::Revealed,
            spot: None,
            saved_pose: None,
            rest_pose: Pose::IDENTITY,
            look: BoundedLook::default(),
            transit: None,
            events: Vec::new(),
        }
    }

    pub fn attach_avatar(&mut self, avatar: A) {
        self.avatar = Some(avatar);
    }

    pub fn avatar(&self) -> Option<&A> {
        self.avatar.as_ref()
    }

    pub fn avatar_mut(&mut self) -> Option<&mut A> {
        self.avatar.as_mut()
    }

    pub fn config(&self) -> &ConcealmentConfig {
        &self.config
    }

    pub fn state(&self) -> ConcealState {
        self.state
    }

    pub fn is_concealed(&self) -> bool {
        self.state.is_concealed()
    }

    /// Spot currently being entered, occupied or exited
    pub fn spot(&self) -> Option<&ConcealmentSpot> {
        self.spot.as_ref()
    }

    pub fn saved_pose(&self) -> Option<Pose> {
        self.saved_pose
    }

    pub fn look(&self) -> BoundedLook {
        self.look
    }

    pub fn transit(&self) -> Option<&Transit> {
        self.transit.as_ref()
    }

    pub fn is_in_transit(&self) -> bool {
        self.transit.is_some()
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<ConcealmentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start hiding in `spot`
    ///
    /// Accepted from `Revealed`, and from `EnteringConceal`/`ExitingConceal`
    /// where it replaces the in-flight transit. The pre-entry pose is only
    /// saved when leaving `Revealed`, so re-targeting mid-transit still
    /// restores the original pose on exit.
    pub fn request_enter(&mut self, spot: &ConcealmentSpot) -> bool {
        if !spot.is_valid() {
            tracing::debug!(spot = ?spot.id, "Ignoring hide request: spot has no anchor");
            return false;
        }

        if !matches!(
            self.state,
            ConcealState::Revealed | ConcealState::EnteringConceal | ConcealState::ExitingConceal
        ) {
            return false;
        }

        let Some(avatar) = self.avatar.as_mut() else {
            return false;
        };

        let current = avatar.pose();
        if self.state == ConcealState::Revealed {
            self.saved_pose = Some(current);
        }

        let facing = spot.entry_facing(current.rotation);

        self.look.reset();
        avatar.set_camera_local_pitch(0.0);
        avatar.set_locomotion_enabled(false);
        avatar.set_fov_override(spot.hide_fov);

        self.transit = Some(Transit::new(
            TransitKind::Enter,
            current,
            spot.entry_chain(),
            self.config.leg_duration(),
            self.config.easing,
        ));
        self.spot = Some(spot.clone());

        tracing::debug!(spot = ?spot.id, from = ?self.state, "Entering concealment");
        self.state = ConcealState::EnteringConceal;
        self.events.push(ConcealmentEvent::EnterStarted {
            spot: spot.id,
            facing,
        });
        true
    }

    /// Leave the current spot
    ///
    /// Accepted from `Concealed`, `Peeking`, and `EnteringConceal` (which
    /// turns the player around mid-entry).
    pub fn request_exit(&mut self) -> bool {
        if !matches!(
            self.state,
            ConcealState::Concealed | ConcealState::Peeking | ConcealState::EnteringConceal
        ) {
            return false;
        }

        let (Some(avatar), Some(spot), Some(saved)) =
            (self.avatar.as_ref(), self.spot.as_ref(), self.saved_pose)
        else {
            return false;
        };

        let spot_id = spot.id;
        self.transit = Some(Transit::new(
            TransitKind::Exit,
            avatar.pose(),
            spot.exit_chain(saved),
            self.config.leg_duration(),
            self.config.easing,
        ));
        self.look.yaw = 0.0;

        if self.state == ConcealState::Peeking {
            self.events.push(ConcealmentEvent::PeekEnded { spot: spot_id });
        }

        tracing::debug!(spot = ?spot_id, from = ?self.state, "Exiting concealment");
        self.state = ConcealState::ExitingConceal;
        self.events.push(ConcealmentEvent::ExitStarted { spot: spot_id });
        true
    }

    /// Start (`on`) or stop peeking
    ///
    /// Rejected unless the active spot has a peek pose.
    pub fn request_peek(&mut self, on: bool) -> bool {
        let Some(spot) = self.spot.as_ref() else {
            return false;
        };
        let (Some(peek), Some(concealed)) = (spot.peek_pose, spot.concealed_pose()) else {
            return false;
        };
        let Some(avatar) = self.avatar.as_ref() else {
            return false;
        };

        let spot_id = spot.id;
        let returning = self
            .transit
            .as_ref()
            .is_some_and(|t| t.kind() == TransitKind::PeekReturn);

        let (kind, target) = match (on, self.state) {
            (true, ConcealState::Concealed) => (TransitKind::PeekOut, peek),
            (true, ConcealState::Peeking) if returning => (TransitKind::PeekOut, peek),
            (false, ConcealState::Peeking) if !returning => (TransitKind::PeekReturn, concealed),
            _ => return false,
        };

        self.transit = Some(Transit::new(
            kind,
            avatar.pose(),
            vec![target],
            self.config.peek_duration(),
            self.config.easing,
        ));
        self.look.yaw = 0.0;

        if self.state == ConcealState::Concealed {
            tracing::debug!(spot = ?spot_id, "Peeking");
            self.state = ConcealState::Peeking;
            self.events.push(ConcealmentEvent::PeekStarted { spot: spot_id });
        }
        true
    }

    /// Advance the in-flight transit, or apply bounded look when resting
    /// while concealed
    pub fn tick(&mut self, delta_time: f32, look_delta_yaw: f32, look_delta_pitch: f32) {
        if let Some(transit) = self.transit.as_mut() {
            let step = transit.advance(delta_time);
            let kind = transit.kind();

            if let Some(avatar) = self.avatar.as_mut() {
                avatar.set_pose(step.pose);
            }

            if step.finished {
                self.transit = None;
                self.rest_pose = step.pose;
                self.finish_transit(kind);
            }
            return;
        }

        if !self.state.is_concealed() {
            return;
        }

        let Some(avatar) = self.avatar.as_mut() else {
            return;
        };

        self.look.apply(look_delta_yaw, look_delta_pitch, &self.config);
        let rotation = if self.look.yaw == 0.0 {
            self.rest_pose.rotation
        } else {
            self.rest_pose.rotation * yaw_rotation(self.look.yaw)
        };
        avatar.set_pose(Pose::new(self.rest_pose.position, rotation));
        avatar.set_camera_local_pitch(self.look.pitch);
    }

    fn finish_transit(&mut self, kind: TransitKind) {
        let Some(spot_id) = self.spot.as_ref().map(|s| s.id) else {
            return;
        };

        match kind {
            TransitKind::Enter => {
                tracing::debug!(spot = ?spot_id, "Fully concealed");
                self.state = ConcealState::Concealed;
                self.events
                    .push(ConcealmentEvent::FullyConcealed { spot: spot_id });
            }
            TransitKind::Exit => {
                if let Some(avatar) = self.avatar.as_mut() {
                    if let Some(saved) = self.saved_pose {
                        avatar.set_pose(saved);
                    }
                    avatar.set_camera_local_pitch(0.0);
                    avatar.set_fov_override(None);
                    avatar.set_locomotion_enabled(true);
                }
                self.saved_pose = None;
                self.spot = None;
                self.look.reset();

                tracing::debug!(spot = ?spot_id, "Revealed");
                self.state = ConcealState::Revealed;
                self.events.push(ConcealmentEvent::Exited { spot: spot_id });
            }
            TransitKind::PeekOut => {}
            TransitKind::PeekReturn => {
                self.state = ConcealState::Concealed;
                self.events.push(ConcealmentEvent::PeekEnded { spot: spot_id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn config() -> ConcealmentConfig {
        ConcealmentConfig {
            transit_leg_duration: 0.5,
            peek_fraction: 0.25,
            ..Default::default()
        }
    }

    fn start() -> Pose {
        Pose::from_yaw(Vec3::new(0.0, 0.0, -3.0), 0.3)
    }

    fn closet() -> ConcealmentSpot {
        ConcealmentSpot::new(SpotId(1), Pose::at(Vec3::new(0.0, 0.0, 2.0)))
    }

    fn controller() -> ConcealmentController {
        ConcealmentController::new(config(), KinematicAvatar::new(start()))
    }

    fn run(controller: &mut ConcealmentController, seconds: f32) {
        let steps = (seconds / 0.05).ceil() as usize;
        for _ in 0..steps {
            controller.tick(0.05, 0.0, 0.0);
        }
    }

    #[test]
    fn test_starts_revealed() {
        let c = controller();
        assert_eq!(c.state(), ConcealState::Revealed);
        assert!(!c.is_concealed());
        assert!(c.saved_pose().is_none());
    }

    #[test]
    fn test_enter_suppresses_locomotion_and_saves_pose() {
        let mut c = controller();
        assert!(c.request_enter(&closet()));

        assert_eq!(c.state(), ConcealState::EnteringConceal);
        assert!(!c.is_concealed());
        assert_eq!(c.saved_pose(), Some(start()));
        assert!(!c.avatar().unwrap().locomotion_enabled);
    }

    #[test]
    fn test_enter_completes_to_concealed() {
        let mut c = controller();
        c.request_enter(&closet());
        run(&mut c, 0.6);

        assert_eq!(c.state(), ConcealState::Concealed);
        assert!(c.is_concealed());
        assert_eq!(c.avatar().unwrap().pose, closet().concealed_pose().unwrap());

        let names: Vec<_> = c.take_events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["enter_started", "fully_concealed"]);
    }

    #[test]
    fn test_invalid_spot_is_rejected() {
        let mut c = controller();
        assert!(!c.request_enter(&ConcealmentSpot::without_anchor(SpotId(9))));
        assert_eq!(c.state(), ConcealState::Revealed);
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn test_no_avatar_is_a_no_op() {
        let mut c: ConcealmentController =
            ConcealmentController::without_avatar(config());
        assert!(!c.request_enter(&closet()));
        c.tick(1.0, 5.0, 5.0);
        assert_eq!(c.state(), ConcealState::Revealed);
    }

    #[test]
    fn test_attach_avatar_enables_requests() {
        let mut c: ConcealmentController =
            ConcealmentController::without_avatar(config());
        c.attach_avatar(KinematicAvatar::new(start()));

        assert!(c.request_enter(&closet()));
        assert_eq!(c.state(), ConcealState::EnteringConceal);
        assert_eq!(c.saved_pose(), Some(start()));
    }

    #[test]
    fn test_exit_restores_pose_and_locomotion() {
        let mut c = controller();
        c.request_enter(&closet());
        run(&mut c, 0.6);

        assert!(c.request_exit());
        assert_eq!(c.state(), ConcealState::ExitingConceal);
        assert!(!c.is_concealed());
        run(&mut c, 0.6);

        assert_eq!(c.state(), ConcealState::Revealed);
        let avatar = c.avatar().unwrap();
        assert_eq!(avatar.pose, start());
        assert!(avatar.locomotion_enabled);
        assert!(c.saved_pose().is_none());
        assert!(c.spot().is_none());
    }

    #[test]
    fn test_exit_from_revealed_is_ignored() {
        let mut c = controller();
        assert!(!c.request_exit());
        assert_eq!(c.state(), ConcealState::Revealed);
    }

    #[test]
    fn test_enter_while_concealed_is_ignored() {
        let mut c = controller();
        c.request_enter(&closet());
        run(&mut c, 0.6);

        let other = ConcealmentSpot::new(SpotId(2), Pose::at(Vec3::new(5.0, 0.0, 0.0)));
        assert!(!c.request_enter(&other));
        assert_eq!(c.spot().unwrap().id, SpotId(1));
    }

    #[test]
    fn test_bounded_look_clamps() {
        let mut c = controller();
        c.request_enter(&closet());
        run(&mut c, 0.6);

        // 100 * 2.5 sensitivity, clamped to the 60 degree limit
        c.tick(0.016, 100.0, -100.0);
        let look = c.look();
        assert_eq!(look.yaw, 60.0);
        assert_eq!(look.pitch, 40.0);
        assert_eq!(c.avatar().unwrap().camera_pitch, 40.0);

        let expected = closet().concealed_pose().unwrap().rotation * yaw_rotation(60.0);
        assert!(c.avatar().unwrap().pose.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_look_ignored_during_transit() {
        let mut c = controller();
        c.request_enter(&closet());
        c.tick(0.1, 50.0, 50.0);
        assert_eq!(c.look(), BoundedLook::default());
    }

    #[test]
    fn test_look_resets_on_each_entry() {
        let mut c = controller();
        c.request_enter(&closet());
        run(&mut c, 0.6);
        c.tick(0.016, 10.0, 10.0);
        assert_ne!(c.look(), BoundedLook::default());

        c.request_exit();
        run(&mut c, 0.6);
        c.request_enter(&closet());
        assert_eq!(c.look(), BoundedLook::default());
    }

    #[test]
    fn test_hide_fov_applied_and_cleared() {
        let spot = closet().with_hide_fov(50.0);
        let mut c = controller();
        c.request_enter(&spot);
        assert_eq!(c.avatar().unwrap().fov_override, Some(50.0));

        run(&mut c, 0.6);
        c.request_exit();
        run(&mut c, 0.6);
        assert_eq!(c.avatar().unwrap().fov_override, None);
    }

    #[test]
    fn test_bounded_look_apply() {
        let mut look = BoundedLook::default();
        let config = ConcealmentConfig {
            look_sensitivity: 1.0,
            look_yaw_limit: 30.0,
            look_pitch_limit: 20.0,
            ..Default::default()
        };

        look.apply(10.0, 5.0, &config);
        assert_eq!(look.yaw, 10.0);
        assert_eq!(look.pitch, -5.0);

        look.apply(-100.0, -100.0, &config);
        assert_eq!(look.yaw, -30.0);
        assert_eq!(look.pitch, 20.0);
    }
}
