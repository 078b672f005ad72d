//! In-flight transits
//!
//! A transit is a timed interpolation through a chain of poses. It is plain
//! resumable state: the controller advances it once per tick and drops it to
//! cancel. Each leg lasts `leg_duration`; time left over when a leg ends is
//! carried into the next one so the chain's total duration does not depend
//! on frame granularity.

use std::collections::VecDeque;

use crate::core::config::MIN_DURATION;
use crate::core::types::Pose;
use crate::spatial::Easing;

/// What a transit is moving the player towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitKind {
    Enter,
    Exit,
    PeekOut,
    PeekReturn,
}

/// Result of advancing a transit by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitStep {
    pub pose: Pose,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct Transit {
    kind: TransitKind,
    /// Start of the current leg
    from: Pose,
    /// Remaining leg targets; the front is the current leg
    legs: VecDeque<Pose>,
    elapsed: f32,
    leg_duration: f32,
    easing: Easing,
}

impl Transit {
    /// Start a transit at `start` through `targets`
    ///
    /// Durations below [`MIN_DURATION`] (including negative ones) are
    /// clamped.
    pub fn new(
        kind: TransitKind,
        start: Pose,
        targets: Vec<Pose>,
        leg_duration: f32,
        easing: Easing,
    ) -> Self {
        Self {
            kind,
            from: start,
            legs: targets.into(),
            elapsed: 0.0,
            leg_duration: leg_duration.max(MIN_DURATION),
            easing,
        }
    }

    pub fn kind(&self) -> TransitKind {
        self.kind
    }

    /// Final pose of the chain
    pub fn destination(&self) -> Option<Pose> {
        self.legs.back().copied()
    }

    pub fn remaining_legs(&self) -> usize {
        self.legs.len()
    }

    /// Elapsed fraction of the current leg (0-1)
    pub fn fraction(&self) -> f32 {
        (self.elapsed / self.leg_duration).min(1.0)
    }

    pub fn leg_duration(&self) -> f32 {
        self.leg_duration
    }

    /// Advance by `dt` seconds and return the pose to apply
    ///
    /// When the last leg completes the returned pose is exactly the final
    /// target, not an interpolated approximation.
    pub fn advance(&mut self, dt: f32) -> TransitStep {
        self.elapsed += dt.max(0.0);

        loop {
            let Some(&target) = self.legs.front() else {
                return TransitStep {
                    pose: self.from,
                    finished: true,
                };
            };

            if self.elapsed < self.leg_duration {
                let t = self.easing.apply(self.elapsed / self.leg_duration);
                return TransitStep {
                    pose: self.from.interpolate(&target, t),
                    finished: false,
                };
            }

            self.legs.pop_front();
            self.from = target;
            if self.legs.is_empty() {
                return TransitStep {
                    pose: target,
                    finished: true,
                };
            }
            self.elapsed -= self.leg_duration;
        }
    }
}
