//! Player response to being detected
//!
//! Driven by [`DetectionAggregator::any_detected`]: detected players sprint
//! faster, get a small FOV boost while sprinting, and see a screen effect
//! fade in. Values are pushed to the host's [`AffordanceLayer`].
//!
//! [`DetectionAggregator::any_detected`]: crate::perception::DetectionAggregator::any_detected

use serde::Serialize;

use crate::core::config::AffordanceConfig;
use crate::host::ui::AffordanceLayer;

/// Values last pushed to the affordance layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AffordanceSnapshot {
    pub speed_modifier: f32,
    pub fov_offset: f32,
    pub screen_effect: f32,
}

#[derive(Debug, Clone)]
pub struct DetectionResponse {
    config: AffordanceConfig,
    fov_offset: f32,
    screen_effect: f32,
}

impl DetectionResponse {
    pub fn new(config: AffordanceConfig) -> Self {
        Self {
            config,
            fov_offset: 0.0,
            screen_effect: 0.0,
        }
    }

    /// Movement speed as a multiple of walk speed
    pub fn speed_modifier(&self, detected: bool, wants_to_run: bool) -> f32 {
        let speed = match (wants_to_run, detected) {
            (false, _) => self.config.walk_speed,
            (true, false) => self.config.run_speed,
            (true, true) => self.config.detected_run_speed,
        };

        if self.config.walk_speed > 0.0 {
            speed / self.config.walk_speed
        } else {
            1.0
        }
    }

    pub fn update(
        &mut self,
        detected: bool,
        wants_to_run: bool,
        delta_time: f32,
        layer: &mut dyn AffordanceLayer,
    ) -> AffordanceSnapshot {
        let fov_target = if detected && wants_to_run {
            self.config.run_fov_increase
        } else {
            0.0
        };
        let effect_target = if detected {
            self.config.detected_effect_intensity
        } else {
            0.0
        };

        self.fov_offset = smooth(self.fov_offset, fov_target, delta_time * self.config.fov_smooth_speed);
        self.screen_effect = smooth(
            self.screen_effect,
            effect_target,
            delta_time * self.config.effect_smooth_speed,
        );

        let snapshot = AffordanceSnapshot {
            speed_modifier: self.speed_modifier(detected, wants_to_run),
            fov_offset: self.fov_offset,
            screen_effect: self.screen_effect,
        };

        layer.set_speed_modifier(snapshot.speed_modifier);
        layer.set_fov_offset(snapshot.fov_offset);
        layer.set_screen_effect(snapshot.screen_effect);
        snapshot
    }
}

/// Move `current` towards `target` by fraction `t` (clamped to 0..=1)
fn smooth(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t.clamp(0.0, 1.0)
}
