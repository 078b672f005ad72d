//! Stealth configuration with documented tunables
//!
//! Every tunable is per-instance: agents and controllers clone the section
//! they need when they are created. Defaults are the hospital level's tuning.
//! Angles are in degrees, times in seconds and distances in world units.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StealthError};
use crate::spatial::Easing;

/// Smallest duration accepted anywhere a fraction is accumulated
pub const MIN_DURATION: f32 = 1e-4;

/// Tunables for a single enemy's perception and pursuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Maximum distance at which the target can be seen
    pub view_distance: f32,

    /// Full width of the vision cone (degrees). The target must lie within
    /// half of this angle from the agent's forward vector.
    pub view_angle: f32,

    /// How long the agent keeps chasing after its last positive sighting
    ///
    /// This is the "memory" window: losing line of sight does not end a
    /// chase until this much time has passed without a new sighting.
    pub forget_time: f64,

    /// Radius around the agent used to pick patrol wander targets
    pub wander_radius: f32,

    /// Time between wander target refreshes while patrolling
    pub wander_interval: f64,

    /// Window after the target hides during which a sighting taken just
    /// before it hid still counts as visible
    pub conceal_grace_window: f64,

    /// Height of the occlusion probe origin above the agent's position
    pub eye_height: f32,

    /// Distance at which a visible target counts as caught
    pub catch_radius: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            view_distance: 15.0,
            view_angle: 120.0,
            forget_time: 3.0,
            wander_radius: 10.0,
            wander_interval: 4.0,
            conceal_grace_window: 0.2,
            eye_height: 1.0,
            catch_radius: 1.0,
        }
    }
}

/// Tunables for the player's concealment controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcealmentConfig {
    /// Duration of each leg of a waypoint transit
    pub transit_leg_duration: f32,

    /// Peek transits last `transit_leg_duration * peek_fraction`
    pub peek_fraction: f32,

    /// Bounded look: maximum yaw away from the rest orientation (degrees)
    pub look_yaw_limit: f32,

    /// Bounded look: maximum camera pitch (degrees)
    pub look_pitch_limit: f32,

    /// Multiplier applied to raw look deltas before clamping
    pub look_sensitivity: f32,

    /// Easing curve applied to every transit leg
    pub easing: Easing,
}

impl Default for ConcealmentConfig {
    fn default() -> Self {
        Self {
            transit_leg_duration: 0.5,
            peek_fraction: 0.25,
            look_yaw_limit: 60.0,
            look_pitch_limit: 40.0,
            look_sensitivity: 2.5,
            easing: Easing::EaseInOut,
        }
    }
}

impl ConcealmentConfig {
    /// Leg duration clamped to a positive minimum
    pub fn leg_duration(&self) -> f32 {
        self.transit_leg_duration.max(MIN_DURATION)
    }

    /// Peek duration clamped to a positive minimum
    pub fn peek_duration(&self) -> f32 {
        (self.transit_leg_duration * self.peek_fraction).max(MIN_DURATION)
    }
}

/// Tunables for the hide prompt and crosshair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Maximum probe distance for offering a hide spot
    pub interact_distance: f32,

    /// Key name shown in prompts
    pub key_label: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            interact_distance: 3.0,
            key_label: "E".to_string(),
        }
    }
}

/// Tunables for the player's response to being detected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordanceConfig {
    pub walk_speed: f32,
    pub run_speed: f32,

    /// Sprint speed while any agent has the player detected
    pub detected_run_speed: f32,

    /// FOV boost (degrees) while sprinting and detected
    pub run_fov_increase: f32,

    /// Exponential smoothing rate for the FOV offset (per second)
    pub fov_smooth_speed: f32,

    /// Screen effect (vignette) intensity while detected
    pub detected_effect_intensity: f32,

    /// Exponential smoothing rate for the screen effect (per second)
    pub effect_smooth_speed: f32,
}

impl Default for AffordanceConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_speed: 10.0,
            detected_run_speed: 15.0,
            run_fov_increase: 5.0,
            fov_smooth_speed: 10.0,
            detected_effect_intensity: 0.45,
            effect_smooth_speed: 4.0,
        }
    }
}

/// Configuration for a whole stealth world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StealthConfig {
    /// Seed for every agent's wander RNG
    pub seed: u64,
    pub perception: PerceptionConfig,
    pub concealment: ConcealmentConfig,
    pub interaction: InteractionConfig,
    pub affordance: AffordanceConfig,
}

impl Default for StealthConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            perception: PerceptionConfig::default(),
            concealment: ConcealmentConfig::default(),
            interaction: InteractionConfig::default(),
            affordance: AffordanceConfig::default(),
        }
    }
}

impl StealthConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document; missing keys keep defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: StealthConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    ///
    /// Durations are clamped at use sites, so only values that would make
    /// the simulation meaningless are rejected here.
    pub fn validate(&self) -> Result<()> {
        let p = &self.perception;
        if p.view_distance < 0.0 {
            return Err(StealthError::InvalidConfig(format!(
                "view_distance ({}) must not be negative",
                p.view_distance
            )));
        }

        if !(0.0..=360.0).contains(&p.view_angle) {
            return Err(StealthError::InvalidConfig(format!(
                "view_angle ({}) must be within 0..=360 degrees",
                p.view_angle
            )));
        }

        if p.forget_time < 0.0 || p.conceal_grace_window < 0.0 {
            return Err(StealthError::InvalidConfig(
                "forget_time and conceal_grace_window must not be negative".into(),
            ));
        }

        let c = &self.concealment;
        if !(0.0..=1.0).contains(&c.peek_fraction) {
            return Err(StealthError::InvalidConfig(format!(
                "peek_fraction ({}) must be within 0..=1",
                c.peek_fraction
            )));
        }

        if c.look_yaw_limit < 0.0 || c.look_pitch_limit < 0.0 {
            return Err(StealthError::InvalidConfig(
                "look limits must not be negative".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(StealthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StealthConfig::from_toml_str(
            r#"
            seed = 7

            [perception]
            view_distance = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.perception.view_distance, 20.0);
        assert_eq!(config.perception.forget_time, 3.0);
        assert_eq!(config.concealment, ConcealmentConfig::default());
    }

    #[test]
    fn test_easing_parses_from_toml() {
        let config = StealthConfig::from_toml_str(
            r#"
            [concealment]
            easing = "linear"
            "#,
        )
        .unwrap();
        assert_eq!(config.concealment.easing, Easing::Linear);
    }

    #[test]
    fn test_rejects_bad_peek_fraction() {
        let result = StealthConfig::from_toml_str(
            r#"
            [concealment]
            peek_fraction = 1.5
            "#,
        );
        assert!(matches!(result, Err(StealthError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = StealthConfig::from_toml_str("perception = 3");
        assert!(matches!(result, Err(StealthError::ConfigParse(_))));
    }

    #[test]
    fn test_durations_are_clamped() {
        let config = ConcealmentConfig {
            transit_leg_duration: -1.0,
            ..Default::default()
        };
        assert_eq!(config.leg_duration(), MIN_DURATION);
        assert_eq!(config.peek_duration(), MIN_DURATION);
    }
}
