//! Configuration loading and typed config structures for the locomotion core.
//!
//! Every tunable constant of the controller lives here: gait speeds, stamina
//! rates, crouch smoothing, camera anchors, run-shake shape and look limits.
//! A YAML file may override any subset of them; missing keys fall back to the
//! defaults below.
//!
//! ```yaml
//! speed:
//!   run: 5.0
//! stamina:
//!   decrease_rate: 25.0
//! crouch:
//!   stand_up:
//!     mode: per_tick
//!     amount: 0.05
//! ```

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside the range the controller can work with.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level locomotion configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Gait speeds.
    pub speed: SpeedConfig,
    /// Stamina pool and rates.
    pub stamina: StaminaConfig,
    /// Crouch smoothing and stand-up step.
    pub crouch: CrouchConfig,
    /// Camera anchors in body-local space.
    pub camera: CameraConfig,
    /// Run-shake oscillator shape.
    pub shake: ShakeConfig,
    /// Mouse look limits.
    pub look: LookConfig,
}

impl LocomotionConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] or [`ConfigError::Invalid`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value the controller relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("speed.walk", self.speed.walk)?;
        non_negative("speed.run", self.speed.run)?;
        non_negative("speed.crouch", self.speed.crouch)?;

        positive("stamina.max", self.stamina.max)?;
        non_negative("stamina.decrease_rate", self.stamina.decrease_rate)?;
        non_negative("stamina.recover_rate", self.stamina.recover_rate)?;
        if !(0.0..=self.stamina.max).contains(&self.stamina.initial) {
            return Err(invalid(
                "stamina.initial",
                format!("{} is outside 0..={}", self.stamina.initial, self.stamina.max),
            ));
        }

        non_negative("crouch.smoothing", self.crouch.smoothing)?;
        positive("crouch.stand_up.amount", self.crouch.stand_up.amount())?;
        if self.camera.crouch_local[1] >= self.camera.origin_local[1] {
            return Err(invalid(
                "camera.crouch_local",
                "crouch anchor must sit below the standing anchor".to_string(),
            ));
        }

        positive("shake.swing_period", self.shake.swing_period)?;
        non_negative("shake.angular_speed", self.shake.angular_speed)?;

        positive("look.pitch_limit", self.look.pitch_limit)?;
        if self.look.pitch_limit > 90.0 {
            return Err(invalid(
                "look.pitch_limit",
                format!("{} exceeds 90 degrees", self.look.pitch_limit),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be a finite, non-negative number")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be a finite, positive number")))
    }
}

/// Movement speeds in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub walk: f32,
    pub run: f32,
    pub crouch: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            walk: 2.0,
            run: 4.5,
            crouch: 1.2,
        }
    }
}

/// Stamina pool and per-second rates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    pub max: f32,
    pub initial: f32,
    pub decrease_rate: f32,
    pub recover_rate: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max: 100.0,
            initial: 100.0,
            decrease_rate: 20.0,
            recover_rate: 10.0,
        }
    }
}

/// How far the camera rises on each stand-up slice.
///
/// `PerTick` reproduces a fixed step per frame, which makes standing up faster
/// at higher frame rates. `PerSecond` scales the step by the frame time.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", content = "amount", rename_all = "snake_case")]
pub enum StandUpStep {
    PerSecond(f32),
    PerTick(f32),
}

impl StandUpStep {
    /// Raw configured amount, independent of mode.
    pub fn amount(&self) -> f32 {
        match *self {
            StandUpStep::PerSecond(amount) | StandUpStep::PerTick(amount) => amount,
        }
    }

    /// Distance to rise during a slice of length `dt`.
    pub fn distance(&self, dt: f32) -> f32 {
        match *self {
            StandUpStep::PerSecond(rate) => rate * dt,
            StandUpStep::PerTick(step) => step,
        }
    }
}

impl Default for StandUpStep {
    fn default() -> Self {
        // 0.05 units per frame at 60 fps.
        StandUpStep::PerSecond(3.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrouchConfig {
    /// Exponential smoothing rate towards the crouch anchor.
    pub smoothing: f32,
    pub stand_up: StandUpStep,
}

impl Default for CrouchConfig {
    fn default() -> Self {
        Self {
            smoothing: 6.0,
            stand_up: StandUpStep::default(),
        }
    }
}

/// Camera anchors, relative to the body origin.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub origin_local: [f32; 3],
    pub crouch_local: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin_local: [0.0, 1.6, 0.0],
            crouch_local: [0.0, 0.9, 0.0],
        }
    }
}

/// Shape of the elliptical run shake.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    pub x_radius: f32,
    pub y_radius: f32,
    /// Starting phase in degrees.
    pub start_degree: f32,
    /// Degrees per second.
    pub angular_speed: f32,
    /// Seconds between swing direction flips.
    pub swing_period: f32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            x_radius: 0.2,
            y_radius: 0.1,
            start_degree: 90.0,
            angular_speed: 200.0,
            swing_period: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    pub sensitivity: f32,
    /// Vertical look is clamped to `[-pitch_limit, pitch_limit]` degrees.
    pub pitch_limit: f32,
    /// Resting forward bend of the spine bone, in degrees.
    pub spine_rest_pitch: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            pitch_limit: 80.0,
            spine_rest_pitch: -6.638,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        LocomotionConfig::default()
            .validate()
            .expect("defaults should validate");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = LocomotionConfig::parse("speed:\n  run: 6.0\n").expect("valid yaml");
        assert_eq!(config.speed.run, 6.0);
        assert_eq!(config.speed.walk, SpeedConfig::default().walk);
        assert_eq!(config.stamina, StaminaConfig::default());
    }

    #[test]
    fn test_stand_up_mode_parses() {
        let yaml = "crouch:\n  stand_up:\n    mode: per_tick\n    amount: 0.05\n";
        let config = LocomotionConfig::parse(yaml).expect("valid yaml");
        assert_eq!(config.crouch.stand_up, StandUpStep::PerTick(0.05));
        assert_eq!(config.crouch.stand_up.distance(1.0), 0.05);
    }

    #[test]
    fn test_initial_stamina_above_max_is_rejected() {
        let err = LocomotionConfig::parse("stamina:\n  max: 50.0\n  initial: 80.0\n")
            .expect_err("initial above max");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "stamina.initial",
                ..
            }
        ));
    }

    #[test]
    fn test_crouch_anchor_above_origin_is_rejected() {
        let yaml = "camera:\n  origin_local: [0.0, 1.0, 0.0]\n  crouch_local: [0.0, 1.5, 0.0]\n";
        assert!(matches!(
            LocomotionConfig::parse(yaml),
            Err(ConfigError::Invalid {
                field: "camera.crouch_local",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            LocomotionConfig::parse("speed: [unterminated"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = LocomotionConfig::from_file(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
