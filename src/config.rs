//! Motion Configuration
//!
//! Explicit configuration handed to the orchestrator and interpolators at
//! construction. There is no process-wide state.

use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::warn;

use crate::{DEFAULT_FPS, DEFAULT_SPEED};

/// What `attempt_move` does while the mover is already running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectPolicy {
    /// Drop the request; the current run finishes undisturbed.
    #[default]
    Ignore,
    /// Resolve from the nearest cell and restart from the live position.
    Redirect,
}

impl FromStr for RedirectPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(RedirectPolicy::Ignore),
            "redirect" => Ok(RedirectPolicy::Redirect),
            other => Err(ConfigError::Env {
                var: "GRIDSTEP_REDIRECT",
                value: other.to_string(),
            }),
        }
    }
}

/// Motion configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Nominal frame rate used to size runs (Hz).
    pub fps: f64,
    /// Speed used when a level does not set one (grid units per second).
    pub default_speed: f64,
    /// Upper bound on a single frame's delta time (seconds).
    pub max_frame_dt: f64,
    /// Behaviour for move requests while a run is active.
    pub redirect_policy: RedirectPolicy,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            default_speed: DEFAULT_SPEED,
            max_frame_dt: 0.25,
            redirect_policy: RedirectPolicy::Ignore,
        }
    }
}

impl MotionConfig {
    /// Create config from environment variables.
    ///
    /// Unset variables keep their defaults. Unparseable values, and numbers
    /// that are not finite and positive, are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(fps) = env_positive("GRIDSTEP_FPS") {
            config.fps = fps;
        }
        if let Some(speed) = env_positive("GRIDSTEP_DEFAULT_SPEED") {
            config.default_speed = speed;
        }
        if let Some(dt) = env_positive("GRIDSTEP_MAX_FRAME_DT") {
            config.max_frame_dt = dt;
        }
        if let Some(policy) = env_parse::<RedirectPolicy>("GRIDSTEP_REDIRECT") {
            config.redirect_policy = policy;
        }
        config
    }

    /// Builder-style frame rate override.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Builder-style default speed override.
    pub fn with_default_speed(mut self, speed: f64) -> Self {
        self.default_speed = speed;
        self
    }

    /// Builder-style redirect policy override.
    pub fn with_redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect_policy = policy;
        self
    }

    /// Check every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::InvalidFrameRate(self.fps));
        }
        if !(self.default_speed.is_finite() && self.default_speed > 0.0) {
            return Err(ConfigError::InvalidSpeed(self.default_speed));
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(ConfigError::InvalidFrameDt(self.max_frame_dt));
        }
        Ok(())
    }

    /// Duration of one nominal frame (seconds).
    #[inline]
    pub fn nominal_frame_dt(&self) -> f64 {
        1.0 / self.fps
    }
}

fn env_parse<T: FromStr>(var: &'static str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", var, raw);
            None
        }
    }
}

fn env_positive(var: &'static str) -> Option<f64> {
    env_parse::<f64>(var).filter(|value| {
        let usable = value.is_finite() && *value > 0.0;
        if !usable {
            warn!("Ignoring {}={}: must be finite and positive", var, value);
        }
        usable
    })
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Frame rate must be finite and positive.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// Speed must be finite and positive.
    #[error("Invalid speed: {0}")]
    InvalidSpeed(f64),

    /// Frame delta cap must be finite and positive.
    #[error("Invalid max frame dt: {0}")]
    InvalidFrameDt(f64),

    /// Environment variable could not be parsed.
    #[error("Invalid value for {var}: {value}")]
    Env {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}
