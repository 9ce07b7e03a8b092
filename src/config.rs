//! # Configuration
//!
//! Tunables of the demo: camera and projection, the two rotation periods, the clear
//! color, FPS window and surface preferences. Every field has a default, so a config
//! file only needs the keys it changes.
//!
//! On native targets [`RenderConfig::from_env`] reads a JSON file named by the
//! `TETRA_DEMO_CONFIG` environment variable:
//!
//! ```json
//! { "fov_y": 1.0, "period_y_ms": 3000.0, "vsync": false }
//! ```
//!
//! The geometry and shader are not configurable here. They are chosen at build time,
//! see [`Geometry::for_build`](crate::geometry::Geometry::for_build).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::Duration;

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV_VAR: &str = "TETRA_DEMO_CONFIG";

/// Errors while loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Adapter power preference, mirrored so it can be (de)serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerPreference {
    #[default]
    Default,
    LowPower,
    HighPerformance,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(preference: PowerPreference) -> Self {
        match preference {
            PowerPreference::Default => wgpu::PowerPreference::None,
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
            PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// Render session and host settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in radians.
    pub fov_y: f64,
    pub z_near: f64,
    pub z_far: f64,
    /// Distance the camera is pulled back along -Z.
    pub camera_distance: f64,
    /// Milliseconds per radian of rotation about X.
    pub period_x_ms: f64,
    /// Milliseconds per radian of rotation about Y.
    pub period_y_ms: f64,
    /// Clear color, RGBA.
    pub clear_color: [f64; 4],
    /// Length of the FPS sampling window in milliseconds.
    pub fps_window_ms: u64,
    pub power_preference: PowerPreference,
    /// Present with vsync (`Fifo`) or without (`AutoNoVsync`).
    pub vsync: bool,
    /// Window title prefix used by the desktop host.
    pub title: String,
    /// Initial surface size requested by the desktop host.
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_y: std::f64::consts::FRAC_PI_4,
            z_near: 0.1,
            z_far: 100.0,
            camera_distance: 3.0,
            period_x_ms: 2000.0,
            period_y_ms: 1500.0,
            clear_color: [0.1, 0.1, 0.2, 1.0],
            fps_window_ms: 1000,
            power_preference: PowerPreference::Default,
            vsync: true,
            title: "WebGPU Tetrahedron".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl RenderConfig {
    /// Parses a config from JSON. Missing keys keep their defaults.
    ///
    /// The result is validated, see [`RenderConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values the projection and animation cannot work with.
    ///
    /// The field of view must lie in `(0, pi)`, the near plane must be positive with the
    /// far plane beyond it, the camera distance must be finite and both rotation
    /// periods must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid(message));

        if !(self.fov_y > 0.0 && self.fov_y < std::f64::consts::PI) {
            return invalid(format!("fov_y must lie in (0, pi), got {}", self.fov_y));
        }
        if !(self.z_near > 0.0 && self.z_near.is_finite()) {
            return invalid(format!("z_near must be positive, got {}", self.z_near));
        }
        if !(self.z_far > self.z_near && self.z_far.is_finite()) {
            return invalid(format!(
                "z_far ({}) must lie beyond z_near ({})",
                self.z_far, self.z_near
            ));
        }
        if !self.camera_distance.is_finite() {
            return invalid(format!(
                "camera_distance must be finite, got {}",
                self.camera_distance
            ));
        }
        if !(self.period_x_ms > 0.0) {
            return invalid(format!("period_x_ms must be positive, got {}", self.period_x_ms));
        }
        if !(self.period_y_ms > 0.0) {
            return invalid(format!("period_y_ms must be positive, got {}", self.period_y_ms));
        }
        Ok(())
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults when it is unset.
    ///
    /// A file that cannot be read or parsed is reported through `log` and the defaults
    /// are used instead.
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {path}");
                config
            }
            Err(error) => {
                log::warn!("Ignoring config {path}: {error}");
                Self::default()
            }
        }
    }

    pub fn fps_window(&self) -> Duration {
        Duration::from_millis(self.fps_window_ms.max(1))
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}
