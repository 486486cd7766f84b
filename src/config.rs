//! Configuration file support.
//!
//! Zoom sensitivities, optional zoom limits, gesture timings and log verbosity
//! can be exported to and imported from JSON. Missing fields fall back to
//! their defaults so older files keep loading.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ADJUSTMENT_THROTTLE_MS, DEFAULT_DOUBLE_TAP_MS, DEFAULT_FIT_RATIO,
    DEFAULT_PINCH_SENSITIVITY, DEFAULT_WHEEL_SENSITIVITY,
};
use crate::transform::ZoomBounds;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including per-event transitions
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Viewer configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Zoom behaviour
    #[serde(default)]
    pub zoom: ZoomConfig,

    /// Gesture timings
    #[serde(default)]
    pub gestures: GestureConfig,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Zoom section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Zoom step per wheel event (continuous input)
    #[serde(default = "default_wheel_sensitivity")]
    pub wheel_sensitivity: f32,

    /// Zoom step per pinch update (discrete input)
    #[serde(default = "default_pinch_sensitivity")]
    pub pinch_sensitivity: f32,

    /// Lower zoom limit, unbounded when absent
    #[serde(default)]
    pub min_zoom: Option<f32>,

    /// Upper zoom limit, unbounded when absent
    #[serde(default)]
    pub max_zoom: Option<f32>,

    /// Share of the viewport height used by the initial fit
    #[serde(default = "default_fit_ratio")]
    pub fit_ratio: f32,
}

fn default_wheel_sensitivity() -> f32 {
    DEFAULT_WHEEL_SENSITIVITY
}

fn default_pinch_sensitivity() -> f32 {
    DEFAULT_PINCH_SENSITIVITY
}

fn default_fit_ratio() -> f32 {
    DEFAULT_FIT_RATIO
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            wheel_sensitivity: default_wheel_sensitivity(),
            pinch_sensitivity: default_pinch_sensitivity(),
            min_zoom: None,
            max_zoom: None,
            fit_ratio: default_fit_ratio(),
        }
    }
}

impl ZoomConfig {
    pub fn bounds(&self) -> ZoomBounds {
        ZoomBounds::new(self.min_zoom, self.max_zoom)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("zoom.wheel_sensitivity", self.wheel_sensitivity),
            ("zoom.pinch_sensitivity", self.pinch_sensitivity),
        ] {
            // 1 - s must stay positive for zoom-out steps
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::invalid_value(field, format!("{} is not in (0, 1)", value)));
            }
        }

        for (field, limit) in [("zoom.min_zoom", self.min_zoom), ("zoom.max_zoom", self.max_zoom)] {
            if let Some(limit) = limit {
                if !(limit.is_finite() && limit > 0.0) {
                    return Err(ConfigError::invalid_value(field, format!("{} is not a positive number", limit)));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_zoom, self.max_zoom) {
            if min > max {
                return Err(ConfigError::invalid_value(
                    "zoom.min_zoom",
                    format!("{} is greater than max_zoom {}", min, max),
                ));
            }
        }

        if !(self.fit_ratio > 0.0 && self.fit_ratio <= 1.0) {
            return Err(ConfigError::invalid_value(
                "zoom.fit_ratio",
                format!("{} is not in (0, 1]", self.fit_ratio),
            ));
        }

        Ok(())
    }
}

/// Gesture timing section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Maximum gap between taps of a double tap, in milliseconds
    #[serde(default = "default_double_tap_ms")]
    pub double_tap_ms: u64,

    /// Minimum interval between adjustment change notifications, in milliseconds
    #[serde(default = "default_adjustment_throttle_ms")]
    pub adjustment_throttle_ms: u64,
}

fn default_double_tap_ms() -> u64 {
    DEFAULT_DOUBLE_TAP_MS
}

fn default_adjustment_throttle_ms() -> u64 {
    DEFAULT_ADJUSTMENT_THROTTLE_MS
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_tap_ms: default_double_tap_ms(),
            adjustment_throttle_ms: default_adjustment_throttle_ms(),
        }
    }
}

impl GestureConfig {
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_ms)
    }

    pub fn adjustment_throttle(&self) -> Duration {
        Duration::from_millis(self.adjustment_throttle_ms)
    }
}

impl ViewerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            zoom: ZoomConfig::default(),
            gestures: GestureConfig::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Check every value against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zoom.validate()
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "rawview-config.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("rawview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("rawview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                Some(config)
            }
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trip() {
        let config = ViewerConfig::default();
        let json = config.to_json().unwrap();
        let parsed = ViewerConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parsed = ViewerConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(parsed.zoom.wheel_sensitivity, DEFAULT_WHEEL_SENSITIVITY);
        assert_eq!(parsed.zoom.pinch_sensitivity, DEFAULT_PINCH_SENSITIVITY);
        assert_eq!(parsed.zoom.bounds(), ZoomBounds::unbounded());
        assert_eq!(parsed.gestures.double_tap_window(), Duration::from_millis(300));
        assert_eq!(parsed.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_zoom_section() {
        let parsed =
            ViewerConfig::from_json(r#"{"version": 1, "zoom": {"pinch_sensitivity": 0.2, "max_zoom": 8.0}}"#)
                .unwrap();
        assert_eq!(parsed.zoom.wheel_sensitivity, DEFAULT_WHEEL_SENSITIVITY);
        assert_eq!(parsed.zoom.pinch_sensitivity, 0.2);
        assert_eq!(parsed.zoom.bounds(), ZoomBounds::new(None, Some(8.0)));
    }

    #[test]
    fn test_version_too_new() {
        let result = ViewerConfig::from_json(r#"{"version": 99}"#);
        assert!(matches!(
            result,
            Err(ConfigError::VersionTooNew { file_version: 99, supported_version: CONFIG_VERSION })
        ));
    }

    #[test]
    fn test_rejects_sensitivity_out_of_range() {
        for bad in ["0.0", "1.0", "-0.5", "2.5"] {
            let json = format!(r#"{{"version": 1, "zoom": {{"wheel_sensitivity": {}}}}}"#, bad);
            let result = ViewerConfig::from_json(&json);
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { field: "zoom.wheel_sensitivity", .. })),
                "accepted wheel_sensitivity {}",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let result = ViewerConfig::from_json(r#"{"version": 1, "zoom": {"min_zoom": 4.0, "max_zoom": 2.0}}"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { field: "zoom.min_zoom", .. })));
    }

    #[test]
    fn test_rejects_non_positive_limit() {
        let result = ViewerConfig::from_json(r#"{"version": 1, "zoom": {"min_zoom": 0.0}}"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { field: "zoom.min_zoom", .. })));
    }

    #[test]
    fn test_rejects_bad_fit_ratio() {
        let result = ViewerConfig::from_json(r#"{"version": 1, "zoom": {"fit_ratio": 1.5}}"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { field: "zoom.fit_ratio", .. })));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(ViewerConfig::from_json("not json"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_log_level_names() {
        let parsed = ViewerConfig::from_json(r#"{"version": 1, "log_level": "trace"}"#).unwrap();
        assert_eq!(parsed.log_level.to_level_filter(), log::LevelFilter::Trace);
    }
}
