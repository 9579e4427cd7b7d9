//! Configuration loading for gazeclick
//!
//! Sources, lowest priority first:
//! - Built-in defaults (see [`crate::defaults`])
//! - User config: `<platform config dir>/gazeclick/config.toml`
//! - Project-local: `gazeclick.toml` in the working directory
//! - An explicit file passed by the caller
//! - `GAZECLICK_*` environment variables
//!
//! Files are merged table-by-table, so a later file only needs the keys it
//! changes. Validation runs once on the merged result.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::defaults;

/// File name searched for in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "gazeclick.toml";

/// Error types for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Configuration does not match the expected schema: {0}")]
    Schema(#[source] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Blink classification settings.
    pub blink: BlinkConfig,
    /// Gaze-to-cursor motion settings.
    pub motion: MotionConfig,
    /// Target screen geometry.
    pub screen: ScreenConfig,
    /// Landmark indices describing each eye.
    pub eyes: EyeShapeConfig,
    /// End-of-session report settings.
    pub report: ReportConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Blink classification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Eye aspect ratio below which an eye counts as closed.
    pub ear_threshold: f64,
    /// Consecutive closed frames needed before a blink fires.
    pub debounce_frames: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            ear_threshold: defaults::EAR_THRESH,
            debounce_frames: defaults::DEBOUNCE_FRAMES,
        }
    }
}

/// Cursor motion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Minimum screen-space delta (exclusive) before the cursor moves.
    pub deadzone: f64,
    /// Divisor applied to each delta.
    pub smoothing: f64,
    /// Gain applied to the damped delta.
    pub acceleration: f64,
    /// Low edge of the gaze window, as a fraction of the frame size.
    pub window_low: f64,
    /// High edge of the gaze window, as a fraction of the frame size.
    pub window_high: f64,
    /// Clamp mapped gaze to the screen instead of extrapolating past it.
    pub clamp_to_screen: bool,
    /// Cursor position at session start.
    pub origin: [f64; 2],
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            deadzone: defaults::DEADZONE,
            smoothing: defaults::SMOOTHING,
            acceleration: defaults::ACCEL,
            window_low: defaults::GAZE_WINDOW_LOW,
            window_high: defaults::GAZE_WINDOW_HIGH,
            clamp_to_screen: true,
            origin: [0.0, 0.0],
        }
    }
}

/// Screen geometry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: defaults::SCREEN_WIDTH,
            height: defaults::SCREEN_HEIGHT,
        }
    }
}

/// Landmark indices for each eye, ordered corner, upper, upper, corner, lower, lower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeShapeConfig {
    pub left: [usize; 6],
    pub right: [usize; 6],
}

impl Default for EyeShapeConfig {
    fn default() -> Self {
        Self {
            left: defaults::LEFT_EYE,
            right: defaults::RIGHT_EYE,
        }
    }
}

/// End-of-session report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Write a report file when the session ends.
    pub enabled: bool,
    /// Directory the report is written into.
    pub output_dir: PathBuf,
    /// Include the raw and smoothed cursor series in the report.
    pub include_series: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: PathBuf::from(defaults::REPORT_DIR),
            include_series: true,
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

/// A single configuration file in the load order.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub path: PathBuf,
    /// Missing required layers are an error; missing optional ones are skipped.
    pub required: bool,
}

impl ConfigLayer {
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }

    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the standard locations plus an optional explicit file,
    /// then apply environment overrides and validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut layers = Vec::new();
        if let Some(path) = user_config_path() {
            layers.push(ConfigLayer::optional(path));
        }
        layers.push(ConfigLayer::optional(PROJECT_CONFIG_FILE));
        if let Some(path) = explicit {
            layers.push(ConfigLayer::required(path));
        }

        let mut config = Self::from_layers(&layers)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge the given files in order on top of the defaults. No validation.
    pub fn from_layers(layers: &[ConfigLayer]) -> Result<Self> {
        let mut merged = toml::Table::new();

        for layer in layers {
            if !layer.path.exists() {
                if layer.required {
                    return Err(ConfigError::Io {
                        path: layer.path.clone(),
                        source: std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "config file not found",
                        ),
                    });
                }
                debug!("Config not found, skipping: {}", layer.path.display());
                continue;
            }

            info!("Loading config: {}", layer.path.display());
            let table = read_table(&layer.path)?;
            merge_tables(&mut merged, table);
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(ConfigError::Schema)
    }

    /// Parse a configuration document on top of the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(ConfigError::Schema)
    }

    /// Apply `GAZECLICK_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parsed(&lookup, "GAZECLICK_EAR_THRESHOLD")? {
            self.blink.ear_threshold = v;
        }
        if let Some(v) = parsed(&lookup, "GAZECLICK_DEBOUNCE_FRAMES")? {
            self.blink.debounce_frames = v;
        }
        if let Some(v) = parsed(&lookup, "GAZECLICK_DEADZONE")? {
            self.motion.deadzone = v;
        }
        if let Some(v) = parsed(&lookup, "GAZECLICK_SCREEN_WIDTH")? {
            self.screen.width = v;
        }
        if let Some(v) = parsed(&lookup, "GAZECLICK_SCREEN_HEIGHT")? {
            self.screen.height = v;
        }
        if let Some(v) = lookup("GAZECLICK_REPORT_DIR") {
            self.report.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("GAZECLICK_LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(())
    }

    /// Check that every value is usable by the pipeline.
    pub fn validate(&self) -> Result<()> {
        let blink = &self.blink;
        if !(blink.ear_threshold > 0.0 && blink.ear_threshold.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "blink.ear_threshold must be a positive number, got {}",
                blink.ear_threshold
            )));
        }
        if blink.debounce_frames == 0 {
            return Err(ConfigError::Invalid(
                "blink.debounce_frames must be at least 1".to_string(),
            ));
        }

        let motion = &self.motion;
        if !(motion.deadzone >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "motion.deadzone must not be negative, got {}",
                motion.deadzone
            )));
        }
        if !(motion.smoothing > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "motion.smoothing must be positive, got {}",
                motion.smoothing
            )));
        }
        if !(motion.acceleration > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "motion.acceleration must be positive, got {}",
                motion.acceleration
            )));
        }
        if !(motion.window_low < motion.window_high) {
            return Err(ConfigError::Invalid(format!(
                "motion.window_low ({}) must be below motion.window_high ({})",
                motion.window_low, motion.window_high
            )));
        }

        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen.width, self.screen.height
            )));
        }

        Ok(())
    }

    /// Render the configuration as a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Location of the per-user config file, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gazeclick").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Recursively merge `overlay` into `base`; overlay scalars win.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn parsed<F, T>(lookup: &F, var: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env {
                var: var.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}
