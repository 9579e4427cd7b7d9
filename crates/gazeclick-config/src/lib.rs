//! gazeclick-config: typed configuration for the gazeclick pipeline
//!
//! Holds the tuned constants of the blink and motion stages as defaults and
//! layers TOML files and `GAZECLICK_*` environment variables on top of them.

pub mod config;
pub mod defaults;

pub use config::{
    AppConfig, BlinkConfig, ConfigError, ConfigLayer, EyeShapeConfig, LoggingConfig,
    MotionConfig, ReportConfig, ScreenConfig, PROJECT_CONFIG_FILE,
};
