//! Error types for gazeclick-core.
//!
//! Per-frame problems (missing landmarks, degenerate eyes, actuator
//! rejections) are not errors at this level: the pipeline degrades to a
//! no-op for that frame. Only setup and report output can fail.

use std::path::PathBuf;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to encode report: {0}")]
    ReportEncode(#[from] serde_json::Error),

    #[error("Failed to write report to {path}: {source}")]
    ReportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
