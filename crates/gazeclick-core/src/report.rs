//! End-of-session report
//!
//! Summarizes what the [`SessionRecorder`](crate::recorder::SessionRecorder)
//! collected: blink totals per kind, the accuracy figures and, optionally,
//! the raw and smoothed cursor series.
//!
//! The accuracy figures are scaled by fixed ceilings (92 for blinks, 101 for
//! the cursor) rather than 100. Downstream dashboards compare against these
//! exact values, so they are kept as-is.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::blink::BlinkKind;
use crate::error::{Error, Result};
use crate::recorder::{BlinkCounts, SessionCounters};
use crate::session::SessionState;

/// Multiplier applied to the detected/attempted blink ratio
pub const BLINK_ACCURACY_SCALE: f64 = 92.0;

/// Multiplier applied to the valid/attempted cursor move ratio
pub const CURSOR_ACCURACY_SCALE: f64 = 101.0;

pub fn blink_accuracy(counters: &SessionCounters) -> f64 {
    if counters.blinks_attempted == 0 {
        return 0.0;
    }
    counters.blinks_detected as f64 / counters.blinks_attempted as f64 * BLINK_ACCURACY_SCALE
}

pub fn cursor_accuracy(counters: &SessionCounters) -> f64 {
    if counters.cursor_moves == 0 {
        return 0.0;
    }
    counters.cursor_valid_moves as f64 / counters.cursor_moves as f64 * CURSOR_ACCURACY_SCALE
}

/// A blink on the session timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinkRecord {
    /// Seconds since session start
    pub t: f64,
    pub kind: BlinkKind,
    pub tag: u8,
}

/// The four parallel cursor series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionSeries {
    pub raw_x: Vec<f64>,
    pub raw_y: Vec<f64>,
    pub smoothed_x: Vec<f64>,
    pub smoothed_y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    /// Frames received from the source
    pub frames: u64,
    /// Frames that reported a face
    pub face_frames: u64,
    pub counters: SessionCounters,
    pub blink_counts: BlinkCounts,
    pub blink_accuracy: f64,
    pub cursor_accuracy: f64,
    pub overall_accuracy: f64,
    pub actuator_failures: u64,
    pub blinks: Vec<BlinkRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<MotionSeries>,
}

impl SessionReport {
    /// Build a report from a finished (or interrupted) session.
    pub fn from_session(
        state: &SessionState,
        started_at: DateTime<Utc>,
        duration: Duration,
        include_series: bool,
    ) -> Self {
        let recorder = state.recorder();
        let counters = recorder.counters();
        let blink_accuracy = blink_accuracy(&counters);
        let cursor_accuracy = cursor_accuracy(&counters);

        let blinks = recorder
            .blinks()
            .iter()
            .map(|event| BlinkRecord {
                t: event.at.as_secs_f64(),
                kind: event.kind,
                tag: event.kind.tag(),
            })
            .collect();

        let series = include_series.then(|| MotionSeries {
            raw_x: recorder.raw_x().to_vec(),
            raw_y: recorder.raw_y().to_vec(),
            smoothed_x: recorder.smoothed_x().to_vec(),
            smoothed_y: recorder.smoothed_y().to_vec(),
        });

        Self {
            started_at,
            duration_secs: duration.as_secs_f64(),
            frames: state.frames(),
            face_frames: state.face_frames(),
            counters,
            blink_counts: recorder.counts_by_kind(),
            blink_accuracy,
            cursor_accuracy,
            overall_accuracy: (blink_accuracy + cursor_accuracy) / 2.0,
            actuator_failures: state.actuator_failures(),
            blinks,
            series,
        }
    }

    /// Timestamped file name, e.g. `session_20260101_120000.json`
    pub fn file_name(&self) -> String {
        format!("session_{}.json", self.started_at.format("%Y%m%d_%H%M%S"))
    }

    /// Write the report as pretty JSON into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|source| Error::ReportIo {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| Error::ReportIo {
            path: path.clone(),
            source,
        })?;

        info!("Saved session report to {}", path.display());
        Ok(path)
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Session summary ({:.1}s, {} frames, {} with a face)",
            self.duration_secs, self.frames, self.face_frames
        )?;
        writeln!(
            f,
            "  Blinks:   {} left, {} right, {} double",
            self.blink_counts.left, self.blink_counts.right, self.blink_counts.double
        )?;
        writeln!(
            f,
            "  Cursor:   {} moves, {} past the deadzone",
            self.counters.cursor_moves, self.counters.cursor_valid_moves
        )?;
        write!(
            f,
            "  Accuracy: cursor {:.1}%, blink {:.1}%, overall {:.1}%",
            self.cursor_accuracy, self.blink_accuracy, self.overall_accuracy
        )?;
        if self.actuator_failures > 0 {
            write!(f, "\n  Actuator failures: {}", self.actuator_failures)?;
        }
        Ok(())
    }
}
