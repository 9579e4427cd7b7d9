//! In-memory session log consumed by the end-of-session report

use serde::{Deserialize, Serialize};

use crate::blink::{BlinkEvent, BlinkKind};
use crate::motion::MotionSample;

/// Running counters kept for the accuracy summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    /// Debounce completions
    pub blinks_attempted: u64,
    /// Blinks dispatched and logged
    pub blinks_detected: u64,
    /// Face frames that reached the motion filter
    pub cursor_moves: u64,
    /// Face frames whose target cleared the deadzone
    pub cursor_valid_moves: u64,
}

/// Blink totals per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkCounts {
    pub left: u64,
    pub right: u64,
    pub double: u64,
}

impl BlinkCounts {
    pub fn get(&self, kind: BlinkKind) -> u64 {
        match kind {
            BlinkKind::Left => self.left,
            BlinkKind::Right => self.right,
            BlinkKind::Double => self.double,
        }
    }

    pub fn total(&self) -> u64 {
        self.left + self.right + self.double
    }
}

/// Append-only record of one session
#[derive(Debug, Clone, Default)]
pub struct SessionRecorder {
    raw_x: Vec<f64>,
    raw_y: Vec<f64>,
    smoothed_x: Vec<f64>,
    smoothed_y: Vec<f64>,
    blinks: Vec<BlinkEvent>,
    counters: SessionCounters,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one face frame's motion sample; `moved` marks a deadzone pass.
    pub fn record_motion(&mut self, sample: &MotionSample, moved: bool) {
        self.counters.cursor_moves += 1;
        if moved {
            self.counters.cursor_valid_moves += 1;
        }
        self.raw_x.push(sample.raw_x);
        self.raw_y.push(sample.raw_y);
        self.smoothed_x.push(sample.smoothed_x);
        self.smoothed_y.push(sample.smoothed_y);
    }

    pub fn record_blink(&mut self, event: BlinkEvent) {
        self.counters.blinks_attempted += 1;
        self.blinks.push(event);
        self.counters.blinks_detected += 1;
    }

    pub fn raw_x(&self) -> &[f64] {
        &self.raw_x
    }

    pub fn raw_y(&self) -> &[f64] {
        &self.raw_y
    }

    pub fn smoothed_x(&self) -> &[f64] {
        &self.smoothed_x
    }

    pub fn smoothed_y(&self) -> &[f64] {
        &self.smoothed_y
    }

    pub fn blinks(&self) -> &[BlinkEvent] {
        &self.blinks
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    /// Number of recorded motion samples
    pub fn len(&self) -> usize {
        self.raw_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_x.is_empty()
    }

    pub fn counts_by_kind(&self) -> BlinkCounts {
        self.blinks
            .iter()
            .fold(BlinkCounts::default(), |mut counts, event| {
                match event.kind {
                    BlinkKind::Left => counts.left += 1,
                    BlinkKind::Right => counts.right += 1,
                    BlinkKind::Double => counts.double += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample(raw: f64, smoothed: f64) -> MotionSample {
        MotionSample {
            raw_x: raw,
            raw_y: raw,
            smoothed_x: smoothed,
            smoothed_y: smoothed,
        }
    }

    #[test]
    fn test_series_stay_parallel() {
        let mut recorder = SessionRecorder::new();
        recorder.record_motion(&sample(100.0, 40.0), true);
        recorder.record_motion(&sample(110.0, 40.0), false);

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.raw_x(), &[100.0, 110.0]);
        assert_eq!(recorder.smoothed_y(), &[40.0, 40.0]);
        assert_eq!(recorder.counters().cursor_moves, 2);
        assert_eq!(recorder.counters().cursor_valid_moves, 1);
    }

    #[test]
    fn test_blinks_counted_by_kind() {
        let mut recorder = SessionRecorder::new();
        recorder.record_blink(BlinkEvent::new(BlinkKind::Left, Duration::from_millis(100)));
        recorder.record_blink(BlinkEvent::new(BlinkKind::Double, Duration::from_millis(900)));
        recorder.record_blink(BlinkEvent::new(BlinkKind::Left, Duration::from_secs(2)));

        let counts = recorder.counts_by_kind();
        assert_eq!(counts.get(BlinkKind::Left), 2);
        assert_eq!(counts.get(BlinkKind::Right), 0);
        assert_eq!(counts.get(BlinkKind::Double), 1);
        assert_eq!(counts.total(), 3);

        let counters = recorder.counters();
        assert_eq!(counters.blinks_attempted, 3);
        assert_eq!(counters.blinks_detected, 3);
    }
}
