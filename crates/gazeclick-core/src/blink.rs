//! Blink classification
//!
//! Three independent counters track consecutive frames in which exactly the
//! left eye, exactly the right eye, or both eyes are below the EAR threshold.
//! A counter that has reached the debounce floor fires its blink kind on the
//! frame where its condition breaks, then resets to zero.
//!
//! Counters are evaluated in the order left, right, double and share a single
//! "detected this frame" slot, so if several fire in the same frame the last
//! one evaluated is the one reported.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BlinkConfig;

/// Kind of a classified blink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkKind {
    Left,
    Right,
    Double,
}

impl BlinkKind {
    pub const ALL: [BlinkKind; 3] = [BlinkKind::Left, BlinkKind::Right, BlinkKind::Double];

    /// Numeric tag used on the blink timeline (1 left, 2 right, 3 double)
    pub fn tag(&self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
            Self::Double => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for BlinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified blink, timestamped relative to session start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinkEvent {
    pub kind: BlinkKind,
    pub at: Duration,
}

impl BlinkEvent {
    pub fn new(kind: BlinkKind, at: Duration) -> Self {
        Self { kind, at }
    }
}

/// Snapshot of the classifier's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlinkCounters {
    pub left: u32,
    pub right: u32,
    pub both: u32,
}

/// Debounced per-eye blink state machine
#[derive(Debug, Clone)]
pub struct BlinkClassifier {
    threshold: f64,
    debounce_frames: u32,
    counters: BlinkCounters,
}

impl BlinkClassifier {
    pub fn new(config: &BlinkConfig) -> Self {
        Self::with_params(config.ear_threshold, config.debounce_frames)
    }

    pub fn with_params(threshold: f64, debounce_frames: u32) -> Self {
        Self {
            threshold,
            debounce_frames,
            counters: BlinkCounters::default(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn debounce_frames(&self) -> u32 {
        self.debounce_frames
    }

    pub fn counters(&self) -> BlinkCounters {
        self.counters
    }

    /// Feed one frame's EAR pair; returns the blink completed by this frame, if any.
    pub fn update(&mut self, left_ear: f64, right_ear: f64) -> Option<BlinkKind> {
        let t = self.threshold;
        let floor = self.debounce_frames;
        let mut detected = None;

        if step(&mut self.counters.left, left_ear < t && right_ear >= t, floor) {
            detected = Some(BlinkKind::Left);
        }
        if step(&mut self.counters.right, right_ear < t && left_ear >= t, floor) {
            detected = Some(BlinkKind::Right);
        }
        if step(&mut self.counters.both, left_ear < t && right_ear < t, floor) {
            detected = Some(BlinkKind::Double);
        }

        if let Some(kind) = detected {
            debug!(%kind, left_ear, right_ear, "blink completed");
        }
        detected
    }

    pub fn reset(&mut self) {
        self.counters = BlinkCounters::default();
    }

    #[cfg(test)]
    pub(crate) fn with_counters(mut self, counters: BlinkCounters) -> Self {
        self.counters = counters;
        self
    }
}

impl Default for BlinkClassifier {
    fn default() -> Self {
        Self::new(&BlinkConfig::default())
    }
}

/// Advance one counter; true when it fires.
fn step(counter: &mut u32, qualifies: bool, floor: u32) -> bool {
    if qualifies {
        *counter = counter.saturating_add(1);
        return false;
    }
    let fired = *counter >= floor;
    *counter = 0;
    fired
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: f64 = 0.30;
    const CLOSED: f64 = 0.10;

    fn run(classifier: &mut BlinkClassifier, frames: &[(f64, f64)]) -> Vec<BlinkKind> {
        frames
            .iter()
            .filter_map(|&(l, r)| classifier.update(l, r))
            .collect()
    }

    #[test]
    fn test_single_closed_frame_is_not_a_blink() {
        let mut classifier = BlinkClassifier::default();
        let events = run(&mut classifier, &[(CLOSED, OPEN), (OPEN, OPEN), (OPEN, OPEN)]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_debounce_floor_emits_once_on_release() {
        for n in 2..6 {
            let mut classifier = BlinkClassifier::default();
            let mut frames = vec![(CLOSED, OPEN); n];
            frames.extend([(OPEN, OPEN), (OPEN, OPEN)]);

            let mut fired_at = Vec::new();
            for (i, &(l, r)) in frames.iter().enumerate() {
                if let Some(kind) = classifier.update(l, r) {
                    fired_at.push((i, kind));
                }
            }
            assert_eq!(fired_at, vec![(n, BlinkKind::Left)], "closed for {n} frames");
        }
    }

    #[test]
    fn test_right_and_double_kinds() {
        let mut classifier = BlinkClassifier::default();
        let events = run(
            &mut classifier,
            &[
                (OPEN, CLOSED),
                (OPEN, CLOSED),
                (OPEN, OPEN),
                (CLOSED, CLOSED),
                (CLOSED, CLOSED),
                (OPEN, OPEN),
            ],
        );
        assert_eq!(events, vec![BlinkKind::Right, BlinkKind::Double]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut classifier = BlinkClassifier::default();
        let t = classifier.threshold();
        let events = run(&mut classifier, &[(t, OPEN), (t, OPEN), (OPEN, OPEN)]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_left_turning_into_double_fires_left() {
        let mut classifier = BlinkClassifier::default();
        let events = run(
            &mut classifier,
            &[(CLOSED, OPEN), (CLOSED, OPEN), (CLOSED, CLOSED)],
        );
        assert_eq!(events, vec![BlinkKind::Left]);
        assert_eq!(classifier.counters().both, 1);
    }

    #[test]
    fn test_simultaneous_release_reports_last_evaluated() {
        let mut classifier = BlinkClassifier::default().with_counters(BlinkCounters {
            left: 2,
            right: 0,
            both: 3,
        });
        assert_eq!(classifier.update(OPEN, OPEN), Some(BlinkKind::Double));
        assert_eq!(classifier.counters(), BlinkCounters::default());

        let mut classifier = BlinkClassifier::default().with_counters(BlinkCounters {
            left: 2,
            right: 2,
            both: 0,
        });
        assert_eq!(classifier.update(OPEN, OPEN), Some(BlinkKind::Right));
    }

    #[test]
    fn test_custom_debounce() {
        let mut classifier = BlinkClassifier::with_params(0.22, 3);
        let events = run(&mut classifier, &[(CLOSED, OPEN), (CLOSED, OPEN), (OPEN, OPEN)]);
        assert!(events.is_empty());

        let events = run(
            &mut classifier,
            &[(CLOSED, OPEN), (CLOSED, OPEN), (CLOSED, OPEN), (OPEN, OPEN)],
        );
        assert_eq!(events, vec![BlinkKind::Left]);
    }

    #[test]
    fn test_tags() {
        let tags: Vec<u8> = BlinkKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(tags, vec![1, 2, 3]);
    }
}
