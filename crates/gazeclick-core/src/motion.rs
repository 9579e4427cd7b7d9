//! Gaze-to-cursor motion filter
//!
//! The gaze anchor (an eye center in frame pixels) is mapped linearly from a
//! window in the middle of the frame onto the full screen. The cursor then
//! follows that target only when it is more than the deadzone away on either
//! axis, covering `acceleration / smoothing` of the remaining distance per
//! frame.

use serde::{Deserialize, Serialize};

use crate::config::{MotionConfig, ScreenConfig};
use crate::landmarks::{PixelPoint, ScreenPoint};

/// Last emitted cursor position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
}

impl CursorState {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Raw target and resulting cursor position for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub raw_x: f64,
    pub raw_y: f64,
    pub smoothed_x: f64,
    pub smoothed_y: f64,
}

/// Result of one motion step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    pub sample: MotionSample,
    /// New cursor position when the deadzone gate passed
    pub moved: Option<ScreenPoint>,
}

/// Linear interpolation of `x` from `from` onto `to`.
///
/// With `clamp`, inputs outside `from` map to the nearest endpoint of `to`;
/// otherwise the line is extended.
pub fn interp(x: f64, from: (f64, f64), to: (f64, f64), clamp: bool) -> f64 {
    let (x0, x1) = from;
    let (y0, y1) = to;
    if clamp {
        if x <= x0 {
            return y0;
        }
        if x >= x1 {
            return y1;
        }
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// Immutable motion settings; cursor state lives in [`CursorState`]
#[derive(Debug, Clone)]
pub struct MotionFilter {
    deadzone: f64,
    smoothing: f64,
    acceleration: f64,
    window: (f64, f64),
    clamp: bool,
    screen: (f64, f64),
}

impl MotionFilter {
    pub fn new(motion: &MotionConfig, screen: &ScreenConfig) -> Self {
        Self {
            deadzone: motion.deadzone,
            smoothing: motion.smoothing,
            acceleration: motion.acceleration,
            window: (motion.window_low, motion.window_high),
            clamp: motion.clamp_to_screen,
            screen: (screen.width as f64, screen.height as f64),
        }
    }

    pub fn deadzone(&self) -> f64 {
        self.deadzone
    }

    /// Fraction of the remaining distance covered per gated step
    pub fn gain(&self) -> f64 {
        self.acceleration / self.smoothing
    }

    /// Map an eye position in frame pixels to a screen target.
    pub fn map_to_screen(&self, eye: PixelPoint, frame_width: u32, frame_height: u32) -> ScreenPoint {
        let (lo, hi) = self.window;
        let (w, h) = (frame_width as f64, frame_height as f64);
        ScreenPoint::new(
            interp(eye.x as f64, (lo * w, hi * w), (0.0, self.screen.0), self.clamp),
            interp(eye.y as f64, (lo * h, hi * h), (0.0, self.screen.1), self.clamp),
        )
    }

    /// Move `cursor` toward `target` if the target is outside the deadzone.
    pub fn step(&self, cursor: &mut CursorState, target: ScreenPoint) -> MotionOutcome {
        let dx = target.x - cursor.x;
        let dy = target.y - cursor.y;

        let moved = if dx.abs() > self.deadzone || dy.abs() > self.deadzone {
            cursor.x += dx / self.smoothing * self.acceleration;
            cursor.y += dy / self.smoothing * self.acceleration;
            Some(cursor.position())
        } else {
            None
        };

        MotionOutcome {
            sample: MotionSample {
                raw_x: target.x,
                raw_y: target.y,
                smoothed_x: cursor.x,
                smoothed_y: cursor.y,
            },
            moved,
        }
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new(&MotionConfig::default(), &ScreenConfig::default())
    }
}
