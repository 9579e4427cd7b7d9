//! Tuned constants used as configuration defaults.

/// Eye aspect ratio below which an eye counts as closed.
pub const EAR_THRESH: f64 = 0.22;

/// Consecutive qualifying frames required before a blink can fire.
pub const DEBOUNCE_FRAMES: u32 = 2;

/// Screen-space distance a gaze target must move before the cursor follows.
pub const DEADZONE: f64 = 25.0;

/// Divisor applied to each cursor delta.
pub const SMOOTHING: f64 = 4.0;

/// Gain applied to the damped delta.
pub const ACCEL: f64 = 1.6;

/// Fraction of the frame width/height that maps to the screen's top-left edge.
pub const GAZE_WINDOW_LOW: f64 = 0.3;

/// Fraction of the frame width/height that maps to the screen's bottom-right edge.
pub const GAZE_WINDOW_HIGH: f64 = 0.7;

pub const SCREEN_WIDTH: u32 = 1920;
pub const SCREEN_HEIGHT: u32 = 1080;

/// Face-mesh indices for the left eye: corner, upper, upper, corner, lower, lower.
pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];

/// Face-mesh indices for the right eye, same ordering as [`LEFT_EYE`].
pub const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];

/// Directory the end-of-session report is written to.
pub const REPORT_DIR: &str = "results/cursor_movement";

pub const LOG_LEVEL: &str = "info";
