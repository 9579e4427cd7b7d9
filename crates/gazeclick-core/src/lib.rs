//! gazeclick-core: hands-free pointer control from facial landmarks
//!
//! Everything downstream of "a set of 2D landmarks for the current frame":
//! - Eye aspect ratio and eye-center metrics
//! - Debounced left / right / double blink classification
//! - Gaze-to-screen mapping with deadzone, smoothing and acceleration
//! - Dispatch of clicks and moves to an external actuator
//! - An in-memory session record and end-of-session report
//!
//! Frames are processed one at a time by [`Pipeline::process_frame`], which
//! threads an explicit [`SessionState`] through every stage.

pub mod actuator;
pub mod blink;
pub mod control;
pub mod dispatch;
pub mod error;
pub mod landmarks;
pub mod metrics;
pub mod motion;
pub mod recorder;
pub mod refine;
pub mod report;
pub mod session;
pub mod synthetic;
pub mod test_utils;

pub use gazeclick_config::{config, defaults};

// Re-export commonly used types
pub use actuator::{
    Actuator, ActuatorCommand, ActuatorError, JsonLinesActuator, LoggingActuator, MouseButton,
    NoopActuator,
};
pub use blink::{BlinkClassifier, BlinkCounters, BlinkEvent, BlinkKind};
pub use control::{ControlCommand, ControlState, LoopControl};
pub use dispatch::ActionDispatcher;
pub use error::{Error, Result};
pub use landmarks::{Eye, EyeShape, LandmarkFrame, LandmarkPoint, Landmarks, PixelPoint, ScreenPoint};
pub use metrics::{EyeMeasurement, MetricsError};
pub use motion::{CursorState, MotionFilter, MotionOutcome, MotionSample};
pub use recorder::{BlinkCounts, SessionCounters, SessionRecorder};
pub use refine::{GazeRefiner, IrisFrame, NullGazeRefiner};
pub use report::SessionReport;
pub use session::{FrameOutcome, Pipeline, ProcessedFrame, SessionState};
pub use synthetic::{BlinkScript, SyntheticFace};
