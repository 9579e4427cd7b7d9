//! Actuator abstraction for OS-level clicks and cursor moves
//!
//! The pipeline never talks to the windowing system directly. Every click
//! and move goes through an [`Actuator`]; calls are fire-and-forget and a
//! failure never rolls back pipeline state.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Mouse button to click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Error types for actuator calls.
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("Actuator rejected {action}: {reason}")]
    Rejected { action: &'static str, reason: String },

    #[error("Actuator output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode actuator command: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single command sent to an actuator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActuatorCommand {
    Click { button: MouseButton },
    Move { x: f64, y: f64 },
}

/// Host-side pointer actions.
pub trait Actuator {
    /// Click `button` at the current cursor position.
    fn click(&mut self, button: MouseButton) -> Result<(), ActuatorError>;
    /// Move the cursor to absolute screen coordinates.
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), ActuatorError>;
}

/// [`Actuator`] implementation that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActuator;

impl Actuator for NoopActuator {
    fn click(&mut self, _button: MouseButton) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn move_to(&mut self, _x: f64, _y: f64) -> Result<(), ActuatorError> {
        Ok(())
    }
}

/// Simple [`Actuator`] implementation that logs each action.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingActuator;

impl Actuator for LoggingActuator {
    fn click(&mut self, button: MouseButton) -> Result<(), ActuatorError> {
        info!(button = button.as_str(), "actuator click");
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<(), ActuatorError> {
        info!(x, y, "actuator move");
        Ok(())
    }
}

/// Writes each command as one JSON object per line, for an external injector.
pub struct JsonLinesActuator<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesActuator<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, command: ActuatorCommand) -> Result<(), ActuatorError> {
        serde_json::to_writer(&mut self.writer, &command)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Actuator for JsonLinesActuator<W> {
    fn click(&mut self, button: MouseButton) -> Result<(), ActuatorError> {
        self.emit(ActuatorCommand::Click { button })
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<(), ActuatorError> {
        self.emit(ActuatorCommand::Move { x, y })
    }
}
