//! Runtime control state driven by operator key presses

use std::fmt;

/// Operator-facing mode of the session.
///
/// `Calibrating` is an integration point only: no calibration routine
/// exists, so the pipeline behaves the same in both states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Calibrating,
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Calibrating => f.write_str("calibrating"),
        }
    }
}

/// Commands accepted by the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    ToggleCalibration,
    Quit,
}

/// What the frame loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

impl ControlState {
    /// Apply a command, returning the next state and whether the loop continues.
    pub fn apply(self, command: ControlCommand) -> (ControlState, LoopControl) {
        match (self, command) {
            (_, ControlCommand::Quit) => (self, LoopControl::Stop),
            (ControlState::Idle, ControlCommand::ToggleCalibration) => {
                (ControlState::Calibrating, LoopControl::Continue)
            }
            (ControlState::Calibrating, ControlCommand::ToggleCalibration) => {
                (ControlState::Idle, LoopControl::Continue)
            }
        }
    }
}
