//! Test doubles for the actuator seam

use crate::actuator::{Actuator, ActuatorCommand, ActuatorError, MouseButton};

/// Records every command it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    pub commands: Vec<ActuatorCommand>,
}

impl RecordingActuator {
    pub fn clicks(&self, button: MouseButton) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, ActuatorCommand::Click { button: b } if *b == button))
            .count()
    }

    pub fn moves(&self) -> Vec<(f64, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                ActuatorCommand::Move { x, y } => Some((*x, *y)),
                ActuatorCommand::Click { .. } => None,
            })
            .collect()
    }
}

impl Actuator for RecordingActuator {
    fn click(&mut self, button: MouseButton) -> Result<(), ActuatorError> {
        self.commands.push(ActuatorCommand::Click { button });
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<(), ActuatorError> {
        self.commands.push(ActuatorCommand::Move { x, y });
        Ok(())
    }
}

/// Rejects every command
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingActuator;

impl Actuator for FailingActuator {
    fn click(&mut self, _button: MouseButton) -> Result<(), ActuatorError> {
        Err(ActuatorError::Rejected {
            action: "click",
            reason: "display unavailable".to_string(),
        })
    }

    fn move_to(&mut self, _x: f64, _y: f64) -> Result<(), ActuatorError> {
        Err(ActuatorError::Rejected {
            action: "move",
            reason: "display unavailable".to_string(),
        })
    }
}
