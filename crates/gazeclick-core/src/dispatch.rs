//! Maps classified blinks and gated cursor moves onto actuator calls

use tracing::{info, warn};

use crate::actuator::{Actuator, MouseButton};
use crate::blink::BlinkKind;
use crate::landmarks::ScreenPoint;

/// Button clicked for each blink kind.
///
/// A double blink is a plain left click, not a distinct action.
pub fn button_for(kind: BlinkKind) -> MouseButton {
    match kind {
        BlinkKind::Left | BlinkKind::Double => MouseButton::Left,
        BlinkKind::Right => MouseButton::Right,
    }
}

/// Forwards actions to an actuator and counts the calls it rejected
#[derive(Debug, Clone, Default)]
pub struct ActionDispatcher {
    failures: u64,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click for a completed blink. Returns false if the actuator failed.
    pub fn click(&mut self, actuator: &mut dyn Actuator, kind: BlinkKind) -> bool {
        let button = button_for(kind);
        info!("{} blink -> {} click", kind, button.as_str());

        match actuator.click(button) {
            Ok(()) => true,
            Err(e) => {
                warn!("Click for {} blink failed: {}", kind, e);
                self.failures += 1;
                false
            }
        }
    }

    /// Move the cursor. Returns false if the actuator failed.
    pub fn move_to(&mut self, actuator: &mut dyn Actuator, target: ScreenPoint) -> bool {
        match actuator.move_to(target.x, target.y) {
            Ok(()) => true,
            Err(e) => {
                warn!("Cursor move to ({:.1}, {:.1}) failed: {}", target.x, target.y, e);
                self.failures += 1;
                false
            }
        }
    }

    /// Actuator calls that returned an error so far
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::ActuatorCommand;
    use crate::test_utils::{FailingActuator, RecordingActuator};

    #[test]
    fn test_blink_kinds_map_to_buttons() {
        assert_eq!(button_for(BlinkKind::Left), MouseButton::Left);
        assert_eq!(button_for(BlinkKind::Right), MouseButton::Right);
        assert_eq!(button_for(BlinkKind::Double), MouseButton::Left);
    }

    #[test]
    fn test_dispatch_reaches_actuator() {
        let mut dispatcher = ActionDispatcher::new();
        let mut actuator = RecordingActuator::default();

        assert!(dispatcher.click(&mut actuator, BlinkKind::Double));
        assert!(dispatcher.move_to(&mut actuator, ScreenPoint::new(3.0, 4.0)));

        assert_eq!(
            actuator.commands,
            vec![
                ActuatorCommand::Click {
                    button: MouseButton::Left
                },
                ActuatorCommand::Move { x: 3.0, y: 4.0 },
            ]
        );
        assert_eq!(dispatcher.failures(), 0);
    }

    #[test]
    fn test_failures_are_counted_not_raised() {
        let mut dispatcher = ActionDispatcher::new();
        let mut actuator = FailingActuator;

        assert!(!dispatcher.click(&mut actuator, BlinkKind::Right));
        assert!(!dispatcher.move_to(&mut actuator, ScreenPoint::ORIGIN));
        assert_eq!(dispatcher.failures(), 2);
    }
}
