//! Operator key controls
//!
//! Controls:
//! - c: toggle calibration mode
//! - q / Q / Ctrl-C: quit and write the session report

use std::io;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use futures::StreamExt;
use gazeclick_core::ControlCommand;
use tracing::warn;

/// Map a key press to a control command.
pub fn command_for_key(key: &KeyEvent) -> Option<ControlCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        // Raw mode swallows SIGINT, so Ctrl-C arrives as a key.
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ControlCommand::Quit)
        }
        KeyCode::Char('c') => Some(ControlCommand::ToggleCalibration),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(ControlCommand::Quit),
        _ => None,
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Terminal key presses as control commands. Raw mode lasts as long as this value.
pub struct KeyCommands {
    events: EventStream,
    _raw: RawModeGuard,
}

impl KeyCommands {
    pub fn start() -> io::Result<Self> {
        let raw = RawModeGuard::enable()?;
        Ok(Self {
            events: EventStream::new(),
            _raw: raw,
        })
    }

    /// Next recognized command, or `None` once the terminal stops delivering events.
    pub async fn next_command(&mut self) -> Option<ControlCommand> {
        while let Some(event) = self.events.next().await {
            match event {
                Ok(Event::Key(key)) => {
                    if let Some(command) = command_for_key(&key) {
                        return Some(command);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Key input failed: {}", e);
                    return None;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_c_toggles_calibration() {
        assert_eq!(
            command_for_key(&press(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(ControlCommand::ToggleCalibration)
        );
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            press(KeyCode::Char('q'), KeyModifiers::NONE),
            press(KeyCode::Char('Q'), KeyModifiers::SHIFT),
            press(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(command_for_key(&key), Some(ControlCommand::Quit));
        }
    }

    #[test]
    fn test_other_keys_and_releases_are_ignored() {
        assert_eq!(
            command_for_key(&press(KeyCode::Char('x'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(command_for_key(&press(KeyCode::Esc, KeyModifiers::NONE)), None);

        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(command_for_key(&release), None);
    }
}
