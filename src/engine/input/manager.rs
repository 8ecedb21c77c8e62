// Input manager - translates keyboard events into game commands

use super::command::{Command, InputSource};
use super::commands::{CommandEvent, CommandState};
use super::config::InputConfigManager;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Turns raw key events into command events and keeps the command state
#[derive(Debug, Default)]
pub struct InputManager {
    config: InputConfigManager,
    state: CommandState,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> Option<CommandEvent> {
        match event.physical_key {
            PhysicalKey::Code(code) => self.process_key(
                code,
                event.state == ElementState::Pressed,
                event.repeat,
            ),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    /// Process a key press or release. Key repeats and unbound keys
    /// produce no command event.
    pub fn process_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) -> Option<CommandEvent> {
        if repeat {
            return None;
        }

        let command = self.config.get_command(InputSource::key(code))?;
        if pressed {
            self.state.press(command).then(|| CommandEvent::pressed(command))
        } else {
            self.state.release(command).then(|| CommandEvent::released(command))
        }
    }

    /// Clear per-frame events. Call once per frame after processing events.
    pub fn update(&mut self) {
        self.state.update();
    }

    pub fn state(&self) -> &CommandState {
        &self.state
    }

    pub fn is_pressed(&self, command: Command) -> bool {
        self.state.is_pressed(command)
    }

    pub fn config(&self) -> &InputConfigManager {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut InputConfigManager {
        &mut self.config
    }

    /// Release every command (e.g. when the window loses focus)
    pub fn reset(&mut self) -> Vec<CommandEvent> {
        let released: Vec<CommandEvent> = Command::ALL
            .iter()
            .filter(|c| self.state.is_pressed(**c))
            .map(|c| CommandEvent::released(*c))
            .collect();
        self.state.reset();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Direction8;

    #[test]
    fn test_key_to_command() {
        let mut manager = InputManager::new();
        let event = manager.process_key(KeyCode::Space, true, false);
        assert_eq!(event, Some(CommandEvent::pressed(Command::Action)));
        assert!(manager.is_pressed(Command::Action));

        let event = manager.process_key(KeyCode::Space, false, false);
        assert_eq!(event, Some(CommandEvent::released(Command::Action)));
        assert!(!manager.is_pressed(Command::Action));
    }

    #[test]
    fn test_repeat_ignored() {
        let mut manager = InputManager::new();
        manager.process_key(KeyCode::ArrowUp, true, false);
        assert_eq!(manager.process_key(KeyCode::ArrowUp, true, true), None);
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut manager = InputManager::new();
        assert_eq!(manager.process_key(KeyCode::F5, true, false), None);
    }

    #[test]
    fn test_double_press_reports_once() {
        let mut manager = InputManager::new();
        manager.config_mut().hero_config_mut().bind(InputSource::key(KeyCode::KeyW), Command::Up);
        assert!(manager.process_key(KeyCode::ArrowUp, true, false).is_some());
        assert!(manager.process_key(KeyCode::KeyW, true, false).is_none());
    }

    #[test]
    fn test_wanted_direction_through_manager() {
        let mut manager = InputManager::new();
        manager.process_key(KeyCode::ArrowDown, true, false);
        manager.process_key(KeyCode::ArrowRight, true, false);
        assert_eq!(manager.state().wanted_direction8(), Some(Direction8::new(7)));
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut manager = InputManager::new();
        manager.process_key(KeyCode::ArrowLeft, true, false);
        manager.process_key(KeyCode::KeyX, true, false);
        let released = manager.reset();
        assert_eq!(released.len(), 2);
        assert!(released.iter().all(|e| !e.pressed));
        assert!(!manager.is_pressed(Command::Left));
    }

    #[test]
    fn test_update_clears_just_pressed() {
        let mut manager = InputManager::new();
        manager.process_key(KeyCode::KeyC, true, false);
        assert!(manager.state().just_pressed(Command::Attack));
        manager.update();
        assert!(!manager.state().just_pressed(Command::Attack));
        assert!(manager.is_pressed(Command::Attack));
    }
}
