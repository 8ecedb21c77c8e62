// Game command state: which commands are held and where the player wants to go

use super::command::Command;
use crate::core::Direction8;
use std::collections::HashSet;

/// A command press or release, as delivered to the hero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEvent {
    pub command: Command,
    pub pressed: bool,
}

impl CommandEvent {
    pub fn pressed(command: Command) -> Self {
        Self {
            command,
            pressed: true,
        }
    }

    pub fn released(command: Command) -> Self {
        Self {
            command,
            pressed: false,
        }
    }
}

/// Wanted 8-direction for each combination of held arrows
/// (bit 0 right, bit 1 up, bit 2 left, bit 3 down). Opposite arrows cancel.
const MASKS_TO_DIRECTION8: [i32; 16] = [-1, 0, 2, 1, 4, -1, 3, -1, 6, 7, -1, -1, 5, -1, -1, -1];

/// Current state of the game commands
#[derive(Debug, Clone, Default)]
pub struct CommandState {
    /// Commands currently held
    pressed: HashSet<Command>,

    /// Commands pressed since the last `update`
    just_pressed: HashSet<Command>,

    /// Commands released since the last `update`
    just_released: HashSet<Command>,
}

impl CommandState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, command: Command) -> bool {
        self.pressed.contains(&command)
    }

    pub fn just_pressed(&self, command: Command) -> bool {
        self.just_pressed.contains(&command)
    }

    pub fn just_released(&self, command: Command) -> bool {
        self.just_released.contains(&command)
    }

    /// Register a press. Returns false if the command was already held.
    pub fn press(&mut self, command: Command) -> bool {
        if self.pressed.insert(command) {
            self.just_pressed.insert(command);
            true
        } else {
            false
        }
    }

    /// Register a release. Returns false if the command was not held.
    pub fn release(&mut self, command: Command) -> bool {
        if self.pressed.remove(&command) {
            self.just_released.insert(command);
            true
        } else {
            false
        }
    }

    /// Forget the press/release events of the previous frame
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Release everything
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Bit mask of the directional commands held
    pub fn direction_mask(&self) -> usize {
        [Command::Right, Command::Up, Command::Left, Command::Down]
            .iter()
            .enumerate()
            .filter(|(_, c)| self.is_pressed(**c))
            .fold(0, |mask, (bit, _)| mask | (1 << bit))
    }

    /// Direction the player wants to go, or `None` when no valid
    /// combination of arrows is held
    pub fn wanted_direction8(&self) -> Option<Direction8> {
        Direction8::try_new(MASKS_TO_DIRECTION8[self.direction_mask()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        let mut state = CommandState::new();
        assert!(state.press(Command::Action));
        assert!(!state.press(Command::Action));
        assert!(state.is_pressed(Command::Action));
        assert!(state.just_pressed(Command::Action));

        state.update();
        assert!(!state.just_pressed(Command::Action));
        assert!(state.release(Command::Action));
        assert!(state.just_released(Command::Action));
        assert!(!state.release(Command::Action));
    }

    #[test]
    fn test_wanted_direction_single_arrow() {
        let mut state = CommandState::new();
        assert_eq!(state.wanted_direction8(), None);

        state.press(Command::Left);
        assert_eq!(state.wanted_direction8(), Some(Direction8::new(4)));
    }

    #[test]
    fn test_wanted_direction_diagonal() {
        let mut state = CommandState::new();
        state.press(Command::Right);
        state.press(Command::Up);
        assert_eq!(state.wanted_direction8(), Some(Direction8::new(1)));

        state.release(Command::Right);
        state.press(Command::Left);
        assert_eq!(state.wanted_direction8(), Some(Direction8::new(3)));
    }

    #[test]
    fn test_opposite_arrows_cancel() {
        let mut state = CommandState::new();
        state.press(Command::Right);
        state.press(Command::Left);
        assert_eq!(state.wanted_direction8(), None);

        state.press(Command::Down);
        assert_eq!(state.wanted_direction8(), None);
    }

    #[test]
    fn test_reset() {
        let mut state = CommandState::new();
        state.press(Command::Down);
        state.press(Command::Item1);
        state.reset();
        assert!(!state.is_pressed(Command::Down));
        assert_eq!(state.direction_mask(), 0);
    }
}
