// Game command definitions and default key bindings

use winit::keyboard::KeyCode;

use crate::core::Direction4;

/// The fixed set of commands the hero understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Interaction
    Action,
    Attack,
    Item1,
    Item2,

    // Meta
    Pause,

    // Movement
    Right,
    Up,
    Left,
    Down,
}

impl Command {
    /// All commands, in a stable order
    pub const ALL: [Command; 9] = [
        Command::Action,
        Command::Attack,
        Command::Item1,
        Command::Item2,
        Command::Pause,
        Command::Right,
        Command::Up,
        Command::Left,
        Command::Down,
    ];

    /// The 4-direction of a movement command
    pub fn direction4(self) -> Option<Direction4> {
        match self {
            Command::Right => Some(Direction4::RIGHT),
            Command::Up => Some(Direction4::UP),
            Command::Left => Some(Direction4::LEFT),
            Command::Down => Some(Direction4::DOWN),
            _ => None,
        }
    }

    pub fn is_direction(self) -> bool {
        self.direction4().is_some()
    }

    /// Item slot of an item command (0 or 1)
    pub fn item_slot(self) -> Option<usize> {
        match self {
            Command::Item1 => Some(0),
            Command::Item2 => Some(1),
            _ => None,
        }
    }
}

/// A key that can be bound to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings for the hero
pub fn default_bindings() -> Vec<(InputSource, Command)> {
    vec![
        (InputSource::key(KeyCode::ArrowRight), Command::Right),
        (InputSource::key(KeyCode::ArrowUp), Command::Up),
        (InputSource::key(KeyCode::ArrowLeft), Command::Left),
        (InputSource::key(KeyCode::ArrowDown), Command::Down),
        (InputSource::key(KeyCode::Space), Command::Action),
        (InputSource::key(KeyCode::KeyC), Command::Attack),
        (InputSource::key(KeyCode::KeyX), Command::Item1),
        (InputSource::key(KeyCode::KeyV), Command::Item2),
    ]
}

/// Bindings that stay active while the game is paused
pub fn global_bindings() -> Vec<(InputSource, Command)> {
    vec![(InputSource::key(KeyCode::KeyD), Command::Pause)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_commands() {
        assert_eq!(Command::Up.direction4(), Some(Direction4::UP));
        assert!(Command::Left.is_direction());
        assert!(!Command::Attack.is_direction());
        assert_eq!(Command::Item2.item_slot(), Some(1));
        assert_eq!(Command::Pause.item_slot(), None);
    }

    #[test]
    fn test_default_bindings_cover_hero_commands() {
        let bindings = default_bindings();
        for command in Command::ALL.iter().filter(|c| **c != Command::Pause) {
            assert!(
                bindings.iter().any(|(_, c)| c == command),
                "{command:?} has no default binding"
            );
        }
    }

    #[test]
    fn test_pause_is_global() {
        assert!(global_bindings()
            .iter()
            .any(|(_, c)| *c == Command::Pause));
    }

    #[test]
    fn test_no_duplicate_inputs() {
        let mut seen_sources = std::collections::HashSet::new();
        for (source, _) in default_bindings().into_iter().chain(global_bindings()) {
            assert!(
                seen_sources.insert(source),
                "Duplicate input source found in default bindings"
            );
        }
    }
}
