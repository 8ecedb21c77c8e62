// Input configuration and remapping system

use super::command::{Command, InputSource};
use std::collections::HashMap;

/// Maps keys to game commands
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    /// Mapping from input sources to commands
    bindings: HashMap<InputSource, Command>,

    /// Reverse mapping for quick lookups (command -> all sources)
    command_to_sources: HashMap<Command, Vec<InputSource>>,
}

impl InputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: Vec<(InputSource, Command)>) -> Self {
        let mut config = Self::new();
        for (source, command) in bindings {
            config.bind(source, command);
        }
        config
    }

    /// Bind an input source to a command, replacing its previous binding
    pub fn bind(&mut self, source: InputSource, command: Command) {
        self.unbind_source(source);
        self.bindings.insert(source, command);
        self.command_to_sources
            .entry(command)
            .or_default()
            .push(source);
    }

    /// Unbind an input source
    pub fn unbind_source(&mut self, source: InputSource) {
        if let Some(command) = self.bindings.remove(&source) {
            if let Some(sources) = self.command_to_sources.get_mut(&command) {
                sources.retain(|s| *s != source);
                if sources.is_empty() {
                    self.command_to_sources.remove(&command);
                }
            }
        }
    }

    /// Unbind all sources of a command
    pub fn unbind_command(&mut self, command: Command) {
        if let Some(sources) = self.command_to_sources.remove(&command) {
            for source in sources {
                self.bindings.remove(&source);
            }
        }
    }

    pub fn get_command(&self, source: InputSource) -> Option<Command> {
        self.bindings.get(&source).copied()
    }

    /// All input sources bound to a command
    pub fn get_sources(&self, command: Command) -> Vec<InputSource> {
        self.command_to_sources
            .get(&command)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_bound(&self, source: InputSource) -> bool {
        self.bindings.contains_key(&source)
    }

    pub fn has_binding(&self, command: Command) -> bool {
        self.command_to_sources.contains_key(&command)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
        self.command_to_sources.clear();
    }

    /// Reset to the default hero bindings
    pub fn reset_to_defaults(&mut self) {
        self.clear();
        for (source, command) in super::command::default_bindings() {
            self.bind(source, command);
        }
    }
}

/// Hero bindings plus bindings that work even when the game is paused
#[derive(Debug)]
pub struct InputConfigManager {
    hero_config: InputConfig,
    global_config: InputConfig,
}

impl InputConfigManager {
    /// Create a manager with the default bindings
    pub fn new() -> Self {
        Self {
            hero_config: InputConfig::from_bindings(super::command::default_bindings()),
            global_config: InputConfig::from_bindings(super::command::global_bindings()),
        }
    }

    pub fn hero_config(&self) -> &InputConfig {
        &self.hero_config
    }

    pub fn hero_config_mut(&mut self) -> &mut InputConfig {
        &mut self.hero_config
    }

    pub fn global_config(&self) -> &InputConfig {
        &self.global_config
    }

    pub fn global_config_mut(&mut self) -> &mut InputConfig {
        &mut self.global_config
    }

    /// The command for an input source.
    /// Hero bindings are checked first, then global bindings.
    pub fn get_command(&self, source: InputSource) -> Option<Command> {
        self.hero_config
            .get_command(source)
            .or_else(|| self.global_config.get_command(source))
    }

    pub fn reset_all_to_defaults(&mut self) {
        *self = Self::new();
    }
}

impl Default for InputConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_command() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);
        config.bind(source, Command::Left);

        assert_eq!(config.get_command(source), Some(Command::Left));
    }

    #[test]
    fn test_unbind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);
        config.bind(source, Command::Left);
        config.unbind_source(source);

        assert_eq!(config.get_command(source), None);
        assert!(!config.has_binding(Command::Left));
    }

    #[test]
    fn test_unbind_command() {
        let mut config = InputConfig::new();
        let source1 = InputSource::key(KeyCode::KeyA);
        let source2 = InputSource::key(KeyCode::ArrowLeft);

        config.bind(source1, Command::Left);
        config.bind(source2, Command::Left);
        assert_eq!(config.get_sources(Command::Left).len(), 2);

        config.unbind_command(Command::Left);
        assert_eq!(config.get_command(source1), None);
        assert_eq!(config.get_command(source2), None);
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);

        config.bind(source, Command::Left);
        config.bind(source, Command::Attack);

        assert_eq!(config.get_command(source), Some(Command::Attack));
        assert!(!config.has_binding(Command::Left));
        assert!(config.is_bound(source));
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = InputConfig::new();
        config.bind(InputSource::key(KeyCode::KeyZ), Command::Left);
        config.reset_to_defaults();

        assert!(!config.is_bound(InputSource::key(KeyCode::KeyZ)));
        assert_eq!(
            config.get_command(InputSource::key(KeyCode::Space)),
            Some(Command::Action)
        );
    }

    #[test]
    fn test_manager_falls_back_to_global_bindings() {
        let manager = InputConfigManager::new();
        assert_eq!(
            manager.get_command(InputSource::key(KeyCode::ArrowUp)),
            Some(Command::Up)
        );
        assert_eq!(
            manager.get_command(InputSource::key(KeyCode::KeyD)),
            Some(Command::Pause)
        );
        assert_eq!(manager.get_command(InputSource::key(KeyCode::F12)), None);
    }

    #[test]
    fn test_manager_reset_all() {
        let mut manager = InputConfigManager::new();
        manager.hero_config_mut().clear();
        manager.global_config_mut().clear();

        manager.reset_all_to_defaults();
        assert!(manager.hero_config().has_binding(Command::Action));
        assert!(manager.global_config().has_binding(Command::Pause));
    }
}
