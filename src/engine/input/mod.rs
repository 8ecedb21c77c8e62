// Input handling system
//
// Keyboard events are translated into the fixed set of game commands the
// hero understands.
//
// ## Architecture
//
// - `command`: the command set and default key bindings
// - `config`: key remapping
// - `commands`: held commands and the wanted 8-direction
// - `manager`: key events in, `CommandEvent`s out
//
// ## Usage Example
//
// ```rust
// use rusted_quest::engine::input::InputManager;
//
// let mut input = InputManager::new();
//
// // In your event loop
// if let Some(event) = input.process_keyboard_event(&key_event) {
//     world.notify_command(event, now);
// }
//
// // At the end of each frame
// input.update();
// ```

pub mod command;
pub mod commands;
pub mod config;
pub mod manager;

pub use command::{Command, InputSource};
pub use commands::{CommandEvent, CommandState};
pub use config::{InputConfig, InputConfigManager};
pub use manager::InputManager;
