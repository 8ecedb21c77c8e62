// Rusted Quest - hero core of a tile-based action-adventure

pub mod core;
pub mod engine;
pub mod game;
