// Core utilities shared by the engine and the game

pub mod math;

pub use math::{distance, Direction4, Direction8, Rect};
