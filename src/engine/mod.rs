// Engine modules: timing, input, map geometry and movements

pub mod game_loop;
pub mod input;
pub mod map;
pub mod movement;
