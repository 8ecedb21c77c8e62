// Game modules: the hero, the entities around it and the world holding them

pub mod detectors;
pub mod entity;
pub mod hero;
pub mod stream;
pub mod world;
