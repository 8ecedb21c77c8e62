// The hero cannot do anything, typically during a cutscene

use crate::engine::map::Playfield;

use super::super::context::HeroCore;
use super::super::state::HeroState;

#[derive(Debug, Default)]
pub struct FreezedState;

impl FreezedState {
    pub fn new() -> Self {
        Self
    }
}

impl HeroState for FreezedState {
    fn name(&self) -> &'static str {
        "freezed"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.clear_movement();
        hero.sprites.set_animation_stopped_normal(now);
    }
}
