// Swinging the sword

use crate::engine::map::Playfield;

use super::super::context::HeroCore;
use super::super::state::HeroState;

#[derive(Debug, Default)]
pub struct SwordSwingingState {
    done: bool,
}

impl SwordSwingingState {
    pub fn new() -> Self {
        Self { done: false }
    }
}

impl HeroState for SwordSwingingState {
    fn name(&self) -> &'static str {
        "sword swinging"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.clear_movement();
        hero.play_sound("sword1");
        hero.sprites.play_from_start("sword", now);
    }

    fn update(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if !self.done && hero.sprites.is_animation_finished() {
            self.done = true;
            hero.start_free();
        }
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn can_be_hurt(&self) -> bool {
        true
    }
}
