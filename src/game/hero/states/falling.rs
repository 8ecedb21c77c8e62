// Falling into a hole

use crate::engine::map::Playfield;

use super::super::context::{HeroCore, BAD_GROUND_DAMAGE};
use super::super::state::HeroState;

#[derive(Debug, Default)]
pub struct FallingState {
    done: bool,
}

impl FallingState {
    pub fn new() -> Self {
        Self { done: false }
    }
}

impl HeroState for FallingState {
    fn name(&self) -> &'static str {
        "falling"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.clear_movement();
        hero.sprites.play_from_start("falling", now);
        hero.play_sound("hero_falls");
    }

    fn update(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if self.done || !hero.sprites.is_animation_finished() {
            return;
        }
        self.done = true;
        hero.equipment.remove_life(BAD_GROUND_DAMAGE);
        hero.set_walking_speed(hero.normal_walking_speed());
        hero.start_back_to_solid_ground(true, 0, true);
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn can_avoid_hole(&self) -> bool {
        true
    }
}
