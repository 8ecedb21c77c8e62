// Plunging into deep water or lava

use crate::engine::map::{Ground, Playfield};

use super::super::context::HeroCore;
use super::super::state::HeroState;
use super::SwimmingState;

/// Life lost when drowning
const DROWNING_DAMAGE: i32 = 1;
/// Life lost when plunging into lava
const LAVA_DAMAGE: i32 = 2;

#[derive(Debug, Default)]
pub struct PlungingState {
    done: bool,
}

impl PlungingState {
    pub fn new() -> Self {
        Self { done: false }
    }
}

impl HeroState for PlungingState {
    fn name(&self) -> &'static str {
        "plunging"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.clear_movement();
        hero.sprites.play_from_start("plunging", now);
        hero.play_sound("splash");
    }

    fn update(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if self.done || !hero.sprites.is_animation_finished() {
            return;
        }
        self.done = true;

        let ground = hero.ground_below();
        if ground == Ground::DeepWater && hero.equipment.has_ability("swim") {
            hero.set_state(Box::new(SwimmingState::new()));
            return;
        }

        let damage = if ground == Ground::Lava {
            LAVA_DAMAGE
        } else {
            DROWNING_DAMAGE
        };
        hero.equipment.remove_life(damage);
        hero.start_back_to_solid_ground(true, 0, false);
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn can_avoid_deep_water(&self) -> bool {
        true
    }

    fn can_avoid_lava(&self) -> bool {
        true
    }
}
