// Lifting an item before carrying it

use crate::engine::map::Playfield;
use crate::game::detectors::CarriedItem;

use super::super::context::HeroCore;
use super::super::state::HeroState;
use super::CarryingState;

pub struct LiftingState {
    item: Option<CarriedItem>,
}

impl LiftingState {
    pub fn new(item: CarriedItem) -> Self {
        Self { item: Some(item) }
    }
}

impl HeroState for LiftingState {
    fn name(&self) -> &'static str {
        "lifting"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        hero.clear_movement();
        hero.play_sound("lift");
        let now = hero.now();
        hero.sprites.play_from_start("lifting", now);
    }

    fn update(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if hero.sprites.is_animation_finished() {
            if let Some(item) = self.item.take() {
                hero.set_state(Box::new(CarryingState::new(item)));
            }
        }
    }

    fn is_carrying_item(&self) -> bool {
        true
    }

    fn carried_item(&self) -> Option<&CarriedItem> {
        self.item.as_ref()
    }
}
