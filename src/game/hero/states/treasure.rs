// Brandishing a treasure just obtained

use crate::engine::input::Command;
use crate::engine::map::Playfield;
use crate::game::detectors::Treasure;

use super::super::context::HeroCore;
use super::super::equipment::EquipmentItem;
use super::super::events::{CallbackRef, HeroEvent};
use super::super::state::HeroState;

pub struct TreasureState {
    treasure: Treasure,
    /// Invoked once the player dismisses the treasure
    callback: Option<CallbackRef>,
    concluded: bool,
}

impl TreasureState {
    pub fn new(treasure: Treasure, callback: Option<CallbackRef>) -> Self {
        Self {
            treasure,
            callback,
            concluded: false,
        }
    }
}

impl HeroState for TreasureState {
    fn name(&self) -> &'static str {
        "treasure"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.clear_movement();
        hero.sprites.set_animation("brandish", now);
        hero.play_sound("treasure");

        let Treasure { item, variant } = &self.treasure;
        hero.equipment
            .add_item(EquipmentItem::new(item, *variant, true));
        hero.push_event(HeroEvent::TreasureObtained {
            item: item.clone(),
            variant: *variant,
        });
    }

    fn notify_command_pressed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, command: Command) {
        if command != Command::Action || self.concluded {
            return;
        }
        self.concluded = true;
        if let Some(callback) = self.callback.take() {
            hero.push_event(HeroEvent::CallbackInvoked(callback));
        }
        hero.start_free();
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn is_brandishing_treasure(&self) -> bool {
        true
    }
}
