// Walking with an item above the head

use crate::engine::input::Command;
use crate::engine::map::Playfield;
use crate::game::detectors::CarriedItem;

use super::super::context::HeroCore;
use super::super::events::HeroEvent;
use super::super::state::HeroState;
use super::player_walk::PlayerWalk;

pub struct CarryingState {
    item: Option<CarriedItem>,
}

impl CarryingState {
    pub fn new(item: CarriedItem) -> Self {
        Self { item: Some(item) }
    }

    fn throw_item(&mut self, hero: &mut HeroCore) {
        if let Some(item) = self.item.take() {
            hero.play_sound("throw");
            hero.push_event(HeroEvent::ItemThrown {
                item: item.name,
                direction: hero.animation_direction().to_direction8(),
            });
        }
    }
}

impl HeroState for CarryingState {
    fn name(&self) -> &'static str {
        "carrying"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        PlayerWalk::CARRYING.start(hero);
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, next: &dyn HeroState) {
        PlayerWalk::CARRYING.stop(hero);
        // The item cannot follow the hero into a state that does not carry
        if !next.is_carrying_item() {
            self.throw_item(hero);
        }
    }

    fn notify_command_pressed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, command: Command) {
        if matches!(command, Command::Action | Command::Attack) {
            self.throw_item(hero);
            hero.start_free();
        }
    }

    fn notify_movement_changed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        PlayerWalk::CARRYING.update_animation(hero);
    }

    fn notify_walking_speed_changed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        PlayerWalk::CARRYING.update_speed(hero);
    }

    fn can_control_movement(&self) -> bool {
        true
    }

    fn can_be_hurt(&self) -> bool {
        true
    }

    fn can_take_stairs(&self) -> bool {
        true
    }

    fn is_carrying_item(&self) -> bool {
        self.item.is_some()
    }

    fn carried_item(&self) -> Option<&CarriedItem> {
        self.item.as_ref()
    }
}
