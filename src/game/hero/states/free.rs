// Normal state: the player walks around

use crate::engine::input::Command;
use crate::engine::map::Playfield;

use super::super::context::HeroCore;
use super::super::state::HeroState;
use super::player_walk::PlayerWalk;
use super::{usable_item, GrabbingState, RunningState, SwordSwingingState, UsingItemState};

#[derive(Debug, Default)]
pub struct FreeState;

impl FreeState {
    pub fn new() -> Self {
        Self
    }
}

impl HeroState for FreeState {
    fn name(&self) -> &'static str {
        "free"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        PlayerWalk::NORMAL.start(hero);
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        PlayerWalk::NORMAL.stop(hero);
    }

    fn notify_command_pressed(&mut self, hero: &mut HeroCore, map: &mut dyn Playfield, command: Command) {
        match command {
            Command::Action => {
                if hero.is_facing_obstacle(map) && hero.equipment.has_ability("grab") {
                    hero.set_state(Box::new(GrabbingState::new()));
                } else if hero.equipment.has_ability("run") {
                    hero.set_state(Box::new(RunningState::new(command)));
                }
            }
            Command::Attack => {
                if hero.equipment.has_ability("sword") {
                    hero.set_state(Box::new(SwordSwingingState::new()));
                }
            }
            Command::Item1 | Command::Item2 => {
                let Some(slot) = command.item_slot() else {
                    return;
                };
                match usable_item(hero, slot) {
                    Ok(item) => hero.set_state(Box::new(UsingItemState::new(item))),
                    Err(e) => log::debug!("{}", e),
                }
            }
            _ => {}
        }
    }

    fn notify_movement_changed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        PlayerWalk::NORMAL.update_animation(hero);
    }

    fn notify_walking_speed_changed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        PlayerWalk::NORMAL.update_speed(hero);
    }

    fn can_control_movement(&self) -> bool {
        true
    }

    fn is_free(&self) -> bool {
        true
    }

    fn can_be_hurt(&self) -> bool {
        true
    }

    fn can_start_item(&self) -> bool {
        true
    }

    fn can_take_stairs(&self) -> bool {
        true
    }

    fn can_pick_treasure(&self) -> bool {
        true
    }
}
