// Holding an obstacle with the action command, and pulling it

use crate::engine::input::Command;
use crate::engine::map::Playfield;

use super::super::context::HeroCore;
use super::super::state::HeroState;

#[derive(Debug, Default)]
pub struct GrabbingState {
    pulling: bool,
}

impl GrabbingState {
    pub fn new() -> Self {
        Self { pulling: false }
    }

    pub fn is_pulling(&self) -> bool {
        self.pulling
    }

    /// Pull while the arrows point away from the grabbed obstacle
    fn update_pulling(&mut self, hero: &mut HeroCore) {
        let facing = hero.animation_direction().to_direction8();
        let pulling = hero.commands.wanted_direction8() == Some(facing.opposite());
        if pulling != self.pulling {
            self.pulling = pulling;
            let now = hero.now();
            let animation = if pulling { "pulling" } else { "grabbing" };
            hero.sprites.set_animation(animation, now);
        }
    }
}

impl HeroState for GrabbingState {
    fn name(&self) -> &'static str {
        "grabbing"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        hero.clear_movement();
        let now = hero.now();
        hero.sprites.set_animation("grabbing", now);
        self.update_pulling(hero);
    }

    fn notify_command_pressed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, command: Command) {
        if command.is_direction() {
            self.update_pulling(hero);
        }
    }

    fn notify_command_released(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, command: Command) {
        if command == Command::Action {
            hero.start_free();
        } else if command.is_direction() {
            self.update_pulling(hero);
        }
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn can_be_hurt(&self) -> bool {
        true
    }

    fn is_grabbing_or_pulling(&self) -> bool {
        true
    }
}
