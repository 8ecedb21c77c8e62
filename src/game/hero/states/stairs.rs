// Taking stairs

use crate::core::Direction4;
use crate::engine::map::Playfield;
use crate::engine::movement::Movement;
use crate::game::detectors::{Stairs, StairsWay};

use super::super::context::HeroCore;
use super::super::state::HeroState;

pub struct StairsState {
    stairs: Stairs,
    way: StairsWay,
}

impl StairsState {
    pub fn new(stairs: Stairs, way: StairsWay) -> Self {
        Self { stairs, way }
    }

    pub fn way(&self) -> StairsWay {
        self.way
    }
}

impl HeroState for StairsState {
    fn name(&self) -> &'static str {
        "stairs"
    }

    fn start(&mut self, hero: &mut HeroCore, map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        let direction = self.stairs.movement_direction(self.way);
        hero.sprites
            .set_animation_direction(Direction4::new(direction.index() / 2));
        hero.sprites.set_animation("walking", now);
        hero.play_sound(match self.way {
            StairsWay::Normal => "stairs_up",
            StairsWay::Reverse => "stairs_down",
        });

        // Going up stairs inside a floor: on the upper layer right away
        if self.stairs.inside_floor && self.way == StairsWay::Normal {
            if let Some(above) = hero.layer().above() {
                hero.set_layer(above, map);
            }
        }

        let movement = Movement::path(self.stairs.path(self.way), hero.stats.stairs_speed, false, now)
            .with_ignore_obstacles(true);
        hero.set_movement(movement);
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        hero.clear_movement();
    }

    fn notify_movement_finished(&mut self, hero: &mut HeroCore, map: &mut dyn Playfield) {
        // Going down: on the lower layer only once out of the stairs
        if self.stairs.inside_floor && self.way == StairsWay::Reverse {
            if let Some(below) = hero.layer().below() {
                hero.set_layer(below, map);
            }
        }
        hero.clear_movement();
        hero.start_free();
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn are_collisions_ignored(&self) -> bool {
        true
    }

    fn can_avoid_conveyor_belt(&self) -> bool {
        true
    }

    fn can_avoid_stream(&self) -> bool {
        true
    }
}
