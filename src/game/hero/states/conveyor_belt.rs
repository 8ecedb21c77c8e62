// Carried by a conveyor belt

use crate::engine::map::Playfield;
use crate::engine::movement::Movement;
use crate::game::detectors::{detector_xy, ConveyorBelt};

use super::super::context::HeroCore;
use super::super::state::HeroState;

pub struct ConveyorBeltState {
    belt: ConveyorBelt,
    /// Moving to the center of the belt before being carried
    snapping: bool,
}

impl ConveyorBeltState {
    pub fn new(belt: ConveyorBelt) -> Self {
        Self {
            belt,
            snapping: true,
        }
    }

    fn start_carrying(&mut self, hero: &mut HeroCore) {
        self.snapping = false;
        let movement = Movement::path(
            self.belt.path(),
            hero.stats.conveyor_belt_speed,
            false,
            hero.now(),
        )
        .with_ignore_obstacles(true);
        hero.set_movement(movement);
    }
}

impl HeroState for ConveyorBeltState {
    fn name(&self) -> &'static str {
        "conveyor belt"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.sprites.set_animation_stopped_normal(now);

        let target = detector_xy(&self.belt.bounding_box, hero.stats.origin);
        if hero.xy() == target {
            self.start_carrying(hero);
        } else {
            self.snapping = true;
            let movement = Movement::target(target, hero.stats.conveyor_belt_speed, now)
                .with_ignore_obstacles(true);
            hero.set_movement(movement);
        }
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        hero.clear_movement();
    }

    fn notify_movement_finished(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if self.snapping {
            self.start_carrying(hero);
        } else {
            hero.clear_movement();
            hero.start_state_from_ground();
        }
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn can_avoid_conveyor_belt(&self) -> bool {
        true
    }

    fn can_avoid_stream(&self) -> bool {
        true
    }
}
