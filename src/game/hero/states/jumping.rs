// Jumping over obstacles or bad grounds

use crate::core::{Direction4, Direction8};
use crate::engine::map::Playfield;
use crate::engine::movement::Movement;

use super::super::context::HeroCore;
use super::super::state::HeroState;
use super::super::stats::HeroStats;

pub struct JumpingState {
    direction8: Direction8,
    distance: i32,
    ignore_obstacles: bool,
    with_sound: bool,
    /// Milliseconds per pixel
    movement_delay: u32,
}

impl JumpingState {
    pub fn new(
        direction8: Direction8,
        distance: i32,
        ignore_obstacles: bool,
        with_sound: bool,
        movement_delay: u32,
    ) -> Self {
        Self {
            direction8,
            distance,
            ignore_obstacles,
            with_sound,
            movement_delay,
        }
    }

    pub fn direction8(&self) -> Direction8 {
        self.direction8
    }

    fn land(&mut self, hero: &mut HeroCore) {
        hero.clear_movement();
        hero.start_state_from_ground();
    }
}

impl HeroState for JumpingState {
    fn name(&self) -> &'static str {
        "jumping"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        if self.with_sound {
            hero.play_sound("jump");
        }
        if !self.direction8.is_diagonal() {
            hero.sprites
                .set_animation_direction(Direction4::new(self.direction8.index() / 2));
        }
        hero.sprites.set_animation("jumping", now);

        let speed = HeroStats::jump_speed(self.movement_delay);
        let movement = Movement::straight(self.direction8, speed, Some(self.distance.max(1)), now)
            .with_ignore_obstacles(self.ignore_obstacles);
        hero.set_movement(movement);
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        hero.clear_movement();
    }

    fn notify_movement_finished(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        self.land(hero);
    }

    fn notify_obstacle_reached(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        self.land(hero);
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn is_touching_ground(&self) -> bool {
        false
    }

    fn can_avoid_deep_water(&self) -> bool {
        true
    }

    fn can_avoid_hole(&self) -> bool {
        true
    }

    fn can_avoid_ice(&self) -> bool {
        true
    }

    fn can_avoid_lava(&self) -> bool {
        true
    }

    fn can_avoid_prickle(&self) -> bool {
        true
    }

    fn can_avoid_conveyor_belt(&self) -> bool {
        true
    }

    fn can_avoid_teletransporter(&self) -> bool {
        true
    }

    fn can_avoid_sensor(&self) -> bool {
        true
    }

    fn can_avoid_switch(&self) -> bool {
        true
    }

    fn can_avoid_jumper(&self) -> bool {
        true
    }

    fn can_avoid_stream(&self) -> bool {
        true
    }
}
