// Brought back to solid ground after falling, drowning or touching prickles

use glam::IVec2;

use crate::engine::map::{Layer, Playfield};
use crate::engine::movement::Movement;

use super::super::context::HeroCore;
use super::super::state::HeroState;

pub struct BackToSolidGroundState {
    target_xy: IVec2,
    target_layer: Layer,
    /// Time to wait once arrived
    end_delay: u32,
    with_sound: bool,
    /// Set once arrived
    end_date: Option<u32>,
    done: bool,
}

impl BackToSolidGroundState {
    /// Target: the point memorized by the quest if `use_memorized_xy` and
    /// there is one, else the last solid ground, else the current position
    pub fn new(hero: &HeroCore, use_memorized_xy: bool, end_delay: u32, with_sound: bool) -> Self {
        let (target_xy, target_layer) = use_memorized_xy
            .then(|| hero.target_solid_ground())
            .flatten()
            .or_else(|| hero.last_solid_ground())
            .unwrap_or((hero.xy(), hero.layer()));
        Self {
            target_xy,
            target_layer,
            end_delay,
            with_sound,
            end_date: None,
            done: false,
        }
    }

    pub fn target(&self) -> (IVec2, Layer) {
        (self.target_xy, self.target_layer)
    }

    fn arrive(&mut self, hero: &mut HeroCore) {
        let now = hero.now();
        hero.clear_movement();
        hero.sprites.set_animation_stopped_normal(now);
        hero.sprites.blink(hero.stats.blink_duration, now);
        self.end_date = Some(now + self.end_delay);
    }
}

impl HeroState for BackToSolidGroundState {
    fn name(&self) -> &'static str {
        "back to solid ground"
    }

    fn start(&mut self, hero: &mut HeroCore, map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        if self.with_sound {
            hero.play_sound("hero_hurt");
        }
        hero.set_layer(self.target_layer, map);
        hero.sprites.set_animation_stopped_normal(now);

        if hero.xy() == self.target_xy {
            self.arrive(hero);
        } else {
            let movement = Movement::target(self.target_xy, hero.stats.back_to_solid_ground_speed, now)
                .with_ignore_obstacles(true);
            hero.set_movement(movement);
        }
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        hero.clear_movement();
    }

    fn update(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if let Some(end_date) = self.end_date {
            if !self.done && hero.now() >= end_date {
                self.done = true;
                hero.start_state_from_ground();
            }
        }
    }

    fn set_suspended(&mut self, hero: &mut HeroCore, suspended: bool) {
        if !suspended {
            if let Some(end_date) = self.end_date.as_mut() {
                *end_date += hero.suspended_duration();
            }
        }
    }

    fn notify_movement_finished(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        self.arrive(hero);
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn is_touching_ground(&self) -> bool {
        false
    }

    fn can_come_from_bad_ground(&self) -> bool {
        false
    }

    fn can_start_gameover_sequence(&self) -> bool {
        false
    }

    fn can_avoid_deep_water(&self) -> bool {
        true
    }

    fn can_avoid_hole(&self) -> bool {
        true
    }

    fn can_avoid_lava(&self) -> bool {
        true
    }

    fn can_avoid_prickle(&self) -> bool {
        true
    }

    fn can_avoid_teletransporter(&self) -> bool {
        true
    }

    fn can_avoid_conveyor_belt(&self) -> bool {
        true
    }

    fn can_avoid_stream(&self) -> bool {
        true
    }
}
