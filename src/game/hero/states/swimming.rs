// Swimming in deep water

use crate::engine::map::{Ground, Playfield};

use super::super::context::HeroCore;
use super::super::state::HeroState;
use super::player_walk::PlayerWalk;

#[derive(Debug, Default)]
pub struct SwimmingState;

impl SwimmingState {
    pub fn new() -> Self {
        Self
    }
}

impl HeroState for SwimmingState {
    fn name(&self) -> &'static str {
        "swimming"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        hero.set_walking_speed(hero.stats.swimming_speed);
        PlayerWalk::SWIMMING.start(hero);
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        PlayerWalk::SWIMMING.stop(hero);
        hero.set_walking_speed(hero.normal_walking_speed());
    }

    fn notify_ground_changed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if hero.ground_below() != Ground::DeepWater {
            hero.start_state_from_ground();
        }
    }

    fn notify_movement_changed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        PlayerWalk::SWIMMING.update_animation(hero);
    }

    fn notify_walking_speed_changed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        PlayerWalk::SWIMMING.update_speed(hero);
    }

    fn can_control_movement(&self) -> bool {
        true
    }

    fn can_be_hurt(&self) -> bool {
        true
    }

    fn can_avoid_deep_water(&self) -> bool {
        true
    }
}
