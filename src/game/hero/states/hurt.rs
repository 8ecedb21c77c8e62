// Knocked back after being hurt

use glam::IVec2;

use crate::core::Direction8;
use crate::engine::map::Playfield;
use crate::engine::movement::Movement;

use super::super::context::HeroCore;
use super::super::state::HeroState;

pub struct HurtState {
    /// Where the hit came from
    source_xy: IVec2,
    life_points: i32,
}

impl HurtState {
    pub fn new(source_xy: IVec2, life_points: i32) -> Self {
        Self {
            source_xy,
            life_points,
        }
    }

    fn end(&mut self, hero: &mut HeroCore) {
        hero.clear_movement();
        hero.start_state_from_ground();
    }
}

impl HeroState for HurtState {
    fn name(&self) -> &'static str {
        "hurt"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.play_sound("hero_hurt");
        hero.equipment.remove_life(self.life_points);
        hero.sprites.set_animation("hurt", now);
        hero.sprites.blink(hero.stats.blink_duration, now);

        // Pushed away from the source, or backwards if hit from the exact
        // same point
        let direction = Direction8::towards(self.source_xy, hero.xy())
            .unwrap_or_else(|| hero.animation_direction().to_direction8().opposite());
        let movement = Movement::straight(
            direction,
            hero.stats.hurt_speed,
            Some(hero.stats.hurt_distance),
            now,
        );
        hero.set_movement(movement);
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        hero.clear_movement();
    }

    fn notify_movement_finished(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        self.end(hero);
    }

    fn notify_obstacle_reached(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        self.end(hero);
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn can_start_gameover_sequence(&self) -> bool {
        false
    }
}
