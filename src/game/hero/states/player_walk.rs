// Shared behavior of the states where the arrows move the hero

use crate::engine::movement::Movement;

use super::super::context::HeroCore;

/// Animations of a player-controlled walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PlayerWalk {
    stopped: &'static str,
    walking: &'static str,
}

impl PlayerWalk {
    pub const NORMAL: Self = Self {
        stopped: "stopped",
        walking: "walking",
    };

    pub const CARRYING: Self = Self {
        stopped: "carrying_stopped",
        walking: "carrying_walking",
    };

    pub const SWIMMING: Self = Self {
        stopped: "swimming_stopped",
        walking: "swimming_slow",
    };

    /// Give the hero a player movement at its current walking speed
    pub fn start(self, hero: &mut HeroCore) {
        let movement = Movement::player(hero.walking_speed(), hero.now());
        hero.set_movement(movement);
        self.update_animation(hero);
    }

    pub fn stop(self, hero: &mut HeroCore) {
        hero.clear_movement();
    }

    /// Walking or stopped animation, depending on the movement
    pub fn update_animation(self, hero: &mut HeroCore) {
        let moving = hero.movement().is_some_and(|m| !m.is_stopped());
        let now = hero.now();
        let animation = if moving { self.walking } else { self.stopped };
        hero.sprites.set_animation(animation, now);
    }

    pub fn update_speed(self, hero: &mut HeroCore) {
        let (speed, now) = (hero.walking_speed(), hero.now());
        if let Some(movement) = hero.movement_mut() {
            movement.set_speed(speed, now);
        }
    }
}
