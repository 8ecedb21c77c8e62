// Walking along a path imposed by the quest

use crate::core::{Direction4, Direction8};
use crate::engine::map::Playfield;
use crate::engine::movement::{parse_path, Movement, MovementError};

use super::super::context::HeroCore;
use super::super::state::HeroState;

pub struct ForcedWalkingState {
    steps: Vec<Direction8>,
    looping: bool,
    ignore_obstacles: bool,
}

impl ForcedWalkingState {
    /// `path` is a string of direction digits, e.g. `"0022"`
    pub fn new(path: &str, looping: bool, ignore_obstacles: bool) -> Result<Self, MovementError> {
        Ok(Self {
            steps: parse_path(path)?,
            looping,
            ignore_obstacles,
        })
    }
}

impl HeroState for ForcedWalkingState {
    fn name(&self) -> &'static str {
        "forced walking"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        if let Some(first) = self.steps.first().filter(|d| !d.is_diagonal()) {
            hero.sprites
                .set_animation_direction(Direction4::new(first.index() / 2));
        }
        hero.sprites.set_animation_walking_normal(now);

        let movement = Movement::path(self.steps.clone(), hero.walking_speed(), self.looping, now)
            .with_ignore_obstacles(self.ignore_obstacles);
        hero.set_movement(movement);
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        hero.clear_movement();
    }

    fn notify_movement_finished(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        hero.clear_movement();
        hero.start_free();
    }

    fn is_direction_locked(&self) -> bool {
        true
    }
}
