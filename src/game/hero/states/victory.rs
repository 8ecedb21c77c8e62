// Victory pose

use crate::engine::map::Playfield;

use super::super::context::HeroCore;
use super::super::events::{CallbackRef, HeroEvent};
use super::super::state::HeroState;

pub struct VictoryState {
    callback: Option<CallbackRef>,
    end_date: u32,
    finished: bool,
}

impl VictoryState {
    /// Without a callback, the hero goes back to the free state at the end
    pub fn new(callback: Option<CallbackRef>) -> Self {
        Self {
            callback,
            end_date: 0,
            finished: false,
        }
    }
}

impl HeroState for VictoryState {
    fn name(&self) -> &'static str {
        "victory"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.clear_movement();
        hero.sprites.set_animation("victory", now);
        hero.play_sound("victory");
        self.end_date = now + hero.stats.victory_duration;
    }

    fn update(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if self.finished || hero.now() < self.end_date {
            return;
        }
        self.finished = true;
        match self.callback.take() {
            Some(callback) => hero.push_event(HeroEvent::CallbackInvoked(callback)),
            None => hero.start_free(),
        }
    }

    fn set_suspended(&mut self, hero: &mut HeroCore, suspended: bool) {
        if !suspended {
            self.end_date += hero.suspended_duration();
        }
    }

    fn is_direction_locked(&self) -> bool {
        true
    }
}
