// Running after holding the action command

use crate::engine::input::Command;
use crate::engine::map::Playfield;
use crate::engine::movement::Movement;

use super::super::context::HeroCore;
use super::super::state::HeroState;

/// Delay between two running sounds
const SOUND_DELAY: u32 = 170;
/// Delay before the first running sound
const FIRST_SOUND_DELAY: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Stamping before the run, cancelled if the command is released
    Preparing,
    Running,
}

pub struct RunningState {
    /// Command that started the run
    command: Command,
    phase: Phase,
    next_phase_date: u32,
    next_sound_date: u32,
}

impl RunningState {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            phase: Phase::Preparing,
            next_phase_date: 0,
            next_sound_date: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

impl HeroState for RunningState {
    fn name(&self) -> &'static str {
        "running"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        self.phase = Phase::Preparing;
        self.next_phase_date = now + hero.stats.running_prepare_delay;
        self.next_sound_date = now + FIRST_SOUND_DELAY;
        hero.clear_movement();
        hero.sprites.set_animation("prepare_running", now);
    }

    fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
        hero.clear_movement();
    }

    fn update(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        let now = hero.now();

        if self.phase == Phase::Preparing {
            if now >= self.next_phase_date {
                let direction = hero.animation_direction().to_direction8();
                let movement = Movement::straight(direction, hero.stats.running_speed, None, now);
                hero.set_movement(movement);
                hero.sprites.set_animation("running", now);
                self.phase = Phase::Running;
            } else if !hero.commands.is_pressed(self.command) {
                hero.start_free();
                return;
            }
        }

        if now >= self.next_sound_date {
            hero.play_sound("running");
            self.next_sound_date = now + SOUND_DELAY;
        }
    }

    fn set_suspended(&mut self, hero: &mut HeroCore, suspended: bool) {
        if !suspended {
            let diff = hero.suspended_duration();
            self.next_phase_date += diff;
            self.next_sound_date += diff;
        }
    }

    fn notify_command_pressed(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, command: Command) {
        // Another direction stops the run
        if let Some(direction4) = command.direction4() {
            if direction4 != hero.animation_direction() {
                hero.start_free();
            }
        }
    }

    fn notify_obstacle_reached(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if self.phase != Phase::Running {
            return;
        }
        let back = hero.animation_direction().to_direction8().opposite();
        hero.play_sound("running_obstacle");
        let (distance, delay) = (hero.stats.running_bounce_distance, hero.stats.jump_delay);
        hero.start_jumping(back, distance, false, false, delay);
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn can_be_hurt(&self) -> bool {
        true
    }

    fn can_take_stairs(&self) -> bool {
        self.phase == Phase::Preparing
    }

    fn can_pick_treasure(&self) -> bool {
        true
    }
}
