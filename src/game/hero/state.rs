// Hero behavior state interface
//
// Exactly one state is active at a time. A state reacts to the hero's
// notifications and answers capability queries. Every method has a
// conservative default so each state only overrides what differs.
//
// States never replace themselves directly: they queue the next state with
// `HeroCore::set_state` and the hero performs the transition once the
// current callback has returned.

use crate::core::Direction8;
use crate::engine::input::Command;
use crate::engine::map::{GroundObstacles, Playfield};
use crate::game::detectors::CarriedItem;

use super::context::HeroCore;

pub trait HeroState {
    /// Name used by logs and events
    fn name(&self) -> &'static str;

    // Lifecycle

    /// The state becomes active. `previous` is the state just stopped.
    fn start(
        &mut self,
        _hero: &mut HeroCore,
        _map: &mut dyn Playfield,
        _previous: Option<&dyn HeroState>,
    ) {
    }

    /// The state is about to be replaced by `next`.
    ///
    /// Must not start another state.
    fn stop(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {}

    /// Called once per tick while the game is not suspended
    fn update(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield) {}

    /// Pause or resume. Resuming should shift pending dates by
    /// `hero.now() - hero.when_suspended()`.
    fn set_suspended(&mut self, _hero: &mut HeroCore, _suspended: bool) {}

    // Notifications

    fn notify_command_pressed(
        &mut self,
        _hero: &mut HeroCore,
        _map: &mut dyn Playfield,
        _command: Command,
    ) {
    }

    fn notify_command_released(
        &mut self,
        _hero: &mut HeroCore,
        _map: &mut dyn Playfield,
        _command: Command,
    ) {
    }

    fn notify_movement_finished(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield) {}

    fn notify_movement_changed(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield) {}

    fn notify_obstacle_reached(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield) {}

    fn notify_position_changed(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield) {}

    fn notify_layer_changed(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield) {}

    /// The category of the ground below the hero changed
    fn notify_ground_changed(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield) {}

    fn notify_walking_speed_changed(&mut self, _hero: &mut HeroCore, _map: &mut dyn Playfield) {}

    // Movement

    /// Whether the player controls the movement
    fn can_control_movement(&self) -> bool {
        false
    }

    /// Direction the player wants to go, if the player controls the movement
    fn wanted_movement_direction8(&self, hero: &HeroCore) -> Option<Direction8> {
        if self.can_control_movement() {
            hero.commands.wanted_direction8()
        } else {
            None
        }
    }

    /// The sprites keep their direction whatever the movement
    fn is_direction_locked(&self) -> bool {
        false
    }

    fn is_free(&self) -> bool {
        false
    }

    fn is_touching_ground(&self) -> bool {
        true
    }

    /// Position changes skip the ground and floor checks
    fn are_collisions_ignored(&self) -> bool {
        false
    }

    /// Non-wall grounds the hero cannot walk on in this state
    fn ground_obstacles(&self) -> GroundObstacles {
        GroundObstacles::NONE
    }

    // Ground immunities

    fn can_avoid_deep_water(&self) -> bool {
        false
    }

    fn can_avoid_hole(&self) -> bool {
        false
    }

    fn can_avoid_ice(&self) -> bool {
        false
    }

    fn can_avoid_lava(&self) -> bool {
        false
    }

    fn can_avoid_prickle(&self) -> bool {
        false
    }

    // Detector immunities

    fn can_avoid_conveyor_belt(&self) -> bool {
        false
    }

    fn can_avoid_teletransporter(&self) -> bool {
        false
    }

    fn can_avoid_sensor(&self) -> bool {
        false
    }

    fn can_avoid_switch(&self) -> bool {
        false
    }

    fn can_avoid_explosion(&self) -> bool {
        false
    }

    fn can_avoid_jumper(&self) -> bool {
        false
    }

    fn can_avoid_stream(&self) -> bool {
        false
    }

    // Combat and life

    fn can_be_hurt(&self) -> bool {
        false
    }

    fn can_start_gameover_sequence(&self) -> bool {
        true
    }

    /// Whether the current position may be remembered as solid ground
    fn can_come_from_bad_ground(&self) -> bool {
        true
    }

    // Interactions

    fn is_carrying_item(&self) -> bool {
        false
    }

    fn carried_item(&self) -> Option<&CarriedItem> {
        None
    }

    fn can_start_item(&self) -> bool {
        false
    }

    fn can_take_stairs(&self) -> bool {
        false
    }

    fn can_pick_treasure(&self) -> bool {
        false
    }

    fn is_using_item(&self) -> bool {
        false
    }

    fn is_brandishing_treasure(&self) -> bool {
        false
    }

    fn is_grabbing_or_pulling(&self) -> bool {
        false
    }
}
