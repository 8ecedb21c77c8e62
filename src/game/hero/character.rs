// The hero: active state, per-tick pipeline and state transitions

use std::mem;

use glam::IVec2;
use log::{debug, error, info};

use crate::core::{Direction4, Direction8, Rect};
use crate::engine::input::{Command, CommandEvent};
use crate::engine::map::{EntityId, Ground, Layer, ObstacleRules, Playfield};
use crate::engine::movement::{Movement, MovementError};
use crate::game::detectors::{CarriedItem, ConveyorBelt, Stairs, StairsWay, Treasure};
use crate::game::entity::MovableEntity;

use super::context::HeroCore;
use super::equipment::{Equipment, HeroError};
use super::events::{CallbackRef, HeroEvent};
use super::sprites::HeroSprites;
use super::state::HeroState;
use super::states::{
    usable_item, CarryingState, ConveyorBeltState, ForcedWalkingState, FreeState, FreezedState,
    GrabbingState, HurtState, LiftingState, RunningState, StairsState, TreasureState,
    UsingItemState, VictoryState,
};
use super::stats::HeroStats;

/// The player's character
pub struct Hero {
    /// Never absent once constructed
    pub(super) state: Box<dyn HeroState>,

    /// States replaced during this tick, dropped once it completes
    pub(super) retired: Vec<Box<dyn HeroState>>,

    pub(super) core: HeroCore,

    /// Number of states that started another state from their `stop`
    pub(super) stop_violations: u32,
}

impl Hero {
    pub fn new(id: EntityId, xy: IVec2, layer: Layer, map: &mut dyn Playfield, now: u32) -> Self {
        Self::with_stats(id, xy, layer, HeroStats::default(), map, now)
    }

    pub fn with_stats(
        id: EntityId,
        xy: IVec2,
        layer: Layer,
        stats: HeroStats,
        map: &mut dyn Playfield,
        now: u32,
    ) -> Self {
        let core = HeroCore::new(id, xy, layer, stats, now);
        map.set_entity_layer(id, layer);
        map.set_entity_bounding_box(id, core.bounding_box());

        let mut hero = Self {
            state: Box::new(FreeState::new()),
            retired: Vec::new(),
            core,
            stop_violations: 0,
        };
        hero.state.start(&mut hero.core, map, None);
        hero.core.ground_obstacles = hero.state.ground_obstacles();
        hero.check_position(map);
        hero.sync_player_movement();
        hero.flush(map);
        hero
    }

    // Transitions

    /// Replace the active state right now.
    ///
    /// The old state is retired, not dropped: it may be the very caller of
    /// the transition. States queued by the old state's `stop` are discarded
    /// and `next` is forced.
    fn change_state(&mut self, next: Box<dyn HeroState>, map: &mut dyn Playfield) {
        let queued = self.core.pending.len();
        self.state.stop(&mut self.core, map, next.as_ref());

        let strays: Vec<_> = self.core.pending.drain(queued..).collect();
        for stray in strays {
            error!(
                "Hero state '{}' did not stop properly to let state '{}' go, it started state '{}' instead. State '{}' will be forced.",
                self.state.name(),
                next.name(),
                stray.name(),
                next.name()
            );
            self.stop_violations += 1;
            self.retired.push(stray);
        }

        let previous = mem::replace(&mut self.state, next);
        debug!("Hero state: '{}' -> '{}'", previous.name(), self.state.name());
        self.core.push_event(HeroEvent::StateChanged {
            from: previous.name(),
            to: self.state.name(),
        });
        self.retired.push(previous);
        self.core.ground_obstacles = self.state.ground_obstacles();

        let queued = self.core.pending.len();
        self.state
            .start(&mut self.core, map, self.retired.last().map(|s| s.as_ref()));
        self.core.ground_obstacles = self.state.ground_obstacles();

        if self.core.pending.len() == queued {
            // Not replaced again by its own start
            self.check_position(map);
        }
    }

    /// Process everything states deferred: notifications first, then the
    /// queued transitions in order
    pub(super) fn flush(&mut self, map: &mut dyn Playfield) {
        loop {
            if mem::take(&mut self.core.position_changed_pending) {
                self.notify_position_changed(map);
            } else if mem::take(&mut self.core.walking_speed_changed_pending) {
                self.state.notify_walking_speed_changed(&mut self.core, map);
            } else if mem::take(&mut self.core.movement_changed_pending) {
                self.notify_movement_changed(map);
            } else if let Some(next) = self.core.pending.pop_front() {
                self.change_state(next, map);
                self.sync_player_movement();
            } else {
                break;
            }
        }
    }

    // Per-tick update

    pub fn update(&mut self, now: u32, map: &mut dyn Playfield) {
        self.core.now = now;

        self.update_movement(map);
        self.core.sprites.update(now);

        if !self.core.suspended {
            self.state.update(&mut self.core, map);
            self.flush(map);
        }
        self.retired.clear();

        if !self.core.suspended {
            self.update_ground_effects(map);
            self.check_gameover();
            self.flush(map);
            self.retired.clear();
        }

        self.core.commands.update();
    }

    /// Drop the states replaced since the hero's own update, by streams or
    /// scripts acting on the hero later in the same tick
    pub fn end_tick(&mut self) {
        self.retired.clear();
    }

    fn update_movement(&mut self, map: &mut dyn Playfield) {
        self.sync_player_movement();
        self.flush(map);

        loop {
            let (now, xy) = (self.core.now, self.core.xy());
            let Some(delta) = self.core.movement.as_mut().and_then(|m| m.poll_step(now, xy)) else {
                break;
            };

            match self.try_step(delta, map) {
                Some(step) => {
                    self.core.bounding_box = self.core.bounding_box.translated(step);
                    let xy = self.core.xy();
                    if let Some(movement) = self.core.movement.as_mut() {
                        movement.notify_step_done(step, xy);
                    }
                    self.notify_position_changed(map);
                    self.flush(map);
                }
                None => {
                    self.notify_obstacle_reached(map);
                    self.flush(map);
                    break;
                }
            }
        }

        if self.core.movement.as_mut().is_some_and(|m| m.take_finished_event()) {
            self.state.notify_movement_finished(&mut self.core, map);
            self.flush(map);
        }
    }

    /// The step actually possible for a wanted one-pixel step. Smooth
    /// movements blocked diagonally slide along one axis.
    fn try_step(&self, delta: IVec2, map: &dyn Playfield) -> Option<IVec2> {
        let movement = self.core.movement.as_ref()?;
        if movement.ignores_obstacles() {
            return Some(delta);
        }

        let mut candidates = vec![delta];
        if movement.is_smooth() && delta.x != 0 && delta.y != 0 {
            candidates.push(IVec2::new(delta.x, 0));
            candidates.push(IVec2::new(0, delta.y));
        }
        candidates
            .into_iter()
            .find(|&step| !self.test_collision(map, step))
    }

    /// Whether the hero's box moved by `delta` would overlap an obstacle
    pub(super) fn test_collision(&self, map: &dyn Playfield, delta: IVec2) -> bool {
        let rect = self.core.bounding_box.translated(delta);
        map.test_collision_with_obstacles(self.core.layer, &rect, &self.core)
    }

    /// Give a player movement the direction wanted by the active state
    fn sync_player_movement(&mut self) {
        let wanted = self.state.wanted_movement_direction8(&self.core);
        let now = self.core.now;
        if let Some(movement) = self
            .core
            .movement
            .as_mut()
            .filter(|m| m.is_player_controlled())
        {
            if movement.set_player_direction(wanted, now) {
                self.core.movement_changed_pending = true;
            }
        }
    }

    fn check_gameover(&mut self) {
        if self.core.equipment.life() <= 0
            && !self.core.game_over_started
            && self.state.can_start_gameover_sequence()
        {
            self.core.game_over_started = true;
            self.core.sprites.stop_blinking();
            info!("Hero has no life left, starting the game-over sequence");
            self.core.push_event(HeroEvent::GameOverStarted);
        }
    }

    /// The game-over sequence is over and the hero gets another chance
    pub fn notify_game_over_finished(&mut self, map: &mut dyn Playfield) {
        self.core.game_over_started = false;
        let (duration, now) = (self.core.stats.blink_duration, self.core.now);
        self.core.sprites.blink(duration, now);
        self.core.start_state_from_ground();
        self.flush(map);
    }

    // Notifications

    fn notify_position_changed(&mut self, map: &mut dyn Playfield) {
        self.check_position(map);
        self.state.notify_position_changed(&mut self.core, map);
        map.set_entity_bounding_box(self.core.id, self.core.bounding_box);
        self.core.push_event(HeroEvent::PositionChanged {
            xy: self.core.xy(),
            layer: self.core.layer,
        });
    }

    fn notify_obstacle_reached(&mut self, map: &mut dyn Playfield) {
        self.state.notify_obstacle_reached(&mut self.core, map);
        if self.core.ground_below == Ground::Ice {
            self.core.ground_dxy = IVec2::ZERO;
            self.core.ice_direction8 = None;
        }
    }

    fn notify_movement_changed(&mut self, map: &mut dyn Playfield) {
        if let Some(wanted) = self.state.wanted_movement_direction8(&self.core) {
            if !self.state.is_direction_locked() {
                let real = self.real_movement_direction8(map);
                let direction = self.core.sprites.animation_direction_for(wanted, real);
                self.core.sprites.set_animation_direction(direction);
            }
        }

        self.state.notify_movement_changed(&mut self.core, map);
        self.check_position(map);

        if self.core.ground_below == Ground::Ice {
            self.update_ice();
        }

        let xy = self.core.xy();
        let (direction, speed) = self
            .core
            .movement
            .as_ref()
            .map(|m| (m.direction(xy), m.speed()))
            .unwrap_or((None, 0));
        self.core
            .push_event(HeroEvent::MovementChanged { direction, speed });
    }

    pub fn notify_command_pressed(&mut self, command: Command, now: u32, map: &mut dyn Playfield) {
        self.notify_command(CommandEvent::pressed(command), now, map);
    }

    pub fn notify_command_released(&mut self, command: Command, now: u32, map: &mut dyn Playfield) {
        self.notify_command(CommandEvent::released(command), now, map);
    }

    /// Forward a game command to the active state
    pub fn notify_command(&mut self, event: CommandEvent, now: u32, map: &mut dyn Playfield) {
        self.core.now = now;
        let changed = if event.pressed {
            self.core.commands.press(event.command)
        } else {
            self.core.commands.release(event.command)
        };
        if !changed {
            return;
        }

        if !self.core.suspended {
            if event.pressed {
                self.state
                    .notify_command_pressed(&mut self.core, map, event.command);
            } else {
                self.state
                    .notify_command_released(&mut self.core, map, event.command);
            }
            self.flush(map);
        }

        self.sync_player_movement();
        self.flush(map);
    }

    /// Pause or resume time-driven behavior
    pub fn set_suspended(&mut self, suspended: bool, now: u32) {
        if suspended == self.core.suspended {
            return;
        }
        self.core.now = now;
        self.core.suspended = suspended;
        if suspended {
            self.core.when_suspended = now;
        } else {
            let diff = self.core.suspended_duration();
            self.core.next_ground_date += diff;
            self.core.next_ice_date += diff;
        }

        if let Some(movement) = self.core.movement.as_mut() {
            movement.set_suspended(suspended, now);
        }
        self.core.sprites.set_suspended(suspended, now);
        self.state.set_suspended(&mut self.core, suspended);
    }

    // Movement queries

    /// Direction the hero really moves to: the wanted one, or one of the two
    /// closest when sliding against an obstacle
    pub fn real_movement_direction8(&self, map: &dyn Playfield) -> Option<Direction8> {
        let Some(wanted) = self.state.wanted_movement_direction8(&self.core) else {
            let xy = self.core.xy();
            return self.core.movement.as_ref().and_then(|m| m.direction(xy));
        };

        [wanted, wanted.rotated(1), wanted.rotated(-1)]
            .into_iter()
            .find(|d| !self.test_collision(map, d.to_xy_move()))
            .or(Some(wanted))
    }

    /// Whether the hero moves towards `direction4`, diagonals included
    pub fn is_moving_towards(&self, direction4: Direction4) -> bool {
        if !self.core.movement.as_ref().is_some_and(|m| !m.is_stopped()) {
            return false;
        }
        let target = direction4.to_direction8();
        self.state
            .wanted_movement_direction8(&self.core)
            .is_some_and(|wanted| {
                wanted == target || wanted.rotated(1) == target || wanted.rotated(-1) == target
            })
    }

    // State starters

    /// Start a state now, processing whatever it triggers
    pub fn set_state(&mut self, state: Box<dyn HeroState>, map: &mut dyn Playfield) {
        self.core.set_state(state);
        self.flush(map);
    }

    pub fn start_free(&mut self, map: &mut dyn Playfield) {
        self.set_state(Box::new(FreeState::new()), map);
    }

    /// Free, or keep carrying what the hero already holds
    pub fn start_free_or_carrying(&mut self, map: &mut dyn Playfield) {
        match self.state.carried_item().cloned() {
            Some(item) => self.set_state(Box::new(CarryingState::new(item)), map),
            None => self.start_free(map),
        }
    }

    pub fn start_state_from_ground(&mut self, map: &mut dyn Playfield) {
        self.core.start_state_from_ground();
        self.flush(map);
    }

    pub fn start_treasure(
        &mut self,
        treasure: Treasure,
        callback: Option<CallbackRef>,
        map: &mut dyn Playfield,
    ) {
        self.set_state(Box::new(TreasureState::new(treasure, callback)), map);
    }

    pub fn start_victory(&mut self, callback: Option<CallbackRef>, map: &mut dyn Playfield) {
        self.set_state(Box::new(VictoryState::new(callback)), map);
    }

    pub fn start_freezed(&mut self, map: &mut dyn Playfield) {
        self.set_state(Box::new(FreezedState::new()), map);
    }

    /// Walk along a path of direction digits such as `"0022"`
    pub fn start_forced_walking(
        &mut self,
        path: &str,
        looping: bool,
        ignore_obstacles: bool,
        map: &mut dyn Playfield,
    ) -> Result<(), MovementError> {
        let state = ForcedWalkingState::new(path, looping, ignore_obstacles)?;
        self.set_state(Box::new(state), map);
        Ok(())
    }

    pub fn start_jumping(
        &mut self,
        direction8: Direction8,
        distance: i32,
        ignore_obstacles: bool,
        with_sound: bool,
        movement_delay: u32,
        map: &mut dyn Playfield,
    ) {
        self.core
            .start_jumping(direction8, distance, ignore_obstacles, with_sound, movement_delay);
        self.flush(map);
    }

    pub fn start_lifting(&mut self, item: CarriedItem, map: &mut dyn Playfield) {
        self.set_state(Box::new(LiftingState::new(item)), map);
    }

    pub fn start_running(&mut self, map: &mut dyn Playfield) -> Result<(), HeroError> {
        self.refuse_unless(self.state.is_free(), "running")?;
        self.set_state(Box::new(RunningState::new(Command::Action)), map);
        Ok(())
    }

    pub fn start_grabbing(&mut self, map: &mut dyn Playfield) -> Result<(), HeroError> {
        self.refuse_unless(self.state.is_free(), "grabbing")?;
        self.set_state(Box::new(GrabbingState::new()), map);
        Ok(())
    }

    /// Use the item assigned to a slot
    pub fn start_item(&mut self, slot: usize, map: &mut dyn Playfield) -> Result<(), HeroError> {
        self.refuse_unless(self.state.can_start_item(), "item")?;
        let item = usable_item(&self.core, slot)?;
        self.set_state(Box::new(UsingItemState::new(item)), map);
        Ok(())
    }

    pub fn start_back_to_solid_ground(
        &mut self,
        use_memorized_xy: bool,
        end_delay: u32,
        with_sound: bool,
        map: &mut dyn Playfield,
    ) {
        self.core
            .start_back_to_solid_ground(use_memorized_xy, end_delay, with_sound);
        self.flush(map);
    }

    fn refuse_unless(&self, allowed: bool, requested: &'static str) -> Result<(), HeroError> {
        if allowed {
            return Ok(());
        }
        debug!(
            "Hero state '{}' refuses to start '{}'",
            self.state.name(),
            requested
        );
        Err(HeroError::CommandRefused {
            state: self.state.name(),
            requested,
        })
    }

    /// Hurt the hero unless it is blinking or its state is immune.
    /// Returns whether the hero was hurt.
    pub fn hurt(&mut self, source_xy: IVec2, life_points: i32, map: &mut dyn Playfield) -> bool {
        if self.core.sprites.is_blinking() || !self.state.can_be_hurt() {
            return false;
        }
        self.set_state(Box::new(HurtState::new(source_xy, life_points)), map);
        true
    }

    // Position

    /// Teleport the hero
    pub fn set_xy(&mut self, xy: IVec2, map: &mut dyn Playfield) {
        self.core.set_xy(xy);
        self.flush(map);
    }

    /// Pin the place the hero returns to after falling, instead of the last
    /// solid ground walked on
    pub fn set_target_solid_ground_coords(&mut self, xy: IVec2, layer: Layer) {
        self.core.target_solid_ground = Some((xy, layer));
    }

    pub fn reset_target_solid_ground_coords(&mut self) {
        self.core.target_solid_ground = None;
    }

    // Detectors

    pub fn notify_collision_with_conveyor_belt(
        &mut self,
        belt: &ConveyorBelt,
        map: &mut dyn Playfield,
    ) {
        if self.state.can_avoid_conveyor_belt() {
            return;
        }

        // A significant part of the hero must be on the belt
        let center = self.core.center_point();
        let center_box = Rect::new(center.x - 1, center.y - 1, 2, 2);
        if !belt.bounding_box.overlaps(&center_box) {
            return;
        }

        // The hero must fit on the belt and its exit must be clear, otherwise
        // it would be trapped forever
        let dxy = belt.direction.to_xy_move();
        let hero_box = self.core.bounding_box;
        let (x, y) = if dxy.x != 0 {
            (hero_box.x + dxy.x, belt.bounding_box.y)
        } else {
            (belt.bounding_box.x, hero_box.y + dxy.y)
        };
        let layer = self.core.layer;
        let on_belt = Rect::new(x, y, hero_box.width, hero_box.height);
        if map.test_collision_with_obstacles(layer, &on_belt, &self.core) {
            return;
        }
        let exit = belt.bounding_box.translated(dxy);
        if map.test_collision_with_obstacles(layer, &exit, &self.core) {
            return;
        }

        self.set_state(Box::new(ConveyorBeltState::new(belt.clone())), map);
    }

    /// Stairs touched, either by the facing point (`facing`) or by the
    /// bounding box
    pub fn notify_collision_with_stairs(
        &mut self,
        stairs: &Stairs,
        facing: bool,
        map: &mut dyn Playfield,
    ) {
        if !self.state.can_take_stairs() {
            return;
        }

        let way = if stairs.inside_floor {
            if self.core.layer == stairs.layer {
                StairsWay::Normal
            } else {
                StairsWay::Reverse
            }
        } else if facing {
            StairsWay::Normal
        } else {
            StairsWay::Reverse
        };

        let direction = stairs.movement_direction(way);
        if self.is_moving_towards(Direction4::new(direction.index() / 2)) {
            self.set_state(Box::new(StairsState::new(stairs.clone(), way)), map);
        }
    }

    // Accessors

    pub fn id(&self) -> EntityId {
        self.core.id
    }

    pub fn xy(&self) -> IVec2 {
        self.core.xy()
    }

    pub fn layer(&self) -> Layer {
        self.core.layer
    }

    pub fn bounding_box(&self) -> Rect {
        self.core.bounding_box
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn state(&self) -> &dyn HeroState {
        self.state.as_ref()
    }

    pub fn core(&self) -> &HeroCore {
        &self.core
    }

    pub fn equipment(&self) -> &Equipment {
        &self.core.equipment
    }

    pub fn equipment_mut(&mut self) -> &mut Equipment {
        &mut self.core.equipment
    }

    pub fn sprites(&self) -> &HeroSprites {
        &self.core.sprites
    }

    pub fn stats(&self) -> &HeroStats {
        &self.core.stats
    }

    pub fn movement(&self) -> Option<&Movement> {
        self.core.movement()
    }

    pub fn walking_speed(&self) -> i32 {
        self.core.walking_speed
    }

    pub fn ground_below(&self) -> Ground {
        self.core.ground_below
    }

    pub fn ground_dxy(&self) -> IVec2 {
        self.core.ground_dxy
    }

    pub fn last_solid_ground(&self) -> Option<(IVec2, Layer)> {
        self.core.last_solid_ground
    }

    pub fn facing_point(&self) -> Rect {
        self.core.facing_point
    }

    pub fn is_suspended(&self) -> bool {
        self.core.suspended
    }

    /// Take the notifications emitted since the last call
    pub fn drain_events(&mut self) -> Vec<HeroEvent> {
        self.core.events.drain()
    }

    /// States replaced during the current tick and not dropped yet
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    pub fn stop_violations(&self) -> u32 {
        self.stop_violations
    }
}

impl MovableEntity for Hero {
    fn id(&self) -> EntityId {
        self.core.id
    }

    fn xy(&self) -> IVec2 {
        self.core.xy()
    }

    fn layer(&self) -> Layer {
        self.core.layer
    }

    fn bounding_box(&self) -> Rect {
        self.core.bounding_box
    }

    fn ground_point(&self) -> IVec2 {
        self.core.ground_point()
    }

    fn obstacle_rules(&self) -> &dyn ObstacleRules {
        &self.core
    }

    fn set_xy(&mut self, xy: IVec2, map: &mut dyn Playfield) {
        Hero::set_xy(self, xy, map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::map::TileMap;
    use std::cell::Cell;
    use std::rc::Rc;

    fn hero_at(map: &mut TileMap, x: i32, y: i32) -> Hero {
        Hero::new(1, IVec2::new(x, y), Layer::Low, map, 0)
    }

    struct DropProbe {
        drops: Rc<Cell<u32>>,
    }

    impl HeroState for DropProbe {
        fn name(&self) -> &'static str {
            "probe"
        }
    }

    impl Drop for DropProbe {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    /// Starts another state from its own `stop`
    struct Stubborn;

    impl HeroState for Stubborn {
        fn name(&self) -> &'static str {
            "stubborn"
        }

        fn stop(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _next: &dyn HeroState) {
            hero.set_state(Box::new(FreezedState::new()));
        }
    }

    #[test]
    fn test_starts_free() {
        let mut map = TileMap::new(20, 20);
        let hero = hero_at(&mut map, 40, 40);
        assert_eq!(hero.state_name(), "free");
        assert_eq!(hero.bounding_box(), Rect::new(32, 27, 16, 16));
        assert_eq!(hero.last_solid_ground(), Some((IVec2::new(40, 40), Layer::Low)));
        assert_eq!(hero.retired_count(), 0);
    }

    #[test]
    fn test_walk_right() {
        let mut map = TileMap::new(20, 20);
        let mut hero = hero_at(&mut map, 40, 40);

        hero.notify_command_pressed(Command::Right, 0, &mut map);
        assert_eq!(hero.sprites().animation_direction(), Direction4::RIGHT);
        assert_eq!(hero.sprites().current_animation(), "walking");

        // One step every 11 ms at 88 px/s
        hero.update(100, &mut map);
        assert_eq!(hero.xy(), IVec2::new(49, 40));

        let events = hero.drain_events();
        assert!(events.contains(&HeroEvent::MovementChanged {
            direction: Some(Direction8::new(0)),
            speed: 88,
        }));
        assert!(events.contains(&HeroEvent::PositionChanged {
            xy: IVec2::new(49, 40),
            layer: Layer::Low,
        }));
    }

    #[test]
    fn test_walls_block_steps() {
        let mut map = TileMap::new(20, 20);
        map.fill(Layer::Low, Rect::new(56, 0, 8, 160), Ground::Wall);
        let mut hero = hero_at(&mut map, 40, 40);

        hero.notify_command_pressed(Command::Right, 0, &mut map);
        for now in (100..=1000).step_by(100) {
            hero.update(now, &mut map);
            assert!(!map.test_collision_with_obstacles(
                Layer::Low,
                &hero.bounding_box(),
                hero.obstacle_rules()
            ));
        }
        assert_eq!(hero.xy(), IVec2::new(48, 40));
        assert_eq!(hero.state_name(), "free");
    }

    #[test]
    fn test_hole_far_from_solid_ground_falls() {
        let mut map = TileMap::new(30, 30);
        map.fill(Layer::Low, Rect::new(96, 88, 16, 24), Ground::Hole);
        let mut hero = hero_at(&mut map, 90, 100);

        hero.set_xy(IVec2::new(100, 100), &mut map);
        assert_eq!(hero.ground_below(), Ground::Hole);
        assert_eq!(hero.state_name(), "free");

        hero.update(1, &mut map);
        assert_eq!(hero.state_name(), "falling");
        assert_eq!(hero.xy(), IVec2::new(100, 100));
    }

    #[test]
    fn test_hole_pulls_gradually() {
        let mut map = TileMap::new(30, 30);
        map.fill(Layer::Low, Rect::new(96, 88, 16, 24), Ground::Hole);
        let mut hero = hero_at(&mut map, 92, 100);

        hero.set_xy(IVec2::new(96, 100), &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::new(1, 0));
        assert_eq!(hero.walking_speed(), 29);

        hero.update(1, &mut map);
        assert_eq!(hero.xy(), IVec2::new(97, 100));

        // Gated: nothing happens before the next evaluation date
        hero.update(30, &mut map);
        assert_eq!(hero.xy(), IVec2::new(97, 100));

        for now in [61, 121, 181] {
            hero.update(now, &mut map);
            assert_eq!(hero.state_name(), "free");
        }
        assert_eq!(hero.xy(), IVec2::new(100, 100));

        hero.update(241, &mut map);
        assert_eq!(hero.state_name(), "falling");
        assert_eq!(hero.walking_speed(), 88);
    }

    #[test]
    fn test_ice_resists_then_follows() {
        let mut map = TileMap::new(40, 30);
        map.fill(Layer::Low, Rect::new(0, 0, 320, 240), Ground::Ice);
        let mut hero = hero_at(&mut map, 80, 80);
        assert_eq!(hero.ground_below(), Ground::Ice);

        // At rest: the slide stays off for a second
        hero.update(0, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::ZERO);
        assert_eq!(hero.core().next_ice_date, 1000);

        // From rest, the ice resists the wanted direction
        hero.notify_command_pressed(Command::Right, 500, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::new(-1, 0));

        hero.update(1000, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::new(-1, 0));

        hero.update(1020, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::new(1, 0));
        assert_eq!(hero.core().next_ice_date, 1320);
    }

    #[test]
    fn test_ice_slide_disarms_after_release() {
        let mut map = TileMap::new(40, 30);
        map.fill(Layer::Low, Rect::new(0, 0, 320, 240), Ground::Ice);
        let mut hero = hero_at(&mut map, 40, 80);
        assert_eq!(hero.core().next_ice_date, 1000);

        // Start sliding once the rest delay is over
        hero.notify_command_pressed(Command::Right, 1000, &mut map);
        hero.update(1000, &mut map);
        hero.update(1020, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::new(1, 0));
        assert_eq!(hero.core().next_ice_date, 1320);

        // Still sliding right after the release
        hero.notify_command_released(Command::Right, 1100, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::new(1, 0));
        assert_eq!(hero.core().next_ice_date, 1400);

        hero.update(1400, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::new(1, 0));
        assert_eq!(hero.core().ice_direction8, None);

        // At rest again
        hero.update(1700, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::ZERO);
        assert_eq!(hero.core().next_ice_date, 2700);

        hero.update(2000, &mut map);
        assert_eq!(hero.ground_dxy(), IVec2::ZERO);
    }

    #[test]
    fn test_retired_states_dropped_at_end_of_tick() {
        let mut map = TileMap::new(20, 20);
        let mut hero = hero_at(&mut map, 40, 40);
        let drops = Rc::new(Cell::new(0));

        hero.set_state(Box::new(DropProbe { drops: drops.clone() }), &mut map);
        assert_eq!(hero.state_name(), "probe");
        assert_eq!(hero.retired_count(), 1);
        hero.update(10, &mut map);
        assert_eq!(hero.retired_count(), 0);

        hero.start_free(&mut map);
        assert_eq!(drops.get(), 0);
        assert_eq!(hero.retired_count(), 1);
        hero.update(20, &mut map);
        assert_eq!(drops.get(), 1);
        assert_eq!(hero.retired_count(), 0);
    }

    #[test]
    fn test_state_started_from_stop_is_overridden() {
        let mut map = TileMap::new(20, 20);
        let mut hero = hero_at(&mut map, 40, 40);

        hero.set_state(Box::new(Stubborn), &mut map);
        hero.start_free(&mut map);
        assert_eq!(hero.state_name(), "free");
        assert_eq!(hero.stop_violations(), 1);
    }

    #[test]
    fn test_treasure_callback_invoked_once() {
        let mut map = TileMap::new(20, 20);
        let mut hero = hero_at(&mut map, 40, 40);

        hero.start_treasure(Treasure::new("sword", 1), Some(CallbackRef(7)), &mut map);
        assert!(hero.state().is_brandishing_treasure());
        assert_eq!(hero.equipment().item("sword").map(|i| i.variant), Some(1));

        hero.notify_command_pressed(Command::Action, 10, &mut map);
        hero.notify_command_released(Command::Action, 20, &mut map);
        hero.notify_command_pressed(Command::Action, 30, &mut map);
        assert_eq!(hero.state_name(), "free");

        let callbacks = hero
            .drain_events()
            .into_iter()
            .filter(|e| *e == HeroEvent::CallbackInvoked(CallbackRef(7)))
            .count();
        assert_eq!(callbacks, 1);
    }

    #[test]
    fn test_suspension_shifts_ground_dates() {
        let mut map = TileMap::new(30, 30);
        map.fill(Layer::Low, Rect::new(96, 88, 16, 24), Ground::Hole);
        let mut hero = hero_at(&mut map, 92, 100);
        hero.set_xy(IVec2::new(96, 100), &mut map);
        hero.update(1, &mut map);
        assert_eq!(hero.xy(), IVec2::new(97, 100));

        hero.set_suspended(true, 10);
        hero.update(300, &mut map);
        assert_eq!(hero.xy(), IVec2::new(97, 100));
        hero.set_suspended(false, 510);
        assert_eq!(hero.core().next_ground_date, 561);

        hero.update(520, &mut map);
        assert_eq!(hero.xy(), IVec2::new(97, 100));
        hero.update(561, &mut map);
        assert_eq!(hero.xy(), IVec2::new(98, 100));
    }

    #[test]
    fn test_hurt_then_blinking_protects() {
        let mut map = TileMap::new(40, 30);
        let mut hero = hero_at(&mut map, 80, 80);

        assert!(hero.hurt(IVec2::new(60, 80), 2, &mut map));
        assert_eq!(hero.state_name(), "hurt");
        assert_eq!(hero.equipment().life(), 10);

        // Knocked back 24 px to the right
        hero.update(300, &mut map);
        assert_eq!(hero.xy(), IVec2::new(104, 80));
        assert_eq!(hero.state_name(), "free");

        assert!(!hero.hurt(IVec2::new(60, 80), 2, &mut map));
        assert_eq!(hero.equipment().life(), 10);
    }

    #[test]
    fn test_game_over_started_once() {
        let mut map = TileMap::new(20, 20);
        let mut hero = hero_at(&mut map, 40, 40);
        hero.equipment_mut().remove_life(12);

        hero.update(10, &mut map);
        hero.update(20, &mut map);
        let game_overs = hero
            .drain_events()
            .into_iter()
            .filter(|e| *e == HeroEvent::GameOverStarted)
            .count();
        assert_eq!(game_overs, 1);

        hero.equipment_mut().restore_all_life();
        hero.notify_game_over_finished(&mut map);
        assert!(hero.sprites().is_blinking());
        assert_eq!(hero.state_name(), "free");
    }

    #[test]
    fn test_conveyor_belt_carries_hero() {
        let mut map = TileMap::new(30, 30);
        let mut hero = hero_at(&mut map, 100, 93);
        let belt = ConveyorBelt::new(2, 96, 80, Layer::Low, Direction8::new(0));

        hero.notify_collision_with_conveyor_belt(&belt, &mut map);
        assert_eq!(hero.state_name(), "conveyor belt");

        // Snapped on the belt, then carried 16 px
        hero.update(2000, &mut map);
        assert_eq!(hero.xy(), IVec2::new(104, 93));
        hero.update(3000, &mut map);
        assert_eq!(hero.xy(), IVec2::new(120, 93));
        assert_eq!(hero.state_name(), "free");
    }

    #[test]
    fn test_blocked_conveyor_belt_is_ignored() {
        let mut map = TileMap::new(30, 30);
        map.fill(Layer::Low, Rect::new(112, 80, 8, 16), Ground::Wall);
        let mut hero = hero_at(&mut map, 100, 93);
        let belt = ConveyorBelt::new(2, 96, 80, Layer::Low, Direction8::new(0));

        hero.notify_collision_with_conveyor_belt(&belt, &mut map);
        assert_eq!(hero.state_name(), "free");
    }

    #[test]
    fn test_command_driven_transitions_refused() {
        let mut map = TileMap::new(20, 20);
        let mut hero = hero_at(&mut map, 40, 40);
        hero.start_freezed(&mut map);

        assert_eq!(
            hero.start_item(0, &mut map),
            Err(HeroError::CommandRefused {
                state: "freezed",
                requested: "item",
            })
        );
        assert!(hero.start_running(&mut map).is_err());
        assert_eq!(hero.state_name(), "freezed");

        hero.start_free(&mut map);
        assert_eq!(hero.start_item(0, &mut map), Err(HeroError::NoItemAssigned(0)));
    }

    #[test]
    fn test_stairs_need_matching_direction() {
        let mut map = TileMap::new(30, 30);
        let mut hero = hero_at(&mut map, 100, 100);
        let stairs = Stairs::new(3, 92, 72, Layer::Low, Direction4::UP, false);

        hero.notify_collision_with_stairs(&stairs, true, &mut map);
        assert_eq!(hero.state_name(), "free");

        hero.notify_command_pressed(Command::Up, 0, &mut map);
        hero.notify_collision_with_stairs(&stairs, true, &mut map);
        assert_eq!(hero.state_name(), "stairs");
    }
}
