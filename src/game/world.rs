// World: the map and everything living on it
//
// Owns the hero, the other movable entities, streams and detectors, and
// runs one tick of the whole thing: the hero first, then detector checks,
// then stream actions, then removal of whatever asked to disappear.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use glam::IVec2;
use log::{debug, info};

use crate::engine::input::{Command, CommandEvent};
use crate::engine::map::{CollisionGroups, EntityId, Layer, TileMap};

use super::detectors::{ConveyorBelt, Stairs};
use super::entity::{MovableEntity, SimpleEntity};
use super::hero::{Hero, HeroEvent};
use super::stream::{Stream, StreamAction};

/// Entity id of the hero
pub const HERO_ID: EntityId = 1;

pub struct World {
    map: TileMap,
    hero: Rc<RefCell<Hero>>,
    entities: Vec<Rc<RefCell<SimpleEntity>>>,
    streams: Vec<Rc<RefCell<Stream>>>,
    stream_actions: Vec<StreamAction>,
    conveyor_belts: Vec<ConveyorBelt>,
    stairs: Vec<Stairs>,
    next_id: EntityId,
    suspended: bool,
    now: u32,
}

impl World {
    /// Place the hero on `map` with its origin on `hero_xy`
    pub fn new(mut map: TileMap, hero_xy: IVec2, hero_layer: Layer, now: u32) -> Self {
        let hero_box = crate::core::Rect::new(hero_xy.x - 8, hero_xy.y - 13, 16, 16);
        map.add_obstacle(HERO_ID, hero_layer, hero_box, CollisionGroups::Hero);
        let hero = Hero::new(HERO_ID, hero_xy, hero_layer, &mut map, now);
        info!("World created, hero at {:?} on layer {:?}", hero.xy(), hero.layer());

        Self {
            map,
            hero: Rc::new(RefCell::new(hero)),
            entities: Vec::new(),
            streams: Vec::new(),
            stream_actions: Vec::new(),
            conveyor_belts: Vec::new(),
            stairs: Vec::new(),
            next_id: HERO_ID + 1,
            suspended: false,
            now,
        }
    }

    /// Reserve an id for a new entity
    pub fn new_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a plain entity that blocks others according to `group`
    pub fn spawn_entity(&mut self, xy: IVec2, layer: Layer, group: CollisionGroups) -> EntityId {
        let id = self.new_id();
        let entity = SimpleEntity::new(id, xy, layer, group);
        self.map
            .add_obstacle(id, layer, entity.bounding_box(), group);
        self.entities.push(Rc::new(RefCell::new(entity)));
        id
    }

    pub fn add_stream(&mut self, stream: Stream) {
        self.streams.push(Rc::new(RefCell::new(stream)));
    }

    pub fn add_conveyor_belt(&mut self, belt: ConveyorBelt) {
        self.conveyor_belts.push(belt);
    }

    pub fn add_stairs(&mut self, stairs: Stairs) {
        self.stairs.push(stairs);
    }

    /// Ask an entity or a stream to disappear. Detectors go immediately,
    /// others at the end of the next tick.
    pub fn remove(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.iter().find(|e| e.borrow().id == id) {
            entity.borrow_mut().remove();
        }
        if let Some(stream) = self.streams.iter().find(|s| s.borrow().id == id) {
            stream.borrow_mut().being_removed = true;
        }
        self.conveyor_belts.retain(|b| b.id != id);
        self.stairs.retain(|s| s.id != id);
    }

    // Accessors

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    pub fn hero(&self) -> Ref<'_, Hero> {
        self.hero.borrow()
    }

    /// The hero together with the map its operations need
    pub fn hero_and_map(&mut self) -> (RefMut<'_, Hero>, &mut TileMap) {
        (self.hero.borrow_mut(), &mut self.map)
    }

    pub fn entity(&self, id: EntityId) -> Option<Ref<'_, SimpleEntity>> {
        self.entities
            .iter()
            .find(|e| e.borrow().id == id)
            .map(|e| e.borrow())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn stream_action_count(&self) -> usize {
        self.stream_actions.len()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn now(&self) -> u32 {
        self.now
    }

    pub fn drain_hero_events(&mut self) -> Vec<HeroEvent> {
        self.hero.borrow_mut().drain_events()
    }

    // Commands and suspension

    /// Route a game command: pause toggles suspension, the rest goes to
    /// the hero
    pub fn notify_command(&mut self, event: CommandEvent, now: u32) {
        self.now = now;
        if event.command == Command::Pause {
            if event.pressed {
                let suspended = !self.suspended;
                info!("Game {}", if suspended { "paused" } else { "resumed" });
                self.set_suspended(suspended);
            }
            return;
        }
        self.hero
            .borrow_mut()
            .notify_command(event, now, &mut self.map);
    }

    pub fn set_suspended(&mut self, suspended: bool) {
        if suspended == self.suspended {
            return;
        }
        self.suspended = suspended;
        self.hero.borrow_mut().set_suspended(suspended, self.now);
        for action in &mut self.stream_actions {
            action.set_suspended(suspended, self.now);
        }
    }

    /// The game-over sequence is over: refill life and give the hero
    /// another chance
    pub fn notify_game_over_finished(&mut self) {
        let mut hero = self.hero.borrow_mut();
        hero.equipment_mut().restore_all_life();
        hero.notify_game_over_finished(&mut self.map);
    }

    // Tick

    pub fn update(&mut self, now: u32) {
        self.now = now;

        self.hero.borrow_mut().update(now, &mut self.map);

        if !self.suspended {
            self.check_detectors();
            self.check_streams(now);
        }

        for action in &mut self.stream_actions {
            action.update(now, &mut self.map);
        }
        self.stream_actions.retain(StreamAction::is_active);

        self.remove_marked_entities();
        self.hero.borrow_mut().end_tick();
    }

    fn check_detectors(&mut self) {
        let mut hero = self.hero.borrow_mut();

        for belt in &self.conveyor_belts {
            if belt.layer == hero.layer() && belt.bounding_box.overlaps(&hero.bounding_box()) {
                hero.notify_collision_with_conveyor_belt(belt, &mut self.map);
            }
        }

        for stairs in &self.stairs {
            let reachable = stairs.layer == hero.layer()
                || (stairs.inside_floor && stairs.layer.above() == Some(hero.layer()));
            if !reachable {
                continue;
            }
            if stairs.bounding_box.overlaps(&hero.facing_point()) {
                hero.notify_collision_with_stairs(stairs, true, &mut self.map);
            } else if stairs.bounding_box.overlaps(&hero.bounding_box()) {
                hero.notify_collision_with_stairs(stairs, false, &mut self.map);
            }
        }
    }

    /// Start a stream action for every entity whose ground point entered a
    /// stream and is not carried already
    fn check_streams(&mut self, now: u32) {
        let mut candidates: Vec<Rc<RefCell<dyn MovableEntity>>> = Vec::new();
        if !self.hero.borrow().state().can_avoid_stream() {
            candidates.push(self.hero.clone());
        }
        for entity in &self.entities {
            candidates.push(entity.clone());
        }

        for stream in &self.streams {
            let (stream_id, stream_box, stream_layer) = {
                let stream = stream.borrow();
                if !stream.enabled || stream.being_removed {
                    continue;
                }
                (stream.id, stream.bounding_box, stream.layer)
            };

            for entity in &candidates {
                let (entity_id, caught) = {
                    let entity = entity.borrow();
                    let caught = entity.is_enabled()
                        && !entity.is_being_removed()
                        && entity.layer() == stream_layer
                        && stream_box.contains_point(entity.ground_point());
                    (entity.id(), caught)
                };
                let carried = self
                    .stream_actions
                    .iter()
                    .any(|a| a.is_active() && a.entity_id() == entity_id);
                if caught && !carried {
                    debug!("Entity {} caught by stream {}", entity_id, stream_id);
                    let mut action = StreamAction::new(stream, entity, now);
                    action.set_suspended(self.suspended, now);
                    self.stream_actions.push(action);
                }
            }
        }
    }

    fn remove_marked_entities(&mut self) {
        let map = &mut self.map;
        self.entities.retain(|entity| {
            let entity = entity.borrow();
            if entity.being_removed {
                debug!("Entity {} removed", entity.id);
                map.remove_entity(entity.id);
            }
            !entity.being_removed
        });
        self.streams.retain(|stream| !stream.borrow().being_removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Direction4, Direction8, Rect};
    use crate::engine::map::Ground;

    fn world_with_hero_at(x: i32, y: i32) -> World {
        World::new(TileMap::new(30, 30), IVec2::new(x, y), Layer::Low, 0)
    }

    #[test]
    fn test_hero_registered_on_map() {
        let world = world_with_hero_at(48, 53);
        assert_eq!(
            world.map().obstacle(HERO_ID).map(|o| o.bounding_box),
            Some(Rect::new(40, 40, 16, 16))
        );
        assert_eq!(world.hero().state_name(), "free");
    }

    #[test]
    fn test_stream_carries_hero() {
        let mut world = world_with_hero_at(48, 53);
        let id = world.new_id();
        world.add_stream(Stream::new(id, 40, 40, Layer::Low, Direction8::new(0)));

        world.update(10);
        assert_eq!(world.stream_action_count(), 1);

        world.update(300);
        assert_eq!(world.hero().xy(), IVec2::new(64, 53));
        assert_eq!(world.stream_action_count(), 0);

        world.update(600);
        assert_eq!(world.hero().xy(), IVec2::new(64, 53));
    }

    #[test]
    fn test_states_replaced_by_stream_push_dropped_same_tick() {
        let mut world = world_with_hero_at(48, 53);
        world
            .map_mut()
            .fill(Layer::Low, Rect::new(56, 0, 16, 240), Ground::Prickle);
        let id = world.new_id();
        world.add_stream(Stream::new(id, 40, 40, Layer::Low, Direction8::new(0)));

        world.update(10);
        world.update(300);
        let hero = world.hero();
        assert_eq!(hero.state_name(), "back to solid ground");
        assert_eq!(hero.retired_count(), 0);
    }

    #[test]
    fn test_stream_carries_entities() {
        let mut world = world_with_hero_at(200, 200);
        let entity = world.spawn_entity(IVec2::new(48, 53), Layer::Low, CollisionGroups::Npc);
        let stream_id = world.new_id();
        world.add_stream(Stream::new(stream_id, 40, 40, Layer::Low, Direction8::new(6)));

        world.update(10);
        world.update(300);
        assert_eq!(world.entity(entity).map(|e| e.xy()), Some(IVec2::new(48, 69)));
        assert_eq!(
            world.map().obstacle(entity).map(|o| o.bounding_box),
            Some(Rect::new(40, 56, 16, 16))
        );
    }

    #[test]
    fn test_removed_stream_releases_entity() {
        let mut world = world_with_hero_at(48, 53);
        let id = world.new_id();
        world.add_stream(Stream::new(id, 40, 40, Layer::Low, Direction8::new(0)).with_speed(4));

        world.update(10);
        world.remove(id);
        world.update(1000);
        assert_eq!(world.hero().xy(), IVec2::new(48, 53));
        assert_eq!(world.stream_action_count(), 0);
    }

    #[test]
    fn test_pause_freezes_streams() {
        let mut world = world_with_hero_at(48, 53);
        let id = world.new_id();
        world.add_stream(Stream::new(id, 40, 40, Layer::Low, Direction8::new(0)));
        world.update(10);

        world.notify_command(CommandEvent::pressed(Command::Pause), 10);
        world.notify_command(CommandEvent::released(Command::Pause), 20);
        assert!(world.is_suspended());
        assert!(world.hero().is_suspended());

        world.update(500);
        assert_eq!(world.hero().xy(), IVec2::new(48, 53));

        world.notify_command(CommandEvent::pressed(Command::Pause), 500);
        assert!(!world.is_suspended());
        world.update(520);
        assert_eq!(world.hero().xy(), IVec2::new(49, 53));
    }

    #[test]
    fn test_conveyor_belt_detected() {
        let mut world = world_with_hero_at(100, 93);
        let id = world.new_id();
        world.add_conveyor_belt(ConveyorBelt::new(id, 96, 80, Layer::Low, Direction8::new(0)));

        world.update(10);
        assert_eq!(world.hero().state_name(), "conveyor belt");

        world.update(2000);
        world.update(3000);
        world.update(5000);
        assert_eq!(world.hero().xy(), IVec2::new(120, 93));
        assert_eq!(world.hero().state_name(), "free");
    }

    #[test]
    fn test_stairs_ignored_when_not_walking_into_them() {
        let mut world = world_with_hero_at(100, 93);
        let id = world.new_id();
        world.add_stairs(Stairs::new(id, 96, 64, Layer::Low, Direction4::new(1), false));

        world.update(10);
        assert_eq!(world.hero().state_name(), "free");
    }

    #[test]
    fn test_removed_entity_leaves_map() {
        let mut world = world_with_hero_at(200, 200);
        let id = world.spawn_entity(IVec2::new(48, 53), Layer::Low, CollisionGroups::Block);
        assert!(world.map().obstacle(id).is_some());

        world.remove(id);
        world.update(10);
        assert_eq!(world.entity_count(), 0);
        assert!(world.map().obstacle(id).is_none());
    }

    #[test]
    fn test_game_over_finished_restores_life() {
        let mut world = world_with_hero_at(48, 53);
        {
            let (mut hero, _) = world.hero_and_map();
            hero.equipment_mut().remove_life(100);
        }
        world.update(10);
        assert!(world.drain_hero_events().contains(&HeroEvent::GameOverStarted));

        world.notify_game_over_finished();
        let hero = world.hero();
        assert_eq!(hero.equipment().life(), hero.equipment().max_life());
        assert_eq!(hero.state_name(), "free");
    }

    #[test]
    fn test_hero_walks_through_world() {
        let mut world = World::new(TileMap::new(30, 30), IVec2::new(48, 53), Layer::Low, 0);
        world
            .map_mut()
            .fill(Layer::Low, Rect::new(64, 0, 8, 240), Ground::Wall);

        world.notify_command(CommandEvent::pressed(Command::Right), 0);
        world.update(1000);
        assert_eq!(world.hero().xy(), IVec2::new(56, 53));
    }
}
