// Streams and the timed displacement they apply to entities
//
// A `StreamAction` is created when an entity steps on a stream. It moves
// the entity one pixel at a time until it reaches a point 16 pixels ahead,
// is blocked, or either end of the action disappears. The action only
// holds weak handles: the stream and the entity are owned by the world and
// may be removed at any time.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::IVec2;

use crate::core::{distance, Direction8, Rect};
use crate::engine::map::{EntityId, Layer, Playfield};

use super::entity::MovableEntity;

/// Distance an entity is carried by a stream
pub const STREAM_DISTANCE: i32 = 16;

/// Default speed of a stream in pixels per second
pub const DEFAULT_STREAM_SPEED: i32 = 64;

/// Distance to the target under which a free stream keeps carrying an
/// entity that left it
const ESCAPE_DISTANCE: f64 = 8.0;

/// A 16x16 terrain feature pushing entities in a direction
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub id: EntityId,
    pub bounding_box: Rect,
    pub layer: Layer,
    pub direction: Direction8,
    /// Pixels per second
    pub speed: i32,
    /// Whether entities can walk against or out of the stream
    pub allow_movement: bool,
    pub enabled: bool,
    pub being_removed: bool,
}

impl Stream {
    pub fn new(id: EntityId, x: i32, y: i32, layer: Layer, direction: Direction8) -> Self {
        Self {
            id,
            bounding_box: Rect::new(x, y, 16, 16),
            layer,
            direction,
            speed: DEFAULT_STREAM_SPEED,
            allow_movement: true,
            enabled: true,
            being_removed: false,
        }
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_allow_movement(mut self, allow_movement: bool) -> Self {
        self.allow_movement = allow_movement;
        self
    }

    /// Origin point, (8, 13) inside the box like other entities
    pub fn xy(&self) -> IVec2 {
        self.bounding_box.xy() + IVec2::new(8, 13)
    }
}

/// Milliseconds between two one-pixel steps of a stream
pub fn stream_step_delay(direction: Direction8, speed: i32) -> u32 {
    let delay = 1000.0 / speed.max(1) as f64;
    let delay = if direction.is_diagonal() {
        delay * std::f64::consts::SQRT_2
    } else {
        delay
    };
    delay.round() as u32
}

/// An entity being carried by a stream
#[derive(Debug)]
pub struct StreamAction {
    stream: Weak<RefCell<Stream>>,
    entity: Weak<RefCell<dyn MovableEntity>>,
    stream_id: EntityId,
    entity_id: EntityId,

    /// One-pixel step
    dxy: IVec2,
    /// Where the action ends
    target: IVec2,
    delay: u32,
    next_move_date: u32,

    active: bool,
    suspended: bool,
    when_suspended: u32,
}

impl StreamAction {
    pub fn new(
        stream: &Rc<RefCell<Stream>>,
        entity: &Rc<RefCell<dyn MovableEntity>>,
        now: u32,
    ) -> Self {
        let (stream_id, direction, speed, stream_xy) = {
            let stream = stream.borrow();
            (stream.id, stream.direction, stream.speed, stream.xy())
        };
        let (entity_id, entity_xy) = {
            let entity = entity.borrow();
            (entity.id(), entity.xy())
        };

        let dxy = direction.to_xy_move();
        let target = if direction.is_diagonal() {
            entity_xy + dxy * STREAM_DISTANCE
        } else if dxy.x != 0 {
            IVec2::new(stream_xy.x + dxy.x * STREAM_DISTANCE, entity_xy.y)
        } else {
            IVec2::new(entity_xy.x, stream_xy.y + dxy.y * STREAM_DISTANCE)
        };
        let delay = stream_step_delay(direction, speed);

        Self {
            stream: Rc::downgrade(stream),
            entity: Rc::downgrade(entity),
            stream_id,
            entity_id,
            dxy,
            target,
            delay,
            next_move_date: now + delay,
            active: true,
            suspended: false,
            when_suspended: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stream_id(&self) -> EntityId {
        self.stream_id
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn target(&self) -> IVec2 {
        self.target
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn next_move_date(&self) -> u32 {
        self.next_move_date
    }

    pub fn update(&mut self, now: u32, map: &mut dyn Playfield) {
        if !self.active {
            return;
        }

        let (Some(stream), Some(entity)) = (self.stream.upgrade(), self.entity.upgrade()) else {
            self.active = false;
            return;
        };
        let stream = stream.borrow();
        if stream.being_removed || !stream.enabled {
            self.active = false;
            return;
        }
        let Ok(mut entity) = entity.try_borrow_mut() else {
            // Being updated by someone else this tick
            return;
        };
        if entity.is_being_removed() || !entity.is_enabled() {
            self.active = false;
            return;
        }

        // Left a free stream, unless almost arrived
        if stream.allow_movement
            && !stream.bounding_box.contains_point(entity.ground_point())
            && distance(entity.xy(), self.target) > ESCAPE_DISTANCE
        {
            self.active = false;
            return;
        }

        if self.suspended {
            return;
        }

        while self.active && now >= self.next_move_date {
            self.next_move_date += self.delay;

            let moved = entity.bounding_box().translated(self.dxy);
            if map.test_collision_with_obstacles(entity.layer(), &moved, entity.obstacle_rules()) {
                // A blocking stream cannot be half done
                if !stream.allow_movement {
                    self.active = false;
                }
                break;
            }

            let xy = entity.xy() + self.dxy;
            entity.set_xy(xy, map);
            if self.has_reached_target(xy) {
                self.active = false;
            }
        }
    }

    /// Both axes must be done. An axis the stream does not move along
    /// always is.
    fn has_reached_target(&self, xy: IVec2) -> bool {
        let reached = |step: i32, position: i32, target: i32| {
            step == 0 || (step > 0 && position >= target) || (step < 0 && position <= target)
        };
        reached(self.dxy.x, xy.x, self.target.x) && reached(self.dxy.y, xy.y, self.target.y)
    }

    /// Pause or resume. Resuming shifts the next step by the paused time.
    pub fn set_suspended(&mut self, suspended: bool, now: u32) {
        if suspended == self.suspended {
            return;
        }
        self.suspended = suspended;
        if suspended {
            self.when_suspended = now;
        } else {
            self.next_move_date += now.saturating_sub(self.when_suspended);
        }
    }
}
