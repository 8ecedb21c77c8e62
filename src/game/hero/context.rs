// Hero data shared with the behavior states
//
// `HeroCore` is everything about the hero except its active state. States
// receive it in each callback, so they can move the hero, change its speed
// or queue the next state without borrowing themselves.

use std::collections::VecDeque;

use glam::IVec2;

use crate::core::{Direction4, Direction8, Rect};
use crate::engine::input::CommandState;
use crate::engine::map::{
    CollisionGroups, EntityId, Ground, GroundObstacles, Layer, ObstacleRules, Playfield,
};
use crate::engine::movement::Movement;

use super::equipment::Equipment;
use super::events::{HeroEvent, HeroEventQueue};
use super::sprites::HeroSprites;
use super::state::HeroState;
use super::states::{
    BackToSolidGroundState, FallingState, FreeState, JumpingState, PlungingState,
};
use super::stats::HeroStats;

/// Life lost when walking on prickles or falling into a hole
pub const BAD_GROUND_DAMAGE: i32 = 2;

pub struct HeroCore {
    pub(super) id: EntityId,
    pub(super) bounding_box: Rect,
    pub(super) layer: Layer,

    /// Date of the current tick in milliseconds
    pub(super) now: u32,
    pub(super) suspended: bool,
    pub(super) when_suspended: u32,

    pub stats: HeroStats,
    pub equipment: Equipment,
    pub commands: CommandState,
    pub sprites: HeroSprites,

    pub(super) movement: Option<Movement>,
    pub(super) walking_speed: i32,
    pub(super) normal_walking_speed: i32,

    // Ground
    pub(super) ground_below: Ground,
    /// Next evaluation of the ground effects
    pub(super) next_ground_date: u32,
    /// Next change of the ice slide
    pub(super) next_ice_date: u32,
    /// Last direction committed on ice
    pub(super) ice_direction8: Option<Direction8>,
    /// Extra displacement imposed by the ground (ice slide, hole pull)
    pub(super) ground_dxy: IVec2,

    pub(super) last_solid_ground: Option<(IVec2, Layer)>,
    /// Solid ground set by the quest, used instead of the last one
    pub(super) target_solid_ground: Option<(IVec2, Layer)>,

    /// Obstacle rules of the active state
    pub(super) ground_obstacles: GroundObstacles,

    /// States queued by callbacks, started once the callback returns
    pub(super) pending: VecDeque<Box<dyn HeroState>>,
    pub(super) events: HeroEventQueue,
    pub(super) facing_point: Rect,

    pub(super) position_changed_pending: bool,
    pub(super) walking_speed_changed_pending: bool,
    pub(super) movement_changed_pending: bool,
    pub(super) game_over_started: bool,
}

impl HeroCore {
    pub fn new(id: EntityId, xy: IVec2, layer: Layer, stats: HeroStats, now: u32) -> Self {
        let bounding_box = Rect::new(
            xy.x - stats.origin.x,
            xy.y - stats.origin.y,
            stats.size.x,
            stats.size.y,
        );
        Self {
            id,
            bounding_box,
            layer,
            now,
            suspended: false,
            when_suspended: 0,
            equipment: Equipment::new(stats.max_life),
            commands: CommandState::new(),
            sprites: HeroSprites::with_standard_animations(),
            movement: None,
            walking_speed: stats.normal_walking_speed,
            normal_walking_speed: stats.normal_walking_speed,
            ground_below: Ground::Traversable,
            next_ground_date: now,
            next_ice_date: now,
            ice_direction8: None,
            ground_dxy: IVec2::ZERO,
            last_solid_ground: None,
            target_solid_ground: None,
            ground_obstacles: GroundObstacles::NONE,
            pending: VecDeque::new(),
            events: HeroEventQueue::new(),
            facing_point: Rect::point(0, 0),
            position_changed_pending: false,
            walking_speed_changed_pending: false,
            movement_changed_pending: false,
            game_over_started: false,
            stats,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Origin point (the feet)
    pub fn xy(&self) -> IVec2 {
        self.bounding_box.xy() + self.stats.origin
    }

    /// Teleport the hero. Listeners are notified once the current callback
    /// returns.
    pub fn set_xy(&mut self, xy: IVec2) {
        self.bounding_box.set_xy(xy - self.stats.origin);
        self.position_changed_pending = true;
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn center_point(&self) -> IVec2 {
        self.bounding_box.center()
    }

    /// Point where the ground below the hero is sampled
    pub fn ground_point(&self) -> IVec2 {
        self.xy() - IVec2::new(0, 2)
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn set_layer(&mut self, layer: Layer, map: &mut dyn Playfield) {
        if layer == self.layer {
            return;
        }
        self.layer = layer;
        map.set_entity_layer(self.id, layer);
        self.events.push(HeroEvent::LayerChanged { layer });
    }

    pub fn now(&self) -> u32 {
        self.now
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn when_suspended(&self) -> u32 {
        self.when_suspended
    }

    /// Time spent suspended, once resumed
    pub fn suspended_duration(&self) -> u32 {
        self.now.saturating_sub(self.when_suspended)
    }

    pub fn animation_direction(&self) -> Direction4 {
        self.sprites.animation_direction()
    }

    // Movement

    pub fn movement(&self) -> Option<&Movement> {
        self.movement.as_ref()
    }

    pub fn movement_mut(&mut self) -> Option<&mut Movement> {
        self.movement.as_mut()
    }

    pub fn set_movement(&mut self, mut movement: Movement) {
        if self.suspended {
            movement.set_suspended(true, self.now);
        }
        self.movement = Some(movement);
        self.movement_changed_pending = true;
    }

    pub fn clear_movement(&mut self) {
        if self.movement.take().is_some() {
            self.movement_changed_pending = true;
        }
    }

    pub fn walking_speed(&self) -> i32 {
        self.walking_speed
    }

    pub fn normal_walking_speed(&self) -> i32 {
        self.normal_walking_speed
    }

    pub fn set_walking_speed(&mut self, speed: i32) {
        if speed != self.walking_speed {
            self.walking_speed = speed;
            self.walking_speed_changed_pending = true;
        }
    }

    // Ground

    pub fn ground_below(&self) -> Ground {
        self.ground_below
    }

    pub fn ground_dxy(&self) -> IVec2 {
        self.ground_dxy
    }

    pub fn last_solid_ground(&self) -> Option<(IVec2, Layer)> {
        self.last_solid_ground
    }

    pub fn target_solid_ground(&self) -> Option<(IVec2, Layer)> {
        self.target_solid_ground
    }

    // Facing point

    pub fn facing_point(&self) -> Rect {
        self.facing_point
    }

    /// Recompute the point in front of the hero from the sprite direction
    pub fn update_facing_point(&mut self) {
        let b = self.bounding_box;
        let (x, y) = match self.sprites.animation_direction() {
            Direction4::RIGHT => (b.right(), b.y + b.height / 2),
            Direction4::UP => (b.x + b.width / 2, b.y - 1),
            Direction4::LEFT => (b.x - 1, b.y + b.height / 2),
            _ => (b.x + b.width / 2, b.bottom()),
        };
        self.facing_point = Rect::point(x, y);
    }

    pub fn is_facing_obstacle(&self, map: &dyn Playfield) -> bool {
        map.test_collision_with_obstacles(self.layer, &self.facing_point, self)
    }

    // Notifications

    pub fn push_event(&mut self, event: HeroEvent) {
        self.events.push(event);
    }

    pub fn play_sound(&mut self, name: &'static str) {
        self.events.push(HeroEvent::SoundRequested(name));
    }

    // State starters usable from inside state callbacks

    /// Queue the next state
    pub fn set_state(&mut self, state: Box<dyn HeroState>) {
        self.pending.push_back(state);
    }

    pub fn start_free(&mut self) {
        self.set_state(Box::new(FreeState::new()));
    }

    pub fn start_falling(&mut self) {
        self.set_state(Box::new(FallingState::new()));
    }

    pub fn start_plunging(&mut self) {
        self.set_state(Box::new(PlungingState::new()));
    }

    /// Start the state matching the ground below, after a state that
    /// ignored the ground ends
    pub fn start_state_from_ground(&mut self) {
        match self.ground_below {
            Ground::DeepWater | Ground::Lava => self.start_plunging(),
            Ground::Hole => self.start_falling(),
            Ground::Prickle => {
                self.start_free();
                self.start_prickle(0);
            }
            Ground::ShallowWater => {
                self.start_shallow_water();
                self.start_free();
            }
            Ground::Grass => {
                self.start_grass();
                self.start_free();
            }
            _ => self.start_free(),
        }
    }

    /// Hurt by prickles, then brought back to solid ground
    pub fn start_prickle(&mut self, delay: u32) {
        self.play_sound("hero_hurt");
        self.equipment.remove_life(BAD_GROUND_DAMAGE);
        self.start_back_to_solid_ground(false, delay, false);
    }

    pub fn start_back_to_solid_ground(
        &mut self,
        use_memorized_xy: bool,
        end_delay: u32,
        with_sound: bool,
    ) {
        let state = BackToSolidGroundState::new(self, use_memorized_xy, end_delay, with_sound);
        self.set_state(Box::new(state));
    }

    pub fn start_jumping(
        &mut self,
        direction8: Direction8,
        distance: i32,
        ignore_obstacles: bool,
        with_sound: bool,
        movement_delay: u32,
    ) {
        self.set_state(Box::new(JumpingState::new(
            direction8,
            distance,
            ignore_obstacles,
            with_sound,
            movement_delay,
        )));
    }

    pub fn start_grass(&mut self) {
        self.start_slow_ground(Ground::Grass);
    }

    pub fn start_shallow_water(&mut self) {
        self.start_slow_ground(Ground::ShallowWater);
    }

    /// Show the ground under the hero and walk at 4/5 of the normal speed
    fn start_slow_ground(&mut self, ground: Ground) {
        self.sprites.create_ground(ground);
        self.set_walking_speed(self.normal_walking_speed * 4 / 5);
        self.next_ground_date = self.next_ground_date.max(self.now);
    }
}

impl ObstacleRules for HeroCore {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn collision_group(&self) -> CollisionGroups {
        CollisionGroups::Hero
    }

    fn ground_obstacles(&self) -> GroundObstacles {
        self.ground_obstacles
    }
}
