// Entities that other systems can move around the map

use glam::IVec2;

use crate::core::Rect;
use crate::engine::map::{CollisionGroups, EntityId, Layer, ObstacleRules, Playfield};

/// An entity with a position that may be displaced by the world (streams)
pub trait MovableEntity {
    fn id(&self) -> EntityId;

    /// Origin point
    fn xy(&self) -> IVec2;

    fn layer(&self) -> Layer;

    fn bounding_box(&self) -> Rect;

    /// Point where the ground below is sampled
    fn ground_point(&self) -> IVec2 {
        self.xy() - IVec2::new(0, 2)
    }

    fn is_enabled(&self) -> bool {
        true
    }

    /// Removal requested, the entity disappears at the end of the tick
    fn is_being_removed(&self) -> bool {
        false
    }

    /// How the map decides what blocks this entity
    fn obstacle_rules(&self) -> &dyn ObstacleRules;

    /// Move to a new origin point and notify whoever cares
    fn set_xy(&mut self, xy: IVec2, map: &mut dyn Playfield);
}

/// A plain entity with no behavior of its own (NPC, block, item on the
/// floor)
#[derive(Debug, Clone)]
pub struct SimpleEntity {
    pub id: EntityId,
    pub bounding_box: Rect,
    pub origin: IVec2,
    pub layer: Layer,
    pub group: CollisionGroups,
    pub enabled: bool,
    pub being_removed: bool,
}

impl SimpleEntity {
    /// A 16x16 entity with its origin at (8, 13), placed with its origin
    /// on `xy`
    pub fn new(id: EntityId, xy: IVec2, layer: Layer, group: CollisionGroups) -> Self {
        let origin = IVec2::new(8, 13);
        let top_left = xy - origin;
        Self {
            id,
            bounding_box: Rect::new(top_left.x, top_left.y, 16, 16),
            origin,
            layer,
            group,
            enabled: true,
            being_removed: false,
        }
    }

    pub fn remove(&mut self) {
        self.being_removed = true;
    }
}

impl ObstacleRules for SimpleEntity {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn collision_group(&self) -> CollisionGroups {
        self.group
    }
}

impl MovableEntity for SimpleEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn xy(&self) -> IVec2 {
        self.bounding_box.xy() + self.origin
    }

    fn layer(&self) -> Layer {
        self.layer
    }

    fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_being_removed(&self) -> bool {
        self.being_removed
    }

    fn obstacle_rules(&self) -> &dyn ObstacleRules {
        self
    }

    fn set_xy(&mut self, xy: IVec2, map: &mut dyn Playfield) {
        self.bounding_box.set_xy(xy - self.origin);
        map.set_entity_bounding_box(self.id, self.bounding_box);
    }
}
