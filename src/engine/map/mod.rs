// Playfield: ground classification and collision oracle
//
// The hero and every movable entity only see the map through the
// `Playfield` trait:
// - `ground`: terrain category of a point on a layer
// - `test_collision_with_obstacles`: whether a box overlaps a wall, a
//   blocking ground or a blocking entity, from the point of view of the
//   entity that wants to move there
// - `set_entity_layer` / `set_entity_bounding_box`: keep the map's view of
//   registered entities in sync when they move
//
// `TileMap` is the concrete grid implementation used by the game and tests.

mod collision;
mod ground;
mod tile_map;

pub use collision::{CollisionGroups, EntityId, ObstacleRules};
pub use ground::{Ground, GroundObstacles};
pub use tile_map::{MapError, MapObstacle, TileMap, CELL_SIZE};

use crate::core::Rect;
use glam::IVec2;

/// Discrete vertical stacking index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Layer {
    #[default]
    Low = 0,
    Intermediate = 1,
    High = 2,
}

impl Layer {
    pub const COUNT: usize = 3;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Low),
            1 => Some(Self::Intermediate),
            2 => Some(Self::High),
            _ => None,
        }
    }

    /// The layer right below, if any
    pub fn below(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// The layer right above, if any
    pub fn above(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

/// Read and write access to the world geometry
pub trait Playfield {
    /// Map width in pixels
    fn width(&self) -> i32;

    /// Map height in pixels
    fn height(&self) -> i32;

    /// Terrain category at a pixel of a layer
    fn ground(&self, layer: Layer, x: i32, y: i32) -> Ground;

    /// Whether `rect` overlaps an obstacle for `entity` on `layer`
    fn test_collision_with_obstacles(
        &self,
        layer: Layer,
        rect: &Rect,
        entity: &dyn ObstacleRules,
    ) -> bool;

    /// Whether a single pixel is an obstacle for `entity`
    fn test_point_collision(&self, layer: Layer, point: IVec2, entity: &dyn ObstacleRules) -> bool {
        self.test_collision_with_obstacles(layer, &Rect::point(point.x, point.y), entity)
    }

    /// Move a registered entity to another layer
    fn set_entity_layer(&mut self, id: EntityId, layer: Layer);

    /// Update the box of a registered entity after it moved
    fn set_entity_bounding_box(&mut self, id: EntityId, rect: Rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_navigation() {
        assert_eq!(Layer::Low.below(), None);
        assert_eq!(Layer::Intermediate.below(), Some(Layer::Low));
        assert_eq!(Layer::High.above(), None);
        assert_eq!(Layer::Low.above(), Some(Layer::Intermediate));
        assert!(Layer::High > Layer::Low);
    }
}
