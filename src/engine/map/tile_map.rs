// Grid map of 8x8 ground cells with registered entity obstacles

use std::collections::HashMap;

use super::collision::{CollisionGroups, EntityId, ObstacleRules};
use super::ground::Ground;
use super::{Layer, Playfield};
use crate::core::Rect;

/// Side of a ground cell in pixels
pub const CELL_SIZE: i32 = 8;

/// Map layout errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("Unknown ground glyph '{glyph}' on layer {layer}, row {row}, column {column}")]
    UnknownGlyph {
        glyph: char,
        layer: usize,
        row: usize,
        column: usize,
    },

    #[error("Row {row} of layer {layer} has {found} cells, expected {expected}")]
    RaggedRow {
        layer: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Layer {0} is empty")]
    EmptyLayer(usize),

    #[error("Layer {layer} is {found_width}x{found_height} cells, expected {width}x{height}")]
    SizeMismatch {
        layer: usize,
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },

    #[error("A map has at most {max} layers, got {found}", max = Layer::COUNT)]
    TooManyLayers { found: usize },
}

/// An entity registered on the map as a potential obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapObstacle {
    pub id: EntityId,
    pub layer: Layer,
    pub bounding_box: Rect,
    pub group: CollisionGroups,
}

/// Grid map made of 8x8 ground cells on up to three layers
#[derive(Debug, Clone)]
pub struct TileMap {
    /// Width in cells
    width8: usize,

    /// Height in cells
    height8: usize,

    /// Ground cells of each layer, row-major
    layers: [Vec<Ground>; Layer::COUNT],

    /// Entities that may block others
    obstacles: Vec<MapObstacle>,

    /// Layer of every entity the map was told about
    entity_layers: HashMap<EntityId, Layer>,
}

impl TileMap {
    /// Create a map whose low layer is traversable and upper layers empty
    pub fn new(width8: usize, height8: usize) -> Self {
        let cells = width8 * height8;
        Self {
            width8,
            height8,
            layers: [
                vec![Ground::Traversable; cells],
                vec![Ground::Empty; cells],
                vec![Ground::Empty; cells],
            ],
            obstacles: Vec::new(),
            entity_layers: HashMap::new(),
        }
    }

    /// Build a map from ASCII rows, one slice of rows per layer starting
    /// from the low layer. Each glyph is one 8x8 cell.
    pub fn from_rows(layers: &[&[&str]]) -> Result<Self, MapError> {
        if layers.len() > Layer::COUNT {
            return Err(MapError::TooManyLayers {
                found: layers.len(),
            });
        }

        let first = layers.first().ok_or(MapError::EmptyLayer(0))?;
        let height8 = first.len();
        let width8 = first.first().map(|row| row.chars().count()).unwrap_or(0);
        if height8 == 0 || width8 == 0 {
            return Err(MapError::EmptyLayer(0));
        }

        let mut map = Self::new(width8, height8);
        for (layer_index, rows) in layers.iter().enumerate() {
            let found_width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
            if rows.len() != height8 || found_width != width8 {
                return Err(MapError::SizeMismatch {
                    layer: layer_index,
                    width: width8,
                    height: height8,
                    found_width,
                    found_height: rows.len(),
                });
            }

            let mut cells = Vec::with_capacity(width8 * height8);
            for (row_index, row) in rows.iter().enumerate() {
                let found = row.chars().count();
                if found != width8 {
                    return Err(MapError::RaggedRow {
                        layer: layer_index,
                        row: row_index,
                        expected: width8,
                        found,
                    });
                }
                for (column, glyph) in row.chars().enumerate() {
                    let ground = Ground::from_glyph(glyph).ok_or(MapError::UnknownGlyph {
                        glyph,
                        layer: layer_index,
                        row: row_index,
                        column,
                    })?;
                    cells.push(ground);
                }
            }
            map.layers[layer_index] = cells;
        }

        Ok(map)
    }

    /// Width in cells
    pub fn width8(&self) -> usize {
        self.width8
    }

    /// Height in cells
    pub fn height8(&self) -> usize {
        self.height8
    }

    fn cell_index(&self, cell_x: i32, cell_y: i32) -> Option<usize> {
        if cell_x < 0 || cell_y < 0 {
            return None;
        }
        let (cx, cy) = (cell_x as usize, cell_y as usize);
        (cx < self.width8 && cy < self.height8).then(|| cy * self.width8 + cx)
    }

    /// Ground of a cell (cell coordinates, not pixels)
    pub fn cell_ground(&self, layer: Layer, cell_x: i32, cell_y: i32) -> Ground {
        self.cell_index(cell_x, cell_y)
            .map(|i| self.layers[layer.index()][i])
            .unwrap_or(Ground::Empty)
    }

    /// Change the ground of a cell. Cells outside the map are ignored.
    pub fn set_cell_ground(&mut self, layer: Layer, cell_x: i32, cell_y: i32, ground: Ground) {
        if let Some(i) = self.cell_index(cell_x, cell_y) {
            self.layers[layer.index()][i] = ground;
        }
    }

    /// Change the ground of every cell overlapping `area` (pixels)
    pub fn fill(&mut self, layer: Layer, area: Rect, ground: Ground) {
        for cell_y in area.y.div_euclid(CELL_SIZE)..=(area.bottom() - 1).div_euclid(CELL_SIZE) {
            for cell_x in area.x.div_euclid(CELL_SIZE)..=(area.right() - 1).div_euclid(CELL_SIZE) {
                self.set_cell_ground(layer, cell_x, cell_y, ground);
            }
        }
    }

    /// Register an entity that may block others
    pub fn add_obstacle(
        &mut self,
        id: EntityId,
        layer: Layer,
        bounding_box: Rect,
        group: CollisionGroups,
    ) {
        self.remove_entity(id);
        self.obstacles.push(MapObstacle {
            id,
            layer,
            bounding_box,
            group,
        });
        self.entity_layers.insert(id, layer);
    }

    /// Forget everything about an entity
    pub fn remove_entity(&mut self, id: EntityId) {
        self.obstacles.retain(|o| o.id != id);
        self.entity_layers.remove(&id);
    }

    /// Layer of an entity the map knows about
    pub fn entity_layer(&self, id: EntityId) -> Option<Layer> {
        self.entity_layers.get(&id).copied()
    }

    /// Registered obstacle of an entity
    pub fn obstacle(&self, id: EntityId) -> Option<&MapObstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Whether a box leaves the map
    pub fn test_collision_with_border(&self, rect: &Rect) -> bool {
        rect.x < 0 || rect.y < 0 || rect.right() > self.width() || rect.bottom() > self.height()
    }

    /// Whether a box overlaps ground that blocks `entity`
    pub fn test_collision_with_ground(
        &self,
        layer: Layer,
        rect: &Rect,
        entity: &dyn ObstacleRules,
    ) -> bool {
        if rect.width <= 0 || rect.height <= 0 {
            return false;
        }

        let first_cx = rect.x.div_euclid(CELL_SIZE);
        let last_cx = (rect.right() - 1).div_euclid(CELL_SIZE);
        let first_cy = rect.y.div_euclid(CELL_SIZE);
        let last_cy = (rect.bottom() - 1).div_euclid(CELL_SIZE);

        for cy in first_cy..=last_cy {
            for cx in first_cx..=last_cx {
                let ground = self.cell_ground(layer, cx, cy);
                if !entity.is_ground_obstacle(ground) {
                    continue;
                }
                if !ground.is_diagonal_wall() {
                    return true;
                }

                // Pixel-precise test on the part of the box inside this cell
                let (cell_left, cell_top) = (cx * CELL_SIZE, cy * CELL_SIZE);
                let x_range = rect.x.max(cell_left)..rect.right().min(cell_left + CELL_SIZE);
                let y_range = rect.y.max(cell_top)..rect.bottom().min(cell_top + CELL_SIZE);
                for py in y_range {
                    for px in x_range.clone() {
                        if ground.blocks_cell_pixel(px - cell_left, py - cell_top, CELL_SIZE) {
                            return true;
                        }
                    }
                }
            }
        }

        false
    }

    /// Whether a box overlaps a registered entity that blocks `entity`
    pub fn test_collision_with_entities(
        &self,
        layer: Layer,
        rect: &Rect,
        entity: &dyn ObstacleRules,
    ) -> bool {
        let id = entity.entity_id();
        let group = entity.collision_group();
        self.obstacles.iter().any(|o| {
            o.id != id && o.layer == layer && o.group.blocks(group) && o.bounding_box.overlaps(rect)
        })
    }
}

impl Playfield for TileMap {
    fn width(&self) -> i32 {
        self.width8 as i32 * CELL_SIZE
    }

    fn height(&self) -> i32 {
        self.height8 as i32 * CELL_SIZE
    }

    fn ground(&self, layer: Layer, x: i32, y: i32) -> Ground {
        self.cell_ground(layer, x.div_euclid(CELL_SIZE), y.div_euclid(CELL_SIZE))
    }

    fn test_collision_with_obstacles(
        &self,
        layer: Layer,
        rect: &Rect,
        entity: &dyn ObstacleRules,
    ) -> bool {
        self.test_collision_with_border(rect)
            || self.test_collision_with_ground(layer, rect, entity)
            || self.test_collision_with_entities(layer, rect, entity)
    }

    fn set_entity_layer(&mut self, id: EntityId, layer: Layer) {
        self.entity_layers.insert(id, layer);
        if let Some(obstacle) = self.obstacles.iter_mut().find(|o| o.id == id) {
            obstacle.layer = layer;
        }
    }

    fn set_entity_bounding_box(&mut self, id: EntityId, rect: Rect) {
        if let Some(obstacle) = self.obstacles.iter_mut().find(|o| o.id == id) {
            obstacle.bounding_box = rect;
        }
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new(40, 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::map::GroundObstacles;

    struct Walker {
        id: EntityId,
        obstacles: GroundObstacles,
    }

    impl ObstacleRules for Walker {
        fn entity_id(&self) -> EntityId {
            self.id
        }

        fn collision_group(&self) -> CollisionGroups {
            CollisionGroups::Hero
        }

        fn ground_obstacles(&self) -> GroundObstacles {
            self.obstacles
        }
    }

    fn walker() -> Walker {
        Walker {
            id: 1,
            obstacles: GroundObstacles::NONE,
        }
    }

    #[test]
    fn test_from_rows() {
        let map = TileMap::from_rows(&[&["..#", ".OI"]]).unwrap();
        assert_eq!(map.width(), 24);
        assert_eq!(map.height(), 16);
        assert_eq!(map.ground(Layer::Low, 17, 0), Ground::Wall);
        assert_eq!(map.ground(Layer::Low, 8, 8), Ground::Hole);
        assert_eq!(map.ground(Layer::Low, 23, 15), Ground::Ice);
        // Upper layers default to empty
        assert_eq!(map.ground(Layer::High, 0, 0), Ground::Empty);
    }

    #[test]
    fn test_from_rows_errors() {
        assert_eq!(
            TileMap::from_rows(&[&["..", ".?"]]).unwrap_err(),
            MapError::UnknownGlyph {
                glyph: '?',
                layer: 0,
                row: 1,
                column: 1
            }
        );
        assert!(matches!(
            TileMap::from_rows(&[&["..", "."]]),
            Err(MapError::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            TileMap::from_rows(&[&[".."], &["..", ".."]]),
            Err(MapError::SizeMismatch { layer: 1, .. })
        ));
        assert_eq!(TileMap::from_rows(&[]).unwrap_err(), MapError::EmptyLayer(0));
    }

    #[test]
    fn test_border_collision() {
        let map = TileMap::new(4, 4);
        let w = walker();
        assert!(!map.test_collision_with_obstacles(Layer::Low, &Rect::new(0, 0, 16, 16), &w));
        assert!(map.test_collision_with_obstacles(Layer::Low, &Rect::new(-1, 0, 16, 16), &w));
        assert!(map.test_collision_with_obstacles(Layer::Low, &Rect::new(17, 0, 16, 16), &w));
    }

    #[test]
    fn test_wall_collision() {
        let map = TileMap::from_rows(&[&["....", "..#.", "....", "...."]]).unwrap();
        let w = walker();
        assert!(map.test_collision_with_obstacles(Layer::Low, &Rect::new(4, 4, 16, 16), &w));
        assert!(!map.test_collision_with_obstacles(Layer::Low, &Rect::new(0, 16, 16, 16), &w));
    }

    #[test]
    fn test_diagonal_wall_collision() {
        // Upper-right half of cell (1, 0) blocks
        let map = TileMap::from_rows(&[&[".7..", "....", "...."]]).unwrap();
        let w = walker();
        // A pixel in the lower-left half passes
        assert!(!map.test_point_collision(Layer::Low, glam::IVec2::new(9, 6), &w));
        // A pixel in the upper-right half blocks
        assert!(map.test_point_collision(Layer::Low, glam::IVec2::new(14, 1), &w));
    }

    #[test]
    fn test_ground_obstacles_depend_on_entity() {
        let map = TileMap::from_rows(&[&["..O.", "....", "...."]]).unwrap();
        let hero = walker();
        let careful = Walker {
            id: 2,
            obstacles: GroundObstacles::BAD_GROUNDS,
        };
        let rect = Rect::new(16, 0, 8, 8);
        assert!(!map.test_collision_with_obstacles(Layer::Low, &rect, &hero));
        assert!(map.test_collision_with_obstacles(Layer::Low, &rect, &careful));
    }

    #[test]
    fn test_entity_obstacles() {
        let mut map = TileMap::new(8, 8);
        map.add_obstacle(7, Layer::Low, Rect::new(16, 16, 16, 16), CollisionGroups::Npc);
        let w = walker();
        assert!(map.test_collision_with_obstacles(Layer::Low, &Rect::new(10, 10, 8, 8), &w));
        // Other layers are not affected
        assert!(!map.test_collision_with_obstacles(Layer::High, &Rect::new(10, 10, 8, 8), &w));

        map.set_entity_layer(7, Layer::High);
        assert!(map.test_collision_with_obstacles(Layer::High, &Rect::new(10, 10, 8, 8), &w));
        assert_eq!(map.entity_layer(7), Some(Layer::High));

        map.set_entity_bounding_box(7, Rect::new(40, 40, 8, 8));
        assert!(!map.test_collision_with_obstacles(Layer::High, &Rect::new(10, 10, 8, 8), &w));

        map.remove_entity(7);
        assert!(map.obstacle(7).is_none());
    }

    #[test]
    fn test_entity_never_blocks_itself() {
        let mut map = TileMap::new(8, 8);
        map.add_obstacle(1, Layer::Low, Rect::new(16, 16, 16, 16), CollisionGroups::Block);
        let w = walker();
        assert!(!map.test_collision_with_obstacles(Layer::Low, &Rect::new(16, 16, 16, 16), &w));
    }

    #[test]
    fn test_fill() {
        let mut map = TileMap::new(4, 4);
        map.fill(Layer::Low, Rect::new(8, 8, 16, 8), Ground::Ice);
        assert_eq!(map.ground(Layer::Low, 8, 8), Ground::Ice);
        assert_eq!(map.ground(Layer::Low, 23, 15), Ground::Ice);
        assert_eq!(map.ground(Layer::Low, 24, 8), Ground::Traversable);
    }
}
