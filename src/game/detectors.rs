// Map features the hero reacts to when touching them

use glam::IVec2;

use crate::core::{Direction4, Direction8, Rect};
use crate::engine::map::{EntityId, Layer};

/// Size of conveyor belts and stairs
pub const DETECTOR_SIZE: i32 = 16;

/// A conveyor belt carrying the hero 16 pixels in its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConveyorBelt {
    pub id: EntityId,
    pub bounding_box: Rect,
    pub layer: Layer,
    pub direction: Direction8,
}

impl ConveyorBelt {
    pub fn new(id: EntityId, x: i32, y: i32, layer: Layer, direction: Direction8) -> Self {
        Self {
            id,
            bounding_box: Rect::new(x, y, DETECTOR_SIZE, DETECTOR_SIZE),
            layer,
            direction,
        }
    }

    /// Path followed by an entity carried by this belt
    pub fn path(&self) -> Vec<Direction8> {
        vec![self.direction; 2]
    }
}

/// Direction in which stairs are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StairsWay {
    /// Going up, or entering the stairs from their bottom
    Normal,
    Reverse,
}

/// Stairs, either between two floors of a map or inside a single floor
/// (from one layer to the one above)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stairs {
    pub id: EntityId,
    pub bounding_box: Rect,
    pub layer: Layer,
    pub direction: Direction4,
    pub inside_floor: bool,
}

impl Stairs {
    pub fn new(
        id: EntityId,
        x: i32,
        y: i32,
        layer: Layer,
        direction: Direction4,
        inside_floor: bool,
    ) -> Self {
        Self {
            id,
            bounding_box: Rect::new(x, y, DETECTOR_SIZE, DETECTOR_SIZE),
            layer,
            direction,
            inside_floor,
        }
    }

    pub fn movement_direction(&self, way: StairsWay) -> Direction8 {
        let direction = self.direction.to_direction8();
        match way {
            StairsWay::Normal => direction,
            StairsWay::Reverse => direction.opposite(),
        }
    }

    /// Two 8-pixel steps through the stairs
    pub fn path(&self, way: StairsWay) -> Vec<Direction8> {
        vec![self.movement_direction(way); 2]
    }
}

/// A treasure given to the hero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treasure {
    pub item: String,
    pub variant: u32,
}

impl Treasure {
    pub fn new(item: &str, variant: u32) -> Self {
        Self {
            item: item.to_string(),
            variant,
        }
    }
}

/// Something lifted and carried above the hero's head (pot, bush, stone)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriedItem {
    pub name: String,
    /// Damage dealt to enemies when thrown
    pub damage: i32,
}

impl CarriedItem {
    pub fn new(name: &str, damage: i32) -> Self {
        Self {
            name: name.to_string(),
            damage,
        }
    }
}

/// Top-left corner of a 16x16 detector for an entity standing on it with
/// the usual (8, 13) origin
pub fn detector_xy(bounding_box: &Rect, origin: IVec2) -> IVec2 {
    bounding_box.xy() + origin
}
