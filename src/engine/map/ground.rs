// Terrain classification of map points

/// Kind of terrain at a point of the map, independent of the tile graphics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ground {
    /// Normal walkable ground
    #[default]
    Traversable,
    /// Fully blocking wall
    Wall,
    /// Wall that only blocks walking entities (projectiles fly over it)
    LowWall,
    /// Diagonal wall: the upper-right half of the cell blocks
    WallTopRight,
    /// Diagonal wall: the upper-left half of the cell blocks
    WallTopLeft,
    /// Diagonal wall: the lower-left half of the cell blocks
    WallBottomLeft,
    /// Diagonal wall: the lower-right half of the cell blocks
    WallBottomRight,
    /// Diagonal wall, upper-right half, the other half is deep water
    WallTopRightWater,
    /// Diagonal wall, upper-left half, the other half is deep water
    WallTopLeftWater,
    /// Diagonal wall, lower-left half, the other half is deep water
    WallBottomLeftWater,
    /// Diagonal wall, lower-right half, the other half is deep water
    WallBottomRightWater,
    DeepWater,
    ShallowWater,
    Hole,
    Lava,
    Prickle,
    Ice,
    Grass,
    Ladder,
    /// Nothing on this layer: look at the layer below
    Empty,
}

impl Ground {
    /// Every wall category, diagonal ones included
    pub fn is_wall(self) -> bool {
        matches!(
            self,
            Self::Wall
                | Self::LowWall
                | Self::WallTopRight
                | Self::WallTopLeft
                | Self::WallBottomLeft
                | Self::WallBottomRight
                | Self::WallTopRightWater
                | Self::WallTopLeftWater
                | Self::WallBottomLeftWater
                | Self::WallBottomRightWater
        )
    }

    pub fn is_diagonal_wall(self) -> bool {
        self.is_wall() && !matches!(self, Self::Wall | Self::LowWall)
    }

    /// Ground where the hero may be brought back after falling or drowning
    pub fn is_solid(self) -> bool {
        !matches!(
            self,
            Self::DeepWater | Self::Hole | Self::Lava | Self::Prickle | Self::Empty
        )
    }

    /// Ground where landing after a floor descent makes a sound
    pub fn is_landing_ground(self) -> bool {
        matches!(self, Self::Traversable | Self::Grass | Self::Ladder)
    }

    /// Whether pixel (`px`, `py`) of a cell is blocked by this diagonal wall.
    ///
    /// `px` and `py` are local to the cell, in `0..size`.
    pub fn blocks_cell_pixel(self, px: i32, py: i32, size: i32) -> bool {
        let last = size - 1;
        match self {
            Self::WallTopRight | Self::WallTopRightWater => px >= py,
            Self::WallTopLeft | Self::WallTopLeftWater => px + py <= last,
            Self::WallBottomLeft | Self::WallBottomLeftWater => px <= py,
            Self::WallBottomRight | Self::WallBottomRightWater => px + py >= last,
            Self::Wall | Self::LowWall => true,
            _ => false,
        }
    }

    /// ASCII glyph used by map layouts
    pub fn from_glyph(glyph: char) -> Option<Self> {
        let ground = match glyph {
            '.' => Self::Traversable,
            '#' => Self::Wall,
            'L' => Self::LowWall,
            '7' => Self::WallTopRight,
            'F' => Self::WallTopLeft,
            'J' => Self::WallBottomLeft,
            'j' => Self::WallBottomRight,
            '9' => Self::WallTopRightWater,
            'f' => Self::WallTopLeftWater,
            'b' => Self::WallBottomLeftWater,
            'd' => Self::WallBottomRightWater,
            'W' => Self::DeepWater,
            'w' => Self::ShallowWater,
            'O' => Self::Hole,
            'l' => Self::Lava,
            '*' => Self::Prickle,
            'I' => Self::Ice,
            '"' => Self::Grass,
            'H' => Self::Ladder,
            ' ' => Self::Empty,
            _ => return None,
        };
        Some(ground)
    }
}

/// Ground categories that block a given entity, beyond walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroundObstacles {
    pub deep_water: bool,
    pub shallow_water: bool,
    pub hole: bool,
    pub lava: bool,
    pub prickle: bool,
    pub ladder: bool,
}

impl GroundObstacles {
    /// Nothing but walls blocks
    pub const NONE: Self = Self {
        deep_water: false,
        shallow_water: false,
        hole: false,
        lava: false,
        prickle: false,
        ladder: false,
    };

    /// Usual rules for non-hero entities: they stay away from bad grounds
    pub const BAD_GROUNDS: Self = Self {
        deep_water: true,
        shallow_water: false,
        hole: true,
        lava: true,
        prickle: true,
        ladder: false,
    };

    pub fn blocks(&self, ground: Ground) -> bool {
        match ground {
            Ground::DeepWater => self.deep_water,
            Ground::ShallowWater => self.shallow_water,
            Ground::Hole => self.hole,
            Ground::Lava => self.lava,
            Ground::Prickle => self.prickle,
            Ground::Ladder => self.ladder,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_categories() {
        assert!(Ground::Wall.is_wall());
        assert!(Ground::WallBottomRightWater.is_wall());
        assert!(Ground::WallTopLeft.is_diagonal_wall());
        assert!(!Ground::Wall.is_diagonal_wall());
        assert!(!Ground::Hole.is_wall());
    }

    #[test]
    fn test_solid_grounds() {
        assert!(Ground::Traversable.is_solid());
        assert!(Ground::Ice.is_solid());
        assert!(Ground::ShallowWater.is_solid());
        assert!(!Ground::Hole.is_solid());
        assert!(!Ground::Empty.is_solid());
        assert!(!Ground::Prickle.is_solid());
    }

    #[test]
    fn test_diagonal_wall_pixels() {
        // Upper-right triangle
        assert!(Ground::WallTopRight.blocks_cell_pixel(7, 0, 8));
        assert!(!Ground::WallTopRight.blocks_cell_pixel(0, 7, 8));
        // Lower-right triangle
        assert!(Ground::WallBottomRight.blocks_cell_pixel(7, 7, 8));
        assert!(!Ground::WallBottomRight.blocks_cell_pixel(0, 0, 8));
        assert!(!Ground::Traversable.blocks_cell_pixel(3, 3, 8));
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(Ground::from_glyph('O'), Some(Ground::Hole));
        assert_eq!(Ground::from_glyph(' '), Some(Ground::Empty));
        assert_eq!(Ground::from_glyph('?'), None);
    }

    #[test]
    fn test_ground_obstacles() {
        assert!(!GroundObstacles::NONE.blocks(Ground::Hole));
        assert!(GroundObstacles::BAD_GROUNDS.blocks(Ground::Lava));
        assert!(!GroundObstacles::BAD_GROUNDS.blocks(Ground::Ice));
    }
}
