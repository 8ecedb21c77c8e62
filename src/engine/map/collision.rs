// Collision groups and per-entity obstacle rules

use super::ground::{Ground, GroundObstacles};

/// Unique identifier of an entity placed on the map
pub type EntityId = u32;

/// Collision groups for filtering which entities block each other
///
/// Each entity belongs to one group. Static obstacles registered on the map
/// only block the groups listed in their filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionGroups {
    /// Default group - blocks everything
    Default = 0b0000_0001,

    /// The hero
    Hero = 0b0000_0010,

    /// Enemies walking on the map
    Enemy = 0b0000_0100,

    /// Non-playing characters
    Npc = 0b0000_1000,

    /// Pushable or liftable blocks
    Block = 0b0001_0000,

    /// Projectiles (arrows, thrown items, etc.)
    Projectile = 0b0010_0000,

    /// Detectors (sensors, streams, conveyor belts) - never block
    Detector = 0b0100_0000,
}

impl CollisionGroups {
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Mask of the groups that an obstacle of this group blocks
    pub fn filter(self) -> u32 {
        match self {
            // The hero is solid for enemies and NPCs, not for projectiles
            // (those hurt him instead)
            CollisionGroups::Hero => {
                CollisionGroups::Enemy as u32
                    | CollisionGroups::Npc as u32
                    | CollisionGroups::Block as u32
            }

            CollisionGroups::Enemy => CollisionGroups::Npc as u32 | CollisionGroups::Block as u32,

            CollisionGroups::Npc => {
                CollisionGroups::Hero as u32
                    | CollisionGroups::Enemy as u32
                    | CollisionGroups::Npc as u32
                    | CollisionGroups::Block as u32
            }

            // Blocks stop everything that moves
            CollisionGroups::Block => {
                CollisionGroups::Hero as u32
                    | CollisionGroups::Enemy as u32
                    | CollisionGroups::Npc as u32
                    | CollisionGroups::Block as u32
                    | CollisionGroups::Projectile as u32
            }

            CollisionGroups::Projectile => 0,

            CollisionGroups::Detector => 0,

            CollisionGroups::Default => u32::MAX,
        }
    }

    /// Whether an obstacle of this group blocks an entity of group `other`
    pub fn blocks(self, other: CollisionGroups) -> bool {
        self.filter() & other.bits() != 0
    }
}

/// What an entity considers an obstacle when the map tests a move for it
pub trait ObstacleRules {
    /// Identity of the entity, so it never collides with itself
    fn entity_id(&self) -> EntityId;

    /// Group the entity belongs to
    fn collision_group(&self) -> CollisionGroups;

    /// Non-wall grounds that block this entity
    fn ground_obstacles(&self) -> GroundObstacles {
        GroundObstacles::BAD_GROUNDS
    }

    /// Whether low walls block this entity
    fn is_low_wall_obstacle(&self) -> bool {
        self.collision_group() != CollisionGroups::Projectile
    }

    /// Whether `ground` blocks this entity at all
    fn is_ground_obstacle(&self, ground: Ground) -> bool {
        match ground {
            Ground::LowWall => self.is_low_wall_obstacle(),
            g if g.is_wall() => true,
            g => self.ground_obstacles().blocks(g),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(CollisionGroups);

    impl ObstacleRules for Probe {
        fn entity_id(&self) -> EntityId {
            1
        }

        fn collision_group(&self) -> CollisionGroups {
            self.0
        }
    }

    #[test]
    fn test_collision_groups_bits() {
        // Ensure each group has a unique bit
        let groups = [
            CollisionGroups::Default,
            CollisionGroups::Hero,
            CollisionGroups::Enemy,
            CollisionGroups::Npc,
            CollisionGroups::Block,
            CollisionGroups::Projectile,
            CollisionGroups::Detector,
        ];

        for (i, group1) in groups.iter().enumerate() {
            for (j, group2) in groups.iter().enumerate() {
                if i != j {
                    assert_ne!(group1.bits(), group2.bits(), "Groups must have unique bits");
                }
            }
        }
    }

    #[test]
    fn test_hero_does_not_block_hero() {
        assert!(!CollisionGroups::Hero.blocks(CollisionGroups::Hero));
        assert!(CollisionGroups::Npc.blocks(CollisionGroups::Hero));
        assert!(CollisionGroups::Block.blocks(CollisionGroups::Hero));
    }

    #[test]
    fn test_detectors_never_block() {
        assert!(!CollisionGroups::Detector.blocks(CollisionGroups::Hero));
        assert!(!CollisionGroups::Detector.blocks(CollisionGroups::Block));
    }

    #[test]
    fn test_default_obstacle_rules() {
        let walker = Probe(CollisionGroups::Npc);
        assert!(walker.is_ground_obstacle(Ground::Wall));
        assert!(walker.is_ground_obstacle(Ground::LowWall));
        assert!(walker.is_ground_obstacle(Ground::Hole));
        assert!(!walker.is_ground_obstacle(Ground::Grass));

        let arrow = Probe(CollisionGroups::Projectile);
        assert!(!arrow.is_ground_obstacle(Ground::LowWall));
        assert!(arrow.is_ground_obstacle(Ground::WallTopLeft));
    }
}
