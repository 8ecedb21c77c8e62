// Hero stats - fixed tuning of the hero's body and movements

use glam::IVec2;

/// Fixed hero configuration. Speeds are in pixels per second, durations in
/// milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroStats {
    // Body
    /// Size of the bounding box
    pub size: IVec2,
    /// Position of the origin point inside the bounding box
    pub origin: IVec2,

    // Movement
    /// Walking speed on normal ground
    pub normal_walking_speed: i32,
    /// Speed while running
    pub running_speed: i32,
    /// Time spent preparing to run before the hero starts moving
    pub running_prepare_delay: u32,
    /// Walking speed in deep water
    pub swimming_speed: i32,
    /// Speed of forced movements on stairs
    pub stairs_speed: i32,
    /// Speed of conveyor belts
    pub conveyor_belt_speed: i32,
    /// Speed of the flight back to solid ground
    pub back_to_solid_ground_speed: i32,

    // Jumps
    /// Milliseconds per pixel of a normal jump
    pub jump_delay: u32,
    /// Length of the jump back after running into an obstacle
    pub running_bounce_distance: i32,

    // Combat
    /// Life points when the game starts
    pub max_life: i32,
    /// Speed of the knockback when hurt
    pub hurt_speed: i32,
    /// Length of the knockback when hurt
    pub hurt_distance: i32,
    /// Invulnerability after being hurt
    pub blink_duration: u32,

    // Misc
    /// Time an item takes to be used
    pub item_use_duration: u32,
    /// Length of a victory sequence without callback
    pub victory_duration: u32,
}

/// The hero's standard stats
pub const BASE_STATS: HeroStats = HeroStats {
    // 16x16 box with the origin at the feet
    size: IVec2::new(16, 16),
    origin: IVec2::new(8, 13),

    normal_walking_speed: 88,
    running_speed: 300,
    running_prepare_delay: 500,
    swimming_speed: 44,
    stairs_speed: 40,
    conveyor_belt_speed: 64,
    back_to_solid_ground_speed: 144,

    jump_delay: 10,
    running_bounce_distance: 32,

    // Three hearts of four quarters
    max_life: 12,
    hurt_speed: 120,
    hurt_distance: 24,
    blink_duration: 2000,

    item_use_duration: 400,
    victory_duration: 1500,
};

impl Default for HeroStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl HeroStats {
    /// Speed of a jump in pixels per second for a given per-pixel delay
    pub fn jump_speed(delay: u32) -> i32 {
        (1000 / delay.max(1)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = HeroStats::default();
        assert_eq!(stats.normal_walking_speed, 88);
        assert_eq!(stats.size, IVec2::new(16, 16));
        assert_eq!(stats.origin, IVec2::new(8, 13));
        assert_eq!(stats, BASE_STATS);
    }

    #[test]
    fn test_jump_speed() {
        assert_eq!(HeroStats::jump_speed(10), 100);
        assert_eq!(HeroStats::jump_speed(13), 76);
        assert_eq!(HeroStats::jump_speed(0), 1000);
    }

    #[test]
    fn test_origin_inside_box() {
        let stats = HeroStats::default();
        assert!(stats.origin.x < stats.size.x && stats.origin.y < stats.size.y);
    }
}
