// Hero animation system
//
// Frames are not drawn here. The sprites only track which animation is
// playing, in which direction, whether it has finished and whether the hero
// is blinking, because the behavior states depend on that.

use std::collections::HashMap;

use crate::core::{Direction4, Direction8};
use crate::engine::map::Ground;

/// A single animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Name of the animation (e.g., "stopped", "walking", "hurt")
    pub name: String,
    /// Number of frames in the animation
    pub frame_count: usize,
    /// Duration of each frame in milliseconds
    pub frame_delay: u32,
    /// Whether the animation loops
    pub looping: bool,
}

impl AnimationClip {
    pub fn new(name: &str, frame_count: usize, frame_delay: u32, looping: bool) -> Self {
        Self {
            name: name.to_string(),
            frame_count: frame_count.max(1),
            frame_delay: frame_delay.max(1),
            looping,
        }
    }

    pub fn looping(name: &str, frame_count: usize, frame_delay: u32) -> Self {
        Self::new(name, frame_count, frame_delay, true)
    }

    /// An animation that plays once and stays on its last frame
    pub fn one_shot(name: &str, frame_count: usize, frame_delay: u32) -> Self {
        Self::new(name, frame_count, frame_delay, false)
    }

    /// Total duration of one cycle in milliseconds
    pub fn total_duration(&self) -> u32 {
        self.frame_count as u32 * self.frame_delay
    }
}

/// Animation state of the hero
#[derive(Debug)]
pub struct HeroSprites {
    animations: HashMap<String, AnimationClip>,
    current_animation: String,
    current_frame: usize,
    next_frame_date: u32,
    finished: bool,

    /// Direction the sprites are facing
    direction: Direction4,

    /// End of the current blinking, if any
    blink_end_date: Option<u32>,

    /// Special ground displayed under the hero (grass, shallow water)
    ground: Option<Ground>,

    suspended: bool,
    when_suspended: u32,
}

impl Default for HeroSprites {
    fn default() -> Self {
        Self::new()
    }
}

impl HeroSprites {
    pub fn new() -> Self {
        Self {
            animations: HashMap::new(),
            current_animation: String::new(),
            current_frame: 0,
            next_frame_date: 0,
            finished: false,
            direction: Direction4::DOWN,
            blink_end_date: None,
            ground: None,
            suspended: false,
            when_suspended: 0,
        }
    }

    /// Sprites with every animation the behavior states use
    pub fn with_standard_animations() -> Self {
        let mut sprites = Self::new();

        for clip in [
            AnimationClip::looping("stopped", 1, 100),
            AnimationClip::looping("walking", 8, 100),
            AnimationClip::looping("carrying_stopped", 1, 100),
            AnimationClip::looping("carrying_walking", 8, 100),
            AnimationClip::one_shot("lifting", 3, 100),
            AnimationClip::looping("grabbing", 1, 100),
            AnimationClip::looping("pulling", 4, 100),
            AnimationClip::looping("hurt", 2, 100),
            AnimationClip::one_shot("falling", 3, 150),
            AnimationClip::one_shot("plunging", 4, 100),
            AnimationClip::looping("swimming_stopped", 2, 300),
            AnimationClip::looping("swimming_slow", 4, 150),
            AnimationClip::looping("jumping", 4, 100),
            AnimationClip::looping("prepare_running", 2, 100),
            AnimationClip::looping("running", 8, 40),
            AnimationClip::looping("sword_loading_walking", 8, 100),
            AnimationClip::one_shot("sword", 6, 40),
            AnimationClip::one_shot("using_item", 4, 100),
            AnimationClip::looping("brandish", 1, 100),
            AnimationClip::looping("victory", 2, 150),
        ] {
            sprites.add_animation(clip);
        }

        sprites.current_animation = "stopped".to_string();
        sprites
    }

    pub fn add_animation(&mut self, clip: AnimationClip) {
        self.animations.insert(clip.name.clone(), clip);
    }

    /// Play an animation by name, from its first frame unless it is
    /// already playing
    pub fn set_animation(&mut self, name: &str, now: u32) {
        if self.current_animation == name && !self.finished {
            return;
        }
        self.play_from_start(name, now);
    }

    /// Play an animation from the beginning, even if it's the same
    pub fn play_from_start(&mut self, name: &str, now: u32) {
        let Some(clip) = self.animations.get(name) else {
            log::warn!("No such hero animation: '{}'", name);
            return;
        };
        self.next_frame_date = now + clip.frame_delay;
        self.current_animation = name.to_string();
        self.current_frame = 0;
        self.finished = false;
    }

    pub fn set_animation_stopped_normal(&mut self, now: u32) {
        self.set_animation("stopped", now);
    }

    pub fn set_animation_walking_normal(&mut self, now: u32) {
        self.set_animation("walking", now);
    }

    pub fn current_animation(&self) -> &str {
        &self.current_animation
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Whether a walking animation is playing
    pub fn is_walking(&self) -> bool {
        self.current_animation.contains("walking")
    }

    /// Whether the current one-shot animation reached its end
    pub fn is_animation_finished(&self) -> bool {
        self.finished
    }

    pub fn animation_direction(&self) -> Direction4 {
        self.direction
    }

    pub fn set_animation_direction(&mut self, direction: Direction4) {
        self.direction = direction;
    }

    /// Sprite direction matching a wanted movement direction and the real one
    /// (which differs when sliding against an obstacle)
    pub fn animation_direction_for(
        &self,
        wanted: Direction8,
        real: Option<Direction8>,
    ) -> Direction4 {
        if !wanted.is_diagonal() {
            return Direction4::new(wanted.index() / 2);
        }
        if let Some(real) = real.filter(|r| !r.is_diagonal()) {
            return Direction4::new(real.index() / 2);
        }

        // Diagonal move: keep the current direction if it is one of the two
        // components of the diagonal
        let first = Direction4::new(wanted.index() / 2);
        let second = Direction4::new((wanted.index() + 1) % 8 / 2);
        if self.direction == first || self.direction == second {
            self.direction
        } else {
            first
        }
    }

    /// Start blinking for `duration` milliseconds
    pub fn blink(&mut self, duration: u32, now: u32) {
        self.blink_end_date = Some(now + duration);
    }

    pub fn stop_blinking(&mut self) {
        self.blink_end_date = None;
    }

    pub fn is_blinking(&self) -> bool {
        self.blink_end_date.is_some()
    }

    /// Show a special ground under the hero
    pub fn create_ground(&mut self, ground: Ground) {
        self.ground = Some(ground);
    }

    pub fn destroy_ground(&mut self) {
        self.ground = None;
    }

    pub fn ground(&self) -> Option<Ground> {
        self.ground
    }

    /// Advance frames and blinking
    pub fn update(&mut self, now: u32) {
        if self.suspended {
            return;
        }

        if self.blink_end_date.is_some_and(|end| now >= end) {
            self.blink_end_date = None;
        }

        if self.finished {
            return;
        }
        let Some(clip) = self.animations.get(&self.current_animation) else {
            return;
        };

        while now >= self.next_frame_date && !self.finished {
            self.next_frame_date += clip.frame_delay;
            self.current_frame += 1;

            if self.current_frame >= clip.frame_count {
                if clip.looping {
                    self.current_frame = 0;
                } else {
                    // Stay on last frame
                    self.current_frame = clip.frame_count - 1;
                    self.finished = true;
                }
            }
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Suspend or resume. Resuming shifts the frame and blink dates.
    pub fn set_suspended(&mut self, suspended: bool, now: u32) {
        if suspended == self.suspended {
            return;
        }
        self.suspended = suspended;
        if suspended {
            self.when_suspended = now;
        } else {
            let diff = now.saturating_sub(self.when_suspended);
            self.next_frame_date += diff;
            if let Some(end) = self.blink_end_date.as_mut() {
                *end += diff;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_clip_creation() {
        let clip = AnimationClip::looping("walking", 4, 125);
        assert_eq!(clip.name, "walking");
        assert_eq!(clip.frame_count, 4);
        assert!(clip.looping);
        assert_eq!(clip.total_duration(), 500);
    }

    #[test]
    fn test_set_animation() {
        let mut sprites = HeroSprites::with_standard_animations();
        assert_eq!(sprites.current_animation(), "stopped");

        sprites.set_animation_walking_normal(0);
        assert_eq!(sprites.current_animation(), "walking");
        assert!(sprites.is_walking());
        assert_eq!(sprites.current_frame(), 0);
    }

    #[test]
    fn test_unknown_animation_is_ignored() {
        let mut sprites = HeroSprites::with_standard_animations();
        sprites.set_animation("moonwalking", 0);
        assert_eq!(sprites.current_animation(), "stopped");
    }

    #[test]
    fn test_looping_animation() {
        let mut sprites = HeroSprites::new();
        sprites.add_animation(AnimationClip::looping("test", 3, 100));
        sprites.set_animation("test", 0);

        sprites.update(350);
        assert_eq!(sprites.current_frame(), 0);
        assert!(!sprites.is_animation_finished());
    }

    #[test]
    fn test_one_shot_animation() {
        let mut sprites = HeroSprites::new();
        sprites.add_animation(AnimationClip::one_shot("test", 3, 100));
        sprites.set_animation("test", 0);

        sprites.update(250);
        assert!(!sprites.is_animation_finished());
        sprites.update(300);
        assert_eq!(sprites.current_frame(), 2);
        assert!(sprites.is_animation_finished());

        // Restarting a finished animation plays it again
        sprites.set_animation("test", 400);
        assert!(!sprites.is_animation_finished());
    }

    #[test]
    fn test_blinking() {
        let mut sprites = HeroSprites::with_standard_animations();
        sprites.blink(2000, 100);
        sprites.update(2099);
        assert!(sprites.is_blinking());
        sprites.update(2100);
        assert!(!sprites.is_blinking());
    }

    #[test]
    fn test_suspension_shifts_blinking() {
        let mut sprites = HeroSprites::with_standard_animations();
        sprites.blink(1000, 0);
        sprites.set_suspended(true, 500);
        sprites.update(5000);
        assert!(sprites.is_blinking());
        sprites.set_suspended(false, 1500);
        sprites.update(1999);
        assert!(sprites.is_blinking());
        sprites.update(2000);
        assert!(!sprites.is_blinking());
    }

    #[test]
    fn test_animation_direction_for_diagonals() {
        let mut sprites = HeroSprites::new();
        sprites.set_animation_direction(Direction4::UP);

        // Straight wanted direction wins
        assert_eq!(
            sprites.animation_direction_for(Direction8::new(4), None),
            Direction4::LEFT
        );
        // Up-right keeps facing up
        assert_eq!(
            sprites.animation_direction_for(Direction8::new(1), Some(Direction8::new(1))),
            Direction4::UP
        );
        // Down-right while facing up turns down
        assert_eq!(
            sprites.animation_direction_for(Direction8::new(7), Some(Direction8::new(7))),
            Direction4::DOWN
        );
        // Sliding along a wall follows the real direction
        assert_eq!(
            sprites.animation_direction_for(Direction8::new(7), Some(Direction8::new(0))),
            Direction4::RIGHT
        );
    }

    #[test]
    fn test_ground_overlay() {
        let mut sprites = HeroSprites::new();
        sprites.create_ground(Ground::Grass);
        assert_eq!(sprites.ground(), Some(Ground::Grass));
        sprites.destroy_ground();
        assert_eq!(sprites.ground(), None);
    }
}
