// Pixel-stepped movements driven by a millisecond clock
//
// A movement never touches the map itself: its owner polls it for the next
// one-pixel step, validates the step against the collision oracle and then
// reports back whether the step was committed.

use glam::IVec2;

use crate::core::Direction8;

/// Side of one path step in pixels
pub const PATH_STEP_SIZE: i32 = 8;

/// Movement configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MovementError {
    #[error("Invalid character '{character}' at index {index} of path \"{path}\", expected a digit from 0 to 7")]
    InvalidPathCharacter {
        path: String,
        index: usize,
        character: char,
    },

    #[error("Empty path")]
    EmptyPath,
}

/// What decides the direction of each step
#[derive(Debug, Clone, PartialEq)]
pub enum MovementKind {
    /// Direction set from the player's commands
    Player { direction: Option<Direction8> },

    /// Fixed direction, optionally for a limited distance
    Straight {
        direction: Direction8,
        max_distance: Option<i32>,
        travelled: i32,
    },

    /// Sequence of 8-pixel steps
    Path {
        steps: Vec<Direction8>,
        index: usize,
        pixels_done: i32,
        looping: bool,
    },

    /// Straight to a point
    Target { target: IVec2 },
}

/// A movement of one pixel per step, at `speed` pixels per second
#[derive(Debug, Clone)]
pub struct Movement {
    kind: MovementKind,

    /// Pixels per second
    speed: i32,

    /// Date of the next step
    next_move_date: u32,

    /// Steps may go through obstacles
    ignore_obstacles: bool,

    /// Player movements try the two axes separately when a diagonal step is blocked
    smooth: bool,

    finished: bool,
    finished_reported: bool,

    suspended: bool,
    when_suspended: u32,
}

impl Movement {
    fn new(kind: MovementKind, speed: i32, now: u32) -> Self {
        let mut movement = Self {
            kind,
            speed,
            next_move_date: now,
            ignore_obstacles: false,
            smooth: false,
            finished: false,
            finished_reported: false,
            suspended: false,
            when_suspended: 0,
        };
        movement.next_move_date = now + movement.current_delay();
        movement
    }

    /// A movement controlled by the player's directional commands
    pub fn player(speed: i32, now: u32) -> Self {
        let mut movement = Self::new(MovementKind::Player { direction: None }, speed, now);
        movement.smooth = true;
        movement
    }

    /// A straight movement, unlimited when `max_distance` is `None`
    pub fn straight(direction: Direction8, speed: i32, max_distance: Option<i32>, now: u32) -> Self {
        Self::new(
            MovementKind::Straight {
                direction,
                max_distance,
                travelled: 0,
            },
            speed,
            now,
        )
    }

    /// A movement along a sequence of 8-pixel steps
    pub fn path(steps: Vec<Direction8>, speed: i32, looping: bool, now: u32) -> Self {
        let mut movement = Self::new(
            MovementKind::Path {
                steps,
                index: 0,
                pixels_done: 0,
                looping,
            },
            speed,
            now,
        );
        movement.finished = movement.direction(IVec2::ZERO).is_none();
        movement
    }

    /// A path movement from a string of direction digits, e.g. `"0022"`
    pub fn path_from_str(path: &str, speed: i32, looping: bool, now: u32) -> Result<Self, MovementError> {
        Ok(Self::path(parse_path(path)?, speed, looping, now))
    }

    /// A movement towards a point
    pub fn target(target: IVec2, speed: i32, now: u32) -> Self {
        Self::new(MovementKind::Target { target }, speed, now)
    }

    pub fn with_ignore_obstacles(mut self, ignore_obstacles: bool) -> Self {
        self.ignore_obstacles = ignore_obstacles;
        self
    }

    pub fn kind(&self) -> &MovementKind {
        &self.kind
    }

    pub fn is_player_controlled(&self) -> bool {
        matches!(self.kind, MovementKind::Player { .. })
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: i32, now: u32) {
        if speed != self.speed {
            self.speed = speed;
            self.next_move_date = now + self.current_delay();
        }
    }

    pub fn ignores_obstacles(&self) -> bool {
        self.ignore_obstacles
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the movement has no direction
    pub fn is_stopped(&self) -> bool {
        match &self.kind {
            MovementKind::Player { direction } => direction.is_none(),
            _ => self.finished,
        }
    }

    /// Returns true exactly once after the movement finishes
    pub fn take_finished_event(&mut self) -> bool {
        if self.finished && !self.finished_reported {
            self.finished_reported = true;
            true
        } else {
            false
        }
    }

    /// Direction of the next step for an entity at `xy`
    pub fn direction(&self, xy: IVec2) -> Option<Direction8> {
        if self.finished {
            return None;
        }
        match &self.kind {
            MovementKind::Player { direction } => *direction,
            MovementKind::Straight { direction, .. } => Some(*direction),
            MovementKind::Path { steps, index, .. } => steps.get(*index).copied(),
            MovementKind::Target { target } => Direction8::from_xy_move(*target - xy),
        }
    }

    /// Change the direction of a player movement.
    /// Returns whether the direction actually changed.
    pub fn set_player_direction(&mut self, wanted: Option<Direction8>, now: u32) -> bool {
        let MovementKind::Player { direction } = &mut self.kind else {
            return false;
        };
        if *direction == wanted {
            return false;
        }
        let was_stopped = direction.is_none();
        *direction = wanted;
        if was_stopped {
            self.next_move_date = now + self.current_delay();
        }
        true
    }

    /// Stop a player movement, dropping any residual step
    pub fn stop(&mut self, now: u32) {
        self.set_player_direction(None, now);
    }

    /// Milliseconds between two steps in `direction`
    pub fn step_delay(&self, direction: Option<Direction8>) -> u32 {
        let base = 1000.0 / self.speed.max(1) as f64;
        let delay = match direction {
            Some(d) if d.is_diagonal() => base * std::f64::consts::SQRT_2,
            _ => base,
        };
        (delay.round() as u32).max(1)
    }

    fn current_delay(&self) -> u32 {
        let direction = match &self.kind {
            MovementKind::Player { direction } => *direction,
            MovementKind::Straight { direction, .. } => Some(*direction),
            MovementKind::Path { steps, index, .. } => steps.get(*index).copied(),
            MovementKind::Target { .. } => None,
        };
        self.step_delay(direction)
    }

    /// The next one-pixel step for an entity at `xy`, if one is due at `now`.
    ///
    /// Each returned step consumes one scheduled date. The caller must report
    /// a committed step with `notify_step_done`.
    pub fn poll_step(&mut self, now: u32, xy: IVec2) -> Option<IVec2> {
        if self.suspended || self.finished || self.speed <= 0 || now < self.next_move_date {
            return None;
        }
        let direction = self.direction(xy)?;
        self.next_move_date += self.step_delay(Some(direction));
        Some(direction.to_xy_move())
    }

    /// Account for a committed step of `delta`, `xy` being the new position
    pub fn notify_step_done(&mut self, delta: IVec2, xy: IVec2) {
        match &mut self.kind {
            MovementKind::Player { .. } => {}
            MovementKind::Straight {
                max_distance,
                travelled,
                ..
            } => {
                *travelled += delta.x.abs().max(delta.y.abs());
                if max_distance.is_some_and(|max| *travelled >= max) {
                    self.finished = true;
                }
            }
            MovementKind::Path {
                steps,
                index,
                pixels_done,
                looping,
            } => {
                *pixels_done += 1;
                if *pixels_done >= PATH_STEP_SIZE {
                    *pixels_done = 0;
                    *index += 1;
                    if *index >= steps.len() {
                        if *looping {
                            *index = 0;
                        } else {
                            self.finished = true;
                        }
                    }
                }
            }
            MovementKind::Target { target } => {
                if xy == *target {
                    self.finished = true;
                }
            }
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Suspend or resume. Resuming shifts the next step by the paused time.
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

    pub fn next_move_date(&self) -> u32 {
        self.next_move_date
    }
}

/// Parse a string of direction digits (`'0'` to `'7'`)
pub fn parse_path(path: &str) -> Result<Vec<Direction8>, MovementError> {
    if path.is_empty() {
        return Err(MovementError::EmptyPath);
    }
    path.chars()
        .enumerate()
        .map(|(index, character)| {
            character
                .to_digit(10)
                .and_then(|d| Direction8::try_new(d as i32))
                .ok_or_else(|| MovementError::InvalidPathCharacter {
                    path: path.to_string(),
                    index,
                    character,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Step a movement without obstacles until `until`, returning the end point
    fn run(movement: &mut Movement, mut xy: IVec2, until: u32) -> IVec2 {
        for now in 0..=until {
            while let Some(delta) = movement.poll_step(now, xy) {
                xy += delta;
                movement.notify_step_done(delta, xy);
            }
        }
        xy
    }

    #[test]
    fn test_step_delay() {
        let movement = Movement::straight(Direction8::new(0), 100, None, 0);
        assert_eq!(movement.step_delay(Some(Direction8::new(0))), 10);
        assert_eq!(movement.step_delay(Some(Direction8::new(1))), 14);

        let movement = Movement::straight(Direction8::new(0), 88, None, 0);
        assert_eq!(movement.step_delay(Some(Direction8::new(0))), 11);
    }

    #[test]
    fn test_straight_movement_speed() {
        let mut movement = Movement::straight(Direction8::new(0), 100, None, 0);
        let xy = run(&mut movement, IVec2::ZERO, 1000);
        assert_eq!(xy, IVec2::new(100, 0));
        assert!(!movement.is_finished());
    }

    #[test]
    fn test_straight_movement_max_distance() {
        let mut movement = Movement::straight(Direction8::new(6), 100, Some(24), 0);
        let xy = run(&mut movement, IVec2::ZERO, 1000);
        assert_eq!(xy, IVec2::new(0, 24));
        assert!(movement.is_finished());
        assert!(movement.take_finished_event());
        assert!(!movement.take_finished_event());
    }

    #[test]
    fn test_path_movement() {
        let mut movement = Movement::path_from_str("06", 100, false, 0).unwrap();
        let xy = run(&mut movement, IVec2::ZERO, 1000);
        assert_eq!(xy, IVec2::new(8, 8));
        assert!(movement.is_finished());
    }

    #[test]
    fn test_looping_path_never_finishes() {
        let mut movement = Movement::path_from_str("04", 100, true, 0).unwrap();
        let xy = run(&mut movement, IVec2::ZERO, 1000);
        assert!(!movement.is_finished());
        assert!(xy.x >= 0 && xy.x <= 8);
    }

    #[test]
    fn test_invalid_path() {
        assert_eq!(
            Movement::path_from_str("018", 100, false, 0).unwrap_err(),
            MovementError::InvalidPathCharacter {
                path: "018".to_string(),
                index: 2,
                character: '8'
            }
        );
        assert_eq!(parse_path("").unwrap_err(), MovementError::EmptyPath);
    }

    #[test]
    fn test_target_movement() {
        let mut movement = Movement::target(IVec2::new(5, -3), 100, 0);
        let xy = run(&mut movement, IVec2::ZERO, 1000);
        assert_eq!(xy, IVec2::new(5, -3));
        assert!(movement.is_finished());
    }

    #[test]
    fn test_player_movement_direction() {
        let mut movement = Movement::player(100, 0);
        assert!(movement.is_stopped());
        assert_eq!(movement.poll_step(500, IVec2::ZERO), None);

        assert!(movement.set_player_direction(Some(Direction8::new(4)), 500));
        assert!(!movement.set_player_direction(Some(Direction8::new(4)), 500));
        let xy = run(&mut movement, IVec2::ZERO, 600);
        assert_eq!(xy, IVec2::new(-10, 0));
    }

    #[test]
    fn test_suspension_shifts_next_step() {
        let mut movement = Movement::straight(Direction8::new(0), 100, None, 0);
        assert_eq!(movement.next_move_date(), 10);

        movement.set_suspended(true, 5);
        assert_eq!(movement.poll_step(50, IVec2::ZERO), None);
        movement.set_suspended(false, 105);
        assert_eq!(movement.next_move_date(), 110);
        assert_eq!(movement.poll_step(109, IVec2::ZERO), None);
        assert_eq!(movement.poll_step(110, IVec2::ZERO), Some(IVec2::new(1, 0)));
    }
}
