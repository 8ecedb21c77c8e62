/// Game clock and fixed-step scheduling
///
/// Wall-clock frames are cut into fixed 10 ms simulation steps. Each step
/// advances the game clock, in milliseconds, which is the `now` given to
/// the world. The game clock does not move while paused, and a frame that
/// took far too long is not caught up: the simulation slows down instead.
use std::time::{Duration, Instant};

use log::{debug, info};

/// Length of one simulation step in milliseconds
pub const TIMESTEP_MS: u32 = 10;
const TIMESTEP: Duration = Duration::from_millis(TIMESTEP_MS as u64);

/// Most simulation steps run for a single frame
const MAX_STEPS_PER_FRAME: u32 = 10;

pub struct GameLoop {
    /// Frame time not consumed by simulation steps yet
    lag: Duration,
    last_frame: Instant,
    paused: bool,
    now_ms: u32,
    frame_count: u64,
    update_count: u64,
    /// Total frame time dropped because frames were too long
    dropped: Duration,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            lag: Duration::ZERO,
            last_frame: Instant::now(),
            paused: false,
            now_ms: 0,
            frame_count: 0,
            update_count: 0,
            dropped: Duration::ZERO,
        }
    }

    /// Start a frame measured on the wall clock, returns how many steps to
    /// simulate
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(frame_time)
    }

    /// Start a frame that lasted `frame_time`, returns how many steps to
    /// simulate. The game clock is already advanced past all of them, so
    /// step `i` of `n` runs at `now_ms() - (n - 1 - i) * TIMESTEP_MS`.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;
        if self.paused {
            return 0;
        }

        self.lag += frame_time;
        let mut steps = 0;
        while self.lag >= TIMESTEP && steps < MAX_STEPS_PER_FRAME {
            self.lag -= TIMESTEP;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME && self.lag >= TIMESTEP {
            debug!("Frame too long, dropping {:?} of game time", self.lag);
            self.dropped += self.lag;
            self.lag = Duration::ZERO;
        }

        self.update_count += u64::from(steps);
        steps
    }

    /// Advance the game clock by one step and return the new time
    pub fn step(&mut self) -> u32 {
        self.now_ms += TIMESTEP_MS;
        self.now_ms
    }

    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn dropped_time(&self) -> Duration {
        self.dropped
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            info!("Game clock stopped at {} ms", self.now_ms);
        }
    }

    /// Restart the clock. Time spent paused is forgotten.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.lag = Duration::ZERO;
            info!("Game clock restarted at {} ms", self.now_ms);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
