//! Tick-counted periodic spawner

use crate::consts::FRAMES_PER_SECOND;

/// Ticks between repopulation attempts (5 s at the nominal frame rate)
pub const REPOPULATE_EVERY_TICKS: u64 = 5 * FRAMES_PER_SECOND as u64;
/// Live instances above which a repopulation attempt does nothing
pub const REPOPULATE_CAP: usize = 10;

/// Fires every `period` ticks while fewer than `cap` instances are alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawner {
    pub period: u64,
    pub cap: usize,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            period: REPOPULATE_EVERY_TICKS,
            cap: REPOPULATE_CAP,
        }
    }
}

impl Spawner {
    pub fn new(period: u64, cap: usize) -> Self {
        Self { period, cap }
    }

    /// Whether one more instance should be added on this tick
    pub fn should_spawn(&self, frame: u64, live: usize) -> bool {
        self.period > 0 && frame > 0 && frame % self.period == 0 && live < self.cap
    }
}
