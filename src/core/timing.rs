//! Monotonic timing of measured operations

use std::time::{Duration, Instant};

/// Start and end of one measured operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    /// When the operation started
    pub start: Instant,
    /// When the operation ended
    pub end: Instant,
}

impl TimingSample {
    /// Close a sample that started at `start`, ending now
    pub fn since(start: Instant) -> Self {
        Self {
            start,
            end: Instant::now(),
        }
    }

    /// Elapsed time between start and end
    pub fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }

    /// Elapsed nanoseconds, saturating at `u64::MAX`
    pub fn elapsed_nanos(&self) -> u64 {
        u64::try_from(self.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
