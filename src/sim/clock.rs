//! Tick sources
//!
//! The engine never reads wall-clock time. A clock turns elapsed time (or a
//! test script) into whole ticks that the owner feeds to `Engine::pump`.

use crate::consts::MAX_CATCHUP_TICKS;

pub trait Clock {
    /// Whole ticks that became due since the last call
    fn due_ticks(&mut self) -> u32;
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Scripted clock for tests and replays
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    pending: u32,
    running: bool,
}

impl ManualClock {
    /// A clock that is already running
    pub fn new() -> Self {
        Self {
            pending: 0,
            running: true,
        }
    }

    /// Queue ticks (dropped while stopped)
    pub fn advance(&mut self, ticks: u32) {
        if self.running {
            self.pending = self.pending.saturating_add(ticks);
        }
    }
}

impl Clock for ManualClock {
    fn due_ticks(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.pending = 0;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Fixed-timestep accumulator fed with real elapsed milliseconds
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    interval_ms: f64,
    accumulator_ms: f64,
    /// Caps catch-up after a long stall so the host can't spiral
    max_catchup: u32,
    running: bool,
}

impl FixedStepClock {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1) as f64,
            accumulator_ms: 0.0,
            max_catchup: MAX_CATCHUP_TICKS,
            running: false,
        }
    }

    pub fn with_max_catchup(mut self, max_catchup: u32) -> Self {
        self.max_catchup = max_catchup.max(1);
        self
    }

    /// Feed elapsed frame time
    pub fn advance(&mut self, dt_ms: f64) {
        if self.running && dt_ms.is_finite() && dt_ms > 0.0 {
            self.accumulator_ms += dt_ms;
        }
    }

    /// Fraction of the next tick already elapsed (for interpolation)
    pub fn alpha(&self) -> f64 {
        (self.accumulator_ms / self.interval_ms).min(1.0)
    }
}

impl Clock for FixedStepClock {
    fn due_ticks(&mut self) -> u32 {
        let mut ticks = 0;
        while self.accumulator_ms >= self.interval_ms && ticks < self.max_catchup {
            self.accumulator_ms -= self.interval_ms;
            ticks += 1;
        }
        if ticks == self.max_catchup && self.accumulator_ms >= self.interval_ms {
            log::warn!(
                "Clock fell behind, dropping {:.0} ms",
                self.accumulator_ms
            );
            self.accumulator_ms %= self.interval_ms;
        }
        ticks
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.accumulator_ms = 0.0;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
