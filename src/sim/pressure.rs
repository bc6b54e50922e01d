//! Bounded pressure accumulator
//!
//! The regulator only clamps; deciding that a full gauge means an explosion
//! is the engine's job.

use serde::{Deserialize, Serialize};

/// Result of a pressure mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureChange {
    pub pressure: f64,
    /// The raw result fell outside `[0, max]`
    pub clamped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureRegulator {
    pressure: f64,
    max: f64,
    loss_per_tick: f64,
}

impl PressureRegulator {
    pub fn new(max: f64, loss_per_tick: f64) -> Self {
        Self {
            pressure: 0.0,
            max,
            loss_per_tick,
        }
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Gauge is full
    pub fn is_saturated(&self) -> bool {
        self.pressure >= self.max
    }

    /// Add a signed amount, clamping to `[0, max]`
    pub fn apply_delta(&mut self, amount: f64) -> PressureChange {
        let raw = self.pressure + amount;
        self.pressure = raw.clamp(0.0, self.max);
        PressureChange {
            pressure: self.pressure,
            clamped: raw != self.pressure,
        }
    }

    /// One tick of decay
    pub fn decay_tick(&mut self) -> PressureChange {
        self.apply_delta(-self.loss_per_tick)
    }

    pub fn reset(&mut self) {
        self.pressure = 0.0;
    }
}
