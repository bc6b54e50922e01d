//! Score and high score
//!
//! Score is held in integer tenths of a point so repeated fractional awards
//! stay exact. Each award is rounded half away from zero to the nearest tenth.

use serde::{Deserialize, Serialize};

use crate::round_tenths;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreAccumulator {
    tenths: u64,
    high_tenths: u64,
}

fn to_tenths(points: f64) -> u64 {
    // Awards are never negative; `as` saturates NaN to 0
    (round_tenths(points.max(0.0)) * 10.0).round() as u64
}

fn from_tenths(tenths: u64) -> f64 {
    tenths as f64 / 10.0
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> f64 {
        from_tenths(self.tenths)
    }

    pub fn high_score(&self) -> f64 {
        from_tenths(self.high_tenths)
    }

    /// Award a success; returns the rounded points added
    pub fn on_success(&mut self, base_points: f64, zone_multiplier: f64, combo_multiplier: f64) -> f64 {
        let delta = to_tenths(base_points * zone_multiplier * combo_multiplier);
        self.add(delta);
        from_tenths(delta)
    }

    /// Passive bonus: whole points, `round(pressure * rate)`
    pub fn bleed_tick(&mut self, pressure: f64, rate: f64) -> u64 {
        let points = (pressure * rate).round().max(0.0) as u64;
        self.add(points * 10);
        points
    }

    fn add(&mut self, tenths: u64) {
        self.tenths = self.tenths.saturating_add(tenths);
        self.high_tenths = self.high_tenths.max(self.tenths);
    }

    /// Zero the score; the high score survives
    pub fn reset(&mut self) {
        self.tenths = 0;
    }
}
