//! Attract/demo mode player
//!
//! Picks actions from a snapshot using a seeded RNG, so the same seed
//! against the same engine always plays the same game.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Action, EngineState, Snapshot};
use super::zone::{PressureAlert, Zone};

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Chance an attempted action lands as a success
    pub success_chance: f64,
    /// Chance of acting at all on a given decision
    pub activity: f64,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            success_chance: 0.8,
            activity: 0.7,
        }
    }

    pub fn with_skill(mut self, success_chance: f64) -> Self {
        self.success_chance = success_chance.clamp(0.0, 1.0);
        self
    }

    /// Next action, or `None` to wait
    pub fn choose(&mut self, snapshot: &Snapshot) -> Option<Action> {
        if snapshot.state != EngineState::Playing {
            return None;
        }

        // Vent before the gauge blows
        if snapshot.alert == PressureAlert::Imminent {
            return Some(Action::Release);
        }

        // Greedier in Red, where points are doubled, but hedge with a vent
        if snapshot.zone == Zone::Red && self.rng.random_bool(0.25) {
            return Some(Action::Release);
        }

        if !self.rng.random_bool(self.activity.clamp(0.0, 1.0)) {
            return None;
        }

        if self.rng.random_bool(self.success_chance.clamp(0.0, 1.0)) {
            Some(Action::Success)
        } else {
            Some(Action::Fail)
        }
    }
}
