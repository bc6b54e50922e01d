//! Combo streak tracking
//!
//! The opening success of a streak scores at 1.0x; every further success in
//! the same streak adds one increment, up to the cap. The countdown advances
//! once per tick while a streak is alive and drops it at `max_time`.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboTracker {
    combo: u32,
    multiplier: f64,
    /// Ticks since the last success, always `<= max_time`
    timer: u32,
    /// Longest streak since the last reset
    best: u32,
    max_time: u32,
    increment: f64,
    cap: f64,
}

impl ComboTracker {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            combo: 0,
            multiplier: 1.0,
            timer: 0,
            best: 0,
            max_time: tuning.combo_max_time,
            increment: tuning.combo_multiplier_increment,
            cap: tuning.combo_multiplier_cap,
        }
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Extend the streak; returns the multiplier this success scores with
    pub fn on_success(&mut self) -> f64 {
        self.combo += 1;
        self.best = self.best.max(self.combo);
        // Closed form keeps long streaks free of accumulated float error
        let steps = (self.combo - 1) as f64;
        self.multiplier = (1.0 + self.increment * steps).min(self.cap);
        self.timer = 0;
        self.multiplier
    }

    /// Drop the streak
    pub fn on_fail_or_release(&mut self) {
        self.combo = 0;
        self.multiplier = 1.0;
        self.timer = 0;
    }

    /// Advance the countdown. Returns the streak length if it just expired.
    pub fn tick(&mut self) -> Option<u32> {
        if self.combo == 0 {
            return None;
        }
        self.timer += 1;
        if self.timer >= self.max_time {
            let streak = self.combo;
            self.on_fail_or_release();
            return Some(streak);
        }
        None
    }

    /// Back to initial values, including the best streak
    pub fn reset(&mut self) {
        self.on_fail_or_release();
        self.best = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_grows_per_success() {
        let mut combo = ComboTracker::new(&Tuning::default());
        assert_eq!(combo.on_success(), 1.0);
        assert_eq!(combo.on_success(), 1.1);
        assert_eq!(combo.on_success(), 1.2);
        assert_eq!(combo.combo(), 3);
        assert_eq!(combo.timer(), 0);
    }

    #[test]
    fn test_multiplier_capped() {
        let mut combo = ComboTracker::new(&Tuning::default());
        for _ in 0..50 {
            combo.on_success();
        }
        assert_eq!(combo.multiplier(), 3.0);
        assert_eq!(combo.best(), 50);
    }

    #[test]
    fn test_expiry_after_max_time() {
        let mut combo = ComboTracker::new(&Tuning::default());
        for _ in 0..3 {
            combo.on_success();
        }
        for expected in 1..5 {
            assert_eq!(combo.tick(), None);
            assert_eq!(combo.timer(), expected);
        }
        assert_eq!(combo.tick(), Some(3));
        assert_eq!(combo.combo(), 0);
        assert_eq!(combo.multiplier(), 1.0);
        assert_eq!(combo.timer(), 0);
        // Best survives expiry
        assert_eq!(combo.best(), 3);
    }

    #[test]
    fn test_success_restarts_countdown() {
        let mut combo = ComboTracker::new(&Tuning::default());
        combo.on_success();
        combo.tick();
        combo.tick();
        combo.on_success();
        assert_eq!(combo.timer(), 0);
        for _ in 0..4 {
            assert_eq!(combo.tick(), None);
        }
        assert_eq!(combo.tick(), Some(2));
    }

    #[test]
    fn test_idle_timer_does_not_run() {
        let mut combo = ComboTracker::new(&Tuning::default());
        for _ in 0..10 {
            assert_eq!(combo.tick(), None);
        }
        assert_eq!(combo.timer(), 0);
    }

    #[test]
    fn test_fail_drops_streak() {
        let mut combo = ComboTracker::new(&Tuning::default());
        combo.on_success();
        combo.on_success();
        combo.on_fail_or_release();
        assert_eq!(combo.combo(), 0);
        assert_eq!(combo.multiplier(), 1.0);
        combo.reset();
        assert_eq!(combo.best(), 0);
    }
}
