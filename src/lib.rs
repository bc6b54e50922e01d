//! Pressure Combo - A pressure-gauge arcade scoring loop
//!
//! Core modules:
//! - `sim`: Deterministic scoring engine (pressure, combo, zones, explosion)
//! - `tuning`: Data-driven game balance, validated at construction
//! - `highscores`: In-memory run leaderboard

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use sim::{Action, Engine, EngineEvent, EngineState, Outcome, Snapshot};
pub use tuning::{Tuning, TuningError};

/// Default tunables
pub mod consts {
    /// Pressure ceiling; reaching it explodes
    pub const PRESSURE_MAX: f64 = 100.0;
    /// Pressure added per success (scaled by zone multiplier)
    pub const PRESSURE_GAIN: f64 = 10.0;
    /// Pressure removed per tick
    pub const PRESSURE_LOSS: f64 = 0.5;
    /// Pressure removed by a fail
    pub const FAIL_PRESSURE_RELEASE: f64 = 15.0;
    /// Pressure removed by a manual release
    pub const PRESSURE_RELEASE: f64 = 25.0;

    /// Zone bands (upper bounds are inclusive)
    pub const GREEN_MAX: f64 = 40.0;
    pub const YELLOW_MAX: f64 = 75.0;

    /// Zone score multipliers
    pub const GREEN_MULTIPLIER: f64 = 1.0;
    pub const YELLOW_MULTIPLIER: f64 = 1.5;
    pub const RED_MULTIPLIER: f64 = 2.0;

    /// Points per success before multipliers
    pub const BASE_POINTS: f64 = 1.0;

    /// Ticks without a success before the combo expires
    pub const COMBO_MAX_TIME: u32 = 5;
    pub const COMBO_MULTIPLIER_INCREMENT: f64 = 0.1;
    pub const COMBO_MULTIPLIER_CAP: f64 = 3.0;

    /// Passive bonus per tick, as a fraction of pressure
    pub const BLEED_RATE: f64 = 0.01;

    /// One tick = one second of decay and combo countdown
    pub const TICK_INTERVAL_MS: u64 = 1000;
    /// Maximum ticks a fixed-step clock releases per poll
    pub const MAX_CATCHUP_TICKS: u32 = 8;
    /// Advisory lockout the presentation layer shows after an explosion
    pub const EXPLOSION_LOCKOUT_MS: u64 = 2000;

    /// Gauge reads CRITICAL above this
    pub const CRITICAL_PRESSURE: f64 = 80.0;
    /// Gauge alarm at or above this
    pub const IMMINENT_PRESSURE: f64 = 90.0;
}

/// Round to the nearest tenth (half away from zero)
#[inline]
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format milliseconds as `HH:MM:SS`
pub fn format_clock(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
