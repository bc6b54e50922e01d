//! Data-driven game balance
//!
//! Every tunable the engine reads lives here. Tunables are validated once at
//! engine construction; a bad tuning is the only hard failure in the crate.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Score multiplier per pressure zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneMultipliers {
    pub green: f64,
    pub yellow: f64,
    pub red: f64,
}

impl Default for ZoneMultipliers {
    fn default() -> Self {
        Self {
            green: GREEN_MULTIPLIER,
            yellow: YELLOW_MULTIPLIER,
            red: RED_MULTIPLIER,
        }
    }
}

/// Rejected tunables
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("zone bounds must satisfy 0 < green_max ({green_max}) < yellow_max ({yellow_max}) < pressure_max ({pressure_max})")]
    ZoneOrdering {
        green_max: f64,
        yellow_max: f64,
        pressure_max: f64,
    },
    #[error("{name} multiplier must be > 0, got {value}")]
    NonPositiveMultiplier { name: &'static str, value: f64 },
    #[error("{name} must be a finite value >= 0, got {value}")]
    NegativeAmount { name: &'static str, value: f64 },
    #[error("base_points must be > 0, got {0}")]
    NonPositiveBasePoints(f64),
    #[error("combo_multiplier_cap must be >= 1.0, got {0}")]
    ComboCapBelowOne(f64),
    #[error("combo_max_time must be at least one tick")]
    ZeroComboTime,
    #[error("target_score must be > 0, got {0}")]
    NonPositiveTarget(f64),
    #[error("tick_interval_ms must be > 0")]
    ZeroTickInterval,
    #[error("alert thresholds must satisfy 0 < critical ({critical}) <= imminent ({imminent}) <= pressure_max")]
    AlertOrdering { critical: f64, imminent: f64 },
    #[error("log_capacity must be > 0 when set")]
    ZeroLogCapacity,
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Pressure ===
    pub pressure_max: f64,
    /// Added on success, scaled by the zone multiplier
    pub pressure_gain: f64,
    /// Decay per tick
    pub pressure_loss: f64,
    pub fail_pressure_release: f64,
    /// Manual release amount
    pub pressure_release: f64,

    // === Zones ===
    pub green_max: f64,
    pub yellow_max: f64,
    pub zone_multipliers: ZoneMultipliers,

    // === Scoring ===
    pub base_points: f64,
    /// Ticks without a success before the streak is dropped
    pub combo_max_time: u32,
    pub combo_multiplier_increment: f64,
    pub combo_multiplier_cap: f64,
    /// Reaching this score finishes the run (disabled when `None`)
    pub target_score: Option<f64>,
    /// Passive per-tick bonus proportional to pressure
    pub bleed_bonus_enabled: bool,
    pub bleed_rate: f64,

    // === Timing ===
    pub tick_interval_ms: u64,
    /// How long the presentation layer holds the overload screen
    pub explosion_lockout_ms: u64,

    // === Presentation hints ===
    pub critical_pressure: f64,
    pub imminent_pressure: f64,
    /// Cap on retained log entries (unbounded when `None`)
    pub log_capacity: Option<usize>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pressure_max: PRESSURE_MAX,
            pressure_gain: PRESSURE_GAIN,
            pressure_loss: PRESSURE_LOSS,
            fail_pressure_release: FAIL_PRESSURE_RELEASE,
            pressure_release: PRESSURE_RELEASE,

            green_max: GREEN_MAX,
            yellow_max: YELLOW_MAX,
            zone_multipliers: ZoneMultipliers::default(),

            base_points: BASE_POINTS,
            combo_max_time: COMBO_MAX_TIME,
            combo_multiplier_increment: COMBO_MULTIPLIER_INCREMENT,
            combo_multiplier_cap: COMBO_MULTIPLIER_CAP,
            target_score: None,
            bleed_bonus_enabled: false,
            bleed_rate: BLEED_RATE,

            tick_interval_ms: TICK_INTERVAL_MS,
            explosion_lockout_ms: EXPLOSION_LOCKOUT_MS,

            critical_pressure: CRITICAL_PRESSURE,
            imminent_pressure: IMMINENT_PRESSURE,
            log_capacity: None,
        }
    }
}

impl Tuning {
    /// Tuning with a win condition
    pub fn with_target(target_score: f64) -> Self {
        Self {
            target_score: Some(target_score),
            ..Self::default()
        }
    }

    /// Check ordering and sign invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let ordered = self.green_max > 0.0
            && self.green_max < self.yellow_max
            && self.yellow_max < self.pressure_max
            && self.pressure_max.is_finite();
        if !ordered {
            return Err(TuningError::ZoneOrdering {
                green_max: self.green_max,
                yellow_max: self.yellow_max,
                pressure_max: self.pressure_max,
            });
        }

        let multipliers = [
            ("green", self.zone_multipliers.green),
            ("yellow", self.zone_multipliers.yellow),
            ("red", self.zone_multipliers.red),
        ];
        for (name, value) in multipliers {
            // NaN fails this too
            if !(value > 0.0 && value.is_finite()) {
                return Err(TuningError::NonPositiveMultiplier { name, value });
            }
        }

        let amounts = [
            ("pressure_gain", self.pressure_gain),
            ("pressure_loss", self.pressure_loss),
            ("fail_pressure_release", self.fail_pressure_release),
            ("pressure_release", self.pressure_release),
            ("combo_multiplier_increment", self.combo_multiplier_increment),
            ("bleed_rate", self.bleed_rate),
        ];
        for (name, value) in amounts {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(TuningError::NegativeAmount { name, value });
            }
        }

        if !(self.base_points > 0.0 && self.base_points.is_finite()) {
            return Err(TuningError::NonPositiveBasePoints(self.base_points));
        }
        if !(self.combo_multiplier_cap >= 1.0 && self.combo_multiplier_cap.is_finite()) {
            return Err(TuningError::ComboCapBelowOne(self.combo_multiplier_cap));
        }
        if self.combo_max_time == 0 {
            return Err(TuningError::ZeroComboTime);
        }
        if let Some(target) = self.target_score {
            if !(target > 0.0 && target.is_finite()) {
                return Err(TuningError::NonPositiveTarget(target));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(TuningError::ZeroTickInterval);
        }

        let alerts_ordered = self.critical_pressure > 0.0
            && self.critical_pressure <= self.imminent_pressure
            && self.imminent_pressure <= self.pressure_max;
        if !alerts_ordered {
            return Err(TuningError::AlertOrdering {
                critical: self.critical_pressure,
                imminent: self.imminent_pressure,
            });
        }
        if self.log_capacity == Some(0) {
            return Err(TuningError::ZeroLogCapacity);
        }

        Ok(())
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
