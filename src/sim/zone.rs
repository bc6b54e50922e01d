//! Pressure zone banding
//!
//! Zones are derived from pressure on demand and never stored.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Pressure band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    Green,
    Yellow,
    Red,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Green => "GREEN",
            Zone::Yellow => "YELLOW",
            Zone::Red => "RED",
        }
    }
}

/// Zone plus its score multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub zone: Zone,
    pub multiplier: f64,
}

/// Classify a (pre-clamped) pressure value. Upper bounds are inclusive.
pub fn classify(pressure: f64, tuning: &Tuning) -> Classification {
    let m = &tuning.zone_multipliers;
    if pressure <= tuning.green_max {
        Classification {
            zone: Zone::Green,
            multiplier: m.green,
        }
    } else if pressure <= tuning.yellow_max {
        Classification {
            zone: Zone::Yellow,
            multiplier: m.yellow,
        }
    } else {
        Classification {
            zone: Zone::Red,
            multiplier: m.red,
        }
    }
}

/// Gauge warning level shown by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureAlert {
    Stable,
    /// Above the critical threshold
    Critical,
    /// At or above the imminent threshold
    Imminent,
}

impl PressureAlert {
    pub fn from_pressure(pressure: f64, tuning: &Tuning) -> Self {
        if pressure >= tuning.imminent_pressure {
            PressureAlert::Imminent
        } else if pressure > tuning.critical_pressure {
            PressureAlert::Critical
        } else {
            PressureAlert::Stable
        }
    }
}
