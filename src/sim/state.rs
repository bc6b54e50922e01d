//! Engine lifecycle, inputs, transition results and snapshots

use serde::{Deserialize, Serialize};

use super::history::LogEntry;
use super::zone::{PressureAlert, Zone};

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No session
    Idle,
    /// Accepting actions and ticks
    Playing,
    /// Locked out after an overload until acknowledged
    Exploded,
    /// Target score reached (only with a target configured)
    Finished,
}

/// Player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Success,
    Fail,
    Release,
}

/// Where to go after an explosion is acknowledged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recovery {
    /// Back to Playing with score intact
    Resume,
    /// Back to Idle (same as reset)
    Reboot,
}

/// Transition results for the presentation layer (effects, sounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    Started,
    Success { points: f64 },
    Fail,
    Released,
    ComboExpired { streak: u32 },
    BleedBonus { points: u64 },
    Exploded,
    ExplosionCleared,
    TargetReached,
    /// Score passed the best score standing at run start (once per run)
    NewHighScore,
    Reset,
}

/// Result of one engine entry point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// False when the call was discarded in the current state
    pub accepted: bool,
    pub events: Vec<EngineEvent>,
}

impl Outcome {
    pub fn ignored() -> Self {
        Self {
            accepted: false,
            events: Vec::new(),
        }
    }

    pub fn accepted() -> Self {
        Self {
            accepted: true,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub fn contains(&self, event: &EngineEvent) -> bool {
        self.events.contains(event)
    }

    /// Fold another outcome into this one
    pub fn merge(&mut self, other: Outcome) {
        self.accepted |= other.accepted;
        self.events.extend(other.events);
    }
}

/// Read-only view of engine state after a mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: EngineState,
    pub score: f64,
    pub high_score: f64,
    pub pressure: f64,
    pub zone: Zone,
    pub alert: PressureAlert,
    pub combo: u32,
    pub combo_multiplier: f64,
    pub combo_timer: u32,
    pub target_score: Option<f64>,
    pub elapsed_ticks: u64,
    /// Newest first
    pub log: Vec<LogEntry>,
}
