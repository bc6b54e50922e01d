//! Deterministic scoring engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Whole ticks only, fed by an injectable clock
//! - Seeded RNG only (autopilot)
//! - No rendering, audio or wall-clock dependencies

pub mod autopilot;
pub mod clock;
pub mod combo;
pub mod engine;
pub mod history;
pub mod pressure;
pub mod score;
pub mod state;
pub mod zone;

pub use autopilot::Autopilot;
pub use clock::{Clock, FixedStepClock, ManualClock};
pub use combo::ComboTracker;
pub use engine::{Engine, OVERLOAD_MESSAGE};
pub use history::{Actor, EventLog, LogEntry};
pub use pressure::{PressureChange, PressureRegulator};
pub use score::ScoreAccumulator;
pub use state::{Action, EngineEvent, EngineState, Outcome, Recovery, Snapshot};
pub use zone::{Classification, PressureAlert, Zone, classify};
