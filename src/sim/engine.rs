//! Scoring engine state machine
//!
//! Owns every piece of session state. Mutations happen only through the
//! entry points below, each a single synchronous step that returns an
//! `Outcome`. Calls that are illegal in the current state are discarded
//! (`accepted == false`) rather than treated as errors.

use super::clock::Clock;
use super::combo::ComboTracker;
use super::history::{Actor, EventLog};
use super::pressure::PressureRegulator;
use super::score::ScoreAccumulator;
use super::state::{Action, EngineEvent, EngineState, Outcome, Recovery, Snapshot};
use super::zone::{PressureAlert, Zone, classify};
use crate::highscores::{HighScoreEntry, HighScores};
use crate::tuning::{Tuning, TuningError};

pub const OVERLOAD_MESSAGE: &str = "AIR PRESSURE OVERLOAD!";
pub const FAIL_MESSAGE: &str = "FAIL - PRESSURE RELEASED";
pub const RELEASE_MESSAGE: &str = "MANUAL PRESSURE RELEASE";
pub const TARGET_MESSAGE: &str = "TARGET SCORE REACHED";

/// Per-run bookkeeping
#[derive(Debug, Clone, Default)]
struct RunStats {
    explosions: u32,
    /// Best score standing when the run began
    high_score_at_start: f64,
    high_score_announced: bool,
    recorded: bool,
}

impl RunStats {
    fn new(high_score: f64) -> Self {
        Self {
            high_score_at_start: high_score,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    tuning: Tuning,
    state: EngineState,
    pressure: PressureRegulator,
    combo: ComboTracker,
    score: ScoreAccumulator,
    log: EventLog,
    leaderboard: HighScores,
    elapsed_ticks: u64,
    run: RunStats,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_valid(Tuning::default())
    }
}

impl Engine {
    /// Build an idle engine; rejects tunables that break ordering rules
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_valid(tuning))
    }

    fn from_valid(tuning: Tuning) -> Self {
        Self {
            state: EngineState::Idle,
            pressure: PressureRegulator::new(tuning.pressure_max, tuning.pressure_loss),
            combo: ComboTracker::new(&tuning),
            score: ScoreAccumulator::new(),
            log: EventLog::new(tuning.log_capacity),
            leaderboard: HighScores::new(),
            elapsed_ticks: 0,
            run: RunStats::default(),
            tuning,
        }
    }

    // === Accessors ===

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == EngineState::Playing
    }

    pub fn score(&self) -> f64 {
        self.score.score()
    }

    pub fn high_score(&self) -> f64 {
        self.score.high_score()
    }

    pub fn pressure(&self) -> f64 {
        self.pressure.pressure()
    }

    pub fn zone(&self) -> Zone {
        classify(self.pressure.pressure(), &self.tuning).zone
    }

    pub fn combo(&self) -> u32 {
        self.combo.combo()
    }

    pub fn combo_multiplier(&self) -> f64 {
        self.combo.multiplier()
    }

    pub fn combo_timer(&self) -> u32 {
        self.combo.timer()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn leaderboard(&self) -> &HighScores {
        &self.leaderboard
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Logical session time
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ticks.saturating_mul(self.tuning.tick_interval_ms)
    }

    pub fn snapshot(&self) -> Snapshot {
        let pressure = self.pressure.pressure();
        Snapshot {
            state: self.state,
            score: self.score.score(),
            high_score: self.score.high_score(),
            pressure,
            zone: classify(pressure, &self.tuning).zone,
            alert: PressureAlert::from_pressure(pressure, &self.tuning),
            combo: self.combo.combo(),
            combo_multiplier: self.combo.multiplier(),
            combo_timer: self.combo.timer(),
            target_score: self.tuning.target_score,
            elapsed_ticks: self.elapsed_ticks,
            log: self.log.to_vec(),
        }
    }

    // === Lifecycle ===

    /// Idle -> Playing
    pub fn start(&mut self) -> Outcome {
        if self.state != EngineState::Idle {
            log::trace!("start ignored in {:?}", self.state);
            return Outcome::ignored();
        }
        self.begin_run();
        log::info!("Session started (high score {:.1})", self.high_score());
        let mut outcome = Outcome::accepted();
        outcome.push(EngineEvent::Started);
        outcome
    }

    /// Finished -> Playing with a fresh score
    pub fn rematch(&mut self) -> Outcome {
        if self.state != EngineState::Finished {
            log::trace!("rematch ignored in {:?}", self.state);
            return Outcome::ignored();
        }
        self.begin_run();
        log::info!("Rematch started");
        let mut outcome = Outcome::accepted();
        outcome.push(EngineEvent::Started);
        outcome
    }

    /// Leave Exploded, either resuming the run or returning to Idle
    pub fn acknowledge_explosion(&mut self, recovery: Recovery) -> Outcome {
        if self.state != EngineState::Exploded {
            log::trace!("acknowledge ignored in {:?}", self.state);
            return Outcome::ignored();
        }
        match recovery {
            Recovery::Resume => {
                self.state = EngineState::Playing;
                log::info!("Explosion cleared, resuming at score {:.1}", self.score());
                let mut outcome = Outcome::accepted();
                outcome.push(EngineEvent::ExplosionCleared);
                outcome
            }
            Recovery::Reboot => {
                let mut outcome = Outcome::accepted();
                outcome.push(EngineEvent::ExplosionCleared);
                outcome.merge(self.reset());
                outcome
            }
        }
    }

    /// Any state -> Idle. Zeroes the session; keeps the high score.
    pub fn reset(&mut self) -> Outcome {
        if matches!(self.state, EngineState::Playing | EngineState::Exploded) {
            self.record_run();
        }
        self.clear_session();
        self.state = EngineState::Idle;
        log::info!("Engine reset");
        let mut outcome = Outcome::accepted();
        outcome.push(EngineEvent::Reset);
        outcome
    }

    fn begin_run(&mut self) {
        self.clear_session();
        self.run = RunStats::new(self.score.high_score());
        self.state = EngineState::Playing;
    }

    fn clear_session(&mut self) {
        self.pressure.reset();
        self.combo.reset();
        self.score.reset();
        self.log.clear();
        self.elapsed_ticks = 0;
    }

    // === Actions ===

    pub fn success(&mut self) -> Outcome {
        self.submit(Action::Success)
    }

    pub fn fail(&mut self) -> Outcome {
        self.submit(Action::Fail)
    }

    pub fn release(&mut self) -> Outcome {
        self.submit(Action::Release)
    }

    /// Apply a player action; discarded unless Playing
    pub fn submit(&mut self, action: Action) -> Outcome {
        if self.state != EngineState::Playing {
            log::trace!("{:?} ignored in {:?}", action, self.state);
            return Outcome::ignored();
        }

        let mut outcome = Outcome::accepted();
        match action {
            Action::Success => self.apply_success(&mut outcome),
            Action::Fail => {
                let amount = self.tuning.fail_pressure_release;
                self.apply_release(&mut outcome, amount, FAIL_MESSAGE, EngineEvent::Fail);
            }
            Action::Release => {
                let amount = self.tuning.pressure_release;
                self.apply_release(&mut outcome, amount, RELEASE_MESSAGE, EngineEvent::Released);
            }
        }
        self.settle(&mut outcome);
        outcome
    }

    fn apply_success(&mut self, outcome: &mut Outcome) {
        // Zone is read before this success adds pressure
        let zone = classify(self.pressure.pressure(), &self.tuning);
        let combo_multiplier = self.combo.on_success();
        let points = self
            .score
            .on_success(self.tuning.base_points, zone.multiplier, combo_multiplier);
        let change = self
            .pressure
            .apply_delta(self.tuning.pressure_gain * zone.multiplier);

        log::debug!(
            "SUCCESS +{:.1} ({:?} x{}, combo {} x{:.1}) pressure {:.1}{}",
            points,
            zone.zone,
            zone.multiplier,
            self.combo.combo(),
            combo_multiplier,
            change.pressure,
            if change.clamped { " (clamped)" } else { "" }
        );

        self.log.append(
            Actor::Player,
            format!("SUCCESS +{:.1} PTS", points),
            self.elapsed_ms(),
        );
        outcome.push(EngineEvent::Success { points });
        self.check_high_score(outcome);
    }

    fn apply_release(&mut self, outcome: &mut Outcome, amount: f64, message: &str, event: EngineEvent) {
        let streak = self.combo.combo();
        self.combo.on_fail_or_release();
        let change = self.pressure.apply_delta(-amount);
        log::debug!(
            "{} (lost streak {}) pressure {:.1}",
            message,
            streak,
            change.pressure
        );
        self.log.append(Actor::Player, message, self.elapsed_ms());
        outcome.push(event);
    }

    // === Time ===

    /// One clock tick: decay, combo countdown, bleed bonus, then checks
    pub fn tick(&mut self) -> Outcome {
        if self.state != EngineState::Playing {
            return Outcome::ignored();
        }

        let mut outcome = Outcome::accepted();
        self.elapsed_ticks += 1;

        let change = self.pressure.decay_tick();
        log::trace!("tick {} pressure {:.1}", self.elapsed_ticks, change.pressure);

        if let Some(streak) = self.combo.tick() {
            log::debug!("Combo of {} expired", streak);
            outcome.push(EngineEvent::ComboExpired { streak });
        }

        if self.tuning.bleed_bonus_enabled {
            let points = self
                .score
                .bleed_tick(self.pressure.pressure(), self.tuning.bleed_rate);
            if points > 0 {
                outcome.push(EngineEvent::BleedBonus { points });
                self.check_high_score(&mut outcome);
            }
        }

        self.settle(&mut outcome);
        outcome
    }

    /// Drain every tick the clock has due
    pub fn pump(&mut self, clock: &mut dyn Clock) -> Outcome {
        let mut outcome = Outcome::ignored();
        for _ in 0..clock.due_ticks() {
            outcome.merge(self.tick());
        }
        outcome
    }

    // === Post-mutation checks ===

    /// Win check first, then overload
    fn settle(&mut self, outcome: &mut Outcome) {
        if let Some(target) = self.tuning.target_score {
            if self.score.score() >= target {
                self.finish(outcome);
                return;
            }
        }
        if self.pressure.is_saturated() {
            self.explode(outcome);
        }
    }

    fn finish(&mut self, outcome: &mut Outcome) {
        self.state = EngineState::Finished;
        self.log.append(Actor::System, TARGET_MESSAGE, self.elapsed_ms());
        log::info!("Target reached with score {:.1}", self.score());
        outcome.push(EngineEvent::TargetReached);
        self.record_run();
    }

    fn explode(&mut self, outcome: &mut Outcome) {
        self.log.append(Actor::System, OVERLOAD_MESSAGE, self.elapsed_ms());
        self.pressure.reset();
        self.combo.on_fail_or_release();
        self.run.explosions += 1;
        self.state = EngineState::Exploded;
        log::info!(
            "Pressure overload at score {:.1} (explosion #{})",
            self.score(),
            self.run.explosions
        );
        outcome.push(EngineEvent::Exploded);
    }

    fn check_high_score(&mut self, outcome: &mut Outcome) {
        let run = &mut self.run;
        if !run.high_score_announced
            && run.high_score_at_start > 0.0
            && self.score.score() > run.high_score_at_start
        {
            run.high_score_announced = true;
            log::info!("New high score {:.1}", self.score.score());
            outcome.push(EngineEvent::NewHighScore);
        }
    }

    fn record_run(&mut self) {
        if self.run.recorded {
            return;
        }
        self.run.recorded = true;
        let entry = HighScoreEntry {
            score: self.score.score(),
            best_combo: self.combo.best(),
            explosions: self.run.explosions,
            elapsed_ticks: self.elapsed_ticks,
        };
        if let Some(rank) = self.leaderboard.add(entry) {
            log::info!("Run scored {:.1}, leaderboard rank {}", self.score(), rank);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::ManualClock;
    use crate::sim::history::LogEntry;

    fn playing(tuning: Tuning) -> Engine {
        let mut engine = Engine::new(tuning).expect("valid tuning");
        assert!(engine.start().accepted);
        engine
    }

    fn overload_entries(engine: &Engine) -> Vec<&LogEntry> {
        engine
            .log()
            .entries()
            .filter(|e| e.description == OVERLOAD_MESSAGE)
            .collect()
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let tuning = Tuning {
            green_max: 75.0,
            yellow_max: 40.0,
            ..Default::default()
        };
        assert!(Engine::new(tuning).is_err());
    }

    #[test]
    fn test_actions_ignored_while_idle() {
        let mut engine = Engine::default();
        let before = engine.snapshot();
        assert!(!engine.success().accepted);
        assert!(!engine.fail().accepted);
        assert!(!engine.release().accepted);
        assert!(!engine.tick().accepted);
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut engine = playing(Tuning::default());
        engine.success();
        assert!(!engine.start().accepted);
        assert_eq!(engine.score(), 1.0);
    }

    #[test]
    fn test_three_green_successes() {
        let mut engine = playing(Tuning::default());
        for _ in 0..3 {
            engine.success();
        }
        let snap = engine.snapshot();
        assert_eq!(snap.pressure, 30.0);
        assert_eq!(snap.combo, 3);
        assert!((snap.combo_multiplier - 1.2).abs() < 1e-9);
        assert_eq!(snap.score, 3.3);
        assert_eq!(snap.zone, Zone::Green);
        assert_eq!(snap.log[0].description, "SUCCESS +1.2 PTS");
        assert_eq!(snap.log[2].description, "SUCCESS +1.0 PTS");
        assert_eq!(snap.log[0].actor, Actor::Player);
    }

    #[test]
    fn test_fail_releases_pressure() {
        let mut engine = playing(Tuning::default());
        for _ in 0..3 {
            engine.success();
        }
        let outcome = engine.fail();
        assert!(outcome.contains(&EngineEvent::Fail));
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.combo_multiplier(), 1.0);
        assert_eq!(engine.pressure(), 15.0);

        engine.fail();
        assert_eq!(engine.pressure(), 0.0);
        assert_eq!(
            engine.log().latest().map(|e| e.description.as_str()),
            Some(FAIL_MESSAGE)
        );
        // Score untouched by fails
        assert_eq!(engine.score(), 3.3);
    }

    #[test]
    fn test_manual_release() {
        let mut engine = playing(Tuning::default());
        for _ in 0..5 {
            engine.success();
        }
        assert_eq!(engine.pressure(), 50.0);
        let outcome = engine.release();
        assert!(outcome.contains(&EngineEvent::Released));
        assert_eq!(engine.pressure(), 25.0);
        assert_eq!(engine.combo(), 0);
        assert_eq!(
            engine.log().latest().map(|e| e.description.as_str()),
            Some(RELEASE_MESSAGE)
        );
    }

    #[test]
    fn test_zone_scales_gain_and_points() {
        let mut engine = playing(Tuning::default());
        for _ in 0..5 {
            engine.success();
        }
        // 50 is Yellow: gain 15, points 1.5 * 1.5
        assert_eq!(engine.zone(), Zone::Yellow);
        let outcome = engine.success();
        assert_eq!(engine.pressure(), 65.0);
        assert!(outcome.contains(&EngineEvent::Success { points: 2.3 }));
    }

    #[test]
    fn test_combo_expires_after_five_ticks() {
        let mut engine = playing(Tuning::default());
        for _ in 0..3 {
            engine.success();
        }
        for _ in 0..4 {
            let outcome = engine.tick();
            assert!(outcome.events.is_empty());
        }
        assert_eq!(engine.combo(), 3);
        assert_eq!(engine.combo_timer(), 4);

        let outcome = engine.tick();
        assert!(outcome.contains(&EngineEvent::ComboExpired { streak: 3 }));
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.combo_multiplier(), 1.0);
        assert_eq!(engine.combo_timer(), 0);
        assert_eq!(engine.pressure(), 27.5);
    }

    #[test]
    fn test_explosion() {
        let mut engine = playing(Tuning::default());
        // 10, 20, 30, 40, 50, 65, 80
        for _ in 0..7 {
            engine.success();
        }
        assert_eq!(engine.pressure(), 80.0);
        assert_eq!(engine.state(), EngineState::Playing);

        // Red zone: 80 + 20 saturates
        let outcome = engine.success();
        assert!(outcome.contains(&EngineEvent::Exploded));
        assert_eq!(engine.state(), EngineState::Exploded);
        assert_eq!(engine.pressure(), 0.0);
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.combo_multiplier(), 1.0);
        assert_eq!(engine.combo_timer(), 0);
        assert_eq!(engine.score(), 14.1);
        assert_eq!(engine.high_score(), 14.1);

        let overloads = overload_entries(&engine);
        assert_eq!(overloads.len(), 1);
        assert_eq!(overloads[0].actor, Actor::System);
        assert_eq!(engine.log().latest().map(|e| e.actor), Some(Actor::System));
    }

    #[test]
    fn test_exploded_is_deaf_until_acknowledged() {
        let mut engine = playing(Tuning::default());
        while engine.state() == EngineState::Playing {
            engine.success();
        }
        let frozen = engine.snapshot();
        assert!(!engine.success().accepted);
        assert!(!engine.release().accepted);
        assert!(!engine.tick().accepted);
        assert_eq!(engine.snapshot(), frozen);
        assert_eq!(overload_entries(&engine).len(), 1);

        let outcome = engine.acknowledge_explosion(Recovery::Resume);
        assert!(outcome.contains(&EngineEvent::ExplosionCleared));
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.score(), frozen.score);
        assert!(engine.success().accepted);
        assert!(!engine.acknowledge_explosion(Recovery::Resume).accepted);
    }

    #[test]
    fn test_reboot_after_explosion() {
        let mut engine = playing(Tuning::default());
        while engine.state() == EngineState::Playing {
            engine.success();
        }
        let outcome = engine.acknowledge_explosion(Recovery::Reboot);
        assert!(outcome.contains(&EngineEvent::Reset));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.score(), 0.0);
        assert_eq!(engine.high_score(), 14.1);
        assert_eq!(engine.leaderboard().len(), 1);
        let entry = &engine.leaderboard().entries[0];
        assert_eq!(entry.explosions, 1);
        assert_eq!(entry.best_combo, 8);
    }

    #[test]
    fn test_target_reached() {
        let mut engine = playing(Tuning::with_target(3.0));
        engine.success();
        engine.success();
        let outcome = engine.success();
        assert!(outcome.contains(&EngineEvent::TargetReached));
        assert_eq!(engine.state(), EngineState::Finished);
        assert_eq!(
            engine.log().latest().map(|e| e.description.as_str()),
            Some(TARGET_MESSAGE)
        );
        assert!(!engine.success().accepted);
        assert!(!engine.tick().accepted);
        assert_eq!(engine.leaderboard().top_score(), Some(3.3));

        let outcome = engine.rematch();
        assert!(outcome.contains(&EngineEvent::Started));
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.score(), 0.0);
        assert_eq!(engine.high_score(), 3.3);
        assert!(engine.log().is_empty());

        // Finished runs aren't recorded twice
        engine.reset();
        assert_eq!(engine.leaderboard().len(), 1);
    }

    #[test]
    fn test_rematch_only_from_finished() {
        let mut engine = playing(Tuning::default());
        assert!(!engine.rematch().accepted);
    }

    #[test]
    fn test_bleed_bonus() {
        let tuning = Tuning {
            bleed_bonus_enabled: true,
            bleed_rate: 0.1,
            ..Default::default()
        };
        let mut engine = playing(tuning);
        for _ in 0..5 {
            engine.success();
        }
        assert_eq!(engine.score(), 6.0);
        let outcome = engine.tick();
        // 49.5 * 0.1 rounds to 5
        assert!(outcome.contains(&EngineEvent::BleedBonus { points: 5 }));
        assert_eq!(engine.score(), 11.0);
    }

    #[test]
    fn test_bleed_disabled_by_default() {
        let mut engine = playing(Tuning::default());
        for _ in 0..5 {
            engine.success();
        }
        engine.tick();
        assert_eq!(engine.score(), 6.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut engine = playing(Tuning::default());
        for _ in 0..4 {
            engine.success();
        }
        engine.tick();
        engine.fail();

        engine.reset();
        let first = engine.snapshot();
        assert_eq!(first.state, EngineState::Idle);
        assert_eq!(first.score, 0.0);
        assert_eq!(first.pressure, 0.0);
        assert_eq!(first.combo, 0);
        assert_eq!(first.combo_multiplier, 1.0);
        assert_eq!(first.combo_timer, 0);
        assert_eq!(first.elapsed_ticks, 0);
        assert!(first.log.is_empty());
        assert_eq!(first.high_score, 4.6);

        engine.reset();
        assert_eq!(engine.snapshot(), first);
    }

    #[test]
    fn test_new_high_score_announced_once() {
        let mut engine = playing(Tuning::default());
        engine.success();
        engine.success();
        engine.reset();
        engine.start();

        // 1.0, then 2.1 ties the standing best
        assert!(!engine.success().contains(&EngineEvent::NewHighScore));
        assert!(!engine.success().contains(&EngineEvent::NewHighScore));
        assert!(engine.success().contains(&EngineEvent::NewHighScore));
        assert!(!engine.success().contains(&EngineEvent::NewHighScore));
        assert_eq!(engine.high_score(), 4.6);
    }

    #[test]
    fn test_pump_drains_clock() {
        let mut engine = Engine::default();
        let mut clock = ManualClock::new();
        clock.advance(3);
        assert!(!engine.pump(&mut clock).accepted);
        assert_eq!(engine.elapsed_ticks(), 0);

        engine.start();
        clock.advance(3);
        assert!(engine.pump(&mut clock).accepted);
        assert_eq!(engine.elapsed_ticks(), 3);
        assert_eq!(engine.elapsed_ms(), 3000);
    }

    #[test]
    fn test_log_timestamps_follow_ticks() {
        let mut engine = playing(Tuning::default());
        engine.success();
        for _ in 0..65 {
            engine.tick();
        }
        engine.fail();
        let entries: Vec<_> = engine.log().entries().collect();
        assert_eq!(entries[0].timestamp, "00:01:05");
        assert_eq!(entries[1].timestamp, "00:00:00");
        assert!(entries[0].id > entries[1].id);
    }
}
