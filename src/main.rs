//! Pressure Combo demo entry point
//!
//! Runs the engine under the autopilot and prints the final snapshot and
//! leaderboard as JSON.
//!
//! Usage: `pressure-combo [TUNING.json] [SEED] [TICKS]`

/// Autopilot decisions per tick
const DECISIONS_PER_TICK: u32 = 3;
/// Simulated host frame time
const FRAME_MS: f64 = 1000.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pressure_combo::Tuning;
    use pressure_combo::sim::{Autopilot, Clock, Engine, EngineState, FixedStepClock, Recovery};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) if path != "-" => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        },
        _ => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(300);

    let mut engine = match Engine::new(tuning) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };
    let interval_ms = engine.tuning().tick_interval_ms;
    let lockout_ticks = engine
        .tuning()
        .explosion_lockout_ms
        .div_ceil(interval_ms)
        .max(1);
    let mut clock = FixedStepClock::new(interval_ms);
    let mut pilot = Autopilot::new(seed);

    log::info!("Pressure Combo (native) starting, seed {}", seed);
    engine.start();
    clock.start();

    let mut frames_since_tick = 0.0;
    let mut lockout_remaining = 0;
    let mut ticks_run = 0;
    while ticks_run < ticks {
        clock.advance(FRAME_MS);
        frames_since_tick += FRAME_MS;

        // Spread decisions across the frames of one tick
        let decision_every = interval_ms as f64 / DECISIONS_PER_TICK as f64;
        if frames_since_tick >= decision_every {
            frames_since_tick -= decision_every;
            if let Some(action) = pilot.choose(&engine.snapshot()) {
                engine.submit(action);
            }
        }

        let due = clock.due_ticks();
        for _ in 0..due {
            ticks_run += 1;
            match engine.state() {
                EngineState::Exploded => {
                    // The presentation layer owns the lockout delay
                    if lockout_remaining == 0 {
                        lockout_remaining = lockout_ticks;
                    }
                    lockout_remaining -= 1;
                    if lockout_remaining == 0 {
                        engine.acknowledge_explosion(Recovery::Resume);
                    }
                }
                EngineState::Finished => {
                    engine.rematch();
                }
                _ => {
                    engine.tick();
                }
            }
        }
    }
    let last = engine.snapshot();
    engine.reset();

    let report = serde_json::json!({
        "last": last,
        "high_score": engine.high_score(),
        "leaderboard": engine.leaderboard(),
        "tuning": engine.tuning(),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Failed to serialize report: {}", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the engine is consumed as a library
}
