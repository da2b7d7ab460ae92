//! Lane Rush headless runner
//!
//! Usage: `lane-rush [seed] [frames] [tuning.json]`
//!
//! Runs an autopilot session for a fixed number of ticks, logging events
//! and saving currency/high score next to the working directory.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_rush::Session;
    use lane_rush::consts::TICK_RATE;
    use lane_rush::persistence::FileStore;
    use lane_rush::platform::LogFrontend;
    use lane_rush::tuning::Tuning;

    env_logger::init();
    log::info!("Lane Rush (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Invalid seed {:?}, using 0", arg);
            0
        }),
        None => 0,
    };
    let default_frames = u64::from(TICK_RATE) * 60;
    let frames: u64 = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Invalid frame count {:?}, using {}", arg, default_frames);
            default_frames
        }),
        None => default_frames,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };

    let store = FileStore::open("lane_rush_save.json");
    log::info!("Saving progress to {}", store.path().display());
    let mut session = Session::new(seed, tuning, LogFrontend::default(), store);
    session.set_autopilot(true);

    for _ in 0..frames {
        session.step();
        if session.state().phase.is_over() {
            break;
        }
    }

    let state = session.state();
    println!(
        "{:?} after {} ticks: score {}, level {} ({}), kills {}, coins {}, best {}",
        state.phase,
        state.frame,
        state.score,
        state.level(),
        state.tier().name(),
        state.kill_count,
        state.currency,
        state.high_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `Session` directly
}
