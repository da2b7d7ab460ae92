//! Session driver
//!
//! Owns the game state and its collaborators. Converts wall-clock time into
//! fixed ticks, clears one-shot input after each tick, forwards events to
//! the frontend and pushes currency/high score to the store whenever they
//! change.

use crate::audio::AudioCue;
use crate::consts::{MAX_FRAME_SECS, MAX_SUBSTEPS, SIM_DT};
use crate::persistence::{MemoryStore, SavedProgress, Store};
use crate::platform::{Frontend, Headless};
use crate::sim::{GameState, TickInput, tick};
use crate::tuning::Tuning;

pub struct Session<F: Frontend = Headless, S: Store = MemoryStore> {
    state: GameState,
    input: TickInput,
    frontend: F,
    store: S,
    accumulator: f32,
    /// Last values written to the store
    saved: SavedProgress,
}

impl<F: Frontend, S: Store> Session<F, S> {
    /// Start a session, seeding currency and high score from the store
    pub fn new(seed: u64, tuning: Tuning, frontend: F, store: S) -> Self {
        let saved = SavedProgress::load(&store);
        let state = GameState::new(seed, tuning).with_saved(saved.currency, saved.high_score);
        log::info!("Session started with seed {}", seed);
        Self {
            state,
            input: TickInput::default(),
            frontend,
            store,
            accumulator: 0.0,
            saved,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for hosts that script scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    /// Latch input for the next tick. One-shot actions are cleared after
    /// every step, so anything other than `pause` or `restart` sent while
    /// paused or after the run ended is dropped.
    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Turn the autopilot on or off without going through a toggle input
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.state.autopilot = enabled;
    }

    pub fn audio_cue(&self) -> AudioCue {
        AudioCue::from_state(&self.state)
    }

    /// Run as many fixed ticks as `elapsed_secs` covers. Returns the number
    /// of ticks run.
    pub fn advance(&mut self, elapsed_secs: f32) -> u32 {
        let dt = elapsed_secs.clamp(0.0, MAX_FRAME_SECS);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one tick
    pub fn step(&mut self) {
        tick(&mut self.state, &self.input);
        self.input.clear_one_shots();

        for event in self.state.drain_events() {
            self.frontend.notify(&event.message());
        }
        self.frontend.report(self.state.score, self.state.level());
        self.persist();
    }

    /// Start a new run on the next tick and run it
    pub fn restart(&mut self) {
        self.input.restart = true;
        self.accumulator = 0.0;
        self.step();
    }

    fn persist(&mut self) {
        let current = SavedProgress {
            currency: self.state.currency,
            high_score: self.state.high_score,
        };
        if current == self.saved {
            return;
        }
        if let Err(e) = current.save(&mut self.store) {
            log::warn!("Failed to save progress: {}", e);
        }
        // Don't retry every tick on a broken store
        self.saved = current;
    }
}
