//! Lane Rush - A top-down lane dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, player, autopilot, progression)
//! - `session`: Fixed-timestep driver that feeds input and dispatches events
//! - `platform`: Notification/report hooks for whatever front end is attached
//! - `persistence`: Encoded currency/high-score values behind a key/value store
//! - `tuning`: Data-driven game balance
//! - `audio`: Read-only cue describing which theme the audio layer should play

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate. All speeds and timers are per tick at this rate.
    pub const TICK_RATE: u32 = 60;
    /// Seconds of wall-clock time covered by one tick
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Movement scale applied to velocities each tick
    pub const TICK_STEP: f32 = 1.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Elapsed time larger than this is treated as a stall and clamped
    pub const MAX_FRAME_SECS: f32 = 0.1;
}

/// Move `current` toward `target` by at most `max_step`
#[inline]
pub fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    let max_step = max_step.max(0.0);
    current + (target - current).clamp(-max_step, max_step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_clamps_step() {
        assert_eq!(approach(0.0, 10.0, 3.0), 3.0);
        assert_eq!(approach(10.0, 0.0, 3.0), 7.0);
        assert_eq!(approach(5.0, 6.0, 3.0), 6.0);
    }

    #[test]
    fn test_approach_negative_step_holds() {
        assert_eq!(approach(4.0, 10.0, -1.0), 4.0);
    }
}
