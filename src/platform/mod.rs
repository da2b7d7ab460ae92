//! Platform abstraction layer
//!
//! The simulation never talks to a screen. Whatever hosts it (browser HUD,
//! terminal, test harness) implements `Frontend` to receive notifications
//! and per-tick score reports.

/// Presentation hooks called by the session driver
pub trait Frontend {
    /// Short human-readable message for an in-game event
    fn notify(&mut self, _message: &str) {}

    /// Score and level after each tick
    fn report(&mut self, _score: u64, _level: u32) {}
}

/// No-op frontend
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Frontend for Headless {}

/// Routes notifications to the `log` facade. Reports are only logged when
/// the level changes.
#[derive(Debug, Clone, Default)]
pub struct LogFrontend {
    last_level: u32,
}

impl Frontend for LogFrontend {
    fn notify(&mut self, message: &str) {
        log::info!("{}", message);
    }

    fn report(&mut self, score: u64, level: u32) {
        if level != self.last_level {
            self.last_level = level;
            log::debug!("score {} at level {}", score, level);
        }
    }
}

/// Keeps everything it receives, for tests and replays
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub messages: Vec<String>,
    pub reports: Vec<(u64, u32)>,
}

impl Frontend for Recorder {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn report(&mut self, score: u64, level: u32) {
        self.reports.push((score, level));
    }
}
