//! Audio cue derived from game state
//!
//! Synthesis lives in the host. The simulation only exposes which music
//! theme should play (the world tier) and which timed layer sits on top.

use crate::sim::{GamePhase, GameState, WorldTier};

/// Timed music layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimedMode {
    #[default]
    Normal,
    /// Hyper mode is running
    Hyper,
    /// Big gun is armed and ready
    WeaponReady,
}

/// What the audio host should be playing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCue {
    pub tier: WorldTier,
    pub mode: TimedMode,
    /// Music should be silent (paused or run over)
    pub muted: bool,
}

impl AudioCue {
    /// Hyper takes priority over an armed weapon
    pub fn from_state(state: &GameState) -> Self {
        let mode = if state.player.is_hyper() {
            TimedMode::Hyper
        } else if state.weapon.armed {
            TimedMode::WeaponReady
        } else {
            TimedMode::Normal
        };
        Self {
            tier: state.tier(),
            mode,
            muted: state.phase != GamePhase::Playing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_cue_modes() {
        let mut state = GameState::new(1, Tuning::default());
        let cue = AudioCue::from_state(&state);
        assert_eq!(cue.tier, WorldTier::Suburbs);
        assert_eq!(cue.mode, TimedMode::Normal);
        assert!(!cue.muted);

        state.weapon.unlock(3);
        state.weapon.toggle_arm();
        assert_eq!(AudioCue::from_state(&state).mode, TimedMode::WeaponReady);

        state.player.hyper_ticks = 10;
        assert_eq!(AudioCue::from_state(&state).mode, TimedMode::Hyper);

        state.phase = GamePhase::Paused;
        assert!(AudioCue::from_state(&state).muted);
    }
}
