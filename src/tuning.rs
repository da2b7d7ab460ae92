//! Data-driven game balance
//!
//! Every gameplay number lives here so a JSON file can rebalance a run
//! without touching the simulation. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read or parse a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Autopilot planner knobs. None of these are load-bearing for correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotTuning {
    /// Number of candidate lane positions across the road
    pub lanes: usize,
    /// Ticks an enemy's motion is projected forward
    pub lookahead_ticks: f32,
    /// Extra horizontal clearance beyond touching, in pixels
    pub horizontal_margin: f32,
    /// Vertical window above the player's row that counts as threatening
    pub vertical_window: f32,
    /// Clearance under which a projected pass counts as an overlap
    pub overlap_margin: f32,
    /// Weight of the graded proximity penalty
    pub danger_weight: f32,
    /// Fixed penalty for a projected overlap
    pub overlap_penalty: f32,
    /// Cost per pixel of lateral travel (keeps the car from wandering)
    pub travel_weight: f32,
    /// Pull toward the nearest enemy ahead once it is safely distant
    pub enemy_attraction: f32,
    /// Pull toward the nearest shield pickup ahead
    pub shield_attraction: f32,
    /// Gap beyond which the nearest enemy is considered safely distant
    pub safe_distance: f32,
    /// Lateral speed relative to the player's base speed
    pub speed_multiplier: f32,
    /// Extra multiplier when the current lane is about to be hit
    pub imminent_boost: f32,
    /// Gap within which enemies count toward crowding
    pub crowd_window: f32,
    /// Multiplier applied when two or more enemies are close ahead
    pub crowd_throttle: f32,
    /// Gap within which an enemy in the current column forces a sidestep
    pub emergency_window: f32,
}

impl Default for AutopilotTuning {
    fn default() -> Self {
        Self {
            lanes: 7,
            lookahead_ticks: 40.0,
            horizontal_margin: 18.0,
            vertical_window: 140.0,
            overlap_margin: 4.0,
            danger_weight: 100.0,
            overlap_penalty: 1000.0,
            travel_weight: 0.05,
            enemy_attraction: 6.0,
            shield_attraction: 25.0,
            safe_distance: 220.0,
            speed_multiplier: 1.4,
            imminent_boost: 1.6,
            crowd_window: 160.0,
            crowd_throttle: 0.75,
            emergency_window: 90.0,
        }
    }
}

/// Complete game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Distance from the bottom edge to the top of the player's car
    pub player_row_offset: f32,
    pub base_speed: f32,
    pub boost_multiplier: f32,
    pub boost_ticks: u32,
    pub shield_ticks: u32,
    pub invulnerable_ticks: u32,

    // === Energy / hyper ===
    pub max_energy: f32,
    pub energy_per_tick: f32,
    pub energy_pickup: f32,
    pub hyper_ticks: u32,
    pub hyper_multiplier: f32,
    pub hyper_spawn_factor: f32,
    pub min_spawn_rate: f32,

    // === Enemies and pickups ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_start_speed: f32,
    pub spawn_rate: f32,
    /// Power-up spawn chance as a fraction of the enemy spawn rate
    pub power_up_spawn_factor: f32,
    pub power_up_size: f32,
    pub power_up_speed: f32,
    pub shield_weight: f32,
    pub speed_energy_weight: f32,
    pub currency_weight: f32,

    // === Bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    /// Largest lateral correction a homing bullet makes per tick
    pub homing_max_step: f32,
    /// Horizontal distance within which a fired bullet locks onto an enemy
    pub homing_lock_window: f32,
    /// Lateral velocity of the side bullets fired in hyper mode
    pub hyper_spread: f32,

    // === Scoring ===
    pub score_enemy_passed: u64,
    pub score_bullet_kill: u64,
    pub score_energy_pickup: u64,

    // === Progression ===
    pub level_ticks: u64,
    pub enemy_speed_step: f32,
    pub spawn_rate_step: f32,
    /// First level of each tier after the first (Highway, Desert, Neon)
    pub tier_levels: [u32; 3],
    pub money_rain_level: u32,
    pub money_rain_coins: usize,
    pub money_rain_lock_ticks: u32,
    pub finish_level: u32,
    pub finish_line_height: f32,
    pub finish_line_speed: f32,

    // === Weapon ===
    pub weapon_kill_threshold: u32,
    pub weapon_charges: u32,
    pub weapon_clear_ticks: u32,

    // === Explosions ===
    pub explosion_start_radius: f32,
    pub explosion_max_radius: f32,
    pub explosion_growth: f32,
    pub explosion_life: f32,

    pub autopilot: AutopilotTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 400.0,
            world_height: 600.0,

            player_width: 40.0,
            player_height: 60.0,
            player_row_offset: 80.0,
            base_speed: 5.0,
            boost_multiplier: 2.0,
            boost_ticks: 120,
            shield_ticks: 300,
            invulnerable_ticks: 60,

            max_energy: 100.0,
            energy_per_tick: 0.15,
            energy_pickup: 30.0,
            hyper_ticks: 300,
            hyper_multiplier: 3.0,
            hyper_spawn_factor: 0.5,
            min_spawn_rate: 0.001,

            enemy_width: 40.0,
            enemy_height: 60.0,
            enemy_start_speed: 3.0,
            spawn_rate: 0.02,
            power_up_spawn_factor: 0.3,
            power_up_size: 30.0,
            power_up_speed: 2.0,
            shield_weight: 0.4,
            speed_energy_weight: 0.45,
            currency_weight: 0.15,

            bullet_width: 5.0,
            bullet_height: 15.0,
            bullet_speed: 8.0,
            homing_max_step: 3.0,
            homing_lock_window: 120.0,
            hyper_spread: 1.5,

            score_enemy_passed: 10,
            score_bullet_kill: 25,
            score_energy_pickup: 50,

            level_ticks: 150,
            enemy_speed_step: 0.3,
            spawn_rate_step: 0.001,
            tier_levels: [5, 10, 18],
            money_rain_level: 8,
            money_rain_coins: 12,
            money_rain_lock_ticks: 180,
            finish_level: 25,
            finish_line_height: 20.0,
            finish_line_speed: 3.0,

            weapon_kill_threshold: 15,
            weapon_charges: 3,
            weapon_clear_ticks: 360,

            explosion_start_radius: 6.0,
            explosion_max_radius: 40.0,
            explosion_growth: 3.0,
            explosion_life: 24.0,

            autopilot: AutopilotTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read a tuning file, falling back to defaults if it is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Top of the player's car
    pub fn player_row(&self) -> f32 {
        self.world_height - self.player_row_offset
    }

    /// Rightmost x the player's car may occupy
    pub fn max_player_x(&self) -> f32 {
        (self.world_width - self.player_width).max(0.0)
    }
}
