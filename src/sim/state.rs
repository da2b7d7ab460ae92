//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything that changes during a run.
//! Front ends read it; only `tick` writes it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::player::Player;
use super::pool::EntityPool;
use super::progression::{Progression, WorldTier};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended by an unshielded collision
    Crashed,
    /// Run ended by reaching the finish line
    Finished,
}

impl GamePhase {
    /// Whether the run has ended (either way)
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Crashed | GamePhase::Finished)
    }
}

/// An oncoming car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed, fixed at spawn from the current difficulty
    pub speed: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    SpeedEnergy,
    Currency,
}

/// A pickup drifting down the road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(id: u32, pos: Vec2, size: f32, speed: f32, kind: PowerUpKind) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(size),
            speed,
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A player bullet travelling up the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward speed
    pub speed: f32,
    /// Constant lateral velocity (side shots in hyper mode)
    pub vx: f32,
    /// Center x the bullet steers toward, a bounded step per tick
    pub homing_x: Option<f32>,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Expanding ring left behind by a destroyed car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub radius: f32,
    /// Ticks left before the effect is culled
    pub life: f32,
}

/// The terminal finish line that scrolls in at the last milestone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishLine {
    pub y: f32,
    pub height: f32,
    pub speed: f32,
}

/// Kill-count weapon that wipes the road
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Weapon {
    pub unlocked: bool,
    pub armed: bool,
    pub charges: u32,
    /// Ticks left on the post-blast spawn suppression
    pub clear_ticks: u32,
}

impl Weapon {
    /// Make the weapon available with a full set of charges
    pub fn unlock(&mut self, charges: u32) {
        self.unlocked = true;
        self.charges = charges;
    }

    /// Weapon can be armed and fired
    pub fn is_ready(&self) -> bool {
        self.unlocked && self.charges > 0
    }

    /// Flip the armed flag. Returns the new value, or None if unavailable.
    pub fn toggle_arm(&mut self) -> Option<bool> {
        if !self.is_ready() {
            return None;
        }
        self.armed = !self.armed;
        Some(self.armed)
    }

    /// Spend one charge and start the clear timer. Returns false if not armed.
    ///
    /// Disarms afterwards; the weapon is lost when the last charge is used.
    pub fn discharge(&mut self, clear_ticks: u32) -> bool {
        if !self.armed || !self.is_ready() {
            return false;
        }
        self.clear_ticks = clear_ticks;
        self.charges -= 1;
        self.armed = false;
        if self.charges == 0 {
            self.unlocked = false;
        }
        true
    }
}

/// Discrete occurrences reported to the notification collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShieldActivated,
    ShieldBroken,
    ShieldFaded,
    EnergyBoost { energy: f32 },
    EnergyFull,
    BoostReleased,
    HyperStarted,
    HyperEnded,
    DirectHit,
    WeaponUnlocked { charges: u32 },
    WeaponArmed,
    WeaponDisarmed,
    WeaponFired { cleared: usize, charges_left: u32 },
    CurrencyCollected { balance: u64 },
    MoneyRain { coins: usize },
    LevelUp { level: u32 },
    WorldTierChanged { tier: WorldTier },
    FinishLineInSight,
    AutopilotToggled { enabled: bool },
    GameOver { score: u64, level: u32 },
    Finished { score: u64, level: u32 },
}

impl GameEvent {
    /// Short human-readable text for on-screen notifications
    pub fn message(&self) -> String {
        match self {
            GameEvent::ShieldActivated => "Shield activated!".to_string(),
            GameEvent::ShieldBroken => "Shield broken!".to_string(),
            GameEvent::ShieldFaded => "Shield faded".to_string(),
            GameEvent::EnergyBoost { energy } => {
                format!("Speed boost! Energy {}", energy.floor() as u32)
            }
            GameEvent::EnergyFull => "Energy full - hyper ready".to_string(),
            GameEvent::BoostReleased => "Boost released!".to_string(),
            GameEvent::HyperStarted => "HYPER SPEED!".to_string(),
            GameEvent::HyperEnded => "Hyper speed over".to_string(),
            GameEvent::DirectHit => "Direct hit!".to_string(),
            GameEvent::WeaponUnlocked { charges } => {
                format!("BIG GUN UNLOCKED! {} charges", charges)
            }
            GameEvent::WeaponArmed => "Big gun armed".to_string(),
            GameEvent::WeaponDisarmed => "Big gun disarmed".to_string(),
            GameEvent::WeaponFired {
                cleared,
                charges_left,
            } => format!("Road cleared! {} cars, {} charges left", cleared, charges_left),
            GameEvent::CurrencyCollected { balance } => format!("+1 coin ({})", balance),
            GameEvent::MoneyRain { coins } => format!("Money rain! {} coins incoming", coins),
            GameEvent::LevelUp { level } => format!("Level {}", level),
            GameEvent::WorldTierChanged { tier } => format!("Entering the {}", tier.name()),
            GameEvent::FinishLineInSight => "Finish line ahead!".to_string(),
            GameEvent::AutopilotToggled { enabled } => {
                if *enabled {
                    "Autopilot on".to_string()
                } else {
                    "Autopilot off".to_string()
                }
            }
            GameEvent::GameOver { score, level } => {
                format!("Game over - score {} at level {}", score, level)
            }
            GameEvent::Finished { score, level } => {
                format!("Finished! Score {} at level {}", score, level)
            }
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance table for this run
    pub tuning: Tuning,
    /// Seeded RNG; the only source of randomness in the simulation
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub frame: u64,
    pub score: u64,
    pub kill_count: u32,
    /// Persisted across runs
    pub currency: u64,
    /// Persisted across runs
    pub high_score: u64,
    pub player: Player,
    pub pool: EntityPool,
    pub progression: Progression,
    pub weapon: Weapon,
    /// Autopilot drives lateral input when set
    pub autopilot: bool,
    /// Ticks left on a milestone spawn lock
    pub spawn_lock_ticks: u32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            frame: 0,
            score: 0,
            kill_count: 0,
            currency: 0,
            high_score: 0,
            player: Player::new(&tuning),
            pool: EntityPool::default(),
            progression: Progression::new(&tuning),
            weapon: Weapon::default(),
            autopilot: false,
            spawn_lock_ticks: 0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Seed the persisted balances loaded at startup
    pub fn with_saved(mut self, currency: u64, high_score: u64) -> Self {
        self.currency = currency;
        self.high_score = high_score;
        self
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn tier(&self) -> WorldTier {
        self.progression.tier
    }

    pub fn push_event(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// End the run with the given terminal phase.
    ///
    /// Only the first call has an effect; later calls return false. Updates
    /// the high score and emits the matching terminal event.
    pub fn end_session(&mut self, outcome: GamePhase) -> bool {
        if self.phase.is_over() || !outcome.is_over() {
            return false;
        }
        self.phase = outcome;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        let (score, level) = (self.score, self.level());
        log::info!(
            "Run ended ({:?}) at frame {} (seed {}): score {}, level {}, kills {}",
            outcome,
            self.frame,
            self.seed,
            score,
            level,
            self.kill_count
        );
        let event = match outcome {
            GamePhase::Finished => GameEvent::Finished { score, level },
            _ => GameEvent::GameOver { score, level },
        };
        self.push_event(event);
        true
    }

    /// Start a fresh run, keeping currency, high score, autopilot and tuning.
    ///
    /// The RNG continues rather than reseeding so consecutive runs differ.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.frame = 0;
        self.score = 0;
        self.kill_count = 0;
        self.player = Player::new(&self.tuning);
        self.pool.clear();
        self.progression = Progression::new(&self.tuning);
        self.weapon = Weapon::default();
        self.spawn_lock_ticks = 0;
        self.events.clear();
        log::info!("Run restarted (currency {}, best {})", self.currency, self.high_score);
    }

    /// Allocate an entity id
    pub fn next_entity_id(&mut self) -> u32 {
        self.pool.next_entity_id()
    }
}
