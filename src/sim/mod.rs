//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod player;
pub mod pool;
pub mod progression;
pub mod state;
pub mod tick;

pub use autopilot::Plan;
pub use collision::{Rect, rects_overlap};
pub use player::{HitOutcome, Player};
pub use pool::EntityPool;
pub use progression::{Difficulty, Progression, WorldTier};
pub use state::{
    Bullet, Enemy, Explosion, FinishLine, GameEvent, GamePhase, GameState, PowerUp, PowerUpKind,
    Weapon,
};
pub use tick::{TickInput, tick};
