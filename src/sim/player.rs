//! The player's car and its layered timers
//!
//! Several modes can be active at once (a boosted, shielded car in hyper
//! mode is legal), so each one is an explicit countdown rather than a single
//! state enum. Each method below documents what it enters and what it undoes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::progression::Difficulty;
use super::state::GameEvent;
use crate::tuning::Tuning;

/// What a lethal collision did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Grace period active, collision ignored
    Ignored,
    /// Shield consumed, grace period started
    Absorbed,
    /// No protection left, the run is over
    Fatal,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Speed outside of boost (tripled while hyper is active)
    pub base_speed: f32,
    /// Current lateral speed magnitude
    pub speed: f32,
    /// Lateral velocity this tick
    pub dx: f32,
    pub shield: bool,
    pub shield_ticks: u32,
    pub boost_ticks: u32,
    pub braking: bool,
    pub invulnerable_ticks: u32,
    pub energy: f32,
    pub hyper_ticks: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                (tuning.world_width / 2.0 - tuning.player_width / 2.0).floor(),
                tuning.player_row(),
            ),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            base_speed: tuning.base_speed,
            speed: tuning.base_speed,
            dx: 0.0,
            shield: false,
            shield_ticks: 0,
            boost_ticks: 0,
            braking: false,
            invulnerable_ticks: 0,
            energy: 0.0,
            hyper_ticks: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn is_hyper(&self) -> bool {
        self.hyper_ticks > 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    pub fn is_boosting(&self) -> bool {
        self.boost_ticks > 0
    }

    /// Feed the held brake state.
    ///
    /// Press: zero lateral velocity and lock steering.
    /// Release: unlock steering and start a boost at `boost_multiplier` times
    /// base speed for `boost_ticks`.
    pub fn set_brake(&mut self, held: bool, tuning: &Tuning) -> Option<GameEvent> {
        match (held, self.braking) {
            (true, false) => {
                self.braking = true;
                self.dx = 0.0;
                None
            }
            (false, true) => {
                self.braking = false;
                self.boost_ticks = tuning.boost_ticks;
                self.speed = self.base_speed * tuning.boost_multiplier;
                Some(GameEvent::BoostReleased)
            }
            _ => None,
        }
    }

    /// Human steering from held directions. Left wins if both are held.
    pub fn steer(&mut self, left: bool, right: bool) {
        self.dx = if self.braking {
            0.0
        } else if left {
            -self.speed
        } else if right {
            self.speed
        } else {
            0.0
        };
    }

    /// Steer toward a target x, moving at most `step` this tick
    pub fn steer_toward(&mut self, target_x: f32, step: f32) {
        self.dx = if self.braking {
            0.0
        } else {
            (target_x - self.pos.x).clamp(-step.max(0.0), step.max(0.0))
        };
    }

    /// Apply lateral velocity and clamp to the road
    pub fn integrate(&mut self, world_width: f32) {
        let max_x = (world_width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + self.dx).clamp(0.0, max_x);
    }

    /// Count down shield, boost and grace timers.
    ///
    /// Shield expiry clears the flag; boost expiry restores base speed.
    pub fn tick_timers(&mut self) -> Option<GameEvent> {
        let mut event = None;
        if self.shield {
            self.shield_ticks = self.shield_ticks.saturating_sub(1);
            if self.shield_ticks == 0 {
                self.shield = false;
                event = Some(GameEvent::ShieldFaded);
            }
        }

        if self.boost_ticks > 0 {
            self.boost_ticks -= 1;
            if self.boost_ticks == 0 {
                self.speed = self.base_speed;
            }
        }

        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
        event
    }

    /// Add energy, clamped to `[0, max]`. Returns true if this filled the bar.
    pub fn charge(&mut self, amount: f32, max: f32) -> bool {
        let was_full = self.energy >= max;
        self.energy = (self.energy + amount).clamp(0.0, max.max(0.0));
        !was_full && self.energy >= max
    }

    /// Enter hyper mode if the energy bar is full.
    ///
    /// Zeroes energy, multiplies base speed, and suppresses the spawn rate
    /// until `tick_hyper` reports expiry.
    pub fn try_enter_hyper(&mut self, difficulty: &mut Difficulty, tuning: &Tuning) -> bool {
        if self.is_hyper() || self.energy < tuning.max_energy {
            return false;
        }
        self.energy = 0.0;
        self.hyper_ticks = tuning.hyper_ticks.max(1);
        self.base_speed *= tuning.hyper_multiplier;
        self.speed = self.base_speed;
        difficulty.suppress(tuning.hyper_spawn_factor, tuning.min_spawn_rate);
        true
    }

    /// Count down hyper mode. On expiry restores base speed and the saved
    /// spawn rate, and returns true.
    pub fn tick_hyper(&mut self, difficulty: &mut Difficulty, tuning: &Tuning) -> bool {
        if self.hyper_ticks == 0 {
            return false;
        }
        self.hyper_ticks -= 1;
        if self.hyper_ticks > 0 {
            return false;
        }
        self.base_speed = tuning.base_speed;
        self.speed = self.base_speed;
        difficulty.restore();
        true
    }

    pub fn grant_shield(&mut self, ticks: u32) {
        self.shield = true;
        self.shield_ticks = ticks.max(1);
    }

    /// Apply a lethal collision.
    ///
    /// During the grace period the hit is ignored. A shield is consumed and
    /// starts the grace period. Otherwise the hit is fatal.
    pub fn resolve_hit(&mut self, grace_ticks: u32) -> HitOutcome {
        if self.is_invulnerable() {
            return HitOutcome::Ignored;
        }
        if self.shield {
            self.shield = false;
            self.shield_ticks = 0;
            self.invulnerable_ticks = grace_ticks;
            return HitOutcome::Absorbed;
        }
        HitOutcome::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (Player, Difficulty, Tuning) {
        let tuning = Tuning::default();
        (Player::new(&tuning), Difficulty::new(&tuning), tuning)
    }

    #[test]
    fn test_starts_centered_on_player_row() {
        let (player, _, tuning) = setup();
        assert_eq!(player.pos, Vec2::new(180.0, tuning.player_row()));
        assert_eq!(player.speed, tuning.base_speed);
    }

    #[test]
    fn test_brake_locks_steering_then_boosts() {
        let (mut player, _, tuning) = setup();
        player.steer(true, false);
        assert_eq!(player.dx, -5.0);

        assert_eq!(player.set_brake(true, &tuning), None);
        assert_eq!(player.dx, 0.0);
        player.steer(true, false);
        assert_eq!(player.dx, 0.0);

        // Holding the brake is not a second press
        assert_eq!(player.set_brake(true, &tuning), None);

        assert_eq!(player.set_brake(false, &tuning), Some(GameEvent::BoostReleased));
        assert_eq!(player.speed, 10.0);
        assert_eq!(player.boost_ticks, tuning.boost_ticks);

        for _ in 0..tuning.boost_ticks {
            player.tick_timers();
        }
        assert_eq!(player.boost_ticks, 0);
        assert_eq!(player.speed, tuning.base_speed);
    }

    #[test]
    fn test_shield_expires() {
        let (mut player, _, _) = setup();
        player.grant_shield(2);
        assert_eq!(player.tick_timers(), None);
        assert!(player.shield);
        assert_eq!(player.tick_timers(), Some(GameEvent::ShieldFaded));
        assert!(!player.shield);
    }

    #[test]
    fn test_hit_outcomes() {
        let (mut player, _, tuning) = setup();
        player.grant_shield(tuning.shield_ticks);

        assert_eq!(player.resolve_hit(tuning.invulnerable_ticks), HitOutcome::Absorbed);
        assert!(!player.shield);
        assert!(player.is_invulnerable());

        assert_eq!(player.resolve_hit(tuning.invulnerable_ticks), HitOutcome::Ignored);

        for _ in 0..tuning.invulnerable_ticks {
            player.tick_timers();
        }
        assert_eq!(player.resolve_hit(tuning.invulnerable_ticks), HitOutcome::Fatal);
    }

    #[test]
    fn test_hyper_needs_full_energy() {
        let (mut player, mut difficulty, tuning) = setup();
        player.energy = tuning.max_energy - 1.0;
        assert!(!player.try_enter_hyper(&mut difficulty, &tuning));
        assert_eq!(difficulty.spawn_rate, tuning.spawn_rate);
    }

    #[test]
    fn test_hyper_round_trip_restores_speed_and_spawn_rate() {
        let (mut player, mut difficulty, tuning) = setup();
        player.charge(1000.0, tuning.max_energy);
        assert!(player.try_enter_hyper(&mut difficulty, &tuning));

        assert_eq!(player.energy, 0.0);
        assert_eq!(player.base_speed, tuning.base_speed * 3.0);
        assert_eq!(player.speed, player.base_speed);
        assert_eq!(difficulty.spawn_rate, tuning.spawn_rate * 0.5);

        // Cannot stack
        player.energy = tuning.max_energy;
        assert!(!player.try_enter_hyper(&mut difficulty, &tuning));

        let mut ended = false;
        for _ in 0..tuning.hyper_ticks {
            ended = player.tick_hyper(&mut difficulty, &tuning);
        }
        assert!(ended);
        assert!(!player.is_hyper());
        assert_eq!(player.base_speed, tuning.base_speed);
        assert_eq!(player.speed, tuning.base_speed);
        assert_eq!(difficulty.spawn_rate, tuning.spawn_rate);
    }

    #[test]
    fn test_charge_reports_filling_once() {
        let (mut player, _, tuning) = setup();
        assert!(!player.charge(50.0, tuning.max_energy));
        assert!(player.charge(60.0, tuning.max_energy));
        assert!(!player.charge(1.0, tuning.max_energy));
        assert_eq!(player.energy, tuning.max_energy);
    }

    #[test]
    fn test_steer_toward_respects_step() {
        let (mut player, _, tuning) = setup();
        player.steer_toward(0.0, 7.0);
        assert_eq!(player.dx, -7.0);
        player.steer_toward(player.pos.x + 2.0, 7.0);
        assert_eq!(player.dx, 2.0);
        player.integrate(tuning.world_width);
        assert_eq!(player.pos.x, 182.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Steer(bool, bool),
        Brake(bool),
        Charge(f32),
        Hyper,
        Tick,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<bool>(), any::<bool>()).prop_map(|(l, r)| Op::Steer(l, r)),
            any::<bool>().prop_map(Op::Brake),
            (-50.0f32..80.0).prop_map(Op::Charge),
            Just(Op::Hyper),
            Just(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn player_stays_on_road_and_energy_in_range(ops in prop::collection::vec(op(), 1..400)) {
            let (mut player, mut difficulty, tuning) = setup();
            for op in ops {
                match op {
                    Op::Steer(l, r) => player.steer(l, r),
                    Op::Brake(held) => { player.set_brake(held, &tuning); }
                    Op::Charge(amount) => { player.charge(amount, tuning.max_energy); }
                    Op::Hyper => {
                        if player.try_enter_hyper(&mut difficulty, &tuning) {
                            prop_assert_eq!(player.energy, 0.0);
                        }
                    }
                    Op::Tick => {
                        player.tick_timers();
                        player.tick_hyper(&mut difficulty, &tuning);
                    }
                }
                player.integrate(tuning.world_width);
                prop_assert!(player.pos.x >= 0.0);
                prop_assert!(player.pos.x <= tuning.max_player_x());
                prop_assert!(player.energy >= 0.0 && player.energy <= tuning.max_energy);
            }
        }
    }
}
