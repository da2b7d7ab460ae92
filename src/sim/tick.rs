//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. The step order
//! matters: collisions are checked after this tick's movement, and pickups
//! apply before the lethal check so a shield grabbed this tick can save the
//! car in the same tick.

use glam::Vec2;

use super::autopilot;
use super::collision::{
    collect_power_ups, finish_line_reached, first_enemy_hit, resolve_bullet_hits,
};
use super::player::HitOutcome;
use super::progression::Milestone;
use super::state::{GameEvent, GamePhase, GameState, PowerUpKind};
use crate::consts::TICK_STEP;

/// Input for a single tick.
///
/// `left`, `right` and `brake` are held state. The rest are one-shot
/// actions the driver clears once a tick has consumed them.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    /// Fire a bullet, or the big gun when armed
    pub fire: bool,
    /// Enter hyper mode (needs full energy)
    pub hyper: bool,
    /// Arm/disarm the big gun
    pub arm_weapon: bool,
    pub toggle_autopilot: bool,
    pub pause: bool,
    pub restart: bool,
}

impl TickInput {
    /// Clear one-shot actions after processing
    pub fn clear_one_shots(&mut self) {
        self.fire = false;
        self.hyper = false;
        self.arm_weapon = false;
        self.toggle_autopilot = false;
        self.pause = false;
        self.restart = false;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    // Don't tick if paused or over
    if state.phase != GamePhase::Playing {
        return;
    }

    if input.toggle_autopilot {
        state.autopilot = !state.autopilot;
        let enabled = state.autopilot;
        state.push_event(GameEvent::AutopilotToggled { enabled });
    }

    state.frame += 1;
    state.weapon.clear_ticks = state.weapon.clear_ticks.saturating_sub(1);
    state.spawn_lock_ticks = state.spawn_lock_ticks.saturating_sub(1);

    apply_actions(state, input);
    update_player(state, input);
    spawn_entities(state);
    advance_pools(state);
    resolve_pickups(state);
    resolve_bullets(state);
    update_energy(state);
    update_progression(state);
    resolve_player_hits(state);
    resolve_finish_line(state);
}

/// Hyper request, weapon arming and firing
fn apply_actions(state: &mut GameState, input: &TickInput) {
    if input.hyper
        && state
            .player
            .try_enter_hyper(&mut state.progression.difficulty, &state.tuning)
    {
        log::info!("Hyper mode at frame {}", state.frame);
        state.push_event(GameEvent::HyperStarted);
    }

    if input.arm_weapon {
        match state.weapon.toggle_arm() {
            Some(true) => state.push_event(GameEvent::WeaponArmed),
            Some(false) => state.push_event(GameEvent::WeaponDisarmed),
            None => {}
        }
    }

    if input.fire {
        if state.weapon.armed {
            fire_weapon(state);
        } else {
            fire_bullets(state);
        }
    }
}

/// Big gun: wipe the road and hold off spawns for a while
fn fire_weapon(state: &mut GameState) {
    if !state.weapon.discharge(state.tuning.weapon_clear_ticks) {
        return;
    }
    let centers = state.pool.enemy_centers();
    state.pool.enemies.clear();
    for center in &centers {
        state.pool.spawn_explosion(*center, &state.tuning);
    }
    let charges_left = state.weapon.charges;
    log::info!(
        "Big gun cleared {} cars ({} charges left)",
        centers.len(),
        charges_left
    );
    state.push_event(GameEvent::WeaponFired {
        cleared: centers.len(),
        charges_left,
    });
}

/// One bullet from the nose, homing on the nearest enemy ahead in the lock
/// window. Hyper mode adds two angled side shots.
fn fire_bullets(state: &mut GameState) {
    let tuning = &state.tuning;
    let player = &state.player;
    let origin = Vec2::new(player.center_x(), player.pos.y);
    let homing_x = state
        .pool
        .nearest_enemy_ahead(
            player.pos.y,
            player.center_x(),
            Some(tuning.homing_lock_window),
        )
        .map(|e| e.center_x());

    state.pool.spawn_bullet(origin, 0.0, homing_x, tuning);
    if player.is_hyper() {
        state
            .pool
            .spawn_bullet(origin, -tuning.hyper_spread, None, tuning);
        state
            .pool
            .spawn_bullet(origin, tuning.hyper_spread, None, tuning);
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    if let Some(event) = state.player.set_brake(input.brake, &state.tuning) {
        state.push_event(event);
    }

    if state.autopilot {
        autopilot::drive(&mut state.player, &state.pool, &state.tuning);
    } else {
        state.player.steer(input.left, input.right);
    }
    state.player.integrate(state.tuning.world_width);

    if let Some(event) = state.player.tick_timers() {
        state.push_event(event);
    }
}

fn spawn_entities(state: &mut GameState) {
    let locked = state.spawn_lock_ticks > 0
        || state.weapon.clear_ticks > 0
        || state.pool.finish_line.is_some();
    if locked {
        return;
    }
    let difficulty = &state.progression.difficulty;
    state.pool.roll_spawns(
        &mut state.rng,
        &state.tuning,
        difficulty.spawn_rate,
        difficulty.enemy_speed,
    );
}

fn advance_pools(state: &mut GameState) {
    state.pool.advance_all(TICK_STEP, &state.tuning);
    let passed = state.pool.cull_offscreen(state.tuning.world_height);
    state.score += passed as u64 * state.tuning.score_enemy_passed;
}

/// The single place power-up effects are applied
fn resolve_pickups(state: &mut GameState) {
    let player_rect = state.player.rect();
    for power_up in collect_power_ups(&player_rect, &mut state.pool.power_ups) {
        match power_up.kind {
            PowerUpKind::Shield => {
                state.player.grant_shield(state.tuning.shield_ticks);
                state.push_event(GameEvent::ShieldActivated);
            }
            PowerUpKind::SpeedEnergy => {
                state.score += state.tuning.score_energy_pickup;
                let filled = state
                    .player
                    .charge(state.tuning.energy_pickup, state.tuning.max_energy);
                let energy = state.player.energy;
                state.push_event(GameEvent::EnergyBoost { energy });
                if filled {
                    state.push_event(GameEvent::EnergyFull);
                }
            }
            PowerUpKind::Currency => {
                state.currency += 1;
                let balance = state.currency;
                state.push_event(GameEvent::CurrencyCollected { balance });
            }
        }
    }
}

fn resolve_bullets(state: &mut GameState) {
    let kills = resolve_bullet_hits(&mut state.pool.bullets, &mut state.pool.enemies);
    for enemy in kills {
        state.score += state.tuning.score_bullet_kill;
        state.kill_count += 1;
        state
            .pool
            .spawn_explosion(enemy.rect().center(), &state.tuning);

        if state
            .progression
            .check_weapon_unlock(state.kill_count, &state.tuning)
        {
            let charges = state.tuning.weapon_charges;
            state.weapon.unlock(charges);
            log::info!("Big gun unlocked after {} kills", state.kill_count);
            state.push_event(GameEvent::WeaponUnlocked { charges });
        } else {
            state.push_event(GameEvent::DirectHit);
        }
    }
}

fn update_energy(state: &mut GameState) {
    if !state.player.is_hyper()
        && state
            .player
            .charge(state.tuning.energy_per_tick, state.tuning.max_energy)
    {
        state.push_event(GameEvent::EnergyFull);
    }

    if state
        .player
        .tick_hyper(&mut state.progression.difficulty, &state.tuning)
    {
        state.push_event(GameEvent::HyperEnded);
    }
}

fn update_progression(state: &mut GameState) {
    for milestone in state.progression.update(state.frame, &state.tuning) {
        match milestone {
            Milestone::LevelUp(level) => {
                log::debug!("Level {} at frame {}", level, state.frame);
                state.push_event(GameEvent::LevelUp { level });
            }
            Milestone::TierChanged(tier) => {
                log::info!("World tier: {}", tier.name());
                state.push_event(GameEvent::WorldTierChanged { tier });
            }
            Milestone::MoneyRain => {
                let coins = state.pool.spawn_money_rain(&mut state.rng, &state.tuning);
                state.spawn_lock_ticks = state.tuning.money_rain_lock_ticks;
                log::info!("Money rain: {} coins", coins);
                state.push_event(GameEvent::MoneyRain { coins });
            }
            Milestone::FinishLine => {
                if state.pool.spawn_finish_line(&state.tuning) {
                    log::info!("Finish line spawned at level {}", state.level());
                    state.push_event(GameEvent::FinishLineInSight);
                }
            }
        }
    }
}

fn resolve_player_hits(state: &mut GameState) {
    let player_rect = state.player.rect();
    let Some(index) = first_enemy_hit(&player_rect, &state.pool.enemies) else {
        return;
    };
    match state.player.resolve_hit(state.tuning.invulnerable_ticks) {
        HitOutcome::Ignored => {}
        HitOutcome::Absorbed => {
            // Drop the car we hit so it can't hit again once the grace ends
            let enemy = state.pool.enemies.remove(index);
            state
                .pool
                .spawn_explosion(enemy.rect().center(), &state.tuning);
            state.push_event(GameEvent::ShieldBroken);
        }
        HitOutcome::Fatal => {
            state.end_session(GamePhase::Crashed);
        }
    }
}

fn resolve_finish_line(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let reached = state
        .pool
        .finish_line
        .is_some_and(|line| finish_line_reached(&state.player.rect(), &line));
    if reached {
        state.end_session(GamePhase::Finished);
    }
}
