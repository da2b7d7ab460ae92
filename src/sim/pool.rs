//! Living entity sets and their lifecycle
//!
//! Spawn, advance, cull. Entities keep spawn order in their vectors, which is
//! also the tie-break order for collision checks.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Bullet, Enemy, Explosion, FinishLine, PowerUp, PowerUpKind};
use crate::approach;
use crate::tuning::Tuning;

impl PowerUpKind {
    /// Weighted roll between the three kinds
    pub fn roll(rng: &mut impl Rng, tuning: &Tuning) -> Self {
        let weights = [
            (PowerUpKind::Shield, tuning.shield_weight.max(0.0)),
            (PowerUpKind::SpeedEnergy, tuning.speed_energy_weight.max(0.0)),
            (PowerUpKind::Currency, tuning.currency_weight.max(0.0)),
        ];
        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return PowerUpKind::Shield;
        }
        let mut roll = rng.random::<f32>() * total;
        for (kind, weight) in weights {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        PowerUpKind::Currency
    }
}

/// What `roll_spawns` produced this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnRoll {
    pub enemy: bool,
    pub power_up: bool,
}

/// All live entities except the player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityPool {
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub finish_line: Option<FinishLine>,
    next_id: u32,
}

impl EntityPool {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Uniform x so an entity of `width` fits on the road
    fn random_x(rng: &mut impl Rng, world_width: f32, width: f32) -> f32 {
        let max_x = world_width - width;
        if max_x > 0.0 {
            rng.random_range(0.0..max_x)
        } else {
            0.0
        }
    }

    /// Spawn one enemy just above the screen at the current difficulty speed
    pub fn spawn_enemy(&mut self, rng: &mut impl Rng, tuning: &Tuning, speed: f32) -> u32 {
        let id = self.next_entity_id();
        let size = Vec2::new(tuning.enemy_width, tuning.enemy_height);
        let x = Self::random_x(rng, tuning.world_width, size.x);
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, -size.y),
            size,
            speed,
        });
        id
    }

    /// Spawn one power-up of a rolled kind just above the screen
    pub fn spawn_power_up(&mut self, rng: &mut impl Rng, tuning: &Tuning) -> u32 {
        let kind = PowerUpKind::roll(rng, tuning);
        let x = Self::random_x(rng, tuning.world_width, tuning.power_up_size);
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp::new(
            id,
            Vec2::new(x, -tuning.power_up_size),
            tuning.power_up_size,
            tuning.power_up_speed,
            kind,
        ));
        id
    }

    /// Spawn a bullet centered on `origin` (its bottom edge at origin.y).
    ///
    /// `direction` is the constant lateral velocity; `homing_x` is an optional
    /// center x the bullet steers toward a bounded step per tick.
    pub fn spawn_bullet(
        &mut self,
        origin: Vec2,
        direction: f32,
        homing_x: Option<f32>,
        tuning: &Tuning,
    ) -> u32 {
        let id = self.next_entity_id();
        let size = Vec2::new(tuning.bullet_width, tuning.bullet_height);
        self.bullets.push(Bullet {
            id,
            pos: Vec2::new(origin.x - size.x / 2.0, origin.y - size.y),
            size,
            speed: tuning.bullet_speed,
            vx: direction,
            homing_x,
        });
        id
    }

    /// Per-tick spawn chance: an enemy with probability `spawn_rate`, a
    /// power-up with `power_up_spawn_factor` times that
    pub fn roll_spawns(
        &mut self,
        rng: &mut impl Rng,
        tuning: &Tuning,
        spawn_rate: f32,
        enemy_speed: f32,
    ) -> SpawnRoll {
        let mut roll = SpawnRoll::default();
        if rng.random::<f32>() < spawn_rate {
            self.spawn_enemy(rng, tuning, enemy_speed);
            roll.enemy = true;
        }
        if rng.random::<f32>() < spawn_rate * tuning.power_up_spawn_factor {
            self.spawn_power_up(rng, tuning);
            roll.power_up = true;
        }
        roll
    }

    /// Bonus drop: coins spread evenly across the road at staggered heights
    pub fn spawn_money_rain(&mut self, rng: &mut impl Rng, tuning: &Tuning) -> usize {
        let count = tuning.money_rain_coins;
        let size = tuning.power_up_size;
        let span = (tuning.world_width - size).max(0.0);
        let spacing = if count > 1 {
            span / (count - 1) as f32
        } else {
            0.0
        };
        for i in 0..count {
            let x = if count > 1 { i as f32 * spacing } else { span / 2.0 };
            let stagger = (i % 3) as f32 * size * 1.5 + rng.random::<f32>() * size * 2.0;
            let id = self.next_entity_id();
            self.power_ups.push(PowerUp::new(
                id,
                Vec2::new(x, -size - stagger),
                size,
                tuning.power_up_speed,
                PowerUpKind::Currency,
            ));
        }
        count
    }

    pub fn spawn_explosion(&mut self, center: Vec2, tuning: &Tuning) {
        self.explosions.push(Explosion {
            center,
            radius: tuning.explosion_start_radius,
            life: tuning.explosion_life,
        });
    }

    /// Place the finish line just above the screen. Only one per run.
    pub fn spawn_finish_line(&mut self, tuning: &Tuning) -> bool {
        if self.finish_line.is_some() {
            return false;
        }
        self.finish_line = Some(FinishLine {
            y: -tuning.finish_line_height,
            height: tuning.finish_line_height,
            speed: tuning.finish_line_speed,
        });
        true
    }

    /// Move everything by one step of `dt` ticks
    pub fn advance_all(&mut self, dt: f32, tuning: &Tuning) {
        for enemy in &mut self.enemies {
            enemy.pos.y += enemy.speed * dt;
        }

        for power_up in &mut self.power_ups {
            power_up.pos.y += power_up.speed * dt;
        }

        let max_step = tuning.homing_max_step * dt;
        for bullet in &mut self.bullets {
            bullet.pos.y -= bullet.speed * dt;
            bullet.pos.x += bullet.vx * dt;
            if let Some(target) = bullet.homing_x {
                // Steer the center, never snap
                let center = bullet.center_x();
                bullet.pos.x += approach(center, target, max_step) - center;
            }
        }

        for explosion in &mut self.explosions {
            explosion.radius =
                (explosion.radius + tuning.explosion_growth * dt).min(tuning.explosion_max_radius);
            explosion.life -= dt;
        }

        if let Some(line) = self.finish_line.as_mut() {
            line.y += line.speed * dt;
        }
    }

    /// Drop everything that left the world. Returns how many enemies got
    /// past the player, which is what earns passive score.
    pub fn cull_offscreen(&mut self, world_height: f32) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| e.pos.y <= world_height);
        let passed = before - self.enemies.len();

        self.power_ups.retain(|p| p.pos.y <= world_height);
        self.bullets.retain(|b| b.pos.y >= 0.0);
        self.explosions.retain(|e| e.life > 0.0);
        passed
    }

    /// Nearest enemy whose bottom edge is above `row_top`, optionally limited
    /// to centers within `window` of `center_x`
    pub fn nearest_enemy_ahead(
        &self,
        row_top: f32,
        center_x: f32,
        window: Option<f32>,
    ) -> Option<&Enemy> {
        self.enemies
            .iter()
            .filter(|e| e.bottom() <= row_top)
            .filter(|e| window.is_none_or(|w| (e.center_x() - center_x).abs() <= w))
            .fold(None, |best: Option<&Enemy>, e| match best {
                Some(b) if b.bottom() >= e.bottom() => Some(b),
                _ => Some(e),
            })
    }

    /// Centers of every enemy, for blast effects
    pub fn enemy_centers(&self) -> Vec<Vec2> {
        self.enemies.iter().map(|e| e.rect().center()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
            && self.power_ups.is_empty()
            && self.bullets.is_empty()
            && self.explosions.is_empty()
            && self.finish_line.is_none()
    }

    /// Remove every entity. Ids keep counting up.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.power_ups.clear();
        self.bullets.clear();
        self.explosions.clear();
        self.finish_line = None;
    }
}
