//! Level, difficulty ramp and one-shot milestones
//!
//! Level is a pure step function of elapsed ticks. Each level raises enemy
//! speed and spawn rate. Milestones fire once per run behind a flag.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Scenery band derived from level. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorldTier {
    Suburbs,
    Highway,
    Desert,
    Neon,
}

impl WorldTier {
    /// Tier for a level, given the first level of each later band
    pub fn for_level(level: u32, tier_levels: &[u32; 3]) -> Self {
        let [highway, desert, neon] = *tier_levels;
        if level >= neon {
            WorldTier::Neon
        } else if level >= desert {
            WorldTier::Desert
        } else if level >= highway {
            WorldTier::Highway
        } else {
            WorldTier::Suburbs
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorldTier::Suburbs => "Suburbs",
            WorldTier::Highway => "Highway",
            WorldTier::Desert => "Desert",
            WorldTier::Neon => "Neon City",
        }
    }
}

/// Current enemy speed and spawn rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    /// Speed given to newly spawned enemies
    pub enemy_speed: f32,
    /// Per-tick enemy spawn probability
    pub spawn_rate: f32,
    /// Unsuppressed spawn rate while hyper mode is active
    saved_spawn_rate: Option<f32>,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            enemy_speed: tuning.enemy_start_speed,
            spawn_rate: tuning.spawn_rate,
            saved_spawn_rate: None,
        }
    }

    /// Scale the spawn rate down, remembering the current value
    pub fn suppress(&mut self, factor: f32, floor: f32) {
        if self.saved_spawn_rate.is_none() {
            self.saved_spawn_rate = Some(self.spawn_rate);
        }
        self.spawn_rate = (self.spawn_rate * factor).max(floor);
    }

    /// Put back the spawn rate saved by `suppress`
    pub fn restore(&mut self) {
        if let Some(rate) = self.saved_spawn_rate.take() {
            self.spawn_rate = rate;
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.saved_spawn_rate.is_some()
    }

    /// One level's worth of ramp. The saved rate ramps too so a restore
    /// after hyper mode does not undo level-ups.
    fn ramp(&mut self, speed_step: f32, rate_step: f32) {
        self.enemy_speed += speed_step;
        self.spawn_rate += rate_step;
        if let Some(saved) = self.saved_spawn_rate.as_mut() {
            *saved += rate_step;
        }
    }
}

/// Something the orchestrator must act on after a progression update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    LevelUp(u32),
    TierChanged(WorldTier),
    MoneyRain,
    FinishLine,
}

/// Level/tier tracker and milestone gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub tier: WorldTier,
    pub difficulty: Difficulty,
    money_rain_done: bool,
    finish_line_done: bool,
    weapon_awarded: bool,
}

impl Progression {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            tier: WorldTier::for_level(1, &tuning.tier_levels),
            difficulty: Difficulty::new(tuning),
            money_rain_done: false,
            finish_line_done: false,
            weapon_awarded: false,
        }
    }

    /// Level reached after `frame` ticks
    pub fn level_for_frame(frame: u64, tuning: &Tuning) -> u32 {
        let level = frame / tuning.level_ticks.max(1) + 1;
        u32::try_from(level).unwrap_or(u32::MAX)
    }

    /// Catch the level up to the frame counter and report what changed
    pub fn update(&mut self, frame: u64, tuning: &Tuning) -> Vec<Milestone> {
        let mut milestones = Vec::new();
        let target = Self::level_for_frame(frame, tuning);
        while self.level < target {
            self.level += 1;
            self.difficulty
                .ramp(tuning.enemy_speed_step, tuning.spawn_rate_step);
            milestones.push(Milestone::LevelUp(self.level));
        }

        let tier = WorldTier::for_level(self.level, &tuning.tier_levels);
        if tier != self.tier {
            self.tier = tier;
            milestones.push(Milestone::TierChanged(tier));
        }

        if !self.money_rain_done && self.level >= tuning.money_rain_level {
            self.money_rain_done = true;
            milestones.push(Milestone::MoneyRain);
        }

        if !self.finish_line_done && self.level >= tuning.finish_level {
            self.finish_line_done = true;
            milestones.push(Milestone::FinishLine);
        }

        milestones
    }

    /// Returns true exactly once per run, when the kill count first reaches
    /// the weapon threshold
    pub fn check_weapon_unlock(&mut self, kill_count: u32, tuning: &Tuning) -> bool {
        if self.weapon_awarded || kill_count < tuning.weapon_kill_threshold {
            return false;
        }
        self.weapon_awarded = true;
        true
    }
}
