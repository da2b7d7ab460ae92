//! Greedy lane planner that can drive the car
//!
//! Every tick the road is cut into a few candidate lanes. Each lane is scored
//! by summing a danger penalty over the enemies projected to reach the
//! player's row, a small travel cost, and attraction toward worthwhile
//! targets. The car steps toward the cheapest lane. Obstacles only ever move
//! down at near-constant speed and the plan is redone every tick, so no path
//! search is needed: cost is O(lanes x enemies).

use super::player::Player;
use super::pool::EntityPool;
use super::state::{Enemy, PowerUpKind};
use crate::tuning::{AutopilotTuning, Tuning};

/// Score of one candidate lane (lower is safer)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneScore {
    /// Left edge the player's car would occupy
    pub x: f32,
    pub score: f32,
}

/// Result of one planning pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// Left edge the car steers toward this tick
    pub target_x: f32,
    pub lanes: Vec<LaneScore>,
    /// Index of the lowest-scoring lane
    pub best_lane: Option<usize>,
    /// Index of the lane closest to where the car is now
    pub current_lane: Option<usize>,
    /// An obstacle directly ahead forced a sidestep
    pub emergency: bool,
    /// The current lane is projected to be hit
    pub imminent: bool,
    /// Two or more enemies are close ahead
    pub crowded: bool,
}

impl Plan {
    fn hold(player: &Player) -> Self {
        Self {
            target_x: player.pos.x,
            ..Default::default()
        }
    }
}

/// Candidate left edges spread evenly across the road
pub fn candidate_lanes(tuning: &Tuning) -> Vec<f32> {
    let count = tuning.autopilot.lanes;
    let max_x = tuning.max_player_x();
    match count {
        0 => Vec::new(),
        1 => vec![max_x / 2.0],
        _ => (0..count)
            .map(|i| max_x * i as f32 / (count - 1) as f32)
            .collect(),
    }
}

/// Gap between an enemy's bottom edge and the top of the player's row, or
/// None once the enemy has passed the row
fn gap_to_row(enemy: &Enemy, player: &Player) -> Option<f32> {
    if enemy.pos.y >= player.pos.y + player.size.y {
        return None;
    }
    Some(player.pos.y - enemy.bottom())
}

/// Danger of putting the car's left edge at `lane_x`
pub fn lane_danger(lane_x: f32, player: &Player, enemies: &[Enemy], ap: &AutopilotTuning) -> f32 {
    let lane_center = lane_x + player.size.x / 2.0;
    let mut danger = 0.0;

    for enemy in enemies {
        let Some(gap) = gap_to_row(enemy, player) else {
            continue;
        };
        // Vertical projection over the lookahead horizon
        let reach = enemy.speed.max(0.0) * ap.lookahead_ticks + ap.vertical_window;
        if gap > reach {
            continue;
        }
        let closeness = if reach > 0.0 {
            1.0 - (gap.max(0.0) / reach).min(1.0)
        } else {
            1.0
        };

        let half_widths = (player.size.x + enemy.size.x) / 2.0;
        let dx = (lane_center - enemy.center_x()).abs();
        let margin = half_widths + ap.horizontal_margin;
        if dx < margin {
            danger += ap.danger_weight * (1.0 - dx / margin) * (1.0 + closeness);
        }
        if dx < half_widths + ap.overlap_margin {
            danger += ap.overlap_penalty;
        }
    }
    danger
}

/// Pull toward `target_center`: full strength when lined up, none a road
/// width away
fn attraction(lane_center: f32, target_center: f32, strength: f32, world_width: f32) -> f32 {
    if world_width <= 0.0 {
        return 0.0;
    }
    strength * (1.0 - (lane_center - target_center).abs() / world_width).max(0.0)
}

/// Enemy in the car's current column close enough to demand a sidestep
fn emergency_obstacle<'a>(player: &Player, enemies: &'a [Enemy], ap: &AutopilotTuning) -> Option<&'a Enemy> {
    let center = player.center_x();
    enemies
        .iter()
        .filter(|e| {
            let half_widths = (player.size.x + e.size.x) / 2.0;
            (e.center_x() - center).abs() < half_widths + ap.overlap_margin
        })
        .filter_map(|e| gap_to_row(e, player).map(|gap| (e, gap)))
        .filter(|(_, gap)| *gap <= ap.emergency_window)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

/// Road edge whose car position leaves the most room from `obstacle`.
///
/// Pinned against a wall, the far edge wins even though it means crossing
/// the obstacle's side of the road.
fn escape_edge(obstacle: &Enemy, player: &Player, tuning: &Tuning) -> f32 {
    let max_x = tuning.max_player_x();
    let half_width = player.size.x / 2.0;
    let center = obstacle.center_x();
    let left_room = (center - half_width).abs();
    let right_room = (max_x + half_width - center).abs();
    if left_room >= right_room { 0.0 } else { max_x }
}

/// Score every lane and pick a target
pub fn plan(player: &Player, pool: &EntityPool, tuning: &Tuning) -> Plan {
    let ap = &tuning.autopilot;
    let lanes = candidate_lanes(tuning);
    let enemies = &pool.enemies;

    let shield_target = pool
        .power_ups
        .iter()
        .filter(|p| p.kind == PowerUpKind::Shield && p.pos.y < player.pos.y + player.size.y)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|p| p.rect().center().x);

    if lanes.is_empty() || (enemies.is_empty() && shield_target.is_none()) {
        return Plan::hold(player);
    }

    let enemy_target = pool
        .nearest_enemy_ahead(player.pos.y, player.center_x(), None)
        .filter(|e| player.pos.y - e.bottom() > ap.safe_distance)
        .map(Enemy::center_x);

    let half_width = player.size.x / 2.0;
    let scores: Vec<LaneScore> = lanes
        .iter()
        .map(|&x| {
            let center = x + half_width;
            let mut score = lane_danger(x, player, enemies, ap);
            score += ap.travel_weight * (x - player.pos.x).abs();
            if let Some(target) = enemy_target {
                score -= attraction(center, target, ap.enemy_attraction, tuning.world_width);
            }
            if let Some(target) = shield_target {
                score -= attraction(center, target, ap.shield_attraction, tuning.world_width);
            }
            LaneScore { x, score }
        })
        .collect();

    let mut best = 0;
    for (i, lane) in scores.iter().enumerate() {
        if lane.score < scores[best].score {
            best = i;
        }
    }
    let current = scores
        .iter()
        .enumerate()
        .min_by(|a, b| {
            (a.1.x - player.pos.x)
                .abs()
                .total_cmp(&(b.1.x - player.pos.x).abs())
        })
        .map(|(i, _)| i);

    let crowded = enemies
        .iter()
        .filter_map(|e| gap_to_row(e, player))
        .filter(|gap| *gap <= ap.crowd_window)
        .count()
        >= 2;

    let mut plan = Plan {
        target_x: scores[best].x,
        best_lane: Some(best),
        current_lane: current,
        imminent: lane_danger(player.pos.x, player, enemies, ap) >= ap.overlap_penalty,
        crowded,
        lanes: scores,
        emergency: false,
    };

    if let Some(obstacle) = emergency_obstacle(player, enemies, ap) {
        plan.target_x = escape_edge(obstacle, player, tuning);
        plan.emergency = true;
        plan.imminent = true;
    }

    plan
}

/// Lateral speed for this plan
pub fn step_speed(player: &Player, plan: &Plan, ap: &AutopilotTuning) -> f32 {
    let mut speed = player.base_speed * ap.speed_multiplier;
    if plan.imminent {
        speed *= ap.imminent_boost;
    }
    if plan.crowded {
        speed *= ap.crowd_throttle;
    }
    speed
}

/// Plan and steer the player for this tick
pub fn drive(player: &mut Player, pool: &EntityPool, tuning: &Tuning) -> Plan {
    let plan = plan(player, pool, tuning);
    let step = step_speed(player, &plan, &tuning.autopilot);
    player.steer_toward(plan.target_x, step);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PowerUp;
    use glam::Vec2;

    fn enemy(id: u32, x: f32, y: f32) -> Enemy {
        Enemy {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(40.0, 60.0),
            speed: 3.0,
        }
    }

    fn setup() -> (Player, EntityPool, Tuning) {
        let tuning = Tuning {
            spawn_rate: 1.0,
            ..Tuning::default()
        };
        (Player::new(&tuning), EntityPool::default(), tuning)
    }

    #[test]
    fn test_candidate_lanes_span_the_road() {
        let tuning = Tuning::default();
        let lanes = candidate_lanes(&tuning);
        assert_eq!(lanes.len(), 7);
        assert_eq!(lanes[0], 0.0);
        assert_eq!(lanes[3], 180.0);
        assert_eq!(lanes[6], tuning.max_player_x());
    }

    #[test]
    fn test_no_enemies_holds_lane() {
        let (player, pool, tuning) = setup();
        let plan = plan(&player, &pool, &tuning);
        assert_eq!(plan.target_x, player.pos.x);
        assert!(plan.lanes.is_empty());
    }

    #[test]
    fn test_zero_lanes_holds_lane() {
        let (player, mut pool, mut tuning) = setup();
        tuning.autopilot.lanes = 0;
        pool.enemies.push(enemy(1, player.pos.x, player.pos.y - 100.0));
        let plan = plan(&player, &pool, &tuning);
        assert_eq!(plan.target_x, player.pos.x);
        assert_eq!(plan.best_lane, None);
    }

    #[test]
    fn test_enemy_dead_ahead_picks_safer_lane() {
        let (player, mut pool, tuning) = setup();
        // Same lane, 100px above the row, well inside the lookahead
        pool.enemies
            .push(enemy(1, player.pos.x, player.pos.y - 60.0 - 100.0));

        let plan = plan(&player, &pool, &tuning);
        let best = plan.best_lane.expect("best lane");
        let straight = plan.current_lane.expect("current lane");

        assert_eq!(plan.lanes[straight].x, player.pos.x);
        assert!(plan.lanes[best].score < plan.lanes[straight].score);
        assert_ne!(plan.target_x, player.pos.x);
        assert!(plan.imminent);
        assert!(!plan.emergency);
    }

    #[test]
    fn test_emergency_sidestep_heads_away_from_obstacle() {
        let (player, mut pool, tuning) = setup();
        // Slightly right of center and very close
        pool.enemies
            .push(enemy(1, player.pos.x + 10.0, player.pos.y - 60.0 - 30.0));

        let right_of_center = plan(&player, &pool, &tuning);
        assert!(right_of_center.emergency);
        assert_eq!(right_of_center.target_x, 0.0);

        let (player, mut pool, tuning) = setup();
        pool.enemies
            .push(enemy(1, player.pos.x - 10.0, player.pos.y - 60.0 - 30.0));
        let left_of_center = plan(&player, &pool, &tuning);
        assert!(left_of_center.emergency);
        assert_eq!(left_of_center.target_x, tuning.max_player_x());
    }

    #[test]
    fn test_emergency_sidestep_leaves_the_wall() {
        let (mut player, mut pool, tuning) = setup();
        let max_x = tuning.max_player_x();

        // Against the left wall, obstacle centered slightly right of the car
        player.pos.x = 0.0;
        pool.enemies.push(enemy(1, 5.0, player.pos.y - 60.0 - 80.0));
        let from_left = plan(&player, &pool, &tuning);
        assert!(from_left.emergency);
        assert_eq!(from_left.target_x, max_x);

        // Mirror image on the right wall
        player.pos.x = max_x;
        pool.enemies[0].pos.x = max_x - 5.0;
        let from_right = plan(&player, &pool, &tuning);
        assert!(from_right.emergency);
        assert_eq!(from_right.target_x, 0.0);
    }

    #[test]
    fn test_far_enemy_is_ignored() {
        let (player, mut pool, tuning) = setup();
        // Way beyond the lookahead projection
        pool.enemies.push(enemy(1, player.pos.x, -400.0));
        let danger = lane_danger(player.pos.x, &player, &pool.enemies, &tuning.autopilot);
        assert_eq!(danger, 0.0);
    }

    #[test]
    fn test_passed_enemy_is_ignored() {
        let (player, mut pool, tuning) = setup();
        pool.enemies
            .push(enemy(1, player.pos.x, player.pos.y + player.size.y + 1.0));
        let danger = lane_danger(player.pos.x, &player, &pool.enemies, &tuning.autopilot);
        assert_eq!(danger, 0.0);
    }

    #[test]
    fn test_shield_pickup_attracts() {
        let (player, mut pool, tuning) = setup();
        pool.power_ups.push(PowerUp::new(
            1,
            Vec2::new(20.0, 200.0),
            30.0,
            2.0,
            PowerUpKind::Shield,
        ));
        let plan = plan(&player, &pool, &tuning);
        assert!(plan.target_x < player.pos.x);
        assert!(!plan.imminent);
    }

    #[test]
    fn test_shield_attraction_never_beats_overlap() {
        let (player, mut pool, tuning) = setup();
        // Shield sits right behind an enemy in the leftmost lane
        pool.power_ups.push(PowerUp::new(
            1,
            Vec2::new(5.0, 200.0),
            30.0,
            2.0,
            PowerUpKind::Shield,
        ));
        pool.enemies.push(enemy(2, 0.0, player.pos.y - 60.0 - 80.0));
        let plan = plan(&player, &pool, &tuning);
        assert_ne!(plan.target_x, 0.0);
    }

    #[test]
    fn test_crowding_throttles_and_danger_boosts() {
        let (player, _, tuning) = setup();
        let ap = &tuning.autopilot;
        let base = player.base_speed * ap.speed_multiplier;

        let calm = Plan::hold(&player);
        assert_eq!(step_speed(&player, &calm, ap), base);

        let urgent = Plan {
            imminent: true,
            ..Plan::hold(&player)
        };
        assert!(step_speed(&player, &urgent, ap) > base);

        let crowded = Plan {
            crowded: true,
            ..Plan::hold(&player)
        };
        assert!(step_speed(&player, &crowded, ap) < base);
    }

    #[test]
    fn test_drive_moves_off_collision_course() {
        let (mut player, mut pool, tuning) = setup();
        pool.enemies
            .push(enemy(1, player.pos.x, player.pos.y - 60.0 - 100.0));
        let start = player.pos.x;
        for _ in 0..30 {
            drive(&mut player, &pool, &tuning);
            player.integrate(tuning.world_width);
        }
        let enemy_center = pool.enemies[0].center_x();
        let clearance = (player.center_x() - enemy_center).abs();
        assert_ne!(player.pos.x, start);
        assert!(clearance >= player.size.x);
    }
}
