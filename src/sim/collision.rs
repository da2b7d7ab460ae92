//! Axis-aligned collision checks
//!
//! Everything on the road is a rectangle. Overlap is strict on both axes, so
//! rectangles that merely share an edge do not collide. When several entities
//! match, array order decides: the first structural match wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bullet, Enemy, FinishLine, PowerUp};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from a top-left position and a size
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        rects_overlap(self, other)
    }
}

/// Two rectangles intersect iff both axis projections overlap strictly
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Index of the first enemy overlapping the player, if any
pub fn first_enemy_hit(player: &Rect, enemies: &[Enemy]) -> Option<usize> {
    enemies.iter().position(|e| player.overlaps(&e.rect()))
}

/// Remove and return every power-up the player overlaps, in array order
pub fn collect_power_ups(player: &Rect, power_ups: &mut Vec<PowerUp>) -> Vec<PowerUp> {
    let mut collected = Vec::new();
    let mut i = 0;
    while i < power_ups.len() {
        if player.overlaps(&power_ups[i].rect()) {
            collected.push(power_ups.remove(i));
        } else {
            i += 1;
        }
    }
    collected
}

/// Resolve bullets against enemies.
///
/// Each bullet removes at most one enemy (the first it overlaps) and is spent
/// on that hit. Returns the destroyed enemies in the order they were hit.
pub fn resolve_bullet_hits(bullets: &mut Vec<Bullet>, enemies: &mut Vec<Enemy>) -> Vec<Enemy> {
    let mut kills = Vec::new();
    bullets.retain(|bullet| {
        let rect = bullet.rect();
        match enemies.iter().position(|e| rect.overlaps(&e.rect())) {
            Some(j) => {
                kills.push(enemies.remove(j));
                false
            }
            None => true,
        }
    });
    kills
}

/// Whether the finish line has scrolled down to the player's row
pub fn finish_line_reached(player: &Rect, line: &FinishLine) -> bool {
    line.y + line.height >= player.min.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PowerUpKind;

    fn enemy(id: u32, x: f32, y: f32) -> Enemy {
        Enemy {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(40.0, 60.0),
            speed: 3.0,
        }
    }

    fn bullet(id: u32, x: f32, y: f32) -> Bullet {
        Bullet {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(5.0, 15.0),
            speed: 8.0,
            vx: 0.0,
            homing_x: None,
        }
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Rect::new(Vec2::new(9.0, 9.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_overlap_needs_both_axes() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let same_column = Rect::new(Vec2::new(2.0, 50.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&same_column));
    }

    #[test]
    fn test_first_enemy_hit_uses_array_order() {
        let player = Rect::new(Vec2::new(100.0, 500.0), Vec2::new(40.0, 60.0));
        let enemies = vec![
            enemy(1, 0.0, 0.0),
            enemy(2, 110.0, 480.0),
            enemy(3, 100.0, 500.0),
        ];
        assert_eq!(first_enemy_hit(&player, &enemies), Some(1));
        assert_eq!(first_enemy_hit(&player, &enemies[..1]), None);
    }

    #[test]
    fn test_collect_power_ups_removes_only_matches() {
        let player = Rect::new(Vec2::new(100.0, 500.0), Vec2::new(40.0, 60.0));
        let mut power_ups = vec![
            PowerUp::new(1, Vec2::new(105.0, 510.0), 30.0, 2.0, PowerUpKind::Shield),
            PowerUp::new(2, Vec2::new(300.0, 510.0), 30.0, 2.0, PowerUpKind::Currency),
            PowerUp::new(3, Vec2::new(120.0, 540.0), 30.0, 2.0, PowerUpKind::SpeedEnergy),
        ];
        let collected = collect_power_ups(&player, &mut power_ups);
        let ids: Vec<u32> = collected.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(power_ups.len(), 1);
        assert_eq!(power_ups[0].id, 2);
    }

    #[test]
    fn test_bullet_kills_one_enemy_and_is_spent() {
        // Two stacked enemies both overlapping the bullet
        let mut enemies = vec![enemy(1, 100.0, 100.0), enemy(2, 100.0, 120.0)];
        let mut bullets = vec![bullet(10, 110.0, 130.0), bullet(11, 300.0, 130.0)];

        let kills = resolve_bullet_hits(&mut bullets, &mut enemies);

        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].id, 1);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 2);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].id, 11);
    }

    #[test]
    fn test_two_bullets_two_kills() {
        let mut enemies = vec![enemy(1, 100.0, 100.0), enemy(2, 100.0, 120.0)];
        let mut bullets = vec![bullet(10, 110.0, 130.0), bullet(11, 112.0, 130.0)];

        let kills = resolve_bullet_hits(&mut bullets, &mut enemies);

        assert_eq!(kills.len(), 2);
        assert!(enemies.is_empty());
        assert!(bullets.is_empty());
    }

    #[test]
    fn test_finish_line_reached() {
        let player = Rect::new(Vec2::new(180.0, 520.0), Vec2::new(40.0, 60.0));
        let far = FinishLine {
            y: 100.0,
            height: 20.0,
            speed: 3.0,
        };
        let arrived = FinishLine { y: 500.0, ..far };
        assert!(!finish_line_reached(&player, &far));
        assert!(finish_line_reached(&player, &arrived));
    }
}
