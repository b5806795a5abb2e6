//! Collision resolution between entity categories
//!
//! Everything here compares bounding boxes by value; nothing holds a
//! reference into another collection across a call.

use super::entities::{Enemy, PlayerBullet};
use super::rect::Rect;

/// Maximum height bonus on top of the base kill score
pub const MAX_HEIGHT_BONUS: f32 = 40.0;
/// Score for a kill at the very bottom of the screen
pub const BASE_KILL_SCORE: u64 = 10;

/// Score for destroying an enemy whose top edge is at `enemy_top`.
///
/// Higher enemies are worth more: 50 at the top of the screen, falling toward
/// 10 at the bottom.
pub fn kill_score(enemy_top: f32, screen_height: f32) -> u64 {
    let fraction = ((screen_height - enemy_top) / screen_height).clamp(0.0, 1.0);
    BASE_KILL_SCORE + (fraction * MAX_HEIGHT_BONUS).floor() as u64
}

/// Resolve player bullets against enemies.
///
/// Every enemy overlapped by at least one live bullet dies, and every bullet
/// overlapping it is consumed. A consumed bullet cannot kill a second enemy.
/// Returns the destroyed enemies in formation order.
pub fn resolve_bullet_hits(bullets: &mut Vec<PlayerBullet>, enemies: &mut Vec<Enemy>) -> Vec<Enemy> {
    if bullets.is_empty() || enemies.is_empty() {
        return Vec::new();
    }

    let mut consumed = vec![false; bullets.len()];
    let mut killed = vec![false; enemies.len()];

    for (enemy_idx, enemy) in enemies.iter().enumerate() {
        for (bullet_idx, bullet) in bullets.iter().enumerate() {
            if !consumed[bullet_idx] && bullet.rect.intersects(&enemy.rect) {
                consumed[bullet_idx] = true;
                killed[enemy_idx] = true;
            }
        }
    }

    let mut consumed = consumed.into_iter();
    bullets.retain(|_| !consumed.next().unwrap_or(false));

    let mut destroyed = Vec::new();
    let mut idx = 0;
    enemies.retain(|enemy| {
        let dead = killed[idx];
        idx += 1;
        if dead {
            destroyed.push(enemy.clone());
        }
        !dead
    });
    destroyed
}

/// Remove and return every item whose bounds overlap `target`
pub fn take_overlapping<T>(target: &Rect, items: &mut Vec<T>, bounds: impl Fn(&T) -> Rect) -> Vec<T> {
    let mut taken = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if bounds(&item).intersects(target) {
            taken.push(item);
        } else {
            kept.push(item);
        }
    }
    *items = kept;
    taken
}
