//! Enemy formation controller
//!
//! The formation sweeps sideways in lock-step. The first tick any member
//! touches a screen edge flips the direction and drops the whole grid; a latch
//! keeps that reaction from repeating until the formation is clear of the edge
//! again or reaches the opposite one.

use glam::Vec2;
use rand::Rng;

use super::entities::Enemy;
use super::rect::Rect;
use crate::config::GameConfig;

/// Screen side the formation reacted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
}

/// The collectively-moving grid of enemies for one level
#[derive(Debug, Clone)]
pub struct Formation {
    /// Live members in spawn order (row-major)
    pub enemies: Vec<Enemy>,
    /// -1.0 = moving left, +1.0 = moving right
    pub direction: f32,
    /// Speed before level bonus and kill increments
    pub base_speed: f32,
    /// Vertical drop applied on each edge contact
    pub drop_per_edge: f32,
    /// Speed accumulated from kills in this wave
    pub speed_increment: f32,
    /// Edge the formation is still in contact with after reacting to it
    latched_edge: Option<Edge>,
}

impl Formation {
    /// Build a full `rows x cols` grid, allocating ids from `next_id`
    pub fn new(config: &GameConfig, mut next_id: impl FnMut() -> u32) -> Self {
        let mut enemies = Vec::with_capacity(config.enemy_count());
        for row in 0..config.enemy_rows {
            for col in 0..config.enemy_cols {
                let x = config.grid_origin_x + col as f32 * (config.enemy_width + config.grid_spacing);
                let y =
                    config.grid_origin_y + row as f32 * (config.enemy_height + config.grid_spacing);
                enemies.push(Enemy {
                    id: next_id(),
                    rect: Rect::new(x, y, config.enemy_width, config.enemy_height),
                });
            }
        }

        Self {
            enemies,
            direction: 1.0,
            base_speed: config.enemy_base_speed,
            drop_per_edge: config.effective_drop(),
            speed_increment: 0.0,
            latched_edge: None,
        }
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Whether the formation is still reacting to its last edge contact
    pub fn is_edge_latched(&self) -> bool {
        self.latched_edge.is_some()
    }

    /// Horizontal speed this tick: base + level bonus + kill increments
    pub fn effective_speed(&self, level: u32, config: &GameConfig) -> f32 {
        self.base_speed
            + config.level_speed_bonus * level.saturating_sub(1) as f32
            + self.speed_increment
    }

    /// Sweep every member sideways and react to edge contact.
    ///
    /// Returns true on the tick the formation flipped direction.
    pub fn advance(&mut self, level: u32, config: &GameConfig) -> bool {
        let dx = self.direction * self.effective_speed(level, config);

        let (mut at_left, mut at_right) = (false, false);
        for enemy in &mut self.enemies {
            enemy.rect.pos.x += dx;
            at_left |= enemy.rect.left() <= 0.0;
            at_right |= enemy.rect.right() >= config.screen_width;
        }

        // The edge ahead wins when both are touched
        let edge = match (at_left, at_right) {
            (false, false) => None,
            (true, false) => Some(Edge::Left),
            (false, true) => Some(Edge::Right),
            (true, true) if self.direction < 0.0 => Some(Edge::Left),
            (true, true) => Some(Edge::Right),
        };

        let Some(edge) = edge else {
            self.latched_edge = None;
            return false;
        };
        if self.latched_edge == Some(edge) {
            return false;
        }

        self.direction = -self.direction;
        for enemy in &mut self.enemies {
            enemy.rect.pos.y += self.drop_per_edge;
        }
        self.latched_edge = Some(edge);
        true
    }

    /// Account for one member destroyed by the player
    pub fn record_kill(&mut self, config: &GameConfig) {
        self.speed_increment += config.kill_speed_increment;
    }

    /// Pick a live member uniformly at random and return its muzzle (bottom-center)
    pub fn pick_shooter<R: Rng>(&self, rng: &mut R) -> Option<Vec2> {
        if self.enemies.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.enemies.len());
        Some(self.enemies[idx].rect.bottom_center())
    }

    /// Whether any member has reached the bottom of the screen
    pub fn breached(&self, screen_height: f32) -> bool {
        self.enemies
            .iter()
            .any(|e| e.rect.bottom() >= screen_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn formation(config: &GameConfig) -> Formation {
        let mut id = 0;
        Formation::new(config, || {
            id += 1;
            id
        })
    }

    #[test]
    fn test_grid_layout() {
        let config = GameConfig::default();
        let f = formation(&config);
        assert_eq!(f.len(), 24);
        assert_eq!(f.enemies[0].rect.pos, Vec2::new(50.0, 50.0));
        assert_eq!(f.enemies[7].rect.pos, Vec2::new(400.0, 50.0));
        assert_eq!(f.enemies[8].rect.pos, Vec2::new(50.0, 90.0));
        assert_eq!(f.direction, 1.0);
        assert_eq!(f.speed_increment, 0.0);
        assert!(!f.is_edge_latched());
    }

    #[test]
    fn test_effective_speed_scales_with_level_and_kills() {
        let config = GameConfig::default();
        let mut f = formation(&config);
        assert_eq!(f.effective_speed(1, &config), 2.0);
        assert_eq!(f.effective_speed(3, &config), 3.0);
        f.record_kill(&config);
        f.record_kill(&config);
        assert!((f.effective_speed(1, &config) - 2.1).abs() < 1e-5);
    }

    #[test]
    fn test_sweep_moves_in_lock_step() {
        let config = GameConfig::default();
        let mut f = formation(&config);
        assert!(!f.advance(1, &config));
        assert_eq!(f.enemies[0].rect.left(), 52.0);
        assert_eq!(f.enemies[23].rect.left(), 402.0);
        assert_eq!(f.enemies[0].rect.top(), 50.0);
    }

    #[test]
    fn test_single_flip_while_held_at_edge() {
        let config = GameConfig::default();
        let mut f = formation(&config);
        f.enemies.truncate(1);
        f.base_speed = 0.0;
        f.enemies[0].rect.pos.x = config.screen_width - config.enemy_width;
        let start_y = f.enemies[0].rect.top();

        assert!(f.advance(1, &config));
        assert_eq!(f.direction, -1.0);
        assert_eq!(f.enemies[0].rect.top(), start_y + 20.0);

        for _ in 0..5 {
            assert!(!f.advance(1, &config));
        }
        assert_eq!(f.direction, -1.0);
        assert_eq!(f.enemies[0].rect.top(), start_y + 20.0);
        assert!(f.is_edge_latched());
    }

    #[test]
    fn test_latch_rearms_after_leaving_edge() {
        let config = GameConfig::default();
        let mut f = formation(&config);
        f.enemies.truncate(1);
        f.enemies[0].rect.pos.x = config.screen_width - config.enemy_width - 1.0;

        // Moves right into the edge and flips
        assert!(f.advance(1, &config));
        assert_eq!(f.direction, -1.0);
        // Moving left clears the edge and resets the latch
        assert!(!f.advance(1, &config));
        assert!(!f.is_edge_latched());

        // Sweep all the way to the left edge: exactly one more flip
        let mut flips = 0;
        for _ in 0..400 {
            if f.advance(1, &config) {
                flips += 1;
            }
            if f.direction > 0.0 {
                break;
            }
        }
        assert_eq!(flips, 1);
        assert_eq!(f.enemies[0].rect.top(), 90.0);
    }

    #[test]
    fn test_flips_when_one_step_crosses_to_the_other_edge() {
        let config = GameConfig::default();
        let mut f = formation(&config);
        f.enemies.truncate(1);
        f.base_speed = 0.0;
        f.enemies[0].rect.pos.x = config.screen_width - config.enemy_width;
        let start_y = f.enemies[0].rect.top();
        assert!(f.advance(1, &config));

        // One step spans the whole free gap: right edge straight to left edge
        f.base_speed = config.screen_width - config.enemy_width;
        assert!(f.advance(1, &config));
        assert_eq!(f.enemies[0].rect.left(), 0.0);
        assert_eq!(f.direction, 1.0);

        assert!(f.advance(1, &config));
        assert_eq!(f.enemies[0].rect.right(), config.screen_width);
        assert_eq!(f.direction, -1.0);
        assert_eq!(f.enemies[0].rect.top(), start_y + 60.0);
        assert!(f.is_edge_latched());
    }

    #[test]
    fn test_pick_shooter() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut f = formation(&config);
        let muzzle = f.pick_shooter(&mut rng).unwrap();
        assert!(f.enemies.iter().any(|e| e.rect.bottom_center() == muzzle));

        f.enemies.clear();
        assert!(f.pick_shooter(&mut rng).is_none());
    }

    #[test]
    fn test_breach() {
        let config = GameConfig::default();
        let mut f = formation(&config);
        assert!(!f.breached(config.screen_height));
        f.enemies[3].rect.pos.y = config.screen_height - config.enemy_height;
        assert!(f.breached(config.screen_height));
    }
}
