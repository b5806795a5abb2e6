//! Entity types and their per-tick update rules
//!
//! Entities are plain data. Each `advance` mutates only the entity's own
//! position and reports whether it left the playfield; the owning collection
//! drops flagged entries in a separate compaction pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::config::GameConfig;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs exactly one hit
    Shield,
    /// Fires a fan of drifting bullets for a limited time
    SpreadFire,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Shield, PowerUpKind::SpreadFire];
}

/// Tag for every kind of entity that can appear in a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    PlayerBullet,
    Enemy,
    EnemyBullet,
    PowerUp(PowerUpKind),
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal velocity in pixels per tick
    pub velocity: f32,
    /// Run clock time of the last shot (None = never fired)
    pub last_shot_ms: Option<u64>,
    /// Movement keys held during the previous tick (for press/release edges)
    held_left: bool,
    held_right: bool,
}

impl Player {
    /// Spawn centered horizontally, resting above the bottom margin
    pub fn new(config: &GameConfig) -> Self {
        let x = (config.screen_width - config.player_width) / 2.0;
        let y = config.screen_height - config.player_bottom_margin - config.player_height;
        Self {
            rect: Rect::new(x, y, config.player_width, config.player_height),
            velocity: 0.0,
            last_shot_ms: None,
            held_left: false,
            held_right: false,
        }
    }

    /// Turn the held-key snapshot into velocity changes.
    ///
    /// Releases are handled before presses. A release only stops the ship if
    /// it was moving in the released direction, so letting go of one key never
    /// cancels motion the other key started.
    pub fn apply_movement(&mut self, move_left: bool, move_right: bool, speed: f32) {
        let released_left = self.held_left && !move_left;
        let released_right = self.held_right && !move_right;
        let pressed_left = move_left && !self.held_left;
        let pressed_right = move_right && !self.held_right;

        if released_left && self.velocity < 0.0 {
            self.velocity = 0.0;
        }
        if released_right && self.velocity > 0.0 {
            self.velocity = 0.0;
        }
        if pressed_left {
            self.velocity = -speed;
        }
        if pressed_right {
            self.velocity = speed;
        }

        self.held_left = move_left;
        self.held_right = move_right;
    }

    /// Whether the shoot cooldown has elapsed at `now_ms`
    pub fn can_fire(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_shot_ms {
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
            None => true,
        }
    }

    /// Move by the current velocity and clamp to `[0, screen_width - width]`
    pub fn advance(&mut self, screen_width: f32) {
        let max_x = (screen_width - self.rect.size.x).max(0.0);
        self.rect.pos.x = (self.rect.pos.x + self.velocity).clamp(0.0, max_x);
    }
}

/// A bullet fired upward by the player
#[derive(Debug, Clone)]
pub struct PlayerBullet {
    pub id: u32,
    pub rect: Rect,
    /// Horizontal drift in pixels per tick (non-zero only for spread shots)
    pub drift: f32,
}

impl PlayerBullet {
    /// Spawn centered on `muzzle`
    pub fn new(id: u32, muzzle: Vec2, drift: f32, config: &GameConfig) -> Self {
        Self {
            id,
            rect: Rect::from_center(muzzle, Vec2::new(config.bullet_width, config.bullet_height)),
            drift,
        }
    }

    /// Returns true once the bullet has fully left the screen
    pub fn advance(&mut self, config: &GameConfig) -> bool {
        self.rect.translate(Vec2::new(self.drift, -config.bullet_speed));
        self.rect
            .is_off_screen(config.screen_width, config.screen_height)
    }
}

/// A bullet fired downward by an enemy
#[derive(Debug, Clone)]
pub struct EnemyBullet {
    pub id: u32,
    pub rect: Rect,
}

impl EnemyBullet {
    /// Spawn with its top edge centered on `muzzle` (the shooter's bottom-center)
    pub fn new(id: u32, muzzle: Vec2, config: &GameConfig) -> Self {
        let size = Vec2::new(config.enemy_bullet_width, config.enemy_bullet_height);
        Self {
            id,
            rect: Rect {
                pos: Vec2::new(muzzle.x - size.x / 2.0, muzzle.y),
                size,
            },
        }
    }

    /// Returns true once the bullet is past the bottom edge
    pub fn advance(&mut self, config: &GameConfig) -> bool {
        self.rect.pos.y += config.enemy_bullet_speed;
        self.rect.top() > config.screen_height
    }
}

/// A member of the enemy formation
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub rect: Rect,
}

/// A falling power-up capsule
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub rect: Rect,
}

impl PowerUp {
    /// Spawn centered on `center`
    pub fn new(id: u32, kind: PowerUpKind, center: Vec2, config: &GameConfig) -> Self {
        Self {
            id,
            kind,
            rect: Rect::from_center(center, Vec2::splat(config.powerup_size)),
        }
    }

    /// Returns true once the capsule is past the bottom edge
    pub fn advance(&mut self, config: &GameConfig) -> bool {
        self.rect.pos.y += config.powerup_fall_speed;
        self.rect.top() > config.screen_height
    }
}

/// Run `advance` over every item, then drop the ones it flagged.
///
/// Returns the number of removed items.
pub fn advance_and_compact<T>(items: &mut Vec<T>, mut advance: impl FnMut(&mut T) -> bool) -> usize {
    let flags: Vec<bool> = items.iter_mut().map(&mut advance).collect();
    let before = items.len();
    let mut flags = flags.into_iter();
    items.retain(|_| !flags.next().unwrap_or(false));
    before - items.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_spawn_position() {
        let config = GameConfig::default();
        let player = Player::new(&config);
        assert_eq!(player.rect.left(), 275.0);
        assert_eq!(player.rect.bottom(), 770.0);
    }

    #[test]
    fn test_player_clamped_to_screen() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.velocity = -1000.0;
        player.advance(config.screen_width);
        assert_eq!(player.rect.left(), 0.0);

        player.velocity = 1000.0;
        player.advance(config.screen_width);
        assert_eq!(player.rect.left(), config.screen_width - config.player_width);
    }

    #[test]
    fn test_release_only_cancels_matching_direction() {
        let mut player = Player::new(&GameConfig::default());

        // Hold left, then also press right: right wins
        player.apply_movement(true, false, 5.0);
        assert_eq!(player.velocity, -5.0);
        player.apply_movement(true, true, 5.0);
        assert_eq!(player.velocity, 5.0);

        // Releasing left must not stop rightward motion
        player.apply_movement(false, true, 5.0);
        assert_eq!(player.velocity, 5.0);

        // Releasing right stops it
        player.apply_movement(false, false, 5.0);
        assert_eq!(player.velocity, 0.0);
    }

    #[test]
    fn test_holding_does_not_retrigger_press() {
        let mut player = Player::new(&GameConfig::default());
        player.apply_movement(true, false, 5.0);
        player.velocity = 0.0;
        player.apply_movement(true, false, 5.0);
        assert_eq!(player.velocity, 0.0);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut player = Player::new(&GameConfig::default());
        assert!(player.can_fire(0, 250));
        player.last_shot_ms = Some(100);
        assert!(!player.can_fire(349, 250));
        assert!(player.can_fire(350, 250));
    }

    #[test]
    fn test_player_bullet_leaves_through_top() {
        let config = GameConfig::default();
        let mut bullet = PlayerBullet::new(1, Vec2::new(100.0, 10.0), 0.0, &config);
        assert!(!bullet.advance(&config)); // bottom at 8
        assert!(!bullet.advance(&config)); // bottom at 1
        assert!(bullet.advance(&config)); // bottom at -6
    }

    #[test]
    fn test_drifting_bullet_leaves_through_side() {
        let config = GameConfig::default();
        let mut bullet = PlayerBullet::new(1, Vec2::new(1.0, 400.0), -2.0, &config);
        let mut ticks = 0;
        while !bullet.advance(&config) {
            ticks += 1;
        }
        assert!(bullet.rect.right() < 0.0);
        assert!(ticks < 10);
    }

    #[test]
    fn test_enemy_bullet_and_powerup_fall_off_bottom() {
        let config = GameConfig::default();
        let mut bullet = EnemyBullet::new(2, Vec2::new(100.0, 794.0), &config);
        assert!(!bullet.advance(&config)); // top at 799
        assert!(bullet.advance(&config)); // top at 804

        let mut capsule = PowerUp::new(3, PowerUpKind::Shield, Vec2::new(100.0, 795.0), &config);
        assert!(!capsule.advance(&config)); // top at 788
        for _ in 0..4 {
            capsule.advance(&config);
        }
        assert!(capsule.advance(&config));
    }

    #[test]
    fn test_advance_and_compact() {
        let mut values = vec![1, 5, 2, 8, 3];
        let removed = advance_and_compact(&mut values, |v| {
            *v += 1;
            *v > 4
        });
        assert_eq!(removed, 2);
        assert_eq!(values, vec![2, 3, 4]);
    }
}
