//! Game tuning and configuration
//!
//! Every constant the simulation reads lives in [`GameConfig`]. Adapters
//! build one (or load it from JSON), call [`GameConfig::validate`], and hand
//! it to [`GameState::new`](crate::sim::GameState::new). The simulation
//! assumes the config it receives has been validated.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Complete game tuning. Speeds are pixels per tick, times are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    /// Gap between the player's bottom edge and the screen bottom
    pub player_bottom_margin: f32,
    pub shoot_cooldown_ms: u64,
    pub starting_lives: u32,

    // === Player bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    /// Bullets per shot while spread fire is active
    pub spread_bullet_count: u32,
    /// Spread bullets drift horizontally by up to this many pixels per tick
    pub spread_max_drift: f32,

    // === Enemies ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_base_speed: f32,
    /// Full drop distance; half of it is applied per edge contact
    pub enemy_drop: f32,
    pub enemy_rows: u32,
    pub enemy_cols: u32,
    pub grid_origin_x: f32,
    pub grid_origin_y: f32,
    pub grid_spacing: f32,
    /// Speed added per level above the first
    pub level_speed_bonus: f32,
    /// Speed added per enemy destroyed in the current wave
    pub kill_speed_increment: f32,

    // === Enemy fire ===
    pub enemy_bullet_width: f32,
    pub enemy_bullet_height: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_fire_cooldown_ms: u64,
    /// Cooldown reduction applied on every level advance
    pub enemy_fire_cooldown_step_ms: u64,
    pub enemy_fire_cooldown_floor_ms: u64,

    // === Power-ups ===
    pub powerup_size: f32,
    pub powerup_fall_speed: f32,
    /// Chance that a destroyed enemy drops a power-up (0.0 - 1.0)
    pub powerup_drop_chance: f64,
    pub spread_fire_duration_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 600.0,
            screen_height: 800.0,

            player_width: 50.0,
            player_height: 30.0,
            player_speed: 5.0,
            player_bottom_margin: 30.0,
            shoot_cooldown_ms: 250,
            starting_lives: 3,

            bullet_width: 5.0,
            bullet_height: 10.0,
            bullet_speed: 7.0,
            spread_bullet_count: 3,
            spread_max_drift: 2.0,

            enemy_width: 40.0,
            enemy_height: 30.0,
            enemy_base_speed: 2.0,
            enemy_drop: 40.0,
            enemy_rows: 3,
            enemy_cols: 8,
            grid_origin_x: 50.0,
            grid_origin_y: 50.0,
            grid_spacing: 10.0,
            level_speed_bonus: 0.5,
            kill_speed_increment: 0.05,

            enemy_bullet_width: 5.0,
            enemy_bullet_height: 10.0,
            enemy_bullet_speed: 5.0,
            enemy_fire_cooldown_ms: 1500,
            enemy_fire_cooldown_step_ms: 100,
            enemy_fire_cooldown_floor_ms: 400,

            powerup_size: 20.0,
            powerup_fall_speed: 3.0,
            powerup_drop_chance: 0.10,
            spread_fire_duration_ms: 5000,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config (missing fields fall back to defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Drop distance applied on each edge contact
    #[inline]
    pub fn effective_drop(&self) -> f32 {
        self.enemy_drop / 2.0
    }

    /// Enemies in a full formation
    #[inline]
    pub fn enemy_count(&self) -> usize {
        (self.enemy_rows * self.enemy_cols) as usize
    }

    /// Width of the enemy grid from its leftmost to its rightmost edge
    pub fn grid_width(&self) -> f32 {
        let cols = self.enemy_cols as f32;
        cols * self.enemy_width + (cols - 1.0).max(0.0) * self.grid_spacing
    }

    /// Height of the enemy grid from its top to its bottom edge
    pub fn grid_height(&self) -> f32 {
        let rows = self.enemy_rows as f32;
        rows * self.enemy_height + (rows - 1.0).max(0.0) * self.grid_spacing
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("bullet_speed", self.bullet_speed),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("enemy_base_speed", self.enemy_base_speed),
            ("enemy_drop", self.enemy_drop),
            ("enemy_bullet_width", self.enemy_bullet_width),
            ("enemy_bullet_height", self.enemy_bullet_height),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("powerup_size", self.powerup_size),
            ("powerup_fall_speed", self.powerup_fall_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("player_bottom_margin", self.player_bottom_margin),
            ("spread_max_drift", self.spread_max_drift),
            ("grid_origin_x", self.grid_origin_x),
            ("grid_origin_y", self.grid_origin_y),
            ("grid_spacing", self.grid_spacing),
            ("level_speed_bonus", self.level_speed_bonus),
            ("kill_speed_increment", self.kill_speed_increment),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")));
            }
        }

        if self.starting_lives == 0 {
            return Err(ConfigError::invalid("starting_lives", "must be at least 1"));
        }
        if self.spread_bullet_count == 0 {
            return Err(ConfigError::invalid("spread_bullet_count", "must be at least 1"));
        }
        if self.enemy_rows == 0 || self.enemy_cols == 0 {
            return Err(ConfigError::invalid(
                "enemy_rows",
                format!("grid must be non-empty, got {}x{}", self.enemy_rows, self.enemy_cols),
            ));
        }
        if !(0.0..=1.0).contains(&self.powerup_drop_chance) {
            return Err(ConfigError::invalid(
                "powerup_drop_chance",
                format!("must be within [0, 1], got {}", self.powerup_drop_chance),
            ));
        }
        if self.enemy_fire_cooldown_floor_ms > self.enemy_fire_cooldown_ms {
            return Err(ConfigError::invalid(
                "enemy_fire_cooldown_floor_ms",
                "floor exceeds the initial enemy fire cooldown",
            ));
        }
        if self.player_width > self.screen_width {
            return Err(ConfigError::invalid("player_width", "player is wider than the screen"));
        }
        if self.player_height + self.player_bottom_margin > self.screen_height {
            return Err(ConfigError::invalid("player_height", "player does not fit on screen"));
        }
        if self.grid_origin_x + self.grid_width() >= self.screen_width {
            return Err(ConfigError::invalid(
                "enemy_cols",
                "enemy grid does not fit the screen width",
            ));
        }
        if self.grid_origin_y + self.grid_height() >= self.screen_height {
            return Err(ConfigError::invalid(
                "enemy_rows",
                "enemy grid does not fit the screen height",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enemy_count(), 24);
        assert_eq!(config.effective_drop(), 20.0);
    }

    #[test]
    fn test_rejects_degenerate_values() {
        let config = GameConfig {
            enemy_base_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "enemy_base_speed", .. })
        ));

        let config = GameConfig {
            screen_width: -10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            powerup_drop_chance: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            enemy_cols: 12,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "enemy_cols", .. })
        ));
    }

    #[test]
    fn test_json_partial_override() {
        let config = GameConfig::from_json(r#"{ "enemy_rows": 2, "starting_lives": 5 }"#).unwrap();
        assert_eq!(config.enemy_rows, 2);
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.screen_width, 600.0);
    }

    #[test]
    fn test_json_invalid_is_rejected() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "starting_lives": 0 }"#),
            Err(ConfigError::Invalid { field: "starting_lives", .. })
        ));
    }
}
