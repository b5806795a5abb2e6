//! Read-only scene description handed to the presentation layer

use serde::{Deserialize, Serialize};

use super::entities::EntityKind;
use super::rect::Rect;
use super::state::{GamePhase, GameState};

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Sprite {
    fn new(kind: EntityKind, rect: &Rect) -> Self {
        Self {
            kind,
            x: rect.pos.x,
            y: rect.pos.y,
            width: rect.size.x,
            height: rect.size.y,
        }
    }
}

/// HUD values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub shield_active: bool,
    pub spread_fire_active: bool,
}

/// Everything the adapter needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Player, player bullets, enemies, enemy bullets, power-ups (in that order)
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
    pub phase: GamePhase,
}

impl Scene {
    pub fn capture(state: &GameState) -> Self {
        let mut sprites = Vec::with_capacity(
            1 + state.bullets.len()
                + state.formation.len()
                + state.enemy_bullets.len()
                + state.powerups.len(),
        );

        sprites.push(Sprite::new(EntityKind::Player, &state.player.rect));
        sprites.extend(
            state
                .bullets
                .iter()
                .map(|b| Sprite::new(EntityKind::PlayerBullet, &b.rect)),
        );
        sprites.extend(
            state
                .formation
                .enemies
                .iter()
                .map(|e| Sprite::new(EntityKind::Enemy, &e.rect)),
        );
        sprites.extend(
            state
                .enemy_bullets
                .iter()
                .map(|b| Sprite::new(EntityKind::EnemyBullet, &b.rect)),
        );
        sprites.extend(
            state
                .powerups
                .iter()
                .map(|p| Sprite::new(EntityKind::PowerUp(p.kind), &p.rect)),
        );

        Self {
            sprites,
            hud: Hud {
                score: state.score,
                level: state.level,
                lives: state.lives,
                shield_active: state.effects.shield_active,
                spread_fire_active: state.effects.spread_fire_active(),
            },
            phase: state.phase,
        }
    }

    /// Sprites of one kind
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(move |s| s.kind == kind)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_capture_initial_scene() {
        let state = GameState::new(GameConfig::default(), 3);
        let scene = Scene::capture(&state);
        assert_eq!(scene.sprites.len(), 25);
        assert_eq!(scene.sprites[0].kind, EntityKind::Player);
        assert_eq!(scene.of_kind(EntityKind::Enemy).count(), 24);
        assert_eq!(scene.hud.lives, 3);
        assert_eq!(scene.hud.level, 1);
        assert!(!scene.hud.shield_active);
    }

    #[test]
    fn test_scene_json() {
        let state = GameState::new(GameConfig::default(), 3);
        let json = Scene::capture(&state).to_json().unwrap();
        assert!(json.contains("\"Player\""));
        assert!(json.contains("\"score\":0"));
    }
}
