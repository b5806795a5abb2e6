//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run deterministically. The order of the
//! steps below is part of the contract: replaying the same seed and input
//! trace reproduces the same run.

use rand::Rng;

use super::collision::{kill_score, resolve_bullet_hits, take_overlapping};
use super::entities::{EnemyBullet, PlayerBullet, PowerUpKind, advance_and_compact};
use super::snapshot::Scene;
use super::state::{GameEvent, GamePhase, GameState, RunEndReason};

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left movement key held (level-triggered)
    pub move_left: bool,
    /// Right movement key held (level-triggered)
    pub move_right: bool,
    /// Fire pressed since the last tick (edge-triggered)
    pub fire_pressed: bool,
    /// Pause toggle
    pub pause: bool,
    /// Abort the run at this tick boundary
    pub quit: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the run by one tick of `elapsed_ms` and return the new scene
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: u32) -> Scene {
    state.events.clear();

    if input.quit && !state.is_over() {
        state.end_run(RunEndReason::Aborted);
        return Scene::capture(state);
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return Scene::capture(state);
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return Scene::capture(state);
    }

    let input = if input.idle_mode {
        idle_input(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    state.clock_ms += u64::from(elapsed_ms);
    let now = state.clock_ms;

    // 1. Movement
    state
        .player
        .apply_movement(input.move_left, input.move_right, state.config.player_speed);

    // 2. Fire control
    if input.fire_pressed && state.player.can_fire(now, state.config.shoot_cooldown_ms) {
        fire_player(state, now);
    }

    // 3. Advance everything
    state.player.advance(state.config.screen_width);
    advance_and_compact(&mut state.bullets, |b| b.advance(&state.config));
    state.formation.advance(state.level, &state.config);
    enemy_fire(state, now);
    advance_and_compact(&mut state.powerups, |p| p.advance(&state.config));
    advance_and_compact(&mut state.enemy_bullets, |b| b.advance(&state.config));

    // 4. Player bullets vs enemies
    let destroyed = resolve_bullet_hits(&mut state.bullets, &mut state.formation.enemies);
    for enemy in destroyed {
        let points = kill_score(enemy.rect.top(), state.config.screen_height);
        state.score += points;
        state.enemies_defeated += 1;
        state.events.push(GameEvent::EnemyDestroyed { score: points });

        if state.rng.random_bool(state.config.powerup_drop_chance) {
            let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
            state.spawn_powerup(kind, enemy.rect.center());
        }
        state.formation.record_kill(&state.config);
    }

    // 5. Power-up pickups
    let player_rect = state.player.rect;
    for powerup in take_overlapping(&player_rect, &mut state.powerups, |p| p.rect) {
        state.apply_powerup(powerup.kind);
    }

    // 6. Spread fire expiry
    if let Some(since) = state.effects.spread_fire_since_ms {
        if now.saturating_sub(since) >= state.config.spread_fire_duration_ms {
            state.effects.spread_fire_since_ms = None;
            state.events.push(GameEvent::SpreadFireExpired);
            log::debug!("Spread fire expired at {}ms", now);
        }
    }

    // 7. Enemy bullets vs player
    let hits = take_overlapping(&player_rect, &mut state.enemy_bullets, |b| b.rect);
    if !hits.is_empty() && !state.absorb_with_shield() {
        state.lose_life();
    }
    if state.is_over() {
        return Scene::capture(state);
    }

    // 8. Enemy bodies vs player
    // The shield soaks up one body; any other member touching the player still hurts
    let rammed = take_overlapping(&player_rect, &mut state.formation.enemies, |e| e.rect);
    let mut body_hits = rammed.len();
    if body_hits > 0 && state.absorb_with_shield() {
        body_hits -= 1;
    }
    if body_hits > 0 {
        state.lose_life();
    }
    if state.is_over() {
        return Scene::capture(state);
    }

    // 9. Formation reached the bottom
    if state.formation.breached(state.config.screen_height) {
        state.end_run(RunEndReason::EnemyBreach);
        return Scene::capture(state);
    }

    // 10. Wave cleared
    if state.formation.is_empty() {
        state.advance_level();
    }

    log::trace!(
        "tick {} @{}ms: enemies={} bullets={} enemy_bullets={} powerups={}",
        state.time_ticks,
        now,
        state.formation.len(),
        state.bullets.len(),
        state.enemy_bullets.len(),
        state.powerups.len()
    );

    // 11. Snapshot
    Scene::capture(state)
}

/// Spawn one bullet, or a drifting fan while spread fire is active
fn fire_player(state: &mut GameState, now: u64) {
    let muzzle = state.player.rect.top_center();
    let spread = state.effects.spread_fire_active();
    let count = if spread {
        state.config.spread_bullet_count
    } else {
        1
    };

    for _ in 0..count {
        let drift = if spread {
            let max = state.config.spread_max_drift;
            state.rng.random_range(-max..=max)
        } else {
            0.0
        };
        let id = state.next_entity_id();
        state
            .bullets
            .push(PlayerBullet::new(id, muzzle, drift, &state.config));
    }

    state.player.last_shot_ms = Some(now);
    state.events.push(GameEvent::PlayerFired { bullets: count });
}

/// Let a random formation member shoot once the enemy cooldown has elapsed
fn enemy_fire(state: &mut GameState, now: u64) {
    if now.saturating_sub(state.last_enemy_fire_ms) < state.enemy_fire_cooldown_ms {
        return;
    }
    let Some(muzzle) = state.formation.pick_shooter(&mut state.rng) else {
        return;
    };
    let id = state.next_entity_id();
    state
        .enemy_bullets
        .push(EnemyBullet::new(id, muzzle, &state.config));
    state.last_enemy_fire_ms = now;
    state.events.push(GameEvent::EnemyFired);
}

/// Vertical distance within which an enemy bullet counts as a threat
const DODGE_LOOKAHEAD: f32 = 160.0;
/// Extra horizontal clearance the autopilot keeps from incoming bullets
const DODGE_MARGIN: f32 = 8.0;

/// Autopilot input for idle/demo mode.
///
/// Priorities: dodge incoming enemy bullets, then grab a reachable power-up,
/// then line up under the lowest enemy and fire.
pub fn idle_input(state: &GameState) -> TickInput {
    let player = &state.player.rect;
    let player_x = player.center().x;
    let speed = state.config.player_speed;

    let threat = state
        .enemy_bullets
        .iter()
        .filter(|b| {
            b.rect.bottom() <= player.bottom()
                && player.top() - b.rect.bottom() < DODGE_LOOKAHEAD
                && b.rect.right() + DODGE_MARGIN > player.left()
                && b.rect.left() - DODGE_MARGIN < player.right()
        })
        .max_by(|a, b| a.rect.bottom().total_cmp(&b.rect.bottom()));

    let target_x = if let Some(bullet) = threat {
        // Step away from the bullet, preferring the side with more room
        let bullet_x = bullet.rect.center().x;
        let room_left = bullet_x;
        let room_right = state.config.screen_width - bullet_x;
        let clearance = player.size.x + DODGE_MARGIN * 2.0;
        if (bullet_x >= player_x && room_left > clearance) || room_right <= clearance {
            bullet_x - clearance
        } else {
            bullet_x + clearance
        }
    } else if let Some(powerup) = state
        .powerups
        .iter()
        .filter(|p| p.rect.bottom() < player.top())
        .min_by(|a, b| {
            (a.rect.center().x - player_x)
                .abs()
                .total_cmp(&(b.rect.center().x - player_x).abs())
        })
    {
        powerup.rect.center().x
    } else if let Some(enemy) = state.formation.enemies.iter().max_by(|a, b| {
        a.rect
            .bottom()
            .total_cmp(&b.rect.bottom())
            .then_with(|| {
                (b.rect.center().x - player_x)
                    .abs()
                    .total_cmp(&(a.rect.center().x - player_x).abs())
            })
    }) {
        enemy.rect.center().x
    } else {
        player_x
    };

    let dx = target_x - player_x;
    let aligned = state
        .formation
        .enemies
        .iter()
        .any(|e| e.rect.left() < player_x && e.rect.right() > player_x);

    TickInput {
        move_left: dx < -speed,
        move_right: dx > speed,
        fire_pressed: aligned && threat.is_none(),
        idle_mode: true,
        ..Default::default()
    }
}
