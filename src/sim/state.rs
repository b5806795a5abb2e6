//! Run state and core simulation types
//!
//! `GameState` owns every entity collection for one run, the current
//! formation, and the single seeded RNG all randomness is drawn from.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{EnemyBullet, Player, PlayerBullet, PowerUp, PowerUpKind};
use super::formation::Formation;
use crate::config::GameConfig;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen; the run clock does not advance
    Paused,
    /// Run ended (terminal)
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEndReason {
    /// Lives reached zero
    LivesExhausted,
    /// An enemy reached the bottom of the screen
    EnemyBreach,
    /// The adapter sent a quit signal
    Aborted,
}

/// Final figures for the end-of-run summary screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
    pub enemies_defeated: u32,
    pub reason: RunEndReason,
    pub ticks: u64,
    pub clock_ms: u64,
}

/// Something noteworthy that happened during the last tick (for sound/feedback)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerFired { bullets: u32 },
    EnemyFired,
    EnemyDestroyed { score: u64 },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    ShieldAbsorbed,
    LifeLost { lives_left: u32 },
    SpreadFireExpired,
    LevelCleared { level: u32 },
    RunEnded(RunEndReason),
}

/// Timed and single-use power-up effects currently on the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield_active: bool,
    /// Run clock time spread fire was (re)started; `Some` while active
    pub spread_fire_since_ms: Option<u64>,
}

impl ActiveEffects {
    pub fn spread_fire_active(&self) -> bool {
        self.spread_fire_since_ms.is_some()
    }

    /// Drop every power-up (on losing a life)
    pub fn clear(&mut self) {
        self.shield_active = false;
        self.spread_fire_since_ms = None;
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Validated tuning for this run
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single source of randomness
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Set when the run ends
    pub end_reason: Option<RunEndReason>,
    /// Current level (1-based, endless)
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    pub enemies_defeated: u32,
    /// Simulation tick counter (playing ticks only)
    pub time_ticks: u64,
    /// Run clock: sum of elapsed time fed to playing ticks
    pub clock_ms: u64,
    /// Current enemy fire cooldown (shrinks each level)
    pub enemy_fire_cooldown_ms: u64,
    /// Run clock time of the last enemy shot
    pub last_enemy_fire_ms: u64,
    pub player: Player,
    /// Active player bullets (insertion order)
    pub bullets: Vec<PlayerBullet>,
    /// Active enemy bullets (insertion order)
    pub enemy_bullets: Vec<EnemyBullet>,
    /// Falling power-ups (insertion order)
    pub powerups: Vec<PowerUp>,
    pub formation: Formation,
    pub effects: ActiveEffects,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a run with an already validated config
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut next_id = 1;
        let formation = Formation::new(&config, || {
            let id = next_id;
            next_id += 1;
            id
        });

        log::info!(
            "Run started: seed={}, formation={}x{}, lives={}",
            seed,
            config.enemy_rows,
            config.enemy_cols,
            config.starting_lives
        );

        Self {
            player: Player::new(&config),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            end_reason: None,
            level: 1,
            lives: config.starting_lives,
            score: 0,
            enemies_defeated: 0,
            time_ticks: 0,
            clock_ms: 0,
            enemy_fire_cooldown_ms: config.enemy_fire_cooldown_ms,
            last_enemy_fire_ms: 0,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            powerups: Vec::new(),
            formation,
            effects: ActiveEffects::default(),
            events: Vec::new(),
            next_id,
            config,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Run-end signal: `Some` once the run is over
    pub fn run_end(&self) -> Option<RunSummary> {
        self.end_reason.map(|reason| RunSummary {
            score: self.score,
            level: self.level,
            enemies_defeated: self.enemies_defeated,
            reason,
            ticks: self.time_ticks,
            clock_ms: self.clock_ms,
        })
    }

    /// Enter the terminal phase. Later calls keep the first reason.
    pub fn end_run(&mut self, reason: RunEndReason) {
        if self.end_reason.is_some() {
            return;
        }
        self.end_reason = Some(reason);
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::RunEnded(reason));
        log::info!(
            "Run ended ({:?}): score={}, level={}, enemies defeated={}",
            reason,
            self.score,
            self.level,
            self.enemies_defeated
        );
    }

    /// Lose one life and every active power-up; ends the run at zero lives
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.effects.clear();
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        log::debug!("Life lost, {} left", self.lives);
        if self.lives == 0 {
            self.end_run(RunEndReason::LivesExhausted);
        }
    }

    /// Let an active shield absorb a hit. Returns false if there was none.
    pub fn absorb_with_shield(&mut self) -> bool {
        if !self.effects.shield_active {
            return false;
        }
        self.effects.shield_active = false;
        self.events.push(GameEvent::ShieldAbsorbed);
        log::debug!("Shield absorbed a hit");
        true
    }

    /// Apply a collected power-up's effect
    pub fn apply_powerup(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Shield => self.effects.shield_active = true,
            PowerUpKind::SpreadFire => self.effects.spread_fire_since_ms = Some(self.clock_ms),
        }
        self.events.push(GameEvent::PowerUpCollected(kind));
        log::debug!("Collected {:?}", kind);
    }

    /// Spawn a power-up capsule centered on `center`
    pub fn spawn_powerup(&mut self, kind: PowerUpKind, center: Vec2) {
        let id = self.next_entity_id();
        self.powerups.push(PowerUp::new(id, kind, center, &self.config));
        self.events.push(GameEvent::PowerUpSpawned(kind));
    }

    /// Advance to the next level with a fresh formation and faster enemy fire
    pub fn advance_level(&mut self) {
        self.events.push(GameEvent::LevelCleared { level: self.level });
        self.level += 1;

        let mut next_id = self.next_id;
        self.formation = Formation::new(&self.config, || {
            let id = next_id;
            next_id += 1;
            id
        });
        self.next_id = next_id;

        self.enemy_fire_cooldown_ms = self
            .enemy_fire_cooldown_ms
            .saturating_sub(self.config.enemy_fire_cooldown_step_ms)
            .max(self.config.enemy_fire_cooldown_floor_ms);

        log::info!(
            "Level {} begins: enemy speed {:.2}, enemy fire every {}ms",
            self.level,
            self.formation.effective_speed(self.level, &self.config),
            self.enemy_fire_cooldown_ms
        );
    }
}
