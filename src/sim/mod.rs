//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time is injected per tick, never read from a wall clock
//! - Seeded RNG only (one generator per run)
//! - Stable iteration order (insertion order within each collection)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod formation;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{kill_score, resolve_bullet_hits, take_overlapping};
pub use entities::{Enemy, EnemyBullet, EntityKind, Player, PlayerBullet, PowerUp, PowerUpKind};
pub use formation::Formation;
pub use rect::Rect;
pub use snapshot::{Hud, Scene, Sprite};
pub use state::{
    ActiveEffects, GameEvent, GamePhase, GameState, RunEndReason, RunSummary,
};
pub use tick::{TickInput, idle_input, tick};
