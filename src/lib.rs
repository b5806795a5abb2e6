//! Wave Shooter - a single-screen, wave-based 2D shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formation, collisions, run state)
//! - `config`: Validated, data-driven game tuning
//! - `error`: Configuration errors
//!
//! Rendering, windowing and input capture are left to the embedding adapter,
//! which feeds [`sim::TickInput`] snapshots into [`sim::tick`] and draws the
//! [`sim::Scene`] it gets back.

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;

/// Simulation timing constants
pub mod consts {
    /// Target tick rate of the external frame clock
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Shortest whole-millisecond step of the 60 Hz cadence
    pub const SIM_DT_MS: u32 = 16;

    /// Milliseconds elapsed on the `tick`-th tick (1-based) of a 60 Hz clock.
    ///
    /// Alternates 16 and 17 so that every `TICKS_PER_SECOND` ticks add up to
    /// exactly one second.
    pub fn frame_ms(tick: u64) -> u32 {
        let at = |t: u64| t * 1000 / u64::from(TICKS_PER_SECOND);
        (at(tick) - at(tick.saturating_sub(1))) as u32
    }
}
