//! Wave Shooter headless runner
//!
//! Plays a run with the idle autopilot at the fixed timestep and reports the
//! result. Useful for balance checks and replay verification.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use wave_shooter::GameConfig;
use wave_shooter::consts::frame_ms;
use wave_shooter::sim::{GameEvent, GameState, TickInput, tick};

/// Run the wave shooter simulation headless with the autopilot
#[derive(Parser)]
#[command(name = "wave-shooter")]
#[command(about = "Headless wave shooter simulation")]
struct Cli {
    /// JSON config file (defaults to the built-in tuning)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for the run
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Abort the run after this many ticks
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_ticks: u64,

    /// Print the final scene as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let config = GameConfig::default();
            config.validate().context("Built-in config is invalid")?;
            config
        }
    };

    log::info!("Wave Shooter (headless) starting with seed {}", cli.seed);

    let mut state = GameState::new(config, cli.seed);
    let autopilot = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut scene = None;
    while !state.is_over() {
        let input = if state.time_ticks >= cli.max_ticks {
            TickInput {
                quit: true,
                ..Default::default()
            }
        } else {
            autopilot.clone()
        };
        let dt = frame_ms(state.time_ticks + 1);
        scene = Some(tick(&mut state, &input, dt));

        for event in &state.events {
            if let GameEvent::LevelCleared { level } = event {
                log::info!(
                    "Level {} cleared at {:.1}s, score {}",
                    level,
                    state.clock_ms as f64 / 1000.0,
                    state.score
                );
            }
        }
    }

    let summary = state
        .run_end()
        .context("Run loop exited without a run-end signal")?;

    if cli.json {
        let scene = scene.context("No ticks were simulated")?;
        println!("{}", scene.to_json().context("Failed to serialize scene")?);
    } else {
        println!("Run over: {:?}", summary.reason);
        println!("  Score:            {}", summary.score);
        println!("  Level reached:    {}", summary.level);
        println!("  Enemies defeated: {}", summary.enemies_defeated);
        println!(
            "  Time survived:    {:.1}s ({} ticks)",
            summary.clock_ms as f64 / 1000.0,
            summary.ticks
        );
    }

    Ok(())
}
