//! Shaft Dropper headless runner
//!
//! Steps the simulation at a fixed 60 Hz with scripted input and prints a
//! JSON summary.

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use serde::Serialize;

#[cfg(not(target_arch = "wasm32"))]
use shaft_dropper::sim::{FrameInput, GameMode, GameState, Hud, SimConfig, tick};

#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "shaft-dropper")]
#[command(about = "Run the shaft dropper simulation headless and print a JSON run summary")]
struct Cli {
    /// JSON config file, or a preset name (`classic`, `arcade`)
    config: Option<String>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,
    /// RNG seed (defaults to the wall clock)
    #[arg(long)]
    seed: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    mode: &'static str,
    seconds: f32,
    frames: u64,
    runs_started: u32,
    best_score: u64,
    deaths: u32,
    final_hud: Hud,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Shaft Dropper (headless) starting...");

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        None => SimConfig::default(),
        Some(arg) => match arg.parse::<GameMode>() {
            Ok(GameMode::Classic) => SimConfig::classic(),
            Ok(GameMode::Arcade) => SimConfig::default(),
            Err(_) => load_config(arg)?,
        },
    };
    let seconds = cli.seconds;
    let seed = cli.seed.unwrap_or_else(clock_seed);

    let mode = config.mode.as_str();
    let mut state = GameState::new(config, seed).context("invalid simulation config")?;
    log::info!("Game initialized with seed: {}", seed);

    let frames = (seconds.max(0.0) / FRAME_DT).round() as u64;
    let mut input = FrameInput::at(FRAME_DT, 0.0);
    let mut best_score = 0;
    let mut deaths = 0;
    let mut last_hud = None;

    for frame in 1..=frames {
        let time = frame as f32 * FRAME_DT;
        input.time = time;
        // Weave slowly across the shaft and turn now and then
        input.thrust = glam::Vec2::new((time * 0.7).sin(), (time * 0.45).cos());
        input.rotation = (time * 0.2).sin();
        if frame == frames / 2 {
            input.toggle_view = true;
        }

        let was_dead = state.player.is_dead();
        let out = tick(&mut state, &input);
        input.clear_triggers();

        if !was_dead && state.player.is_dead() {
            deaths += 1;
        }
        best_score = best_score.max(out.hud.score);
        last_hud = Some(out.hud);
    }

    let final_hud = match last_hud {
        Some(hud) => hud,
        None => tick(&mut state, &FrameInput::at(0.0, 0.0)).hud,
    };
    let summary = RunSummary {
        seed,
        mode,
        seconds,
        frames,
        runs_started: state.run_index,
        best_score,
        deaths,
        final_hud,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> anyhow::Result<SimConfig> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    SimConfig::from_json(&json).with_context(|| format!("parsing config {}", path))
}

/// Seed from the wall clock when none is given
#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is library-only; the host drives `tick` directly
}
