//! Headless skirmish runner driving the simulation plugin from scripted input.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::prelude::*;
use clap::Parser;
use log::info;
use skirmish::plugin::{LastTick, PlayerControls, Simulation};
use skirmish::{init_logging, Controls, SimConfig, SimulationPlugin};

/// Runs a headless skirmish session under scripted input
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,
    /// Seed for world generation and combat rolls
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Walks a square while swinging, casting a spell every second and a half.
const fn scripted_controls(frame: u32) -> Controls {
    let leg = (frame / 60) % 4;
    Controls {
        up: leg == 0,
        right: leg == 1,
        down: leg == 2,
        left: leg == 3,
        attack: true,
        spell: frame % 90 == 0,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin::new(config));
    app.finish();
    app.cleanup();

    for frame in 0..args.ticks {
        app.insert_resource(PlayerControls(scripted_controls(frame)));
        app.update();
        if let Some(last) = app.world().get_resource::<LastTick>() {
            for event in &last.0.events {
                log::debug!("frame {frame}: {event:?}");
            }
        }
    }

    let snapshot = app
        .world()
        .get_resource::<Simulation>()
        .map(|sim| sim.0.snapshot())
        .context("simulation did not start")?;
    info!("final state: {}", serde_json::to_string(&snapshot)?);
    Ok(())
}
