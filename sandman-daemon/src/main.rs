//! Sandman daemon
//!
//! Voice-controlled bed controller for Linux single-board computers.
//! Reads transcripts and intent documents from stdin (one per line),
//! drives the bed's actuators and keeps a nightly report journal.
//!
//! # Task Architecture
//!
//! - `tick_task`: owns the controls; dispatches input and advances state
//! - `input_task`: reads stdin and forwards decoded lines
//! - `sound_task`: plays status clips and adjusts volume
//!
//! ## Usage
//!
//! ```bash
//! speech-frontend | RUST_LOG=debug sandman --config /etc/sandman/sandman.toml
//! ```

#![deny(unsafe_code)]

mod config;
mod controller;
mod error;
mod reports;
mod schedule;
mod setup;
mod sound;
mod tasks;
mod transport;

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::controller::Controller;
use crate::error::DaemonError;
use crate::sound::SoundPlayer;
use crate::tasks::input::{input_task, InputLink, INPUT_CHANNEL_SIZE};
use crate::tasks::sound::sound_task;
use crate::tasks::tick::tick_task;

/// Sandman bed controller daemon.
#[derive(Debug, Parser)]
#[command(name = "sandman")]
#[command(about = "Drives a motorized bed from voice commands")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, short, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Sandman v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load(&args.config)?;
    let registry = setup::build_registry(&config)?;
    info!("{} controls ready", registry.len());

    let (sound, sound_rx) = SoundPlayer::new();
    let sound_handle = tokio::spawn(sound_task(sound_rx, config.sound.clone()));

    let link = InputLink::default();
    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_SIZE);
    tokio::spawn(input_task(input_tx, link.clone()));

    let controller = Controller::new(registry, &config, sound, link);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let controller = tick_task(controller, input_rx, config.tick.interval_ms, shutdown).await;

    info!("{} controls stopped", controller.registry().len());

    // Dropping the controller closes the sound queue
    drop(controller);
    if let Err(e) = sound_handle.await {
        warn!("Sound task failed: {}", e);
    }

    info!("Stopped");
    Ok(())
}
