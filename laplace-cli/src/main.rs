mod observer;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use laplace::model::{CapturePreset, RoomId};
use laplace::session::{RelayConfig, SessionDeps, SessionHandle, SharerSession, ViewerSession};
use observer::ConsoleObserver;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "laplace", about = "Screen-share signaling and relay client")]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Signaling server, e.g. wss://share.example.com
    #[arg(long, global = true)]
    signaling: Option<String>,

    /// Public origin used in join links.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a room and share to every viewer that joins.
    Share {
        /// Capture and ICE preset.
        #[arg(short, long)]
        preset: Option<CapturePreset>,

        /// Pre-issued room token.
        #[arg(long)]
        claim: Option<String>,
    },

    /// Join a room as a viewer.
    View {
        /// Room code; prompted for when omitted.
        room: Option<String>,

        #[arg(short, long)]
        preset: Option<CapturePreset>,
    },

    /// List the capture presets.
    Presets,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RelayConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => RelayConfig::default(),
    };
    if let Some(url) = cli.signaling {
        config.signaling_url = url;
    }
    if let Some(base) = cli.base_url {
        config.base_url = base;
    }
    config.validate()?;

    match cli.command {
        Commands::Presets => {
            for preset in CapturePreset::ALL {
                let c = preset.constraints();
                println!(
                    "{:<20} video {:>5} @ {:>3} fps  audio {}  ice {:?}",
                    preset.name().cyan(),
                    c.video.height.map(|h| format!("{}p", h)).unwrap_or_else(|| "any".into()),
                    c.video.frame_rate.map(|f| f.to_string()).unwrap_or_else(|| "any".into()),
                    c.audio,
                    preset.ice_policy()
                );
            }
        }

        Commands::Share { preset, claim } => {
            let preset = preset.unwrap_or(config.preset);
            println!("{}", format!("Sharing with preset {}...", preset).green().bold());

            let observer = Arc::new(ConsoleObserver::new(config.clone()));
            let deps = SessionDeps::webrtc(&config)?.with_observer(observer);
            let handle = SharerSession::start(config, preset, claim, deps).await?;
            run_until_done(handle).await?;
        }

        Commands::View { room, preset } => {
            let room = match room {
                Some(room) => room,
                None => Input::<String>::new()
                    .with_prompt("Room code")
                    .interact_text()
                    .context("Failed to read room code")?,
            };
            if let Some(preset) = preset {
                config.preset = preset;
            }
            let room = RoomId::from(room.as_str());
            println!("{}", format!("Joining room {}...", room).green().bold());

            let observer = Arc::new(ConsoleObserver::new(config.clone()));
            let deps = SessionDeps::webrtc(&config)?.with_observer(observer);
            let handle = ViewerSession::start(config, room, deps).await?;
            run_until_done(handle).await?;
        }
    }

    Ok(())
}

/// Waits for the session to end on its own or leaves on Ctrl-C.
async fn run_until_done(handle: SessionHandle) -> Result<()> {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("{}", "Leaving...".yellow());
            handle.leave().await;
        }
        _ = wait_finished(&handle) => {}
    }

    match handle.join().await {
        Ok(()) => {
            println!("{}", "Session closed.".green());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Session ended:".red().bold(), e.user_message());
            Err(e.into())
        }
    }
}

async fn wait_finished(handle: &SessionHandle) {
    while !handle.is_finished() {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    }
}
