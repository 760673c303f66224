//! Command-line runner: drops one disc on a board and reports the winner.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use plinko_core::{ParticipantList, PlinkoSession, SoundClip, SoundEffects};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A plinko randomizer board
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Participant list: JSON array of `{"value": ..., "spoken": ...}`.
    /// A built-in demo list is used when omitted.
    #[arg(short, long)]
    participants: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Physics frames to simulate (60 per second)
    #[arg(long, default_value_t = 900)]
    frames: u64,

    /// Seed for the random drop position
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Drop the disc at this board x instead of a random one
    #[arg(long)]
    drop_x: Option<f32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Open a window instead of running headless
    #[cfg(feature = "window")]
    #[arg(long)]
    window: bool,
}

/// Logs each requested clip instead of playing it.
struct LoggingAudio;

impl SoundEffects for LoggingAudio {
    fn play(&self, clip: SoundClip) {
        tracing::debug!(asset = clip.asset(), volume = clip.volume(), "play sound");
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn load_participants(path: Option<&Path>) -> anyhow::Result<ParticipantList> {
    let Some(path) = path else {
        return Ok(ParticipantList::demo());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read participants from {}", path.display()))?;
    ParticipantList::from_json(&json)
        .with_context(|| format!("invalid participant list in {}", path.display()))
}

fn run_headless(args: &Args, participants: ParticipantList) -> anyhow::Result<()> {
    let mut session = PlinkoSession::new(
        args.width,
        args.height,
        participants,
        Arc::new(LoggingAudio),
    )
    .context("failed to build board")?;

    let drop_x = args.drop_x.unwrap_or_else(|| {
        let config = session.config();
        let lo = config.slot_center_x(0);
        let hi = config.slot_center_x(config.slot_count - 1);
        ChaCha8Rng::seed_from_u64(args.seed).random_range(lo..=hi)
    });
    tracing::info!(
        slots = session.config().slot_count,
        scale = session.config().scale,
        drop_x,
        seed = args.seed,
        "dropping disc"
    );
    session.drop_disc_at(drop_x);

    let mut bounces = 0;
    for _ in 0..args.frames {
        bounces += session.step().bounces;
    }

    let slot = session.outcome().winner();
    let winner = session.winner();
    match winner {
        Some(participant) => tracing::info!(
            slot,
            winner = %participant.value,
            pronunciation = participant.pronunciation(),
            "final result"
        ),
        None => tracing::warn!(frames = args.frames, "disc did not settle in a slot"),
    }

    let summary = serde_json::json!({
        "seed": args.seed,
        "drop_x": drop_x,
        "frames": args.frames,
        "bounces": bounces,
        "slot": slot,
        "winner": winner.map(|p| p.value.clone()),
        "pronunciation": winner.map(|p| p.pronunciation().to_owned()),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(feature = "window")]
fn run_window(args: &Args, participants: ParticipantList) -> anyhow::Result<()> {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;
    use plinko_core::BoardConfig;
    use plinko_core::bevy::{PlinkoAudioPlugin, PlinkoRenderPlugin, SoundQueue};

    let config = BoardConfig::new(args.width, args.height, participants.len())
        .context("invalid board configuration")?;

    // Clips are loaded from assets/sounds/ next to the binary's manifest.
    let sounds = SoundQueue::new();
    App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_plugins(PlinkoRenderPlugin::new(config, participants).with_audio(Arc::new(sounds.clone())))
        .add_plugins(PlinkoAudioPlugin::new(sounds))
        .run();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let participants = load_participants(args.participants.as_deref())?;
    tracing::info!(count = participants.len(), "participants loaded");

    #[cfg(feature = "window")]
    if args.window {
        return run_window(&args, participants);
    }

    run_headless(&args, participants)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_drop_options() {
        let args = Args::parse_from(["plinko-sim", "--seed", "7", "--drop-x", "512.5", "--frames", "10"]);
        assert_eq!(args.seed, 7);
        assert_eq!(args.drop_x, Some(512.5));
        assert_eq!(args.frames, 10);
        assert!(args.participants.is_none());
    }

    #[test]
    fn test_missing_participant_file_is_an_error() {
        let err = load_participants(Some(Path::new("/nonexistent/participants.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read participants"));
    }

    #[test]
    fn test_headless_run_completes() {
        let args = Args::parse_from(["plinko-sim", "--frames", "30"]);
        run_headless(&args, ParticipantList::demo()).unwrap();
    }
}
