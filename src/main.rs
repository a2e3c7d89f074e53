//! Gridstep Demo
//!
//! Plays a scripted sequence of moves through a level at 60 Hz, logs the
//! resulting events, then replays the script and checks both runs produced
//! the same trajectory digest.
//!
//! Usage: `gridstep-demo [level.json]`

use anyhow::{ensure, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gridstep::{
    core::hash::{TrajectoryDigest, TrajectoryHasher},
    Level, MotionConfig, MoveOutcome, MovementEventData, PathOrchestrator, VERSION,
};

/// Level used when no path is given.
const DEMO_LEVEL: &str = include_str!("../levels/demo.json");

/// Input tokens fed to the player, one per move.
const SCRIPT: [&str; 8] = ["RIGHT", "UP", "LEFT", "DOWN", "DOWN", "RIGHT", "UP", "JUMP"];

/// Simulated render rate (Hz).
const RENDER_HZ: f64 = 60.0;

const PLAYER: u32 = 1;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Gridstep v{}", VERSION);

    let config = MotionConfig::from_env();
    config.validate().context("Invalid motion config")?;
    info!("Nominal FPS: {}, default speed: {}", config.fps, config.default_speed);

    let level = match std::env::args().nth(1) {
        Some(path) => Level::from_path(&path).with_context(|| format!("Failed to load {}", path))?,
        None => Level::from_json(DEMO_LEVEL).context("Bundled demo level is invalid")?,
    };

    info!("=== Playing Script ===");
    let (digest, frames) = play(&config, &level, true)?;
    info!("Trajectory: {} frames, digest {}", frames, hex::encode(digest));

    info!("=== Verifying Replay ===");
    let (replay_digest, _) = play(&config, &level, false)?;
    info!("Replay digest {}", hex::encode(replay_digest));

    ensure!(digest == replay_digest, "Replay diverged: trajectory digests differ");
    info!("REPLAY VERIFIED: digests match");
    Ok(())
}

/// Run the script once, returning the trajectory digest and frame count.
fn play(config: &MotionConfig, level: &Level, verbose: bool) -> Result<(TrajectoryDigest, u64)> {
    let mut orch = PathOrchestrator::new(config.clone())?;
    orch.load_level(level.clone())?;
    orch.spawn_mover_at_start(PLAYER)?;
    orch.take_events();

    let mut hasher = TrajectoryHasher::for_trajectory();
    let dt = 1.0 / RENDER_HZ;

    for token in SCRIPT {
        let outcome = orch.attempt_move_token(PLAYER, token);
        if verbose {
            match &outcome {
                MoveOutcome::Started { destination, total_frames } => {
                    info!("{:>5}: moving to {} over {} nominal frames", token, destination, total_frames);
                }
                MoveOutcome::Blocked => info!("{:>5}: blocked", token),
                MoveOutcome::Rejected(e) => info!("{:>5}: rejected ({})", token, e),
                other => info!("{:>5}: {:?}", token, other),
            }
        }

        while orch.any_moving() {
            let result = orch.per_frame_update(dt);
            for (mover, position) in &result.positions {
                hasher.record_frame(result.frame, *mover, *position);
            }
            if verbose {
                for event in &result.events {
                    if let MovementEventData::Completed { at } = &event.data {
                        info!("       arrived at {} on frame {}", at, event.frame);
                    }
                }
            }
        }
    }

    let frames = hasher.frames();
    if let Some(position) = orch.position(PLAYER) {
        hasher.update_cell(position.cell());
        if verbose {
            info!("Final position: {}", position);
        }
    }
    Ok((hasher.finalize(), frames))
}
