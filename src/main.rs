//! Ark NEAT entry point
//!
//! Headless front end: play a session with a built-in controller, benchmark
//! candidate controllers across seeds, or dump the default config.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use ark_neat::agent::{
    Controller, EpisodeLimits, EpisodeReport, LinearPolicy, Observation, TrackingController,
    evaluate_seeds,
};
use ark_neat::leaderboard::{DEFAULT_CAPACITY, LeaderboardEntry};
use ark_neat::sim::{FrameResult, GameEvent, GameState, RoundOutcome};
use ark_neat::{BouncePolicy, GameConfig, Leaderboard};

#[derive(Parser)]
#[command(
    name = "ark-neat",
    about = "Breakout simulation with agent-controlled paddles"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ControllerKind {
    /// Follow the ball
    Tracking,
    /// Linear policy (random unless --policy is given)
    Linear,
}

#[derive(Subcommand)]
enum Command {
    /// Play a session with a built-in controller
    Play {
        /// Session seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Number of ticks to simulate
        #[arg(long, default_value = "3600")]
        ticks: u64,

        /// Config file path (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the config's paddle bounce (angle or classic)
        #[arg(long, value_parser = parse_bounce_policy)]
        bounce_policy: Option<BouncePolicy>,

        #[arg(long, value_enum, default_value = "tracking")]
        controller: ControllerKind,

        /// Linear policy weights (JSON)
        #[arg(long)]
        policy: Option<PathBuf>,
    },

    /// Evaluate candidate controllers across many seeds
    Bench {
        /// Number of seeds per candidate
        #[arg(long, default_value = "16")]
        seed_count: u64,

        /// First seed (incremented for each run)
        #[arg(long, default_value = "1")]
        base_seed: u64,

        /// Random linear policies evaluated alongside the tracking controller
        #[arg(long, default_value = "15")]
        candidates: u64,

        /// Config file path (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the config's paddle bounce (angle or classic)
        #[arg(long, value_parser = parse_bounce_policy)]
        bounce_policy: Option<BouncePolicy>,

        /// Ticks without a brick before an episode is abandoned
        #[arg(long)]
        idle_ticks: Option<u64>,

        /// Hard cap on episode length
        #[arg(long)]
        max_ticks: Option<u64>,

        /// Leaderboard file to merge results into
        #[arg(long)]
        leaderboard: Option<PathBuf>,

        /// Entries kept on the leaderboard
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        top: usize,

        /// Parallel jobs (default: all cores)
        #[arg(long)]
        jobs: Option<usize>,
    },

    /// Print the default config as JSON
    Config {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct PlaySummary {
    seed: u64,
    ticks: u64,
    rounds_won: u32,
    rounds_lost: u32,
    invalid_moves: u32,
    last_frame: FrameResult,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            seed,
            ticks,
            config,
            bounce_policy,
            controller,
            policy,
        } => {
            let config = load_config(config, bounce_policy)?;
            let mut controller: Box<dyn Controller> = match controller {
                ControllerKind::Tracking => Box::new(TrackingController::new(&config)),
                ControllerKind::Linear => Box::new(load_policy(policy, seed)?),
            };
            let summary = play(config, seed, ticks, controller.as_mut())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Bench {
            seed_count,
            base_seed,
            candidates,
            config,
            bounce_policy,
            idle_ticks,
            max_ticks,
            leaderboard,
            top,
            jobs,
        } => {
            if seed_count == 0 {
                bail!("bench requires at least one seed");
            }
            let config = load_config(config, bounce_policy)?;
            let defaults = EpisodeLimits::default();
            let limits = EpisodeLimits {
                idle_ticks: idle_ticks.unwrap_or(defaults.idle_ticks),
                max_ticks: max_ticks.unwrap_or(defaults.max_ticks),
            };
            let seeds: Vec<u64> = (0..seed_count).map(|i| base_seed.wrapping_add(i)).collect();

            let mut board = match &leaderboard {
                Some(path) => Leaderboard::load(path, top)
                    .with_context(|| format!("failed loading {}", path.display()))?,
                None => Leaderboard::new(top),
            };

            let mut run = || bench(&config, &seeds, &limits, base_seed, candidates, &mut board);
            if let Some(jobs) = jobs {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .context("failed to build rayon threadpool")?;
                pool.install(run)?;
            } else {
                run()?;
            }

            if let Some(path) = &leaderboard {
                board
                    .save(path)
                    .with_context(|| format!("failed writing {}", path.display()))?;
            }
            println!("{}", serde_json::to_string_pretty(&board)?);
        }

        Command::Config { out } => {
            let json = serde_json::to_string_pretty(&GameConfig::default())?;
            match out {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

fn parse_bounce_policy(s: &str) -> Result<BouncePolicy, String> {
    BouncePolicy::from_str(s).ok_or_else(|| format!("unknown bounce policy '{s}'"))
}

fn load_config(path: Option<PathBuf>, bounce_policy: Option<BouncePolicy>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("failed loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(policy) = bounce_policy {
        config.bounce_policy = policy;
    }
    log::info!("Bounce policy: {}", config.bounce_policy.as_str());
    Ok(config)
}

fn load_policy(path: Option<PathBuf>, seed: u64) -> Result<LinearPolicy> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("invalid policy {}", path.display()))
        }
        None => Ok(LinearPolicy::random(&mut Pcg32::seed_from_u64(seed))),
    }
}

/// Run a presentation-mode session, logging what a renderer would show
fn play(
    config: GameConfig,
    seed: u64,
    ticks: u64,
    controller: &mut dyn Controller,
) -> Result<PlaySummary> {
    let mut state = GameState::with_config(config, seed)?;
    let mut summary = PlaySummary {
        seed,
        ticks,
        rounds_won: 0,
        rounds_lost: 0,
        invalid_moves: 0,
        last_frame: FrameResult::default(),
    };

    for _ in 0..ticks {
        summary.last_frame = state.step(false);
        for event in state.drain_events() {
            match event {
                GameEvent::RoundOver { outcome, score } => {
                    log::info!("Round over: {outcome:?} ({score} points)");
                    match outcome {
                        RoundOutcome::Won => summary.rounds_won += 1,
                        RoundOutcome::Lost => summary.rounds_lost += 1,
                    }
                }
                other => log::debug!("{other:?}"),
            }
        }

        let observation = Observation::from_state(&state);
        if let Some(direction) = controller.decide(&observation).direction() {
            if !state.move_paddle(direction) {
                summary.invalid_moves += 1;
            }
        }
    }
    Ok(summary)
}

/// Evaluate the tracking controller and `candidates` random linear policies
///
/// Re-running against the same leaderboard replaces entries by label.
fn bench(
    config: &GameConfig,
    seeds: &[u64],
    limits: &EpisodeLimits,
    base_seed: u64,
    candidates: u64,
    board: &mut Leaderboard,
) -> Result<()> {
    let tracking = evaluate_seeds(config, seeds, limits, |_| TrackingController::new(config))?;
    record(board, "tracking".to_string(), &tracking);

    for i in 0..candidates {
        let policy_seed = base_seed ^ (i + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let policy = LinearPolicy::random(&mut Pcg32::seed_from_u64(policy_seed));
        let reports = evaluate_seeds(config, seeds, limits, |_| policy.clone())?;
        record(board, format!("linear-{policy_seed:016x}"), &reports);
    }
    Ok(())
}

fn record(board: &mut Leaderboard, label: String, reports: &[EpisodeReport]) {
    let Some(entry) = LeaderboardEntry::from_reports(label, reports) else {
        return;
    };
    log::info!(
        "{}: mean fitness {:.2}, best score {} (seed {})",
        entry.label,
        entry.fitness,
        entry.best_score,
        entry.best_seed
    );
    if let Some(rank) = board.add(entry) {
        log::info!("  -> leaderboard rank {rank}");
    }
}
