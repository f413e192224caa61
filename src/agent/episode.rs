//! Training episodes
//!
//! An episode plays one round under a controller with the session in
//! training mode and scores it. Episodes own their session, so any number
//! can run side by side on the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::controller::Controller;
use super::fitness::FitnessTracker;
use super::observation::Observation;
use crate::Error;
use crate::config::GameConfig;
use crate::consts::IDLE_TICK_LIMIT;
use crate::sim::{GameState, RoundOutcome};

/// Tick budgets for one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeLimits {
    /// Give up after this many ticks without destroying a brick
    pub idle_ticks: u64,
    /// Hard cap on episode length
    pub max_ticks: u64,
}

impl Default for EpisodeLimits {
    fn default() -> Self {
        Self {
            idle_ticks: IDLE_TICK_LIMIT,
            max_ticks: 60 * IDLE_TICK_LIMIT,
        }
    }
}

/// Why an episode stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeEnd {
    Won,
    Lost,
    /// No brick destroyed within `idle_ticks`
    Stalled,
    TickLimit,
}

impl From<RoundOutcome> for EpisodeEnd {
    fn from(outcome: RoundOutcome) -> Self {
        match outcome {
            RoundOutcome::Won => EpisodeEnd::Won,
            RoundOutcome::Lost => EpisodeEnd::Lost,
        }
    }
}

/// Result of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub seed: u64,
    pub ticks: u64,
    pub score: u32,
    pub ball_hits: u32,
    pub invalid_moves: u32,
    pub fitness: f32,
    pub end: EpisodeEnd,
}

/// Play one round with `controller` and score it
pub fn run_episode<C>(
    config: &GameConfig,
    seed: u64,
    controller: &mut C,
    limits: &EpisodeLimits,
) -> Result<EpisodeReport, Error>
where
    C: Controller + ?Sized,
{
    let mut state = GameState::with_config(config.clone(), seed)?;
    let mut tracker = FitnessTracker::new();
    let mut last_score_tick = 0;

    let (frame, end) = loop {
        let frame = state.step(true);
        if frame.collision_occurred {
            last_score_tick = state.time_ticks;
        }

        let observation = Observation::from_state(&state);
        if let Some(direction) = controller.decide(&observation).direction() {
            if !state.move_paddle(direction) {
                tracker.penalize_invalid_move();
            }
        }

        if let Some(outcome) = state.round_outcome() {
            break (frame, outcome.into());
        }
        if state.time_ticks - last_score_tick > limits.idle_ticks {
            break (frame, EpisodeEnd::Stalled);
        }
        if state.time_ticks >= limits.max_ticks {
            break (frame, EpisodeEnd::TickLimit);
        }
    };

    tracker.finish_round(frame.score, frame.ball_hit_count, config.win_score);
    log::debug!(
        "Episode seed={seed} ended {end:?} after {} ticks: score={} hits={} fitness={:.2}",
        state.time_ticks,
        frame.score,
        frame.ball_hit_count,
        tracker.fitness
    );

    Ok(EpisodeReport {
        seed,
        ticks: state.time_ticks,
        score: frame.score,
        ball_hits: frame.ball_hit_count,
        invalid_moves: tracker.invalid_moves,
        fitness: tracker.fitness,
        end,
    })
}

/// Run one episode per seed in parallel
///
/// `make_controller` builds a fresh controller for each seed. Reports come
/// back in seed order. Fails if the config is invalid.
pub fn evaluate_seeds<C, F>(
    config: &GameConfig,
    seeds: &[u64],
    limits: &EpisodeLimits,
    make_controller: F,
) -> Result<Vec<EpisodeReport>, Error>
where
    C: Controller,
    F: Fn(u64) -> C + Sync,
{
    seeds
        .par_iter()
        .map(|&seed| {
            let mut controller = make_controller(seed);
            run_episode(config, seed, &mut controller, limits)
        })
        .collect()
}

/// Mean fitness across reports (0 for none)
pub fn mean_fitness(reports: &[EpisodeReport]) -> f32 {
    if reports.is_empty() {
        return 0.0;
    }
    reports.iter().map(|r| r.fitness).sum::<f32>() / reports.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::controller::{Action, TrackingController};

    #[test]
    fn test_idle_paddle_round_terminates() {
        let config = GameConfig::default();
        let mut stay = |_: &Observation| Action::Stay;
        let report = run_episode(&config, 3, &mut stay, &EpisodeLimits::default()).unwrap();
        // Every brick must fall within idle_ticks of the last, so the cap is never reached
        assert_ne!(report.end, EpisodeEnd::TickLimit);
        assert_eq!(report.invalid_moves, 0);
        assert_eq!(report.score % 10, 0);
    }

    #[test]
    fn test_wall_hugging_is_penalized() {
        let config = GameConfig::default();
        let mut left = |_: &Observation| Action::Left;
        let report = run_episode(&config, 3, &mut left, &EpisodeLimits::default()).unwrap();
        // 518px to the wall at 8px per tick: 64 legal moves (ending at x = 6) then refusals
        assert!(report.invalid_moves > 0);
        assert_eq!(report.invalid_moves as u64, report.ticks - 64);
    }

    #[test]
    fn test_tick_limit() {
        let config = GameConfig::default();
        let limits = EpisodeLimits {
            idle_ticks: 1_000,
            max_ticks: 10,
        };
        let mut stay = |_: &Observation| Action::Stay;
        let report = run_episode(&config, 3, &mut stay, &limits).unwrap();
        assert_eq!(report.end, EpisodeEnd::TickLimit);
        assert_eq!(report.ticks, 10);
    }

    #[test]
    fn test_stall_watchdog() {
        let config = GameConfig::default();
        let limits = EpisodeLimits {
            idle_ticks: 5,
            max_ticks: 1_000,
        };
        let mut stay = |_: &Observation| Action::Stay;
        let report = run_episode(&config, 3, &mut stay, &limits).unwrap();
        assert_eq!(report.end, EpisodeEnd::Stalled);
        assert_eq!(report.ticks, 6);
    }

    #[test]
    fn test_tracking_outscores_idle() {
        let config = GameConfig::default();
        let seeds: Vec<u64> = (1..=8).collect();
        let limits = EpisodeLimits::default();
        let tracking =
            evaluate_seeds(&config, &seeds, &limits, |_| TrackingController::new(&config)).unwrap();
        let idle =
            evaluate_seeds(&config, &seeds, &limits, |_| |_: &Observation| Action::Stay).unwrap();

        assert_eq!(tracking.len(), seeds.len());
        assert_eq!(tracking.iter().map(|r| r.seed).collect::<Vec<_>>(), seeds);
        let tracking_hits: u32 = tracking.iter().map(|r| r.ball_hits).sum();
        let idle_hits: u32 = idle.iter().map(|r| r.ball_hits).sum();
        assert!(tracking_hits > idle_hits);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = GameConfig::default();
        let seeds = [11u64, 12, 13];
        let limits = EpisodeLimits::default();
        let parallel =
            evaluate_seeds(&config, &seeds, &limits, |_| TrackingController::new(&config)).unwrap();
        for (report, &seed) in parallel.iter().zip(&seeds) {
            let mut controller = TrackingController::new(&config);
            let sequential = run_episode(&config, seed, &mut controller, &limits).unwrap();
            assert_eq!(*report, sequential);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            paddle_width: 0.0,
            ..GameConfig::default()
        };
        let limits = EpisodeLimits::default();
        let result = evaluate_seeds(&config, &[1, 2], &limits, |_| |_: &Observation| Action::Stay);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_mean_fitness() {
        assert_eq!(mean_fitness(&[]), 0.0);
    }
}
