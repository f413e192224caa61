//! Agent-side glue around the simulation
//!
//! - `observation`: normalized features fed to a controller
//! - `controller`: the `Controller` trait and built-in controllers
//! - `fitness`: reward and penalty accounting
//! - `episode`: training episodes with a no-score watchdog, run in parallel

pub mod controller;
pub mod episode;
pub mod fitness;
pub mod observation;

pub use controller::{Action, Controller, LinearPolicy, TrackingController};
pub use episode::{
    EpisodeEnd, EpisodeLimits, EpisodeReport, evaluate_seeds, mean_fitness, run_episode,
};
pub use fitness::{FitnessTracker, round_fitness};
pub use observation::Observation;
