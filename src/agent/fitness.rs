//! Fitness accounting for evaluated controllers
//!
//! Low scores are rewarded at half rate so early lucky bricks count for
//! little; clearing score milestones adds flat bonuses.

use serde::{Deserialize, Serialize};

/// Scores up to this are rewarded at the reduced rate
pub const LOW_SCORE_CUTOFF: u32 = 30;
/// Flat deduction per round (bricks can fall on the first serve by chance)
pub const ROUND_OFFSET: f32 = 1.0;
/// Deduction per paddle move rejected at the screen edge
pub const INVALID_MOVE_PENALTY: f32 = 1.0;

/// (score strictly above, bonus)
const SCORE_BONUSES: [(u32, f32); 2] = [(150, 20.0), (400, 40.0)];
/// Bonus for reaching the win score
const WIN_BONUS: f32 = 60.0;

/// Fitness earned by one finished round
pub fn round_fitness(score: u32, ball_hits: u32, win_score: u32) -> f32 {
    let divisor = if score <= LOW_SCORE_CUTOFF { 20.0 } else { 10.0 };
    let mut fitness = (ball_hits as f32 + score as f32) / divisor - ROUND_OFFSET;

    for (threshold, bonus) in SCORE_BONUSES {
        if score > threshold {
            fitness += bonus;
        }
    }
    if score >= win_score {
        fitness += WIN_BONUS;
    }
    fitness
}

/// Running fitness for one controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessTracker {
    pub fitness: f32,
    pub invalid_moves: u32,
}

impl FitnessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn penalize_invalid_move(&mut self) {
        self.invalid_moves += 1;
        self.fitness -= INVALID_MOVE_PENALTY;
    }

    pub fn finish_round(&mut self, score: u32, ball_hits: u32, win_score: u32) {
        self.fitness += round_fitness(score, ball_hits, win_score);
    }
}
