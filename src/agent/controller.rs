//! Paddle controllers
//!
//! A controller turns an [`Observation`] into one of three actions per tick.
//! Evolved networks plug in behind the same trait.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::observation::{OBSERVATION_SIZE, Observation};
use crate::config::GameConfig;
use crate::sim::Direction;

/// Number of actions a controller chooses between
pub const ACTION_COUNT: usize = 3;

/// Per-tick paddle decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Stay,
    Left,
    Right,
}

impl Action {
    /// Pick the action with the highest output; ties go to the earliest
    pub fn from_outputs(outputs: &[f32; ACTION_COUNT]) -> Self {
        let mut best = 0;
        for (i, &value) in outputs.iter().enumerate().skip(1) {
            if value > outputs[best] {
                best = i;
            }
        }
        match best {
            0 => Action::Stay,
            1 => Action::Left,
            _ => Action::Right,
        }
    }

    /// Paddle direction, if the action moves at all
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Stay => None,
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
        }
    }
}

/// Anything that can drive the paddle
pub trait Controller {
    fn decide(&mut self, observation: &Observation) -> Action;
}

impl<F> Controller for F
where
    F: FnMut(&Observation) -> Action,
{
    fn decide(&mut self, observation: &Observation) -> Action {
        self(observation)
    }
}

/// Keeps the paddle centered under the ball
#[derive(Debug, Clone)]
pub struct TrackingController {
    /// Half paddle width, normalized
    paddle_half: f32,
    /// Half ball width, normalized
    ball_half: f32,
    /// Offsets smaller than this are ignored (avoids jitter)
    dead_zone: f32,
}

impl TrackingController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            paddle_half: config.paddle_width / 2.0 / config.screen_width,
            ball_half: config.ball_size / 2.0 / config.screen_width,
            dead_zone: config.paddle_speed / config.screen_width,
        }
    }
}

impl Controller for TrackingController {
    fn decide(&mut self, observation: &Observation) -> Action {
        let paddle_center = observation.paddle_x + self.paddle_half;
        let ball_center = observation.ball_x + self.ball_half;
        let offset = ball_center - paddle_center;
        if offset > self.dead_zone {
            Action::Right
        } else if offset < -self.dead_zone {
            Action::Left
        } else {
            Action::Stay
        }
    }
}

/// Single-layer network: one weighted sum per action, argmax wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPolicy {
    pub weights: [[f32; OBSERVATION_SIZE]; ACTION_COUNT],
    pub bias: [f32; ACTION_COUNT],
}

impl LinearPolicy {
    /// Weights and biases drawn uniformly from [-1, 1]
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut weights = [[0.0; OBSERVATION_SIZE]; ACTION_COUNT];
        for row in &mut weights {
            for w in row.iter_mut() {
                *w = rng.random_range(-1.0..=1.0);
            }
        }
        let mut bias = [0.0; ACTION_COUNT];
        for b in &mut bias {
            *b = rng.random_range(-1.0..=1.0);
        }
        Self { weights, bias }
    }

    /// Raw action scores for an observation
    pub fn activate(&self, observation: &Observation) -> [f32; ACTION_COUNT] {
        let inputs = observation.as_array();
        let mut outputs = self.bias;
        for (out, row) in outputs.iter_mut().zip(&self.weights) {
            *out += row.iter().zip(&inputs).map(|(w, x)| w * x).sum::<f32>();
        }
        outputs
    }
}

impl Controller for LinearPolicy {
    fn decide(&mut self, observation: &Observation) -> Action {
        Action::from_outputs(&self.activate(observation))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    fn obs(paddle_x: f32, ball_x: f32) -> Observation {
        Observation {
            paddle_x,
            ball_x,
            ball_y: 0.5,
            distance_x: (paddle_x - ball_x).abs(),
        }
    }

    #[test]
    fn test_argmax_prefers_first_on_tie() {
        assert_eq!(Action::from_outputs(&[0.5, 0.5, 0.1]), Action::Stay);
        assert_eq!(Action::from_outputs(&[0.1, 0.7, 0.7]), Action::Left);
        assert_eq!(Action::from_outputs(&[-1.0, -2.0, 0.0]), Action::Right);
    }

    #[test]
    fn test_tracking_follows_ball() {
        let mut controller = TrackingController::new(&GameConfig::default());
        assert_eq!(controller.decide(&obs(0.6, 0.1)), Action::Left);
        assert_eq!(controller.decide(&obs(0.1, 0.6)), Action::Right);
        // Ball centered over the paddle: (104 - 22) / 2 px right of the paddle edge
        assert_eq!(controller.decide(&obs(0.5, 0.5 + 41.0 / 800.0)), Action::Stay);
    }

    #[test]
    fn test_linear_policy_activation() {
        let mut policy = LinearPolicy {
            weights: [[0.0; 4], [1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]],
            bias: [0.1, 0.0, 0.0],
        };
        // Paddle right of the ball: the "left" output wins
        assert_eq!(policy.decide(&obs(0.8, 0.2)), Action::Left);
        assert_eq!(policy.decide(&obs(0.2, 0.8)), Action::Right);
        assert_eq!(policy.decide(&obs(0.05, 0.05)), Action::Stay);
    }

    #[test]
    fn test_random_policy_is_reproducible() {
        let a = LinearPolicy::random(&mut Pcg32::seed_from_u64(9));
        let b = LinearPolicy::random(&mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
        assert!(a.weights.iter().flatten().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn test_closure_controller() {
        let mut always_left = |_: &Observation| Action::Left;
        assert_eq!(always_left.decide(&obs(0.5, 0.5)), Action::Left);
        assert_eq!(Action::Left.direction(), Some(Direction::Left));
        assert_eq!(Action::Stay.direction(), None);
    }
}
