//! What an agent sees each tick
//!
//! Positions are normalized by the screen size so a trained policy does not
//! depend on pixel dimensions.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Number of features in an [`Observation`]
pub const OBSERVATION_SIZE: usize = 4;

/// Normalized view of the session handed to a controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Paddle left edge / screen width
    pub paddle_x: f32,
    /// Ball left edge / screen width
    pub ball_x: f32,
    /// Ball top edge / screen height
    pub ball_y: f32,
    /// |paddle_x - ball_x|
    pub distance_x: f32,
}

impl Observation {
    pub fn from_state(state: &GameState) -> Self {
        let width = state.config.screen_width;
        let height = state.config.screen_height;
        let paddle_x = state.paddle.pos.x / width;
        let ball_x = state.ball.pos.x / width;
        Self {
            paddle_x,
            ball_x,
            ball_y: state.ball.pos.y / height,
            distance_x: (paddle_x - ball_x).abs(),
        }
    }

    /// Features in network input order
    pub fn as_array(&self) -> [f32; OBSERVATION_SIZE] {
        [self.paddle_x, self.ball_x, self.ball_y, self.distance_x]
    }
}
