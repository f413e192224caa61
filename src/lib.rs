//! Ark NEAT - Arkanoid-style breakout with an agent-controlled paddle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `config`: Data-driven game constants
//! - `agent`: Observation, controllers, fitness and episode evaluation
//! - `leaderboard`: Best evaluated runs

pub mod agent;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod sim;

pub use config::{BouncePolicy, GameConfig};
pub use error::Error;
pub use leaderboard::Leaderboard;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Frames per second of the reference presentation loop
    pub const FPS: u32 = 60;

    /// Brick grid - 11 columns of 64px bricks with 8px gaps span the screen exactly
    pub const BRICK_ROWS: u32 = 5;
    pub const BRICK_COLUMNS: u32 = 11;
    pub const BRICK_WIDTH: f32 = 64.0;
    pub const BRICK_HEIGHT: f32 = 32.0;
    pub const BRICK_GAP: f32 = 8.0;
    pub const BRICK_POINTS: u32 = 10;

    /// Score that ends a round as a win (full default grid)
    pub const WIN_SCORE: u32 = 550;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 104.0;
    pub const PADDLE_HEIGHT: f32 = 24.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    pub const PADDLE_START_X: f32 = SCREEN_WIDTH / 2.0 + 118.0;
    pub const PADDLE_START_Y: f32 = 500.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 22.0;
    pub const BALL_START_X: f32 = SCREEN_WIDTH / 2.0;
    pub const BALL_START_Y: f32 = 470.0;
    pub const BALL_START_VY: f32 = -5.0;
    pub const BALL_START_VX_CHOICES: [f32; 8] = [-4.0, -3.0, -2.0, -1.0, 1.0, 2.0, 3.0, 4.0];

    /// Maximum paddle deflection from vertical (degrees)
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;
    /// Horizontal speed clamp used by the classic bounce policy
    pub const MAX_BALL_VX: f32 = 10.0;
    /// Speed multiplier applied on classic side/edge hits
    pub const CLASSIC_BOOST: f32 = 1.1;

    /// Ticks without a brick hit before a training episode is abandoned (10 s)
    pub const IDLE_TICK_LIMIT: u64 = 10 * FPS as u64;
}
