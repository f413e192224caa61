//! Game state and core simulation types
//!
//! Everything a session needs to advance deterministically lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::Error;
use crate::config::GameConfig;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Active,
    /// Terminal condition reached; the next step rebuilds the round
    Resetting,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Won,
    Lost,
}

/// Horizontal paddle command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Sign applied to the paddle step
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Which side wall the ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

/// Something the presentation layer may want to react to (sounds, effects)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallHit { side: WallSide },
    CeilingHit,
    /// `hit_position` is 0.0 at the paddle's left edge, 1.0 at its right edge
    PaddleHit { hit_position: f32 },
    BrickDestroyed { row: u32, column: u32 },
    RoundOver { outcome: RoundOutcome, score: u32 },
}

/// Per-tick snapshot returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameResult {
    pub score: u32,
    pub ball_hit_count: u32,
    /// A brick was destroyed this tick
    pub collision_occurred: bool,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Ball {
    pub fn new(size: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::splat(size),
        }
    }

    /// Place the ball and give it a fresh launch velocity
    ///
    /// Horizontal speed is drawn uniformly from `vx_choices`.
    pub fn serve(&mut self, pos: Vec2, vy: f32, vx_choices: &[f32], rng: &mut impl Rng) {
        let vx = if vx_choices.is_empty() {
            0.0
        } else {
            vx_choices[rng.random_range(0..vx_choices.len())]
        };
        self.pos = pos;
        self.vel = Vec2::new(vx, vy);
    }

    /// Integrate one tick of motion (no bounds checks)
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal step per move
    pub speed: f32,
}

impl Paddle {
    pub fn new(pos: Vec2, width: f32, height: f32, speed: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(width, height),
            speed,
        }
    }

    /// Step one move in `direction`. Bounds are the caller's job.
    pub fn shift(&mut self, direction: Direction) {
        self.pos.x += direction.sign() * self.speed;
    }

    /// Left edge after a move in `direction`
    pub fn projected_x(&self, direction: Direction) -> f32 {
        self.pos.x + direction.sign() * self.speed
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Brick colours by row (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Blue,
    Red,
    Green,
    Yellow,
    Grey,
    Purple,
}

impl BrickColor {
    const PALETTE: [BrickColor; 6] = [
        BrickColor::Blue,
        BrickColor::Red,
        BrickColor::Green,
        BrickColor::Yellow,
        BrickColor::Grey,
        BrickColor::Purple,
    ];

    pub fn for_row(row: u32) -> Self {
        Self::PALETTE[row as usize % Self::PALETTE.len()]
    }
}

/// A single brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub row: u32,
    pub column: u32,
    pub color: BrickColor,
    pub rect: Rect,
    pub alive: bool,
}

/// Bricks stored row-major; removed bricks stay in place with `alive = false`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    pub rows: u32,
    pub columns: u32,
    pub bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Build a full grid for the config's layout
    pub fn new(config: &GameConfig) -> Self {
        let mut bricks = Vec::with_capacity(config.brick_count());
        for row in 0..config.brick_rows {
            for column in 0..config.brick_columns {
                let x = config.brick_gap + column as f32 * (config.brick_width + config.brick_gap);
                let y = config.brick_gap + row as f32 * (config.brick_height + config.brick_gap);
                bricks.push(Brick {
                    row,
                    column,
                    color: BrickColor::for_row(row),
                    rect: Rect::new(x, y, config.brick_width, config.brick_height),
                    alive: true,
                });
            }
        }
        Self {
            rows: config.brick_rows,
            columns: config.brick_columns,
            bricks,
        }
    }

    /// A grid with no bricks (useful for isolating paddle/wall physics)
    pub fn empty() -> Self {
        Self {
            rows: 0,
            columns: 0,
            bricks: Vec::new(),
        }
    }

    pub fn get(&self, row: u32, column: u32) -> Option<&Brick> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.bricks.get((row * self.columns + column) as usize)
    }

    /// Surviving bricks in row-major order
    pub fn alive(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.alive)
    }

    pub fn remaining(&self) -> usize {
        self.alive().count()
    }
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Serve RNG (seeded per session, never shared)
    pub rng: Pcg32,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    pub score: u32,
    pub ball_hit_count: u32,
    pub phase: GamePhase,
    /// Simulation tick counter (never reset)
    pub time_ticks: u64,
    /// Completed rounds
    pub rounds: u32,
    /// Events emitted during the most recent step
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session with the default config
    pub fn new(seed: u64) -> Self {
        Self::build(GameConfig::default(), Pcg32::seed_from_u64(seed))
    }

    /// Create a session with a custom config
    ///
    /// Fails if the config does not pass [`GameConfig::validate`].
    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, Error> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }

    /// Create a session around an explicit random source
    pub fn with_rng(config: GameConfig, rng: Pcg32) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    fn build(config: GameConfig, rng: Pcg32) -> Self {
        let paddle = Paddle::new(
            config.paddle_start,
            config.paddle_width,
            config.paddle_height,
            config.paddle_speed,
        );
        let bricks = BrickGrid::new(&config);
        let mut state = Self {
            ball: Ball::new(config.ball_size),
            paddle,
            bricks,
            config,
            rng,
            score: 0,
            ball_hit_count: 0,
            phase: GamePhase::Active,
            time_ticks: 0,
            rounds: 0,
            events: Vec::new(),
        };
        state.serve_ball();
        state
    }

    /// Put the ball at its start position with a random launch velocity
    pub fn serve_ball(&mut self) {
        let start = self.config.ball_start;
        let vy = self.config.ball_start_vy;
        self.ball
            .serve(start, vy, &self.config.ball_start_vx_choices, &mut self.rng);
    }

    /// Events emitted during the most recent step
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take ownership of the most recent step's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current per-tick snapshot
    pub fn frame(&self, collision_occurred: bool) -> FrameResult {
        FrameResult {
            score: self.score,
            ball_hit_count: self.ball_hit_count,
            collision_occurred,
        }
    }
}
