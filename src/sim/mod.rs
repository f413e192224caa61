//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only, owned by the session
//! - Stable iteration order (bricks row-major)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::resolve_collisions;
pub use rect::Rect;
pub use state::{
    Ball, Brick, BrickColor, BrickGrid, Direction, FrameResult, GameEvent, GamePhase, GameState,
    Paddle, RoundOutcome, WallSide,
};
