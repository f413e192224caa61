//! Fixed-step simulation tick
//!
//! One call to [`GameState::step`] is one frame: reset if the previous frame
//! ended the round, move the ball, then resolve collisions.

use super::collision::resolve_collisions;
use super::state::{
    BrickGrid, Direction, FrameResult, GameEvent, GamePhase, GameState, RoundOutcome,
};

impl GameState {
    /// Advance the game by one tick
    ///
    /// In training mode round results are not announced through events; the
    /// driving loop is expected to watch [`GameState::phase`] instead.
    pub fn step(&mut self, training: bool) -> FrameResult {
        self.events.clear();
        self.time_ticks += 1;

        if let Some(outcome) = self.round_outcome() {
            if !training {
                self.events.push(GameEvent::RoundOver {
                    outcome,
                    score: self.score,
                });
            }
            log::info!(
                "Round {} {:?} with score {} after {} paddle hits",
                self.rounds + 1,
                outcome,
                self.score,
                self.ball_hit_count
            );
            self.reset();
        }

        self.ball.advance();
        let collision_occurred = resolve_collisions(self);

        self.phase = if self.round_outcome().is_some() {
            GamePhase::Resetting
        } else {
            GamePhase::Active
        };

        self.frame(collision_occurred)
    }

    /// Move the paddle one step if it stays on screen
    ///
    /// Returns `false` (and leaves the paddle alone) when the move would
    /// cross a screen edge.
    pub fn move_paddle(&mut self, direction: Direction) -> bool {
        let next_x = self.paddle.projected_x(direction);
        let in_bounds = match direction {
            Direction::Left => next_x >= 0.0,
            Direction::Right => next_x + self.paddle.width() <= self.config.screen_width,
        };
        if in_bounds {
            self.paddle.shift(direction);
        }
        in_bounds
    }

    /// Start a fresh round: new ball serve, paddle home, full brick grid
    pub fn reset(&mut self) {
        self.paddle.pos = self.config.paddle_start;
        self.serve_ball();
        self.bricks = BrickGrid::new(&self.config);
        self.score = 0;
        self.ball_hit_count = 0;
        self.phase = GamePhase::Active;
        self.rounds += 1;
    }

    /// Terminal condition check
    ///
    /// Reaching the win score beats losing the ball on the same frame.
    pub fn round_outcome(&self) -> Option<RoundOutcome> {
        if self.score >= self.config.win_score {
            return Some(RoundOutcome::Won);
        }
        let ball = &self.ball;
        let fell_out = ball.pos.y + ball.size.y / 2.0 >= self.config.screen_height + ball.size.y;
        if fell_out {
            Some(RoundOutcome::Lost)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::consts::*;

    #[test]
    fn test_step_moves_then_collides() {
        let mut state = GameState::new(12345);
        state.bricks = BrickGrid::empty();
        // One tick away from the ceiling
        state.ball.pos = Vec2::new(400.0, 3.0);
        state.ball.vel = Vec2::new(0.0, -5.0);

        let frame = state.step(false);
        assert_eq!(state.ball.pos, Vec2::new(400.0, -2.0));
        assert_eq!(state.ball.vel, Vec2::new(0.0, 5.0));
        assert!(!frame.collision_occurred);
        assert_eq!(state.events(), &[GameEvent::CeilingHit]);
    }

    #[test]
    fn test_move_paddle_bounds() {
        let mut state = GameState::new(1);
        state.paddle.pos.x = 4.0;
        assert!(!state.move_paddle(Direction::Left));
        assert_eq!(state.paddle.pos.x, 4.0);

        state.paddle.pos.x = 8.0;
        assert!(state.move_paddle(Direction::Left));
        assert_eq!(state.paddle.pos.x, 0.0);

        state.paddle.pos.x = SCREEN_WIDTH - PADDLE_WIDTH - 8.0;
        assert!(state.move_paddle(Direction::Right));
        assert_eq!(state.paddle.pos.x + PADDLE_WIDTH, SCREEN_WIDTH);
        assert!(!state.move_paddle(Direction::Right));
    }

    #[test]
    fn test_win_resets_regardless_of_ball() {
        let mut state = GameState::new(5);
        state.score = WIN_SCORE;
        state.ball_hit_count = 17;
        state.bricks.bricks.iter_mut().for_each(|b| b.alive = false);
        state.ball.pos = Vec2::new(100.0, 300.0);

        let frame = state.step(false);
        assert_eq!(frame.score, 0);
        assert_eq!(frame.ball_hit_count, 0);
        assert_eq!(state.bricks.remaining(), 55);
        assert_eq!(state.rounds, 1);
        assert_eq!(
            state.events()[0],
            GameEvent::RoundOver {
                outcome: RoundOutcome::Won,
                score: WIN_SCORE
            }
        );
    }

    #[test]
    fn test_lost_ball_resets_to_start() {
        let mut state = GameState::new(5);
        state.score = 40;
        state.paddle.pos.x = 0.0;
        state.ball.pos = Vec2::new(100.0, SCREEN_HEIGHT + BALL_SIZE / 2.0);
        assert_eq!(state.round_outcome(), Some(RoundOutcome::Lost));

        state.step(false);
        assert_eq!(state.score, 0);
        assert_eq!(state.paddle.pos, Vec2::new(PADDLE_START_X, PADDLE_START_Y));
        // Served from the start position, then moved one tick
        assert_eq!(state.ball.pos, Vec2::new(BALL_START_X, BALL_START_Y) + state.ball.vel);
        assert!(matches!(
            state.events()[0],
            GameEvent::RoundOver {
                outcome: RoundOutcome::Lost,
                score: 40
            }
        ));
    }

    #[test]
    fn test_training_mode_is_silent() {
        let mut state = GameState::new(5);
        state.score = WIN_SCORE;
        state.step(true);
        assert_eq!(state.score, 0);
        assert!(
            !state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::RoundOver { .. }))
        );
    }

    #[test]
    fn test_phase_flags_terminal_frame() {
        let mut state = GameState::new(5);
        state.bricks = BrickGrid::empty();
        // Live now, past the bottom margin after one more tick
        state.ball.pos = Vec2::new(100.0, SCREEN_HEIGHT + 10.0);
        state.ball.vel = Vec2::new(0.0, 5.0);
        assert_eq!(state.round_outcome(), None);

        state.step(true);
        assert_eq!(state.phase, GamePhase::Resetting);
        state.step(true);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_ball_just_above_threshold_is_live() {
        let mut state = GameState::new(5);
        state.ball.pos.y = SCREEN_HEIGHT + BALL_SIZE / 2.0 - 0.5;
        assert_eq!(state.round_outcome(), None);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay in lockstep
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let moves = [Direction::Left, Direction::Right, Direction::Right];

        for i in 0..2000 {
            let dir = moves[i % moves.len()];
            let frame1 = state1.step(true);
            let frame2 = state2.step(true);
            assert_eq!(frame1, frame2);
            assert_eq!(state1.move_paddle(dir), state2.move_paddle(dir));
        }

        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.rounds, state2.rounds);
    }
}
