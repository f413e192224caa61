//! Collision detection and response
//!
//! Runs once per tick after the ball has moved. The checks run in a fixed
//! order and each one sees the velocity left behind by the previous one:
//! side walls, ceiling, paddle, then at most one brick.

use glam::Vec2;

use super::state::{Ball, BrickGrid, GameEvent, GameState, Paddle, WallSide};
use crate::config::{BouncePolicy, GameConfig};
use crate::consts::CLASSIC_BOOST;

/// Resolve every collision for the current tick
///
/// Returns `true` only when a brick was destroyed. Wall, ceiling and paddle
/// bounces are reported through events but do not set the flag.
pub fn resolve_collisions(state: &mut GameState) -> bool {
    let GameState {
        config,
        ball,
        paddle,
        bricks,
        score,
        ball_hit_count,
        events,
        ..
    } = state;

    if let Some(side) = bounce_off_side_walls(ball, config.screen_width) {
        events.push(GameEvent::WallHit { side });
    }

    if bounce_off_ceiling(ball) {
        events.push(GameEvent::CeilingHit);
    }

    if let Some(hit_position) = bounce_off_paddle(ball, paddle, config) {
        *ball_hit_count += 1;
        events.push(GameEvent::PaddleHit { hit_position });
    }

    match break_brick(ball, bricks, config) {
        Some((row, column)) => {
            *score += config.brick_points;
            events.push(GameEvent::BrickDestroyed { row, column });
            log::trace!("Brick ({row}, {column}) destroyed, score {}", *score);
            true
        }
        None => false,
    }
}

/// Flip horizontal velocity at the side walls
///
/// The right wall tests the current position, the left wall the projected
/// one (`x + vx`). Gameplay depends on this asymmetry.
pub fn bounce_off_side_walls(ball: &mut Ball, screen_width: f32) -> Option<WallSide> {
    let side = if ball.pos.x + ball.size.x >= screen_width {
        WallSide::Right
    } else if ball.pos.x + ball.vel.x <= 0.0 {
        WallSide::Left
    } else {
        return None;
    };
    ball.vel.x = -ball.vel.x;
    Some(side)
}

/// Flip vertical velocity at the ceiling
pub fn bounce_off_ceiling(ball: &mut Ball) -> bool {
    if ball.pos.y <= 0.0 {
        ball.vel.y = -ball.vel.y;
        true
    } else {
        false
    }
}

/// Where along the paddle the ball's center lies (0.0 = left edge, 1.0 = right edge)
///
/// Can fall slightly outside [0, 1] when the overlap is already deep.
pub fn hit_position(ball: &Ball, paddle: &Paddle) -> f32 {
    (ball.center().x - paddle.pos.x) / paddle.width()
}

/// Bounce off the paddle if the ball is coming down onto it
///
/// Returns the hit position when a bounce happened.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, config: &GameConfig) -> Option<f32> {
    let paddle_rect = paddle.rect();
    let touching = ball.rect().intersects(&paddle_rect)
        && ball.vel.y > 0.0
        && ball.center().y < paddle_rect.bottom();
    if !touching {
        return None;
    }

    let hit = hit_position(ball, paddle);
    match config.bounce_policy {
        BouncePolicy::Angle => {
            ball.vel = angled_bounce(ball.vel, hit, config.max_bounce_angle_deg);
            // Keep the ball from sinking into the paddle next tick
            ball.pos.y = paddle_rect.top() - ball.size.y;
        }
        BouncePolicy::Classic => classic_paddle_bounce(ball, paddle, hit, config.max_ball_vx),
    }
    Some(hit)
}

/// Outgoing velocity for an angle-based paddle bounce
///
/// The paddle center sends the ball straight up; the edges deflect it by up
/// to `max_angle_deg`. Speed is preserved exactly.
pub fn angled_bounce(vel: Vec2, hit_position: f32, max_angle_deg: f32) -> Vec2 {
    let old_speed = vel.length();
    let relative_intersect = (hit_position - 0.5) * 2.0;
    let angle = (relative_intersect * max_angle_deg).to_radians();

    let bounced = Vec2::new(old_speed * angle.sin(), -old_speed * angle.cos());
    let new_speed = bounced.length();
    if new_speed > 0.0 {
        bounced / new_speed * old_speed
    } else {
        bounced
    }
}

/// Sign-flip paddle bounce with a horizontal boost on side and edge hits
fn classic_paddle_bounce(ball: &mut Ball, paddle: &Paddle, hit: f32, max_vx: f32) {
    let ball_rect = ball.rect();
    let paddle_rect = paddle.rect();

    let side_hit = ball_rect.left() - ball.vel.x >= paddle_rect.right()
        || ball_rect.right() - ball.vel.x <= paddle_rect.left();
    if side_hit {
        ball.vel.x *= -CLASSIC_BOOST;
        ball.vel.y = -ball.vel.y;
    } else if ball_rect.bottom() >= paddle_rect.top() {
        ball.vel.y = -ball.vel.y;
        if !(0.25..=0.75).contains(&hit) {
            ball.vel.x *= CLASSIC_BOOST;
        }
    }
    ball.vel.x = ball.vel.x.clamp(-max_vx, max_vx);
}

/// Destroy the first surviving brick (row-major) the ball overlaps
///
/// The shallower penetration axis decides which velocity component flips.
/// Returns the (row, column) of the destroyed brick.
pub fn break_brick(
    ball: &mut Ball,
    bricks: &mut BrickGrid,
    config: &GameConfig,
) -> Option<(u32, u32)> {
    let ball_rect = ball.rect();
    let brick = bricks
        .bricks
        .iter_mut()
        .find(|b| b.alive && ball_rect.intersects(&b.rect))?;
    brick.alive = false;

    let depth = ball_rect.penetration(&brick.rect);
    if depth.x < depth.y {
        match config.bounce_policy {
            BouncePolicy::Angle => ball.vel.x = -ball.vel.x,
            BouncePolicy::Classic => {
                let max_vx = config.max_ball_vx;
                ball.vel.x = (ball.vel.x * -CLASSIC_BOOST).clamp(-max_vx, max_vx);
            }
        }
    } else {
        ball.vel.y = -ball.vel.y;
    }
    Some((brick.row, brick.column))
}
