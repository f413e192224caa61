//! Game configuration
//!
//! Every gameplay constant lives here so sessions can be tuned from a JSON
//! file without touching the simulation. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::consts::*;

/// How the ball leaves the paddle (and how hard bricks push back)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BouncePolicy {
    /// Outgoing angle depends on impact position; speed is preserved
    #[default]
    Angle,
    /// Sign flips with a 10% horizontal boost, clamped to `max_ball_vx`
    Classic,
}

impl BouncePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BouncePolicy::Angle => "angle",
            BouncePolicy::Classic => "classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "angle" | "angled" => Some(BouncePolicy::Angle),
            "classic" | "flip" => Some(BouncePolicy::Classic),
            _ => None,
        }
    }
}

/// Complete set of tunables for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Bricks ===
    pub brick_rows: u32,
    pub brick_columns: u32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_gap: f32,
    /// Points per destroyed brick
    pub brick_points: u32,
    /// Score that ends the round as a win
    pub win_score: u32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Horizontal step per accepted move
    pub paddle_speed: f32,
    pub paddle_start: Vec2,

    // === Ball ===
    pub ball_size: f32,
    pub ball_start: Vec2,
    pub ball_start_vy: f32,
    /// Initial horizontal speed is drawn uniformly from this set
    pub ball_start_vx_choices: Vec<f32>,

    // === Physics ===
    pub bounce_policy: BouncePolicy,
    /// Maximum deflection from vertical on a paddle edge hit (degrees)
    pub max_bounce_angle_deg: f32,
    /// Horizontal speed clamp (classic policy only)
    pub max_ball_vx: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            brick_rows: BRICK_ROWS,
            brick_columns: BRICK_COLUMNS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_gap: BRICK_GAP,
            brick_points: BRICK_POINTS,
            win_score: WIN_SCORE,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_start: Vec2::new(PADDLE_START_X, PADDLE_START_Y),

            ball_size: BALL_SIZE,
            ball_start: Vec2::new(BALL_START_X, BALL_START_Y),
            ball_start_vy: BALL_START_VY,
            ball_start_vx_choices: BALL_START_VX_CHOICES.to_vec(),

            bounce_policy: BouncePolicy::Angle,
            max_bounce_angle_deg: MAX_BOUNCE_ANGLE_DEG,
            max_ball_vx: MAX_BALL_VX,
        }
    }
}

impl GameConfig {
    /// Default config with a different bounce policy
    pub fn with_policy(policy: BouncePolicy) -> Self {
        Self {
            bounce_policy: policy,
            ..Self::default()
        }
    }

    /// Total number of bricks in a full grid
    pub fn brick_count(&self) -> usize {
        (self.brick_rows * self.brick_columns) as usize
    }

    /// Score awarded for clearing the whole grid
    pub fn max_score(&self) -> u32 {
        self.brick_rows * self.brick_columns * self.brick_points
    }

    /// Check the structural invariants the simulation relies on
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |reason: &str| Err(Error::InvalidConfig(reason.to_string()));

        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return invalid("screen dimensions must be positive");
        }
        if self.paddle_width <= 0.0 || self.paddle_height <= 0.0 {
            return invalid("paddle dimensions must be positive");
        }
        if self.paddle_width > self.screen_width {
            return invalid("paddle is wider than the screen");
        }
        if self.paddle_speed <= 0.0 {
            return invalid("paddle speed must be positive");
        }
        if self.paddle_start.x < 0.0 || self.paddle_start.x + self.paddle_width > self.screen_width
        {
            return invalid("paddle start position is off screen");
        }
        if self.ball_size <= 0.0 {
            return invalid("ball size must be positive");
        }
        if self.ball_start_vx_choices.is_empty() {
            return invalid("ball_start_vx_choices must not be empty");
        }
        if self.brick_rows == 0 || self.brick_columns == 0 {
            return invalid("brick grid must have at least one row and column");
        }
        if self.brick_width <= 0.0 || self.brick_height <= 0.0 {
            return invalid("brick dimensions must be positive");
        }
        if self.brick_points == 0 {
            return invalid("brick_points must be positive");
        }
        if self.win_score == 0 || self.win_score > self.max_score() {
            return invalid("win_score must be reachable by clearing bricks");
        }
        if !(0.0..90.0).contains(&self.max_bounce_angle_deg) {
            return invalid("max_bounce_angle_deg must be in [0, 90)");
        }
        if self.max_ball_vx <= 0.0 {
            return invalid("max_ball_vx must be positive");
        }
        Ok(())
    }

    /// Parse and validate a config from JSON text
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.brick_count(), 55);
        assert_eq!(config.max_score(), WIN_SCORE);
    }

    #[test]
    fn test_grid_spans_screen() {
        let config = GameConfig::default();
        let span = config.brick_gap
            + config.brick_columns as f32 * (config.brick_width + config.brick_gap);
        assert_eq!(span, config.screen_width);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "bounce_policy": "classic", "brick_rows": 4, "win_score": 440 }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.bounce_policy, BouncePolicy::Classic);
        assert_eq!(config.brick_rows, 4);
        assert_eq!(config.paddle_width, PADDLE_WIDTH);
    }

    #[test]
    fn test_rejects_zero_width_paddle() {
        let config = GameConfig {
            paddle_width: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unreachable_win_score() {
        let config = GameConfig {
            brick_rows: 4,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(GameConfig::from_json("{ nope"), Err(Error::Json(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = GameConfig::with_policy(BouncePolicy::Classic);
        config.save(&path).unwrap();
        assert_eq!(GameConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(BouncePolicy::from_str("Angle"), Some(BouncePolicy::Angle));
        assert_eq!(BouncePolicy::from_str("classic"), Some(BouncePolicy::Classic));
        assert_eq!(BouncePolicy::from_str("bogus"), None);
        assert_eq!(BouncePolicy::Classic.as_str(), "classic");
    }
}
