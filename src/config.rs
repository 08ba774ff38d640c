//! Game tuning
//!
//! Every gameplay constant in one serializable struct. Loaded from JSON on
//! native builds; the browser build runs with the defaults.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors produced while loading or validating a [`GameConfig`]
#[derive(Debug)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types
    Parse(serde_json::Error),
    /// Well-formed but unplayable values
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Game tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Canvas ===
    /// Logical canvas width (pixels)
    pub canvas_width: f32,
    /// Logical canvas height (pixels)
    pub canvas_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from the bottom edge to the paddle's top edge
    pub paddle_y_offset: f32,
    /// Deflection at the paddle edge (radians)
    pub max_bounce_angle: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Pixels per second
    pub ball_speed: f32,

    // === Bricks ===
    pub brick_rows: usize,
    pub brick_cols: usize,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_offset_top: f32,
    pub brick_offset_left: f32,

    // === Rules ===
    pub initial_lives: u8,
    pub points_per_brick: u64,
    /// Freeze after a lost ball before the life is taken (milliseconds)
    pub life_loss_pause_ms: f64,

    /// Seed for serve direction
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_y_offset: PADDLE_Y_OFFSET,
            max_bounce_angle: MAX_BOUNCE_ANGLE,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,

            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_height: BRICK_HEIGHT,
            brick_padding: BRICK_PADDING,
            brick_offset_top: BRICK_OFFSET_TOP,
            brick_offset_left: BRICK_OFFSET_LEFT,

            initial_lives: INITIAL_LIVES,
            points_per_brick: POINTS_PER_BRICK,
            life_loss_pause_ms: LIFE_LOSS_PAUSE_MS,

            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("brick_height", self.brick_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.paddle_width > self.canvas_width {
            return Err(ConfigError::Invalid(format!(
                "paddle_width {} exceeds canvas_width {}",
                self.paddle_width, self.canvas_width
            )));
        }
        if self.paddle_y_offset < self.paddle_height || self.paddle_y_offset > self.canvas_height {
            return Err(ConfigError::Invalid(format!(
                "paddle_y_offset {} must lie between paddle_height and canvas_height",
                self.paddle_y_offset
            )));
        }
        if !(self.max_bounce_angle > 0.0 && self.max_bounce_angle < std::f32::consts::FRAC_PI_2) {
            return Err(ConfigError::Invalid(format!(
                "max_bounce_angle {} must be within (0, pi/2)",
                self.max_bounce_angle
            )));
        }
        if self.brick_rows == 0 || self.brick_cols == 0 {
            return Err(ConfigError::Invalid("brick grid must have at least one row and column".into()));
        }
        if self.brick_width() <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{} brick columns do not fit a {}px canvas",
                self.brick_cols, self.canvas_width
            )));
        }
        let field_bottom = self.brick_offset_top
            + self.brick_rows as f32 * (self.brick_height + self.brick_padding);
        if field_bottom >= self.paddle_top() {
            return Err(ConfigError::Invalid(format!(
                "brick field reaches y={} which overlaps the paddle at y={}",
                field_bottom,
                self.paddle_top()
            )));
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::Invalid("initial_lives must be at least 1".into()));
        }
        if !(self.life_loss_pause_ms.is_finite() && self.life_loss_pause_ms >= 0.0) {
            return Err(ConfigError::Invalid("life_loss_pause_ms must be non-negative".into()));
        }
        Ok(())
    }

    /// Y coordinate of the paddle's top edge
    #[inline]
    pub fn paddle_top(&self) -> f32 {
        self.canvas_height - self.paddle_y_offset
    }

    /// Rightmost legal paddle x
    #[inline]
    pub fn paddle_max_x(&self) -> f32 {
        self.canvas_width - self.paddle_width
    }

    /// Paddle x when centered horizontally
    #[inline]
    pub fn center_paddle_x(&self) -> f32 {
        (self.canvas_width - self.paddle_width) / 2.0
    }

    /// Ball position on serve
    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(
            self.canvas_width / 2.0,
            self.canvas_height - self.paddle_y_offset - self.paddle_height - self.ball_radius,
        )
    }

    /// Width of one brick cell
    pub fn brick_width(&self) -> f32 {
        (self.canvas_width - 2.0 * self.brick_offset_left) / self.brick_cols as f32 - self.brick_padding
    }

    /// Top-left corner of the brick at (row, col)
    pub fn brick_origin(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            self.brick_offset_left + col as f32 * (self.brick_width() + self.brick_padding),
            self.brick_offset_top + row as f32 * (self.brick_height + self.brick_padding),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.brick_width() - 64.0).abs() < 0.001);
        assert!((config.paddle_top() - 570.0).abs() < 0.001);
        assert_eq!(config.ball_spawn(), Vec2::new(400.0, 540.0));
    }

    #[test]
    fn test_brick_origin() {
        let config = GameConfig::default();
        assert_eq!(config.brick_origin(0, 0), Vec2::new(30.0, 50.0));
        let last = config.brick_origin(7, 9);
        assert!((last.x - (30.0 + 9.0 * 74.0)).abs() < 0.001);
        assert!((last.y - (50.0 + 7.0 * 35.0)).abs() < 0.001);
        // Last column ends at the right offset
        assert!((last.x + config.brick_width() - (800.0 - 30.0 - 10.0)).abs() < 0.001);
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(r#"{ "initial_lives": 5, "seed": 42 }"#).unwrap();
        assert_eq!(config.initial_lives, 5);
        assert_eq!(config.seed, 42);
        assert_eq!(config.canvas_width, CANVAS_WIDTH);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig {
            ball_speed: 500.0,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_rejects_unplayable_values() {
        let zero_lives = GameConfig {
            initial_lives: 0,
            ..Default::default()
        };
        assert!(matches!(zero_lives.validate(), Err(ConfigError::Invalid(_))));

        let wide_paddle = GameConfig {
            paddle_width: 900.0,
            ..Default::default()
        };
        assert!(wide_paddle.validate().is_err());

        let too_many_rows = GameConfig {
            brick_rows: 20,
            ..Default::default()
        };
        assert!(too_many_rows.validate().is_err());

        let negative_speed = GameConfig {
            ball_speed: -1.0,
            ..Default::default()
        };
        let err = negative_speed.validate().unwrap_err();
        assert!(err.to_string().contains("ball_speed"));
    }
}
