//! Neon Breakdown - A single-screen neon brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level layouts, physics, collisions, game state)
//! - `driver`: Frame driver (input scaling, deferred life-loss timer, teardown)
//! - `renderer`: WebGPU rendering pipeline
//! - `config`: Data-driven game tuning

pub mod config;
pub mod driver;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use driver::{FrameDriver, FrameOutput, Viewport};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the bottom edge to the paddle's top edge
    pub const PADDLE_Y_OFFSET: f32 = 30.0;
    /// Maximum deflection off the paddle edge (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Ball speed in pixels per second
    pub const BALL_SPEED: f32 = 700.0;

    /// Brick grid
    pub const BRICK_ROWS: usize = 8;
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 50.0;
    pub const BRICK_OFFSET_LEFT: f32 = 30.0;

    /// Game rules
    pub const INITIAL_LIVES: u8 = 3;
    pub const POINTS_PER_BRICK: u64 = 100;
    /// Freeze after the ball drops out, before the life is taken (ms)
    pub const LIFE_LOSS_PAUSE_MS: f64 = 1000.0;
}
