//! Game state and core simulation types
//!
//! Everything the physics step reads or writes lives here, owned by one
//! `GameState` that the frame driver hands to `tick` each frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{LevelGenerator, LevelLayout};
use crate::config::GameConfig;

/// Engine-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level loaded yet; ticks are no-ops
    Loading,
    /// Active gameplay
    Running,
    /// Ball dropped out; frozen until the deferred life-loss resolves
    LifeLostPause,
    /// Every brick destroyed (terminal for the level)
    LevelCleared,
    /// Out of lives (terminal)
    GameOver,
}

/// Discrete per-frame outputs for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the paddle
    PaddleHit,
    /// At least one brick was hit this frame
    BrickHit,
    /// Ball crossed the bottom edge; the life-loss pause has begun
    BallOut,
    /// A life was taken after the pause
    LifeLost,
    /// Last life taken
    GameOver,
    /// Last brick destroyed
    LevelComplete,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center, canvas space
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub radius: f32,
    /// Still overlapping the paddle band since the last paddle bounce
    #[serde(default)]
    pub paddle_contact: bool,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            paddle_contact: false,
        }
    }

    /// Ball on the serve spot, heading up-left or up-right at 45 degrees
    pub fn serve(config: &GameConfig, go_left: bool) -> Self {
        let (sin, cos) = std::f32::consts::FRAC_PI_4.sin_cos();
        let dir = if go_left { -1.0 } else { 1.0 };
        Self {
            pos: config.ball_spawn(),
            vel: Vec2::new(dir * config.ball_speed * sin, -config.ball_speed * cos),
            radius: config.ball_radius,
            paddle_contact: false,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The player's paddle. Its y is fixed by the config; only x moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Centered paddle
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.center_paddle_x(),
            width: config.paddle_width,
            height: config.paddle_height,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center the paddle under a canvas-space pointer, clamped to
    /// `[0, max_x]` (see [`GameConfig::paddle_max_x`])
    pub fn follow_pointer(&mut self, pointer_x: f32, max_x: f32) {
        let max_x = max_x.max(0.0);
        let x = pointer_x - self.width / 2.0;
        // NaN pointer input keeps the paddle where it is
        if !x.is_nan() {
            self.x = x.clamp(0.0, max_x);
        }
    }
}

/// One grid cell. Type 0 marks an absent brick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// 1..=3, picks color; 0 = no brick
    pub kind: u8,
    /// Hits left; starts at `kind`
    pub health: u8,
}

impl Brick {
    /// Collidable and drawn
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Strict point-in-rectangle test (edges excluded)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.pos.x
            && p.x < self.pos.x + self.width
            && p.y > self.pos.y
            && p.y < self.pos.y + self.height
    }
}

/// Rows x columns of bricks for the current level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrickGrid {
    rows: usize,
    cols: usize,
    /// Row-major
    bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Grid with no cells (no level loaded)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lay out a generated level on the canvas; `health = type`
    pub fn from_layout(layout: &LevelLayout, config: &GameConfig) -> Self {
        let width = config.brick_width();
        let mut bricks = Vec::with_capacity(layout.rows() * layout.cols());
        for row in 0..layout.rows() {
            for col in 0..layout.cols() {
                let kind = layout.get(row, col);
                bricks.push(Brick {
                    pos: config.brick_origin(row, col),
                    width,
                    height: config.brick_height,
                    kind,
                    health: kind,
                });
            }
        }
        Self {
            rows: layout.rows(),
            cols: layout.cols(),
            bricks,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// No cells at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Brick> {
        if row < self.rows && col < self.cols {
            self.bricks.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Brick> {
        if row < self.rows && col < self.cols {
            self.bricks.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.bricks.iter_mut()
    }

    /// Bricks still standing
    pub fn remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_alive()).count()
    }

    /// Every cell is at zero health
    pub fn is_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.is_alive())
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Tuning the state was built with
    pub config: GameConfig,
    /// Current level (1-based)
    pub level: u32,
    /// Player lives
    pub lives: u8,
    /// Score
    pub score: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Absent while no level is loaded or after game over
    pub ball: Option<Ball>,
    /// Player paddle
    pub paddle: Paddle,
    /// Bricks for the current level
    pub bricks: BrickGrid,
    /// Serves so far, mixed into the serve-direction seed
    pub serves: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Fresh game on level 1
    pub fn new(config: GameConfig) -> Self {
        let mut state = Self::empty(config);
        state.load_level(1);
        state
    }

    /// State with no level loaded
    pub fn empty(config: GameConfig) -> Self {
        Self {
            level: 0,
            lives: config.initial_lives,
            score: 0,
            phase: GamePhase::Loading,
            ball: None,
            paddle: Paddle::new(&config),
            bricks: BrickGrid::empty(),
            serves: 0,
            time_ticks: 0,
            config,
        }
    }

    /// Replace the brick grid with `level`'s layout and serve a new ball.
    /// Score and lives carry over.
    pub fn load_level(&mut self, level: u32) {
        let generator = LevelGenerator::new(self.config.brick_rows, self.config.brick_cols);
        let layout = generator.generate(level);
        log::info!(
            "Loading level {} ({:?}, {} bricks)",
            level,
            super::level::Pattern::for_level(level),
            layout.brick_count()
        );
        self.level = level;
        self.bricks = BrickGrid::from_layout(&layout, &self.config);
        self.reset_ball_and_paddle();
        self.phase = GamePhase::Running;
    }

    /// Center the paddle and put a new ball on the serve spot
    pub fn reset_ball_and_paddle(&mut self) {
        self.paddle = Paddle::new(&self.config);
        let go_left = self.serve_rng().random_bool(0.5);
        self.ball = Some(Ball::serve(&self.config, go_left));
        self.serves += 1;
    }

    /// Per-serve RNG, reproducible from the config seed
    fn serve_rng(&self) -> Pcg32 {
        let stream = u64::from(self.serves).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Pcg32::seed_from_u64(self.config.seed ^ stream)
    }

    /// Game over or level cleared
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::LevelCleared)
    }
}
