//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (row-major bricks)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{WallHits, ball_hits_paddle, ball_out_of_bounds, bounce_angle, paddle_bounce, reflect_off_walls};
pub use level::{LevelError, LevelGenerator, LevelLayout, Pattern, SeededRandom};
pub use state::{Ball, Brick, BrickGrid, GameEvent, GamePhase, GameState, Paddle};
pub use tick::{TickInput, resolve_life_loss, tick};
