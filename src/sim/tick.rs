//! Fixed timestep simulation tick
//!
//! Advances the game state by one frame and reports what happened as
//! discrete events. Sound, HUD and screen changes belong to the caller.

use super::collision::{ball_hits_paddle, ball_out_of_bounds, paddle_bounce, reflect_off_walls};
use super::state::{GameEvent, GamePhase, GameState};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Latest pointer/touch x, already in canvas space
    pub pointer_x: Option<f32>,
    /// User pause (distinct from the life-loss freeze)
    pub paused: bool,
}

/// Advance the game state by one fixed timestep.
///
/// A no-op unless the phase is `Running`, the user has not paused, a brick
/// grid is loaded and a ball is present.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.paused || state.phase != GamePhase::Running || state.bricks.is_empty() {
        return events;
    }
    let Some(ball) = state.ball.as_mut() else {
        return events;
    };

    state.time_ticks += 1;
    let config = &state.config;

    // Paddle follows the pointer
    if let Some(pointer_x) = input.pointer_x {
        state.paddle.follow_pointer(pointer_x, config.paddle_max_x());
    }

    ball.pos += ball.vel * dt;

    let walls = reflect_off_walls(ball, config.canvas_width);
    if walls.any() {
        log::trace!("Wall bounce {:?}", walls);
    }

    // One bounce per contact: a ball still inside the band from the last
    // bounce is left alone until it leaves
    let in_band = ball_hits_paddle(ball, &state.paddle, config.paddle_top());
    if in_band && !ball.paddle_contact {
        ball.vel = paddle_bounce(
            ball.pos.x,
            &state.paddle,
            config.ball_speed,
            config.max_bounce_angle,
        );
        log::debug!("Paddle hit at x={:.1}", ball.pos.x);
        events.push(GameEvent::PaddleHit);
    }
    ball.paddle_contact = in_band;

    // Bottom edge: freeze until the frame driver resolves the life loss
    if ball_out_of_bounds(ball, config.canvas_height) {
        log::info!("Ball lost (lives left before resolve: {})", state.lives);
        state.phase = GamePhase::LifeLostPause;
        events.push(GameEvent::BallOut);
        return events;
    }

    // Every overlapped brick takes a hit; the ball reflects once
    let mut bricks_hit = 0u32;
    for brick in state.bricks.iter_mut().filter(|b| b.is_alive()) {
        if brick.contains_point(ball.pos) {
            brick.health -= 1;
            bricks_hit += 1;
            if brick.health == 0 {
                state.score += config.points_per_brick;
            }
        }
    }
    if bricks_hit > 0 {
        ball.vel.y = -ball.vel.y;
        events.push(GameEvent::BrickHit);
    }

    if state.bricks.is_cleared() {
        log::info!("Level {} complete (score {})", state.level, state.score);
        state.phase = GamePhase::LevelCleared;
        events.push(GameEvent::LevelComplete);
    }

    events
}

/// Resolve a pending life loss: take a life, then either end the game or
/// re-serve. Does nothing outside `LifeLostPause`, so a duplicate firing
/// cannot take a second life.
pub fn resolve_life_loss(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase != GamePhase::LifeLostPause {
        log::debug!("Ignoring life-loss resolve in phase {:?}", state.phase);
        return events;
    }

    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::LifeLost);

    if state.lives == 0 {
        log::info!("Game over (score {}, level {})", state.score, state.level);
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
    } else {
        log::info!("Life lost, {} remaining", state.lives);
        state.reset_ball_and_paddle();
        state.phase = GamePhase::Running;
    }

    events
}
