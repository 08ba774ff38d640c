//! Collision detection and response
//!
//! Axis-aligned tests only: walls are the canvas edges, the paddle is a
//! horizontal band, bricks are rectangles tested against the ball center.

use glam::Vec2;

use super::state::{Ball, Paddle};

/// Which walls the ball touched this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top
    }
}

/// Reflect off the left, right and top canvas edges.
///
/// Reflection only flips the sign of a velocity component, and always
/// toward the inside of the canvas, so a ball that overshoots by more than
/// one step cannot flip back and forth outside the wall.
pub fn reflect_off_walls(ball: &mut Ball, canvas_width: f32) -> WallHits {
    let mut hits = WallHits::default();

    if ball.pos.x + ball.radius > canvas_width {
        ball.vel.x = -ball.vel.x.abs();
        hits.right = true;
    } else if ball.pos.x - ball.radius < 0.0 {
        ball.vel.x = ball.vel.x.abs();
        hits.left = true;
    }

    if ball.pos.y - ball.radius < 0.0 {
        ball.vel.y = ball.vel.y.abs();
        hits.top = true;
    }

    hits
}

/// Ball's vertical extent overlaps the paddle band and its center lies
/// strictly within the paddle's horizontal extent. Independent of the
/// ball's direction.
pub fn ball_hits_paddle(ball: &Ball, paddle: &Paddle, paddle_top: f32) -> bool {
    ball.pos.y + ball.radius > paddle_top
        && ball.pos.y - ball.radius < paddle_top + paddle.height
        && ball.pos.x > paddle.x
        && ball.pos.x < paddle.x + paddle.width
}

/// Rebound angle from vertical for a ball at `ball_x`: 0 at the paddle
/// center, `±max_angle` at the edges
pub fn bounce_angle(ball_x: f32, paddle: &Paddle, max_angle: f32) -> f32 {
    let half_width = paddle.width / 2.0;
    let collide_point = ((ball_x - paddle.center_x()) / half_width).clamp(-1.0, 1.0);
    collide_point * max_angle
}

/// Velocity after a paddle hit. Depends only on where the ball struck, never
/// on the incoming direction; always heads up at exactly `speed`.
pub fn paddle_bounce(ball_x: f32, paddle: &Paddle, speed: f32, max_angle: f32) -> Vec2 {
    let (sin, cos) = bounce_angle(ball_x, paddle, max_angle).sin_cos();
    Vec2::new(speed * sin, -speed * cos)
}

/// Ball's bottom edge is past the bottom of the canvas
#[inline]
pub fn ball_out_of_bounds(ball: &Ball, canvas_height: f32) -> bool {
    ball.pos.y + ball.radius > canvas_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_3;

    fn paddle_at(x: f32) -> Paddle {
        Paddle {
            x,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }

    fn ball(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(dx, dy), BALL_RADIUS)
    }

    #[test]
    fn test_right_wall() {
        let mut b = ball(795.0, 300.0, 300.0, -200.0);
        let hits = reflect_off_walls(&mut b, CANVAS_WIDTH);
        assert!(hits.right && !hits.left && !hits.top);
        assert_eq!(b.vel, Vec2::new(-300.0, -200.0));
    }

    #[test]
    fn test_left_wall_and_top_corner() {
        let mut b = ball(5.0, 4.0, -300.0, -200.0);
        let hits = reflect_off_walls(&mut b, CANVAS_WIDTH);
        assert!(hits.left && hits.top);
        assert_eq!(b.vel, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_no_wall() {
        let mut b = ball(400.0, 300.0, 300.0, -200.0);
        assert!(!reflect_off_walls(&mut b, CANVAS_WIDTH).any());
        assert_eq!(b.vel, Vec2::new(300.0, -200.0));
    }

    #[test]
    fn test_wall_reflection_points_inward() {
        // Already heading back in: no second flip
        let mut b = ball(795.0, 300.0, -300.0, 100.0);
        reflect_off_walls(&mut b, CANVAS_WIDTH);
        assert_eq!(b.vel.x, -300.0);
    }

    #[test]
    fn test_paddle_band() {
        let paddle = paddle_at(340.0);
        let top = CANVAS_HEIGHT - PADDLE_Y_OFFSET;
        // Bottom edge just inside the band
        assert!(ball_hits_paddle(&ball(400.0, top - 9.0, 0.0, 1.0), &paddle, top));
        // Above the band
        assert!(!ball_hits_paddle(&ball(400.0, top - 11.0, 0.0, 1.0), &paddle, top));
        // Outside horizontally (edges excluded)
        assert!(!ball_hits_paddle(&ball(340.0, top, 0.0, 1.0), &paddle, top));
        assert!(!ball_hits_paddle(&ball(460.0, top, 0.0, 1.0), &paddle, top));
        // Direction does not matter
        assert!(ball_hits_paddle(&ball(400.0, top, 0.0, -1.0), &paddle, top));
    }

    #[test]
    fn test_center_hit_goes_straight_up() {
        let paddle = paddle_at(340.0);
        let vel = paddle_bounce(400.0, &paddle, BALL_SPEED, FRAC_PI_3);
        assert!(vel.x.abs() < 1e-3);
        assert!((vel.y + BALL_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_edge_angles() {
        let paddle = paddle_at(340.0);
        assert!((bounce_angle(340.0, &paddle, FRAC_PI_3) + FRAC_PI_3).abs() < 1e-6);
        assert!((bounce_angle(460.0, &paddle, FRAC_PI_3) - FRAC_PI_3).abs() < 1e-6);
        // Clamped past the edges
        assert!((bounce_angle(0.0, &paddle, FRAC_PI_3) + FRAC_PI_3).abs() < 1e-6);

        let left = paddle_bounce(341.0, &paddle, BALL_SPEED, FRAC_PI_3);
        assert!(left.x < 0.0 && left.y < 0.0);
        let right = paddle_bounce(459.0, &paddle, BALL_SPEED, FRAC_PI_3);
        assert!(right.x > 0.0 && right.y < 0.0);
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(!ball_out_of_bounds(&ball(400.0, 590.0, 0.0, 1.0), CANVAS_HEIGHT));
        assert!(ball_out_of_bounds(&ball(400.0, 590.5, 0.0, 1.0), CANVAS_HEIGHT));
    }

    proptest! {
        #[test]
        fn prop_wall_reflection_keeps_speed(
            x in -50.0f32..850.0,
            y in -50.0f32..650.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let vel = Vec2::new(angle.cos(), angle.sin()) * BALL_SPEED;
            let mut b = ball(x, y, vel.x, vel.y);
            reflect_off_walls(&mut b, CANVAS_WIDTH);
            prop_assert_eq!(b.vel.x.abs(), vel.x.abs());
            prop_assert_eq!(b.vel.y.abs(), vel.y.abs());
        }

        #[test]
        fn prop_paddle_bounce_speed_and_direction(offset in -1.5f32..1.5) {
            let paddle = paddle_at(200.0);
            let x = paddle.center_x() + offset * paddle.width / 2.0;
            let vel = paddle_bounce(x, &paddle, BALL_SPEED, FRAC_PI_3);
            prop_assert!((vel.length() - BALL_SPEED).abs() < 0.01);
            // Never flatter than 30 degrees above horizontal
            prop_assert!(vel.y <= -BALL_SPEED * FRAC_PI_3.cos() + 0.01);
        }
    }
}
