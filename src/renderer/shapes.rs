//! Shape generation for 2D primitives
//!
//! All positions are canvas space (origin top-left, y down); the pipeline
//! maps them to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{Brick, GameState};

/// Segments used for the ball
const BALL_SEGMENTS: u32 = 24;
/// Inset of the type-2 health overlay
const SHINE_INSET: f32 = 5.0;

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(top_left: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (top_left.x, top_left.y);
    let (x1, y1) = (top_left.x + size.x, top_left.y + size.y);

    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Fill color for a brick type (1..=3); anything else falls back to type 1
pub fn brick_color(kind: u8) -> [f32; 4] {
    match kind {
        2 => colors::BRICKS[1],
        3 => colors::BRICKS[2],
        _ => colors::BRICKS[0],
    }
}

/// Brick body plus, for type 2, an inner overlay showing remaining health
pub fn brick(brick: &Brick) -> Vec<Vertex> {
    let size = Vec2::new(brick.width, brick.height);
    let mut vertices = rect(brick.pos, size, brick_color(brick.kind));

    if brick.kind == 2 {
        let alpha = if brick.health > 1 { 0.5 } else { 0.2 };
        let [r, g, b] = colors::BRICK_SHINE;
        let inset = Vec2::splat(SHINE_INSET);
        vertices.extend(rect(brick.pos + inset, size - inset * 2.0, [r, g, b, alpha]));
    }

    vertices
}

/// Everything visible in one frame, back to front
pub fn scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for b in state.bricks.iter().filter(|b| b.is_alive()) {
        vertices.extend(brick(b));
    }

    let paddle = &state.paddle;
    vertices.extend(rect(
        Vec2::new(paddle.x, state.config.paddle_top()),
        Vec2::new(paddle.width, paddle.height),
        colors::PADDLE,
    ));

    if let Some(ball) = &state.ball {
        vertices.extend(circle(ball.pos, ball.radius, colors::BALL, BALL_SEGMENTS));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::*;

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), colors::CYAN);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::ZERO, BALL_RADIUS, colors::BALL, 16);
        assert_eq!(v.len(), 48);
        for vertex in v.iter().skip(1).step_by(3) {
            let r = Vec2::from(vertex.position).length();
            assert!((r - BALL_RADIUS).abs() < 1e-4);
        }
    }

    #[test]
    fn test_brick_colors() {
        assert_eq!(brick_color(1), colors::CYAN);
        assert_eq!(brick_color(2), colors::MAGENTA);
        assert_eq!(brick_color(3), colors::YELLOW);
    }

    #[test]
    fn test_type_two_overlay_tracks_health() {
        let mut b = Brick {
            pos: Vec2::new(30.0, 50.0),
            width: 64.0,
            height: 25.0,
            kind: 2,
            health: 2,
        };
        let v = brick(&b);
        assert_eq!(v.len(), 12);
        assert_eq!(v[6].color[3], 0.5);
        // Overlay inset 5px on every side
        let overlay = &v[6..];
        let min_x = overlay.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = overlay.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let min_y = overlay.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        assert_eq!(min_x, 35.0);
        assert_eq!(max_x - min_x, 54.0);
        assert_eq!(min_y, 55.0);

        b.health = 1;
        assert_eq!(brick(&b)[6].color[3], 0.2);

        b.kind = 3;
        b.health = 3;
        assert_eq!(brick(&b).len(), 6);
    }

    #[test]
    fn test_scene_skips_dead_bricks() {
        let mut state = GameState::new(GameConfig::default());
        let alive = state.bricks.remaining();
        let full = scene(&state).len();
        // Level 1 is all type 1: one quad per brick, paddle quad, ball fan
        assert_eq!(full, alive * 6 + 6 + BALL_SEGMENTS as usize * 3);

        if let Some(b) = state.bricks.get_mut(0, 0) {
            b.health = 0;
        }
        assert_eq!(scene(&state).len(), full - 6);

        state.ball = None;
        assert_eq!(scene(&state).len(), full - 6 - BALL_SEGMENTS as usize * 3);
    }
}
