//! Deterministic level layouts
//!
//! A level number maps to a fixed brick-type grid. Five patterns cycle with
//! the level number; anything random comes from a sine-hash sequence seeded
//! by the level itself, so the same level always produces the same layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{BRICK_COLS, BRICK_ROWS};

/// Strongest brick type
pub const MAX_BRICK_TYPE: u8 = 3;

/// Sine-hash sequence: `s -> frac(sin(s) * 10000)`, re-seeded from its own
/// unfloored state on every draw
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: f64,
}

impl SeededRandom {
    pub fn new(seed: f64) -> Self {
        Self { state: seed }
    }

    /// Next value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.sin() * 10000.0;
        self.state - self.state.floor()
    }
}

/// Layout pattern, selected by `(level - 1) mod 5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    /// Full rows from the top, growing every 5 levels
    SolidRows,
    /// Alternating cells over the same rows
    Checkerboard,
    /// Rows shrinking by one brick on each side
    Pyramid,
    /// Border band over the upper part of the grid
    HollowFrame,
    /// Random left half mirrored onto the right
    MirroredRandom,
}

impl Pattern {
    pub fn for_level(level: u32) -> Self {
        match level.saturating_sub(1) % 5 {
            0 => Pattern::SolidRows,
            1 => Pattern::Checkerboard,
            2 => Pattern::Pyramid,
            3 => Pattern::HollowFrame,
            _ => Pattern::MirroredRandom,
        }
    }
}

/// Generator failure for inputs outside the level contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelError {
    /// Levels start at 1
    InvalidLevel(i64),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::InvalidLevel(level) => {
                write!(f, "level must be a positive integer, got {}", level)
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Generator output: brick types per cell (0 = empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelLayout {
    rows: usize,
    cols: usize,
    /// Row-major cells
    cells: Vec<u8>,
}

impl LevelLayout {
    /// All-empty layout
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
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

    /// Brick type at (row, col); out-of-range cells read as empty
    pub fn get(&self, row: usize, col: usize) -> u8 {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            0
        }
    }

    fn set(&mut self, row: usize, col: usize, kind: u8) {
        debug_assert!(kind <= MAX_BRICK_TYPE);
        self.cells[row * self.cols + col] = kind;
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Number of non-empty cells
    pub fn brick_count(&self) -> usize {
        self.cells.iter().filter(|&&kind| kind > 0).count()
    }
}

impl fmt::Display for LevelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: String = self
                .row(row)
                .iter()
                .map(|&kind| match kind {
                    0 => '.',
                    k => char::from(b'0' + k),
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Level generator for a fixed grid size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGenerator {
    rows: usize,
    cols: usize,
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new(BRICK_ROWS, BRICK_COLS)
    }
}

impl LevelGenerator {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Layout for `level`.
    ///
    /// # Panics
    /// Panics if `level` is 0. Levels are 1-based.
    pub fn generate(&self, level: u32) -> LevelLayout {
        assert!(level >= 1, "level must be a positive integer, got {}", level);

        let rows = self.rows;
        let cols = self.cols;
        let mut layout = LevelLayout::new(rows, cols);
        let mut rand = SeededRandom::new(f64::from(level));
        // Solid and checkerboard grow by a row every 5 levels
        let filled_rows = (4 + (level / 5) as usize).min(rows);

        match Pattern::for_level(level) {
            Pattern::SolidRows => {
                for r in 0..filled_rows {
                    for c in 0..cols {
                        let kind = if r < 2 && level > 5 { 2 } else { 1 };
                        layout.set(r, c, kind);
                    }
                }
            }

            Pattern::Checkerboard => {
                for r in 0..filled_rows {
                    for c in 0..cols {
                        if (r + c) % 2 == 0 {
                            let kind = if level > 6 && rand.next_f64() > 0.7 { 2 } else { 1 };
                            layout.set(r, c, kind);
                        }
                    }
                }
            }

            Pattern::Pyramid => {
                for r in 0..rows {
                    let bricks_in_row = cols as isize - 2 * r as isize;
                    if bricks_in_row <= 0 {
                        break;
                    }
                    for c in r..r + bricks_in_row as usize {
                        let kind = if level > 7 && r < 2 { 2 } else { 1 };
                        layout.set(r, c, kind);
                    }
                }
            }

            Pattern::HollowFrame => {
                // Only the upper part of the grid gets the frame
                let upper = rows.saturating_sub(4);
                let right_band = cols.saturating_sub(2);
                for r in 0..upper {
                    for c in 0..cols {
                        let border = r < 2 || c < 2 || c >= right_band;
                        if border {
                            let kind = if level > 8 && rand.next_f64() > 0.6 { 2 } else { 1 };
                            layout.set(r, c, kind);
                        }
                    }
                }
            }

            Pattern::MirroredRandom => {
                for r in 0..rows.saturating_sub(3) {
                    for c in 0..cols.div_ceil(2) {
                        if rand.next_f64() > 0.4 {
                            let kind = if level > 9 && rand.next_f64() > 0.5 { 2 } else { 1 };
                            layout.set(r, c, kind);
                            layout.set(r, cols - 1 - c, kind);
                        }
                    }
                }
            }
        }

        layout
    }

    /// Non-panicking variant of [`generate`](Self::generate)
    pub fn try_generate(&self, level: i64) -> Result<LevelLayout, LevelError> {
        match u32::try_from(level) {
            Ok(level) if level >= 1 => Ok(self.generate(level)),
            _ => Err(LevelError::InvalidLevel(level)),
        }
    }
}

/// Layout for `level` on the default 8x10 grid
pub fn generate(level: u32) -> LevelLayout {
    LevelGenerator::default().generate(level)
}

/// Layout for `level` on the default grid, rejecting levels below 1
pub fn try_generate(level: i64) -> Result<LevelLayout, LevelError> {
    LevelGenerator::default().try_generate(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rows_with_bricks(layout: &LevelLayout) -> usize {
        (0..layout.rows())
            .filter(|&r| layout.row(r).iter().any(|&k| k > 0))
            .count()
    }

    #[test]
    fn test_seeded_random_sequence() {
        let mut rand = SeededRandom::new(1.0);
        // frac(sin(1) * 10000)
        let first = rand.next_f64();
        assert!((first - 0.709_848_078_965).abs() < 1e-6);

        for _ in 0..100 {
            let v = rand.next_f64();
            assert!((0.0..1.0).contains(&v));
        }

        let mut a = SeededRandom::new(17.0);
        let mut b = SeededRandom::new(17.0);
        for _ in 0..20 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn test_determinism_levels_1_to_50() {
        for level in 1..=50 {
            assert_eq!(generate(level), generate(level), "level {}", level);
        }
    }

    #[test]
    fn test_pattern_cycles_every_five_levels() {
        assert_eq!(Pattern::for_level(1), Pattern::SolidRows);
        assert_eq!(Pattern::for_level(2), Pattern::Checkerboard);
        assert_eq!(Pattern::for_level(3), Pattern::Pyramid);
        assert_eq!(Pattern::for_level(4), Pattern::HollowFrame);
        assert_eq!(Pattern::for_level(5), Pattern::MirroredRandom);
        for level in 1..=45 {
            assert_eq!(Pattern::for_level(level), Pattern::for_level(level + 5));
        }
    }

    #[test]
    fn test_solid_rows() {
        let layout = generate(1);
        assert_eq!(rows_with_bricks(&layout), 4);
        for r in 0..4 {
            assert!(layout.row(r).iter().all(|&k| k == 1));
        }

        // Level 6: five rows, top two toughened
        let layout = generate(6);
        assert_eq!(rows_with_bricks(&layout), 5);
        assert!(layout.row(0).iter().all(|&k| k == 2));
        assert!(layout.row(1).iter().all(|&k| k == 2));
        assert!(layout.row(4).iter().all(|&k| k == 1));

        // Row count caps at the grid height
        let layout = generate(41);
        assert_eq!(rows_with_bricks(&layout), BRICK_ROWS);
    }

    #[test]
    fn test_checkerboard() {
        for level in [2, 7, 12, 27] {
            let layout = generate(level);
            let expected_rows = (4 + (level / 5) as usize).min(BRICK_ROWS);
            for r in 0..BRICK_ROWS {
                for c in 0..BRICK_COLS {
                    let kind = layout.get(r, c);
                    if r < expected_rows && (r + c) % 2 == 0 {
                        assert!(kind == 1 || kind == 2, "level {} ({}, {})", level, r, c);
                    } else {
                        assert_eq!(kind, 0, "level {} ({}, {})", level, r, c);
                    }
                }
            }
        }
        // Low levels never toughen bricks
        let layout = generate(2);
        assert!((0..BRICK_ROWS).all(|r| layout.row(r).iter().all(|&k| k <= 1)));
    }

    #[test]
    fn test_pyramid() {
        let layout = generate(3);
        for r in 0..BRICK_ROWS {
            let count = BRICK_COLS as isize - 2 * r as isize;
            for c in 0..BRICK_COLS {
                let inside = count > 0 && c >= r && (c as isize) < r as isize + count;
                assert_eq!(layout.get(r, c), u8::from(inside), "({}, {})", r, c);
            }
        }
        assert_eq!(layout.brick_count(), 10 + 8 + 6 + 4 + 2);

        let layout = generate(8);
        assert_eq!(layout.get(0, 0), 2);
        assert_eq!(layout.get(1, 1), 2);
        assert_eq!(layout.get(2, 2), 1);
    }

    #[test]
    fn test_hollow_frame() {
        let layout = generate(4);
        let upper = BRICK_ROWS - 4;
        for r in 0..BRICK_ROWS {
            for c in 0..BRICK_COLS {
                let border = r < 2 || c < 2 || c >= BRICK_COLS - 2;
                let expected = u8::from(r < upper && border);
                assert_eq!(layout.get(r, c), expected, "({}, {})", r, c);
            }
        }

        let layout = generate(9);
        for r in 0..BRICK_ROWS {
            for c in 0..BRICK_COLS {
                let border = r < 2 || c < 2 || c >= BRICK_COLS - 2;
                let kind = layout.get(r, c);
                if r < upper && border {
                    assert!(kind == 1 || kind == 2);
                } else {
                    assert_eq!(kind, 0);
                }
            }
        }
    }

    #[test]
    fn test_mirrored_random() {
        for level in [5, 10, 15, 50] {
            let layout = generate(level);
            for r in 0..BRICK_ROWS {
                for c in 0..BRICK_COLS {
                    assert_eq!(layout.get(r, c), layout.get(r, BRICK_COLS - 1 - c));
                }
            }
            // Bottom three rows stay empty
            for r in BRICK_ROWS - 3..BRICK_ROWS {
                assert!(layout.row(r).iter().all(|&k| k == 0));
            }
        }
        // Below level 10 only type 1 appears
        let layout = generate(5);
        assert!((0..BRICK_ROWS).all(|r| layout.row(r).iter().all(|&k| k <= 1)));
    }

    #[test]
    fn test_small_grids_terminate() {
        for (rows, cols) in [(1, 1), (2, 3), (3, 1), (4, 2)] {
            let generator = LevelGenerator::new(rows, cols);
            for level in 1..=10 {
                let layout = generator.generate(level);
                assert_eq!(layout.rows(), rows);
                assert_eq!(layout.cols(), cols);
            }
        }
    }

    #[test]
    #[should_panic(expected = "positive integer")]
    fn test_level_zero_panics() {
        generate(0);
    }

    #[test]
    fn test_try_generate_rejects_non_positive() {
        assert_eq!(try_generate(0), Err(LevelError::InvalidLevel(0)));
        assert_eq!(try_generate(-3), Err(LevelError::InvalidLevel(-3)));
        assert_eq!(try_generate(2), Ok(generate(2)));
    }

    #[test]
    fn test_display() {
        let text = generate(3).to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "1111111111");
        assert_eq!(text.lines().nth(4).unwrap(), "....11....");
        assert_eq!(text.lines().count(), BRICK_ROWS);
    }

    proptest! {
        #[test]
        fn prop_generate_is_deterministic(level in 1u32..10_000) {
            prop_assert_eq!(generate(level), generate(level));
        }

        #[test]
        fn prop_layout_well_formed(level in 1u32..10_000) {
            let layout = generate(level);
            prop_assert_eq!(layout.rows(), BRICK_ROWS);
            prop_assert_eq!(layout.cols(), BRICK_COLS);
            for r in 0..BRICK_ROWS {
                prop_assert!(layout.row(r).iter().all(|&k| k <= MAX_BRICK_TYPE));
            }
        }

        #[test]
        fn prop_same_pattern_five_levels_apart(level in 1u32..10_000) {
            prop_assert_eq!(Pattern::for_level(level), Pattern::for_level(level + 5));
        }
    }
}
