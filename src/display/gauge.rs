//! Gauge rows: a frame with a proportional bar on top
//!
//! A bar is drawn in two copies from the atlas. The left part comes from the
//! filled tile and the rest from the empty tile, so the two always add up to
//! [`BAR_WIDTH`].

use crate::atlas::{Gauge, TileAtlas, BAR_HEIGHT, BAR_WIDTH, GAUGE_HEIGHT, GAUGE_WIDTH};
use crate::gfx::{Image, TRANSPARENT_INDEX};
use sdl2::rect::Rect;

/// Pixel width of the filled part of a bar for `current` out of `max`
///
/// Computes `floor(BAR_WIDTH * current / max)` clamped to `0..=BAR_WIDTH`.
/// A non-positive `max` gives an empty bar.
///
/// # Example
///
/// ```rust
/// use dyngauge::atlas::BAR_WIDTH;
/// use dyngauge::display::fill_width;
///
/// assert_eq!(fill_width(0, 100), 0);
/// assert_eq!(fill_width(50, 100), 20);
/// assert_eq!(fill_width(250, 100), BAR_WIDTH);
/// ```
pub fn fill_width(current: i32, max: i32) -> u32 {
    if max <= 0 {
        return 0;
    }

    // Rust Learning: widen to i64 so large ATB values can't overflow the product
    let width = (BAR_WIDTH as i64 * current as i64).div_euclid(max as i64);
    width.clamp(0, BAR_WIDTH as i64) as u32
}

/// Draws one gauge row with its top-left corner at (`x`, `y`)
///
/// Layers, bottom to top: gauge frame, filled bar part, empty bar part.
pub fn draw_gauge<I: Image>(
    dest: &mut I,
    atlas: &TileAtlas<I>,
    gauge: Gauge,
    x: i32,
    y: i32,
    current: i32,
    max: i32,
) {
    dest.draw(
        x,
        y,
        atlas.gauge_frame(gauge),
        Rect::new(0, 0, GAUGE_WIDTH, GAUGE_HEIGHT),
        TRANSPARENT_INDEX,
    );

    // Rect::new() bumps a zero width up to 1, so empty spans are skipped here
    let filled = fill_width(current, max);
    if filled > 0 {
        dest.draw(
            x,
            y,
            atlas.bar_filled(gauge),
            Rect::new(0, 0, filled, BAR_HEIGHT),
            TRANSPARENT_INDEX,
        );
    }

    let empty = BAR_WIDTH - filled;
    if empty > 0 {
        dest.draw(
            x + filled as i32,
            y,
            atlas.bar_empty(gauge),
            Rect::new(filled as i32, 0, empty, BAR_HEIGHT),
            TRANSPARENT_INDEX,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_width_endpoints() {
        assert_eq!(fill_width(0, 250), 0);
        assert_eq!(fill_width(250, 250), BAR_WIDTH);
    }

    #[test]
    fn test_fill_width_rounds_down() {
        // 40 * 33 / 100 = 13.2
        assert_eq!(fill_width(33, 100), 13);
        // 40 * 1 / 41 < 1
        assert_eq!(fill_width(1, 41), 0);
        assert_eq!(fill_width(99, 100), 39);
    }

    #[test]
    fn test_fill_width_clamps_out_of_range() {
        assert_eq!(fill_width(-5, 100), 0);
        assert_eq!(fill_width(i32::MIN, 100), 0);
        assert_eq!(fill_width(101, 100), BAR_WIDTH);
        assert_eq!(fill_width(i32::MAX, 1), BAR_WIDTH);
    }

    #[test]
    fn test_fill_width_with_zero_max() {
        assert_eq!(fill_width(10, 0), 0);
        assert_eq!(fill_width(0, 0), 0);
        assert_eq!(fill_width(10, -3), 0);
    }

    #[test]
    fn test_fill_width_is_monotonic() {
        for max in [1, 7, 40, 999, 300_000] {
            let mut previous = 0;
            for current in (-10..=max + 10).step_by((max as usize / 50).max(1)) {
                let width = fill_width(current, max);
                assert!(width >= previous, "width dropped at {}/{}", current, max);
                assert!(width <= BAR_WIDTH);
                previous = width;
            }
        }
    }
}
