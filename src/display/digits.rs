//! Numeric readouts built from digit glyph tiles

use crate::atlas::{TileAtlas, DIGIT_HEIGHT, DIGIT_WIDTH};
use crate::gfx::{Image, TRANSPARENT_INDEX};
use sdl2::rect::Rect;

/// Decimal digits of `value`, most significant first
///
/// No leading zeros; zero itself is the single digit 0. Negative values are
/// shown as 0 since a readout never displays a sign.
pub fn digit_sequence(value: i32) -> Vec<u8> {
    let mut remaining = value.max(0) as u32;
    let mut digits = Vec::new();

    loop {
        digits.push((remaining % 10) as u8);
        remaining /= 10;
        if remaining == 0 {
            break;
        }
    }

    digits.reverse();
    digits
}

/// Draws `value` left to right starting at (`x`, `y`)
///
/// Glyphs are placed one glyph width apart. Returns the x just past the last
/// glyph.
pub fn draw_number<I: Image>(dest: &mut I, atlas: &TileAtlas<I>, x: i32, y: i32, value: i32) -> i32 {
    let mut current_x = x;
    for digit in digit_sequence(value) {
        dest.draw(
            current_x,
            y,
            atlas.digit(digit),
            Rect::new(0, 0, DIGIT_WIDTH, DIGIT_HEIGHT),
            TRANSPARENT_INDEX,
        );
        current_x += DIGIT_WIDTH as i32;
    }
    current_x
}
