use super::{Image, TRANSPARENT_INDEX};
use crate::error::GaugeError;
use sdl2::pixels::Color;
use sdl2::rect::Rect;

/// Number of entries in an 8-bit palette
pub const PALETTE_SIZE: usize = 256;

/// Maps palette indices to displayable colors
///
/// Index 0 is the transparency key and is always presented with zero alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Builds a palette from packed RGB triplets (the PNG `PLTE` layout)
    ///
    /// Missing entries are filled with black.
    pub fn from_rgb(rgb: &[u8]) -> Self {
        let mut colors: Vec<Color> = rgb
            .chunks_exact(3)
            .take(PALETTE_SIZE)
            .map(|c| Color::RGB(c[0], c[1], c[2]))
            .collect();
        colors.resize(PALETTE_SIZE, Color::RGB(0, 0, 0));
        Palette { colors }
    }

    /// A ramp where index N is gray level N
    ///
    /// Used when no system sheet could be loaded.
    pub fn grayscale() -> Self {
        let colors = (0..PALETTE_SIZE)
            .map(|i| Color::RGB(i as u8, i as u8, i as u8))
            .collect();
        Palette { colors }
    }

    pub fn color(&self, index: u8) -> Color {
        let color = self.colors[index as usize];
        if index == TRANSPARENT_INDEX {
            Color::RGBA(color.r, color.g, color.b, 0)
        } else {
            color
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

/// 8-bit palette-indexed software image
///
/// Pixels are stored row-major, one byte per pixel. A freshly created or
/// cleared image is entirely [`TRANSPARENT_INDEX`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl IndexedImage {
    /// Wraps existing pixel data
    ///
    /// Returns `None` if `pixels` doesn't hold exactly `width * height` bytes.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(IndexedImage {
            width,
            height,
            pixels,
        })
    }

    /// Palette index at (`x`, `y`), or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.offset(x, y)])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, index: u8) {
        if x < self.width && y < self.height {
            let offset = self.offset(x, y);
            self.pixels[offset] = index;
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True if no pixel differs from the transparency key
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == TRANSPARENT_INDEX)
    }

    /// Expands to tightly packed RGBA bytes for presentation
    pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for &index in &self.pixels {
            let color = palette.color(index);
            rgba.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        rgba
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl Image for IndexedImage {
    fn create(width: u32, height: u32) -> Result<Self, GaugeError> {
        let len = width as usize * height as usize;
        if len == 0 {
            return Err(GaugeError::ImageCreate { width, height });
        }

        // Rust Learning: try_reserve_exact() reports allocation failure as a
        // value instead of aborting the process
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| GaugeError::ImageCreate { width, height })?;
        pixels.resize(len, TRANSPARENT_INDEX);

        Ok(IndexedImage {
            width,
            height,
            pixels,
        })
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT_INDEX);
    }

    fn draw(&mut self, x: i32, y: i32, src: &Self, src_rect: Rect, color_key: u8) {
        let (src_w, src_h) = (src.width as i32, src.height as i32);
        let (dst_w, dst_h) = (self.width as i32, self.height as i32);

        for row in 0..src_rect.height() as i32 {
            let sy = src_rect.y() + row;
            let dy = y + row;
            if sy < 0 || sy >= src_h || dy < 0 || dy >= dst_h {
                continue;
            }

            for col in 0..src_rect.width() as i32 {
                let sx = src_rect.x() + col;
                let dx = x + col;
                if sx < 0 || sx >= src_w || dx < 0 || dx >= dst_w {
                    continue;
                }

                let index = src.pixels[src.offset(sx as u32, sy as u32)];
                if index != color_key {
                    let offset = self.offset(dx as u32, dy as u32);
                    self.pixels[offset] = index;
                }
            }
        }
    }
}
