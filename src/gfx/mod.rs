//! Off-screen images and keyed blitting
//!
//! All compositing in this crate is a copy of palette indices from one image
//! into another, skipping pixels equal to a color key. There is no blending
//! and no scaling: a source rectangle is copied 1:1 to a destination point.
//!
//! # Architecture
//!
//! - [`Image`] - the backend contract the atlas and displays draw through
//! - [`IndexedImage`] - 8-bit software image used by the plugin and the demo host
//! - [`Palette`] - index to color mapping, only needed at presentation time
//! - [`load_system_sheet`] - decodes the engine's system graphic from an indexed PNG
//!
//! Images release their storage when dropped. Owners never call a destroy
//! function by hand, so an image can't be freed twice or forgotten at exit.

pub mod indexed;
pub mod sheet;

pub use indexed::{IndexedImage, Palette};
pub use sheet::{load_system_sheet, SystemSheet};

use crate::error::GaugeError;
use sdl2::rect::Rect;

/// Palette index treated as transparent by every blit
pub const TRANSPARENT_INDEX: u8 = 0;

/// An off-screen image the overlay can composite into
///
/// Implementors own their pixel storage and release it in `Drop`.
pub trait Image: Sized {
    /// Allocates a blank (fully transparent) image
    ///
    /// Fails if the backing storage can't be allocated.
    fn create(width: u32, height: u32) -> Result<Self, GaugeError>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Resets every pixel to [`TRANSPARENT_INDEX`]
    fn clear(&mut self);

    /// Copies `src_rect` of `src` so its top-left lands at (`x`, `y`)
    ///
    /// Source pixels equal to `color_key` are skipped. Anything falling outside
    /// either image is clipped.
    fn draw(&mut self, x: i32, y: i32, src: &Self, src_rect: Rect, color_key: u8);
}
