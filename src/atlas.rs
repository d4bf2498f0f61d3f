//! Shared tile atlas cut from the system graphic
//!
//! Every display draws from the same set of small tiles: three gauge frames,
//! an empty and a filled bar for each gauge, and the digits 0-9. The tiles
//! are allocated once when the plugin starts and filled from the system sheet
//! the first time a battler is bound. After that the atlas is read-only.
//!
//! # Sheet layout
//!
//! | Tile           | Src X  | Src Y | W  | H  |
//! |----------------|--------|-------|----|----|
//! | Health gauge   | 0      | 40    | 40 | 8  |
//! | Mana gauge     | 0      | 56    | 40 | 8  |
//! | ATB gauge      | 0      | 72    | 40 | 8  |
//! | Bar empty/full | 48/64  | gauge | 40 | 8  |
//! | Digit N        | 8 * N  | 80    | 8  | 16 |

use crate::error::GaugeError;
use crate::gfx::{Image, TRANSPARENT_INDEX};
use sdl2::rect::Rect;

pub const GAUGE_WIDTH: u32 = 40;
pub const GAUGE_HEIGHT: u32 = 8;
pub const GAUGE_SRC_X: i32 = 0;
pub const BAR_WIDTH: u32 = 40;
pub const BAR_HEIGHT: u32 = 8;
/// Source X of the "non-full" bar, drawn for the empty part of a gauge
pub const BAR_EMPTY_SRC_X: i32 = 48;
/// Source X of the "full" bar, drawn for the filled part of a gauge
pub const BAR_FILLED_SRC_X: i32 = 64;
pub const DIGIT_WIDTH: u32 = 8;
pub const DIGIT_HEIGHT: u32 = 16;
pub const DIGIT_SRC_X: i32 = 0;
pub const DIGIT_SRC_Y: i32 = 80;
pub const NUM_DIGITS: usize = 10;

/// The three gauges a display can show
///
/// The order of variants is the order rows are stacked, bottom first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gauge {
    Health,
    Mana,
    Atb,
}

impl Gauge {
    pub const ALL: [Gauge; 3] = [Gauge::Health, Gauge::Mana, Gauge::Atb];

    /// Source Y of this gauge's frame and bars in the system sheet
    pub fn src_y(self) -> i32 {
        match self {
            Gauge::Health => 40,
            Gauge::Mana => 56,
            Gauge::Atb => 72,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Frame and bar tiles for one gauge
struct GaugeTiles<I> {
    frame: I,
    empty: I,
    filled: I,
}

/// Tiles shared by every display
///
/// # Example
///
/// ```rust
/// use dyngauge::gfx::{Image, IndexedImage};
/// use dyngauge::TileAtlas;
///
/// let sheet = IndexedImage::create(160, 96)?;
/// let mut atlas = TileAtlas::<IndexedImage>::new()?;
///
/// assert!(atlas.ensure_initialized(Some(&sheet)));
/// assert!(!atlas.ensure_initialized(Some(&sheet)));
/// assert_eq!(atlas.digit(4).width(), 8);
/// # Ok::<(), dyngauge::GaugeError>(())
/// ```
pub struct TileAtlas<I: Image> {
    gauges: Vec<GaugeTiles<I>>,
    digits: Vec<I>,
    initialized: bool,
    extractions: usize,
}

impl<I: Image> TileAtlas<I> {
    /// Allocates every tile, blank
    ///
    /// This runs at plugin startup so allocation problems surface there
    /// rather than in the middle of a battle.
    pub fn new() -> Result<Self, GaugeError> {
        let mut gauges = Vec::with_capacity(Gauge::ALL.len());
        for _ in Gauge::ALL {
            gauges.push(GaugeTiles {
                frame: I::create(GAUGE_WIDTH, GAUGE_HEIGHT)?,
                empty: I::create(BAR_WIDTH, BAR_HEIGHT)?,
                filled: I::create(BAR_WIDTH, BAR_HEIGHT)?,
            });
        }

        let digits = (0..NUM_DIGITS)
            .map(|_| I::create(DIGIT_WIDTH, DIGIT_HEIGHT))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TileAtlas {
            gauges,
            digits,
            initialized: false,
            extractions: 0,
        })
    }

    /// Cuts the tiles out of the system sheet, once
    ///
    /// Later calls do nothing. Without a sheet the tiles stay blank and the
    /// overlay draws nothing visible, which is preferable to failing a battle.
    /// Returns `true` only for the call that did the work.
    pub fn ensure_initialized(&mut self, sheet: Option<&I>) -> bool {
        if self.initialized {
            return false;
        }

        match sheet {
            Some(sheet) => self.extract(sheet),
            None => log::warn!("System sheet unavailable, gauge tiles left blank"),
        }

        self.initialized = true;
        self.extractions += 1;
        true
    }

    fn extract(&mut self, sheet: &I) {
        for gauge in Gauge::ALL {
            let y = gauge.src_y();
            let tiles = &mut self.gauges[gauge.index()];
            tiles.frame.draw(
                0,
                0,
                sheet,
                Rect::new(GAUGE_SRC_X, y, GAUGE_WIDTH, GAUGE_HEIGHT),
                TRANSPARENT_INDEX,
            );
            tiles.empty.draw(
                0,
                0,
                sheet,
                Rect::new(BAR_EMPTY_SRC_X, y, BAR_WIDTH, BAR_HEIGHT),
                TRANSPARENT_INDEX,
            );
            tiles.filled.draw(
                0,
                0,
                sheet,
                Rect::new(BAR_FILLED_SRC_X, y, BAR_WIDTH, BAR_HEIGHT),
                TRANSPARENT_INDEX,
            );
        }

        // Digits sit side by side, one glyph width apart
        for (i, digit) in self.digits.iter_mut().enumerate() {
            let x = DIGIT_SRC_X + DIGIT_WIDTH as i32 * i as i32;
            digit.draw(
                0,
                0,
                sheet,
                Rect::new(x, DIGIT_SRC_Y, DIGIT_WIDTH, DIGIT_HEIGHT),
                TRANSPARENT_INDEX,
            );
        }

        log::debug!("Extracted {} atlas tiles", self.gauges.len() * 3 + self.digits.len());
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// How many times extraction actually ran (0 or 1)
    pub fn extraction_count(&self) -> usize {
        self.extractions
    }

    pub fn gauge_frame(&self, gauge: Gauge) -> &I {
        &self.gauges[gauge.index()].frame
    }

    pub fn bar_empty(&self, gauge: Gauge) -> &I {
        &self.gauges[gauge.index()].empty
    }

    pub fn bar_filled(&self, gauge: Gauge) -> &I {
        &self.gauges[gauge.index()].filled
    }

    /// Glyph for a single decimal digit; values above 9 are clamped
    pub fn digit(&self, value: u8) -> &I {
        &self.digits[(value as usize).min(NUM_DIGITS - 1)]
    }
}
