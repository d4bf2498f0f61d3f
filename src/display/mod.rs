//! Per-battler overlay images
//!
//! Each hero and monster slot owns one [`EntityDisplay`]. A display remembers
//! which battler it serves and the numbers it last saw, and redraws its own
//! off-screen image from the shared [`TileAtlas`] when asked.
//!
//! # Layout
//!
//! Everything is anchored to the bottom-left corner of the 80x320 image and
//! stacked upward:
//!
//! ```text
//! y = 264  mana value   (digits, 16 px)
//! y = 280  health value (digits, 16 px)
//! y = 296  ATB gauge    (8 px)
//! y = 304  mana gauge   (8 px)
//! y = 312  health gauge (8 px)
//! ```
//!
//! The space above is kept free for further icon rows.
//!
//! # Example
//!
//! ```rust
//! use dyngauge::gfx::{Image, IndexedImage};
//! use dyngauge::{BattlerState, EntityDisplay, TileAtlas};
//!
//! let sheet = IndexedImage::create(160, 96)?;
//! let mut atlas = TileAtlas::<IndexedImage>::new()?;
//! let handle = BattlerState::new(3, 120, 40).into_handle();
//!
//! let mut display = EntityDisplay::<IndexedImage>::new()?;
//! display.set_battler(&handle, &mut atlas, Some(&sheet));
//!
//! // Every frame, after the host drew the battler
//! assert!(display.update(&atlas));
//! assert_eq!(display.snapshot().max_hp, 120);
//! # Ok::<(), dyngauge::GaugeError>(())
//! ```

pub mod digits;
pub mod gauge;

pub use digits::{digit_sequence, draw_number};
pub use gauge::{draw_gauge, fill_width};

use crate::atlas::{Gauge, TileAtlas, DIGIT_HEIGHT, GAUGE_HEIGHT};
use crate::battler::{Battler, BattlerHandle};
use crate::error::GaugeError;
use crate::gfx::Image;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub const DISPLAY_WIDTH: u32 = 80;
pub const DISPLAY_HEIGHT: u32 = 320;

/// Battler numbers as of the last bind or update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub atb: i32,
    pub max_atb: i32,
}

impl Snapshot {
    pub fn of(battler: &dyn Battler) -> Self {
        Snapshot {
            hp: battler.hp(),
            max_hp: battler.max_hp(),
            mp: battler.mp(),
            max_mp: battler.max_mp(),
            atb: battler.atb(),
            max_atb: battler.max_atb(),
        }
    }

    /// Current and maximum value shown by `gauge`
    pub fn gauge_values(&self, gauge: Gauge) -> (i32, i32) {
        match gauge {
            Gauge::Health => (self.hp, self.max_hp),
            Gauge::Mana => (self.mp, self.max_mp),
            Gauge::Atb => (self.atb, self.max_atb),
        }
    }
}

/// Top edge of the gauge row for `gauge`
fn gauge_row_y(gauge: Gauge) -> i32 {
    let row = Gauge::ALL.iter().position(|&g| g == gauge).unwrap_or(0) as i32;
    DISPLAY_HEIGHT as i32 - GAUGE_HEIGHT as i32 * (row + 1)
}

/// Top edge of the `row`-th readout line above the gauges
fn readout_row_y(row: i32) -> i32 {
    let gauges_top = DISPLAY_HEIGHT as i32 - GAUGE_HEIGHT as i32 * Gauge::ALL.len() as i32;
    gauges_top - DIGIT_HEIGHT as i32 * (row + 1)
}

/// Overlay for one hero or monster slot
///
/// The battler is referenced weakly: the host decides how long it lives.
pub struct EntityDisplay<I: Image> {
    battler: Option<Weak<RefCell<dyn Battler>>>,
    snapshot: Snapshot,
    image: I,
}

impl<I: Image> EntityDisplay<I> {
    /// Creates an unbound display with a blank image
    pub fn new() -> Result<Self, GaugeError> {
        Ok(EntityDisplay {
            battler: None,
            snapshot: Snapshot::default(),
            image: I::create(DISPLAY_WIDTH, DISPLAY_HEIGHT)?,
        })
    }

    /// Binds the display to `battler`, replacing any earlier binding
    ///
    /// Makes sure the atlas has been cut from `sheet` and takes an initial
    /// snapshot. Nothing is redrawn until the next [`update`](Self::update).
    pub fn set_battler(&mut self, battler: &BattlerHandle, atlas: &mut TileAtlas<I>, sheet: Option<&I>) {
        atlas.ensure_initialized(sheet);

        self.snapshot = Snapshot::of(&*battler.borrow());
        self.battler = Some(Rc::downgrade(battler));
    }

    /// Refreshes the snapshot from the bound battler and redraws the image
    ///
    /// Does nothing on an unbound display. If the host has dropped the bound
    /// battler, the binding is released and the image cleared. Returns `true`
    /// if the image was redrawn.
    pub fn update(&mut self, atlas: &TileAtlas<I>) -> bool {
        let Some(weak) = &self.battler else {
            return false;
        };

        let Some(battler) = weak.upgrade() else {
            log::debug!("Bound battler is gone, releasing display");
            self.unbind();
            return false;
        };

        self.snapshot = Snapshot::of(&*battler.borrow());
        self.draw(atlas);
        true
    }

    /// True if the display is bound to `battler`
    pub fn is_bound_to(&self, battler: &BattlerHandle) -> bool {
        self.battler
            .as_ref()
            .is_some_and(|weak| std::ptr::addr_eq(weak.as_ptr(), Rc::as_ptr(battler)))
    }

    pub fn is_bound(&self) -> bool {
        self.battler
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
    }

    pub fn image(&self) -> &I {
        &self.image
    }

    /// Forgets the bound battler and clears the image
    pub fn unbind(&mut self) {
        self.battler = None;
        self.snapshot = Snapshot::default();
        self.image.clear();
    }

    /// Recomposites the image from the current snapshot
    fn draw(&mut self, atlas: &TileAtlas<I>) {
        self.image.clear();

        for gauge in Gauge::ALL {
            let (current, max) = self.snapshot.gauge_values(gauge);
            draw_gauge(&mut self.image, atlas, gauge, 0, gauge_row_y(gauge), current, max);
        }

        draw_number(&mut self.image, atlas, 0, readout_row_y(0), self.snapshot.hp);
        draw_number(&mut self.image, atlas, 0, readout_row_y(1), self.snapshot.mp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::tests::{sheet_index, test_sheet};
    use crate::atlas::{BAR_EMPTY_SRC_X, BAR_FILLED_SRC_X, DIGIT_WIDTH};
    use crate::battler::BattlerState;
    use crate::gfx::IndexedImage;

    fn bound_display(
        state: BattlerState,
    ) -> (EntityDisplay<IndexedImage>, TileAtlas<IndexedImage>, Rc<RefCell<BattlerState>>) {
        let sheet = test_sheet();
        let mut atlas = TileAtlas::new().unwrap();
        let mut display = EntityDisplay::new().unwrap();
        let battler = Rc::new(RefCell::new(state));
        let handle: BattlerHandle = battler.clone();
        display.set_battler(&handle, &mut atlas, Some(&sheet));
        (display, atlas, battler)
    }

    #[test]
    fn test_layout_rows() {
        assert_eq!(gauge_row_y(Gauge::Health), 312);
        assert_eq!(gauge_row_y(Gauge::Mana), 304);
        assert_eq!(gauge_row_y(Gauge::Atb), 296);
        assert_eq!(readout_row_y(0), 280);
        assert_eq!(readout_row_y(1), 264);
    }

    #[test]
    fn test_new_display_is_unbound_and_blank() {
        let display = EntityDisplay::<IndexedImage>::new().unwrap();
        assert!(!display.is_bound());
        assert!(display.image().is_blank());
        assert_eq!(display.image().width(), DISPLAY_WIDTH);
        assert_eq!(display.image().height(), DISPLAY_HEIGHT);
    }

    #[test]
    fn test_update_on_unbound_display_is_noop() {
        let atlas = TileAtlas::<IndexedImage>::new().unwrap();
        let mut display = EntityDisplay::new().unwrap();

        assert!(!display.update(&atlas));
        assert!(display.image().is_blank());
        assert_eq!(display.snapshot(), Snapshot::default());
    }

    #[test]
    fn test_set_battler_snapshots_without_drawing() {
        let (display, atlas, _battler) = bound_display(BattlerState {
            database_id: 1,
            hp: 30,
            max_hp: 60,
            mp: 5,
            max_mp: 10,
            atb: 150_000,
        });

        assert!(atlas.is_initialized());
        assert!(display.is_bound());
        assert_eq!(display.snapshot().hp, 30);
        assert_eq!(display.snapshot().atb, 150_000);
        assert!(display.image().is_blank());
    }

    #[test]
    fn test_update_reads_latest_values() {
        let (mut display, atlas, battler) = bound_display(BattlerState::new(1, 100, 20));

        battler.borrow_mut().hp = 64;
        battler.borrow_mut().atb = 1_000;
        assert!(display.update(&atlas));

        assert_eq!(display.snapshot().hp, 64);
        assert_eq!(display.snapshot().atb, 1_000);
    }

    #[test]
    fn test_snapshot_is_stale_until_update() {
        let (display, _atlas, battler) = bound_display(BattlerState::new(1, 100, 20));
        battler.borrow_mut().hp = 1;
        assert_eq!(display.snapshot().hp, 100);
    }

    #[test]
    fn test_composite_health_bar_split() {
        // Half health: 20 px from the filled bar, 20 px from the empty bar
        let mut state = BattlerState::new(1, 100, 20);
        state.hp = 50;
        let (mut display, atlas, _battler) = bound_display(state);
        display.update(&atlas);

        let image = display.image();
        let y = gauge_row_y(Gauge::Health) as u32;
        let src_y = Gauge::Health.src_y() as u32;
        assert_eq!(image.pixel(0, y), Some(sheet_index(BAR_FILLED_SRC_X as u32, src_y)));
        assert_eq!(image.pixel(19, y), Some(sheet_index(BAR_FILLED_SRC_X as u32 + 19, src_y)));
        assert_eq!(image.pixel(20, y), Some(sheet_index(BAR_EMPTY_SRC_X as u32 + 20, src_y)));
        assert_eq!(image.pixel(39, y + 7), Some(sheet_index(BAR_EMPTY_SRC_X as u32 + 39, src_y + 7)));
    }

    #[test]
    fn test_composite_draws_all_gauges() {
        let mut state = BattlerState::new(1, 100, 20);
        state.mp = 0;
        state.atb = crate::battler::FULL_ATB;
        let (mut display, atlas, _battler) = bound_display(state);
        display.update(&atlas);

        let image = display.image();
        let mana_y = gauge_row_y(Gauge::Mana) as u32;
        let atb_y = gauge_row_y(Gauge::Atb) as u32;
        // Empty mana bar, full ATB bar
        assert_eq!(image.pixel(0, mana_y), Some(sheet_index(BAR_EMPTY_SRC_X as u32, 56)));
        assert_eq!(image.pixel(39, atb_y), Some(sheet_index(BAR_FILLED_SRC_X as u32 + 39, 72)));
        // Nothing right of the gauges on gauge rows
        assert_eq!(image.pixel(40, mana_y), Some(0));
    }

    #[test]
    fn test_composite_draws_readouts() {
        let mut state = BattlerState::new(1, 100, 20);
        state.hp = 42;
        state.mp = 7;
        let (mut display, atlas, _battler) = bound_display(state);
        display.update(&atlas);

        let image = display.image();
        let hp_y = readout_row_y(0) as u32;
        let mp_y = readout_row_y(1) as u32;
        assert_eq!(image.pixel(0, hp_y), Some(sheet_index(4 * DIGIT_WIDTH, 80)));
        assert_eq!(image.pixel(DIGIT_WIDTH, hp_y), Some(sheet_index(2 * DIGIT_WIDTH, 80)));
        assert_eq!(image.pixel(2 * DIGIT_WIDTH, hp_y), Some(0));
        assert_eq!(image.pixel(0, mp_y), Some(sheet_index(7 * DIGIT_WIDTH, 80)));
        assert_eq!(image.pixel(DIGIT_WIDTH, mp_y), Some(0));
        // Top of the image stays free
        assert_eq!(image.pixel(0, 0), Some(0));
    }

    #[test]
    fn test_redraw_clears_previous_frame() {
        let mut state = BattlerState::new(1, 100, 20);
        state.hp = 100;
        let (mut display, atlas, battler) = bound_display(state);
        display.update(&atlas);

        battler.borrow_mut().hp = 5;
        display.update(&atlas);

        // "100" had a third glyph; "5" has one
        let hp_y = readout_row_y(0) as u32;
        assert_eq!(display.image().pixel(DIGIT_WIDTH, hp_y), Some(0));
        assert_eq!(display.image().pixel(2 * DIGIT_WIDTH, hp_y), Some(0));
    }

    #[test]
    fn test_rebind_replaces_battler() {
        let (mut display, mut atlas, first) = bound_display(BattlerState::new(1, 100, 20));
        let second: BattlerHandle = BattlerState::new(2, 9, 9).into_handle();
        let first_handle: BattlerHandle = first.clone();

        display.set_battler(&second, &mut atlas, None);

        assert!(display.is_bound_to(&second));
        assert!(!display.is_bound_to(&first_handle));
        assert_eq!(display.snapshot().max_hp, 9);
        assert_eq!(atlas.extraction_count(), 1);
    }

    #[test]
    fn test_dropped_battler_releases_binding() {
        let (mut display, atlas, battler) = bound_display(BattlerState::new(1, 100, 20));
        display.update(&atlas);
        assert!(!display.image().is_blank());

        drop(battler);

        assert!(!display.update(&atlas));
        assert!(!display.is_bound());
        assert!(display.image().is_blank());
    }
}
