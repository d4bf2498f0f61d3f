//! Battle session controller
//!
//! Watches the scene the host reports each frame, binds battlers to display
//! slots when a battle begins, and redraws a slot's display when the host says
//! it just drew that battler.
//!
//! # State machine
//!
//! ```text
//!            scene == Battle
//!   Idle  ------------------->  InBattle
//!         <-------------------
//!            scene != Battle
//! ```
//!
//! Only the edges do anything. Entering a battle binds every active monster
//! and hero and clears the other slots; leaving one just flips the state.
//! Displays keep their last binding until the next battle replaces it.

use crate::atlas::TileAtlas;
use crate::battler::BattlerHandle;
use crate::display::EntityDisplay;
use crate::error::GaugeError;
use crate::gfx::Image;

/// Party size ceiling
pub const NUM_HEROES: usize = 4;
/// Monster group size ceiling
pub const NUM_MONSTERS: usize = 8;

/// Kind of scene the host is showing this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Title,
    Field,
    Menu,
    Battle,
    Shop,
    Name,
    File,
    GameOver,
    Debug,
}

/// Whether the previous frame was a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattleState {
    #[default]
    Idle,
    InBattle,
}

/// Edge reported by [`BattleSession::on_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BattleStarted,
    BattleEnded,
}

/// What the session needs from the host engine
pub trait BattleHost {
    type Image: Image;

    /// The system graphic the atlas is cut from, if the host has one loaded
    fn system_graphic(&self) -> Option<&Self::Image>;

    /// Battler in monster slot `slot`, or `None` if the slot doesn't exist
    fn monster(&self, slot: usize) -> Option<BattlerHandle>;

    /// Battler in party slot `slot`, or `None` if nobody is there
    fn hero(&self, slot: usize) -> Option<BattlerHandle>;
}

/// All overlay state for one plugin instance
///
/// Owns the shared atlas and one display per hero and monster slot. Dropping
/// the session releases every image it allocated.
pub struct BattleSession<I: Image> {
    state: BattleState,
    atlas: TileAtlas<I>,
    heroes: [EntityDisplay<I>; NUM_HEROES],
    monsters: [EntityDisplay<I>; NUM_MONSTERS],
}

impl<I: Image> BattleSession<I> {
    /// Allocates the atlas and every slot's display image
    pub fn new() -> Result<Self, GaugeError> {
        let atlas = TileAtlas::new()?;
        let heroes = [
            EntityDisplay::new()?,
            EntityDisplay::new()?,
            EntityDisplay::new()?,
            EntityDisplay::new()?,
        ];
        let monsters = [
            EntityDisplay::new()?,
            EntityDisplay::new()?,
            EntityDisplay::new()?,
            EntityDisplay::new()?,
            EntityDisplay::new()?,
            EntityDisplay::new()?,
            EntityDisplay::new()?,
            EntityDisplay::new()?,
        ];

        Ok(BattleSession {
            state: BattleState::Idle,
            atlas,
            heroes,
            monsters,
        })
    }

    /// Per-frame scene notification
    ///
    /// Must be called once per frame, before any [`notify_entity_drawn`]
    /// calls for that frame. Returns the transition this frame caused, if any.
    ///
    /// [`notify_entity_drawn`]: Self::notify_entity_drawn
    pub fn on_frame<H>(&mut self, scene: Scene, host: &H) -> Option<Transition>
    where
        H: BattleHost<Image = I>,
    {
        let in_battle = scene == Scene::Battle;

        match (self.state, in_battle) {
            (BattleState::Idle, true) => {
                self.state = BattleState::InBattle;
                self.bind_battlers(host);
                log::info!("Battle started");
                Some(Transition::BattleStarted)
            }
            (BattleState::InBattle, false) => {
                self.state = BattleState::Idle;
                log::info!("Battle ended");
                Some(Transition::BattleEnded)
            }
            _ => None,
        }
    }

    /// Binds every active monster and hero to its slot's display
    ///
    /// Slots that are empty in this battle drop whatever the previous battle
    /// left in them.
    fn bind_battlers<H>(&mut self, host: &H)
    where
        H: BattleHost<Image = I>,
    {
        let sheet = host.system_graphic();

        for (slot, display) in self.monsters.iter_mut().enumerate() {
            match host.monster(slot).filter(|m| m.borrow().is_active()) {
                Some(monster) => {
                    display.set_battler(&monster, &mut self.atlas, sheet);
                    log::debug!("Bound monster slot {}", slot);
                }
                None => display.unbind(),
            }
        }

        for (slot, display) in self.heroes.iter_mut().enumerate() {
            match host.hero(slot).filter(|h| h.borrow().is_active()) {
                Some(hero) => {
                    display.set_battler(&hero, &mut self.atlas, sheet);
                    log::debug!("Bound hero slot {}", slot);
                }
                None => display.unbind(),
            }
        }
    }

    /// Redraws the display of a battler the host has just drawn
    ///
    /// Only updates the slot if it is bound to this very battler. Unknown slot
    /// ids are ignored. Always returns `true` so the host carries on drawing.
    pub fn notify_entity_drawn(&mut self, battler: &BattlerHandle, is_monster: bool, slot_id: usize) -> bool {
        let display = if is_monster {
            self.monsters.get_mut(slot_id)
        } else {
            self.heroes.get_mut(slot_id)
        };

        let Some(display) = display else {
            log::warn!(
                "Ignoring draw notification for out-of-range {} slot {}",
                if is_monster { "monster" } else { "hero" },
                slot_id
            );
            return true;
        };

        if display.is_bound_to(battler) {
            display.update(&self.atlas);
        }

        true
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn in_battle(&self) -> bool {
        self.state == BattleState::InBattle
    }

    pub fn atlas(&self) -> &TileAtlas<I> {
        &self.atlas
    }

    pub fn hero_display(&self, slot: usize) -> Option<&EntityDisplay<I>> {
        self.heroes.get(slot)
    }

    pub fn monster_display(&self, slot: usize) -> Option<&EntityDisplay<I>> {
        self.monsters.get(slot)
    }

    /// Bound displays as `(is_monster, slot, display)`, heroes first
    pub fn bound_displays(&self) -> impl Iterator<Item = (bool, usize, &EntityDisplay<I>)> {
        let heroes = self.heroes.iter().enumerate().map(|(i, d)| (false, i, d));
        let monsters = self.monsters.iter().enumerate().map(|(i, d)| (true, i, d));
        heroes.chain(monsters).filter(|(_, _, d)| d.is_bound())
    }
}
