//! Host-owned battle participants
//!
//! The engine owns every hero and monster. The overlay only reads their
//! numbers, and it never keeps a battler alive: displays hold a [`Weak`]
//! reference and treat a dropped battler the same as an unbound slot.
//!
//! [`Weak`]: std::rc::Weak

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// ATB value at which the engine considers a battler's turn ready
pub const FULL_ATB: i32 = 300_000;

/// Read-only view of a battler's state
pub trait Battler {
    fn hp(&self) -> i32;
    fn max_hp(&self) -> i32;
    fn mp(&self) -> i32;
    fn max_mp(&self) -> i32;

    /// Current ATB fill
    fn atb(&self) -> i32;

    /// ATB fill that counts as a full bar
    fn max_atb(&self) -> i32 {
        FULL_ATB
    }

    /// Database id of the hero or monster; 0 marks an empty slot
    fn database_id(&self) -> i32;

    fn is_active(&self) -> bool {
        self.database_id() != 0
    }
}

/// Shared handle the host hands out for a battler it owns
pub type BattlerHandle = Rc<RefCell<dyn Battler>>;

/// Plain battler record
///
/// Used by the demo host (deserialized from its scenario file) and by tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattlerState {
    pub database_id: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub atb: i32,
}

impl BattlerState {
    /// A battler at full health and mana with an empty ATB bar
    pub fn new(database_id: i32, max_hp: i32, max_mp: i32) -> Self {
        BattlerState {
            database_id,
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            atb: 0,
        }
    }

    /// Wraps the record in the shared handle type hosts pass around
    pub fn into_handle(self) -> BattlerHandle {
        Rc::new(RefCell::new(self))
    }
}

impl Battler for BattlerState {
    fn hp(&self) -> i32 {
        self.hp
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn mp(&self) -> i32 {
        self.mp
    }

    fn max_mp(&self) -> i32 {
        self.max_mp
    }

    fn atb(&self) -> i32 {
        self.atb
    }

    fn database_id(&self) -> i32 {
        self.database_id
    }
}
