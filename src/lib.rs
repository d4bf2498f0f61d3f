//! DynGauge - battle gauges for a 2D RPG engine
//!
//! Draws health, mana and ATB gauges plus numeric readouts for every hero and
//! monster during battle. Each battler gets its own off-screen image, built by
//! copying small tiles cut from the engine's system graphic.
//!
//! # Architecture
//!
//! - `gfx`: image backend contract, indexed software images, sheet loading
//! - `battler`: read-only view of host-owned battlers
//! - `atlas`: the shared tiles (gauge frames, bars, digits)
//! - `display`: one composited overlay image per slot
//! - `session`: battle start/end detection and slot binding
//! - `plugin`: the callbacks the host engine invokes
//! - `config`: the plugin's section of the engine settings file
//!
//! Everything runs on the host's render thread; nothing here is `Send`.

pub mod atlas;
pub mod battler;
pub mod config;
pub mod display;
pub mod error;
pub mod gfx;
pub mod plugin;
pub mod session;

pub use atlas::{Gauge, TileAtlas};
pub use battler::{Battler, BattlerHandle, BattlerState};
pub use config::PluginConfig;
pub use display::{EntityDisplay, Snapshot};
pub use error::GaugeError;
pub use gfx::{Image, IndexedImage, Palette};
pub use plugin::Plugin;
pub use session::{BattleHost, BattleSession, BattleState, Scene, Transition};
