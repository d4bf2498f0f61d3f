//! Engine callback surface
//!
//! [`Plugin`] is what the host talks to. It maps the engine's four callbacks
//! onto a [`BattleSession`]:
//!
//! - `on_startup` - load settings, allocate the atlas and every display
//! - `on_frame` - scene notification, once per frame
//! - `on_battler_drawn` - the host just drew a hero or monster
//! - `on_exit` - release everything
//!
//! Callbacks arriving before a successful startup or after exit are ignored.

use crate::battler::BattlerHandle;
use crate::config::PluginConfig;
use crate::gfx::Image;
use crate::session::{BattleHost, BattleSession, Scene, Transition};
use std::path::Path;

pub struct Plugin<I: Image> {
    name: String,
    config: PluginConfig,
    session: Option<BattleSession<I>>,
}

impl<I: Image> Plugin<I> {
    pub fn new() -> Self {
        Plugin {
            name: String::new(),
            config: PluginConfig::default(),
            session: None,
        }
    }

    /// Loads settings and allocates every image the overlay will use
    ///
    /// Returns `false` (and logs why) if anything fails, in which case the
    /// host should treat the plugin as not loaded.
    pub fn on_startup(&mut self, plugin_name: &str, settings_path: &Path) -> bool {
        self.name = plugin_name.to_string();

        self.config = match PluginConfig::load(settings_path, plugin_name) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {}", plugin_name, e);
                return false;
            }
        };

        match BattleSession::new() {
            Ok(session) => {
                self.session = Some(session);
                log::info!("{} started", plugin_name);
                true
            }
            Err(e) => {
                log::error!("{}: {}", plugin_name, e);
                false
            }
        }
    }

    pub fn on_frame<H>(&mut self, scene: Scene, host: &H) -> Option<Transition>
    where
        H: BattleHost<Image = I>,
    {
        self.session.as_mut()?.on_frame(scene, host)
    }

    /// Always returns `true`: the overlay never suppresses the host's drawing
    pub fn on_battler_drawn(&mut self, battler: &BattlerHandle, is_monster: bool, id: usize) -> bool {
        match self.session.as_mut() {
            Some(session) => session.notify_entity_drawn(battler, is_monster, id),
            None => true,
        }
    }

    /// Releases the atlas and all display images
    pub fn on_exit(&mut self) {
        if self.session.take().is_some() {
            log::info!("{} shut down", self.name);
        }
    }

    pub fn session(&self) -> Option<&BattleSession<I>> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }
}

impl<I: Image> Default for Plugin<I> {
    fn default() -> Self {
        Self::new()
    }
}
