//! Stand-in host engine for the gauge overlay
//!
//! Opens a window, plays a tiny field/battle loop and drives the plugin the
//! way the engine does: one scene notification per frame, then a draw
//! notification after each battler is drawn. The composited display images
//! are blitted above their battlers.
//!
//! Keys: B toggles battle, Space hits the first living monster, H hurts the
//! party, M spends party mana, Escape quits.

use clap::Parser;
use dyngauge::battler::{BattlerHandle, BattlerState, FULL_ATB};
use dyngauge::display::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use dyngauge::gfx::{load_system_sheet, IndexedImage, Palette, SystemSheet};
use dyngauge::session::{BattleHost, Scene};
use dyngauge::{EntityDisplay, Plugin};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, TextureCreator};
use sdl2::surface::Surface;
use sdl2::video::{Window, WindowContext};
use serde::Deserialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

// Game resolution constants
const GAME_WIDTH: u32 = 640;
const GAME_HEIGHT: u32 = 480;
const BATTLER_SIZE: u32 = 32;
/// ATB gained per frame at speed 1
const ATB_PER_FRAME: i32 = 1_500;

#[derive(Parser, Debug)]
#[command(about = "Battle gauge overlay demo")]
struct Args {
    /// Indexed PNG of the engine's system graphic
    #[arg(long, default_value = "System/System2.png")]
    sheet: PathBuf,

    /// JSON roster of heroes and monsters
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Engine settings file holding the plugin's section
    #[arg(long, default_value = "DynRPG.ini")]
    settings: PathBuf,

    #[arg(long, default_value = "DynGauge")]
    plugin_name: String,
}

/// A battler plus where the demo draws it
#[derive(Debug, Deserialize)]
struct DemoBattler {
    #[serde(flatten)]
    state: BattlerState,
    x: i32,
    y: i32,
    #[serde(default = "default_speed")]
    speed: i32,
}

fn default_speed() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
struct Scenario {
    heroes: Vec<DemoBattler>,
    monsters: Vec<DemoBattler>,
}

impl Scenario {
    fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        serde_json::from_str(&json).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    fn builtin() -> Self {
        let battler = |id, hp, mp, x, y, speed| DemoBattler {
            state: BattlerState::new(id, hp, mp),
            x,
            y,
            speed,
        };
        Scenario {
            heroes: vec![
                battler(1, 420, 60, 500, 380, 3),
                battler(2, 310, 120, 540, 430, 2),
            ],
            monsters: vec![
                battler(5, 150, 0, 90, 360, 1),
                battler(0, 0, 0, 0, 0, 1),
                battler(5, 150, 0, 130, 430, 2),
                battler(8, 900, 40, 230, 400, 1),
            ],
        }
    }
}

/// One battler owned by the demo host
struct HostBattler {
    state: Rc<RefCell<BattlerState>>,
    x: i32,
    y: i32,
    speed: i32,
}

impl HostBattler {
    fn handle(&self) -> BattlerHandle {
        self.state.clone()
    }

    fn is_active(&self) -> bool {
        self.state.borrow().database_id != 0
    }
}

impl From<DemoBattler> for HostBattler {
    fn from(battler: DemoBattler) -> Self {
        HostBattler {
            state: Rc::new(RefCell::new(battler.state)),
            x: battler.x,
            y: battler.y,
            speed: battler.speed,
        }
    }
}

struct DemoHost {
    sheet: Option<SystemSheet>,
    heroes: Vec<HostBattler>,
    monsters: Vec<HostBattler>,
}

impl BattleHost for DemoHost {
    type Image = IndexedImage;

    fn system_graphic(&self) -> Option<&IndexedImage> {
        self.sheet.as_ref().map(|sheet| &sheet.image)
    }

    fn monster(&self, slot: usize) -> Option<BattlerHandle> {
        self.monsters.get(slot).map(HostBattler::handle)
    }

    fn hero(&self, slot: usize) -> Option<BattlerHandle> {
        self.heroes.get(slot).map(HostBattler::handle)
    }
}

impl DemoHost {
    /// Fills ATB bars; a full bar means the battler acted and starts over
    fn advance_atb(&mut self) {
        for battler in self.heroes.iter().chain(self.monsters.iter()) {
            let mut state = battler.state.borrow_mut();
            if state.hp <= 0 {
                continue;
            }
            state.atb += ATB_PER_FRAME * battler.speed;
            if state.atb > FULL_ATB {
                state.atb = 0;
            }
        }
    }

    fn hit_first_monster(&mut self, damage: i32) {
        let target = self
            .monsters
            .iter()
            .find(|m| m.is_active() && m.state.borrow().hp > 0);
        if let Some(monster) = target {
            let mut state = monster.state.borrow_mut();
            state.hp = (state.hp - damage).max(0);
            log::info!("Monster {} takes {} damage ({} left)", state.database_id, damage, state.hp);
        }
    }

    fn hurt_party(&mut self, damage: i32) {
        for hero in &self.heroes {
            let mut state = hero.state.borrow_mut();
            state.hp = (state.hp - damage).max(0);
        }
    }

    fn spend_party_mana(&mut self, cost: i32) {
        for hero in &self.heroes {
            let mut state = hero.state.borrow_mut();
            state.mp = (state.mp - cost).max(0);
        }
    }
}

/// Blits a display image with its bottom-left corner at (`x`, `bottom`)
fn present_display(
    canvas: &mut Canvas<Window>,
    texture_creator: &TextureCreator<WindowContext>,
    display: &EntityDisplay<IndexedImage>,
    palette: &Palette,
    x: i32,
    bottom: i32,
) -> Result<(), String> {
    let mut rgba = display.image().to_rgba(palette);
    let surface = Surface::from_data(
        &mut rgba,
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
        DISPLAY_WIDTH * 4,
        PixelFormatEnum::RGBA32,
    )?;

    let mut texture = texture_creator
        .create_texture_from_surface(&surface)
        .map_err(|e| e.to_string())?;
    texture.set_blend_mode(BlendMode::Blend);

    let dest = Rect::new(x, bottom - DISPLAY_HEIGHT as i32, DISPLAY_WIDTH, DISPLAY_HEIGHT);
    canvas.copy(&texture, None, dest)
}

/// Draws the battlers of one side and lets the plugin redraw their displays
fn render_side(
    canvas: &mut Canvas<Window>,
    texture_creator: &TextureCreator<WindowContext>,
    plugin: &mut Plugin<IndexedImage>,
    battlers: &[HostBattler],
    is_monster: bool,
    palette: &Palette,
) -> Result<(), String> {
    let body_color = if is_monster {
        Color::RGB(150, 0, 150)
    } else {
        Color::RGB(0, 120, 200)
    };

    for (slot, battler) in battlers.iter().enumerate() {
        if !battler.is_active() {
            continue;
        }

        let alive = battler.state.borrow().hp > 0;
        canvas.set_draw_color(if alive { body_color } else { Color::RGB(60, 60, 60) });
        canvas.fill_rect(Rect::new(battler.x, battler.y, BATTLER_SIZE, BATTLER_SIZE))?;

        plugin.on_battler_drawn(&battler.handle(), is_monster, slot);

        let display = plugin.session().and_then(|session| {
            if is_monster {
                session.monster_display(slot)
            } else {
                session.hero_display(slot)
            }
        });
        if let Some(display) = display.filter(|d| d.is_bound()) {
            present_display(canvas, texture_creator, display, palette, battler.x, battler.y)?;
        }
    }

    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::builtin(),
    };

    // A missing sheet is not fatal: the gauges just come out blank
    let sheet = match load_system_sheet(&args.sheet) {
        Ok(sheet) => Some(sheet),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    };
    let palette = sheet
        .as_ref()
        .map(|sheet| sheet.palette.clone())
        .unwrap_or_default();

    let mut host = DemoHost {
        sheet,
        heroes: scenario.heroes.into_iter().map(HostBattler::from).collect(),
        monsters: scenario.monsters.into_iter().map(HostBattler::from).collect(),
    };

    let mut plugin = Plugin::<IndexedImage>::new();
    if !plugin.on_startup(&args.plugin_name, &args.settings) {
        return Err(format!("{} failed to start", args.plugin_name));
    }
    log::debug!(
        "Settings: {}",
        serde_json::to_string(plugin.config()).map_err(|e| e.to_string())?
    );

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window("DynGauge - B: battle, Space: attack, H: hurt party, M: spend mana", GAME_WIDTH, GAME_HEIGHT)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    canvas.set_logical_size(GAME_WIDTH, GAME_HEIGHT).map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let mut event_pump = sdl_context.event_pump()?;

    let mut scene = Scene::Field;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(Keycode::B),
                    repeat: false,
                    ..
                } => {
                    scene = if scene == Scene::Battle {
                        Scene::Field
                    } else {
                        Scene::Battle
                    };
                }
                Event::KeyDown {
                    keycode: Some(Keycode::Space),
                    ..
                } if scene == Scene::Battle => host.hit_first_monster(23),
                Event::KeyDown {
                    keycode: Some(Keycode::H),
                    ..
                } if scene == Scene::Battle => host.hurt_party(17),
                Event::KeyDown {
                    keycode: Some(Keycode::M),
                    ..
                } if scene == Scene::Battle => host.spend_party_mana(5),
                _ => {}
            }
        }

        if scene == Scene::Battle {
            host.advance_atb();
        }

        // Scene notification always comes before any draw notification
        plugin.on_frame(scene, &host);

        if scene == Scene::Battle {
            canvas.set_draw_color(Color::RGB(20, 20, 40));
            canvas.clear();
            render_side(&mut canvas, &texture_creator, &mut plugin, &host.monsters, true, &palette)?;
            render_side(&mut canvas, &texture_creator, &mut plugin, &host.heroes, false, &palette)?;
        } else {
            canvas.set_draw_color(Color::RGB(40, 110, 40));
            canvas.clear();
        }

        canvas.present();

        // Cap framerate to ~60 FPS
        std::thread::sleep(std::time::Duration::new(0, 1_000_000_000u32 / 60));
    }

    plugin.on_exit();
    Ok(())
}
