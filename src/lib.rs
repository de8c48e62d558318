//! Sector Scout - a seeded space-exploration arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sector generation, encounters, physics, collisions)
//! - `scene`: Title/Playing/GameOver scenes and the session controller
//! - `renderer`: Post-process stages (bloom, vignette) and the stage registry boundary
//! - `input`: Resolved action sets and keyboard/gamepad precedence
//! - `hud`: One-way display events
//! - `audio`: Tone cues

pub mod audio;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use hud::{EventLog, EventSink, HudEvent};
pub use input::{ActionSet, InputSources};
pub use scene::{SceneController, SceneKey, SessionError};
pub use settings::{ConfigError, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Visible area (world units, y grows downward)
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const PLAYER_SPEED: f32 = 240.0;
    pub const PLAYER_START_HULL: u32 = 3;
    /// Distance from the bottom edge where the player spawns
    pub const PLAYER_START_INSET: f32 = 80.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    /// Upward speed (negative y)
    pub const PROJECTILE_SPEED: f32 = 480.0;
    /// Projectiles this far above the top edge are culled
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 14.0;
    pub const ENEMY_SPACING: f32 = 40.0;
    pub const ENEMY_SPAWN_Y: f32 = -30.0;
    pub const ENEMY_BASE_SPEED: f32 = 40.0;
    pub const ENEMY_SPEED_STEP: f32 = 10.0;
    pub const TANK_HP: u32 = 4;
    pub const DEFAULT_HP: u32 = 2;
    pub const ENCOUNTER_BATCH: usize = 3;

    /// Shield window in milliseconds
    pub const SHIELD_MS: u64 = 300;
    /// Scan reach around the player
    pub const SCAN_RANGE: f32 = 150.0;
    /// Scan pulse animation length in milliseconds
    pub const SCAN_PULSE_MS: u64 = 600;
    /// A sector jump happens every N discoveries
    pub const DISCOVERIES_PER_JUMP: u32 = 5;

    /// Decorative dust emitted per second at density 1.0
    pub const DUST_PER_SECOND: f32 = 40.0;

    /// Post-process defaults
    pub const BLOOM_INTENSITY: f32 = 0.6;
    pub const PHOTO_BLOOM_INTENSITY: f32 = 1.2;
    pub const VIGNETTE_STRENGTH: f32 = 0.5;
}

/// Distance between two points is within the sum of their radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Hermite interpolation between two edges (edges may be reversed)
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Browser entry point: route logs to the console and panics to the console
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("sector-scout wasm module loaded");
}
