//! Game state and core simulation types
//!
//! Everything a Playing session owns lives in `GameState`.

use std::time::Duration;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::encounter::EncounterDirector;
use super::pool::BoundedPool;
use super::rng;
use super::sector::{self, Sector};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Hull reached zero; the session is over
    GameOver,
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Scout,
    Tank,
    Pulsar,
}

impl EnemyKind {
    /// Starting hit points for this type
    pub fn starting_hp(self) -> u32 {
        match self {
            EnemyKind::Tank => TANK_HP,
            EnemyKind::Scout | EnemyKind::Pulsar => DEFAULT_HP,
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub hull: u32,
    pub shielded: bool,
    /// Remaining shield window (zero when not shielded)
    pub shield_remaining: Duration,
    pub discoveries: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            hull: PLAYER_START_HULL,
            shielded: false,
            shield_remaining: Duration::ZERO,
            discoveries: 0,
        }
    }

    /// Raise the shield for its fixed window. Returns false if already up.
    pub fn raise_shield(&mut self) -> bool {
        if self.shielded {
            return false;
        }
        self.shielded = true;
        self.shield_remaining = Duration::from_millis(SHIELD_MS);
        true
    }

    /// Count down the shield window, dropping the shield once it runs out
    pub fn decay_shield(&mut self, delta: Duration) {
        if !self.shielded {
            return;
        }
        self.shield_remaining = self.shield_remaining.saturating_sub(delta);
        if self.shield_remaining.is_zero() {
            self.shielded = false;
        }
    }

    /// Take one point of hull damage. Returns the remaining hull.
    pub fn take_hit(&mut self) -> u32 {
        self.hull = self.hull.saturating_sub(1);
        self.hull
    }
}

/// A shot travelling up the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: Owner,
}

/// A hostile unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: EnemyKind,
    pub hp: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            kind,
            hp: kind.starting_hp(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Decorative drifting dust (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life 0-1; the particle is dropped at 0
    pub life: f32,
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Size of the visible area in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: VIEW_WIDTH,
            height: VIEW_HEIGHT,
        }
    }
}

impl Bounds {
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

/// Complete state of one Playing session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the active sector
    pub seed: u64,
    pub sector: Sector,
    /// Indices of planets in the active sector that already yielded a discovery
    pub scanned: Vec<usize>,
    pub phase: GamePhase,
    pub bounds: Bounds,
    pub player: Player,
    pub projectiles: BoundedPool<Projectile>,
    pub enemies: BoundedPool<Enemy>,
    pub director: EncounterDirector,
    pub photo_mode: bool,
    /// Remaining scan pulse animation (zero when idle)
    pub scan_pulse: Duration,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Fractional dust carried between ticks
    pub dust_carry: f32,
    /// Decoration RNG (never touches gameplay)
    pub dust_rng: Pcg32,
    /// Sector jumps made this session (0 in the starting sector)
    pub jumps: u32,
    pub elapsed: Duration,
}

impl GameState {
    /// Build a fresh session in the sector for `seed`
    pub fn new(seed: u64, settings: &Settings, bounds: Bounds) -> Self {
        let sector = sector::generate_in(seed, bounds);
        let player_pos = Vec2::new(bounds.center_x(), bounds.height - PLAYER_START_INSET);
        let director = EncounterDirector::new(
            Duration::from_millis(settings.encounter_period_ms),
            seed ^ 0x5eed_e7c0_u64,
            bounds.width,
        );

        Self {
            seed,
            sector,
            scanned: Vec::new(),
            phase: GamePhase::Playing,
            bounds,
            player: Player::new(player_pos),
            projectiles: BoundedPool::new(settings.projectile_capacity),
            enemies: BoundedPool::new(settings.enemy_capacity),
            director,
            photo_mode: false,
            scan_pulse: Duration::ZERO,
            particles: Vec::new(),
            dust_carry: 0.0,
            dust_rng: rng::seeded(seed.rotate_left(17)),
            jumps: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Discard the active sector and generate the next one
    pub fn jump(&mut self) {
        self.seed = rng::next_jump_seed(self.seed);
        self.sector = sector::generate_in(self.seed, self.bounds);
        self.scanned.clear();
        self.jumps += 1;
        log::info!(
            "Jumped to sector {} (seed {}, jump #{})",
            self.sector.name(),
            self.seed,
            self.jumps
        );
    }

    /// Scan pulse progress 0..1, or None when no pulse is running
    pub fn scan_pulse_progress(&self) -> Option<f32> {
        if self.scan_pulse.is_zero() {
            return None;
        }
        let total = Duration::from_millis(SCAN_PULSE_MS).as_secs_f32();
        Some(1.0 - self.scan_pulse.as_secs_f32() / total)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
