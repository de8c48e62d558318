//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through explicit `Duration` deltas
//! - Seeded RNG only, with explicit generator state
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod encounter;
pub mod pool;
pub mod rng;
pub mod sector;
pub mod state;
pub mod tick;

pub use encounter::EncounterDirector;
pub use pool::BoundedPool;
pub use rng::{EncounterWeights, next_jump_seed, weighted_choice};
pub use sector::{Galaxy, Nebula, Planet, Sector, Star, generate};
pub use state::{Bounds, Enemy, EnemyKind, GamePhase, GameState, Owner, Player, Projectile};
pub use tick::{TickOutcome, tick};
