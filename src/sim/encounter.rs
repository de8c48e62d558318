//! Timer-driven encounter spawning
//!
//! Elapsed time accumulates each tick. Crossing the period spawns one batch and
//! resets the accumulator to zero; overshoot past the period is discarded, so
//! coarse ticks drift later than wall-clock multiples of the period.

use std::time::Duration;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::pool::BoundedPool;
use super::rng::{self, EncounterWeights, weighted_choice};
use super::state::{Enemy, EnemyKind};
use crate::consts::*;

/// Spawns enemy batches above the visible area on a fixed period
#[derive(Debug, Clone)]
pub struct EncounterDirector {
    elapsed: Duration,
    period: Duration,
    default_weights: EncounterWeights,
    rng: Pcg32,
    view_width: f32,
}

impl EncounterDirector {
    pub fn new(period: Duration, seed: u64, view_width: f32) -> Self {
        Self {
            elapsed: Duration::ZERO,
            period,
            default_weights: EncounterWeights::default(),
            rng: rng::seeded(seed),
            view_width,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Change the period without touching accumulated time
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Advance the timer; spawns at most one batch per call
    ///
    /// `weights` overrides the default 70/20/10 table. Returns the spawned kind.
    /// Enemies that don't fit in `enemies` are dropped.
    pub fn tick(
        &mut self,
        delta: Duration,
        weights: Option<&EncounterWeights>,
        enemies: &mut BoundedPool<Enemy>,
    ) -> Option<EnemyKind> {
        self.elapsed = self.elapsed.saturating_add(delta);
        if self.elapsed <= self.period {
            return None;
        }
        self.elapsed = Duration::ZERO;

        let weights = weights.unwrap_or(&self.default_weights);
        let (kind, next) = weighted_choice(self.rng.clone(), weights);
        self.rng = next;

        let mut placed = 0;
        for enemy in batch(kind, self.view_width) {
            if enemies.try_push(enemy) {
                placed += 1;
            }
        }
        if placed < ENCOUNTER_BATCH {
            log::debug!(
                "Enemy pool full: placed {placed} of {ENCOUNTER_BATCH} {:?}",
                kind
            );
        }
        log::info!("Encounter: {ENCOUNTER_BATCH} x {:?}", kind);
        Some(kind)
    }
}

/// A horizontal line of enemies centered above the visible area
fn batch(kind: EnemyKind, view_width: f32) -> impl Iterator<Item = Enemy> {
    let center = view_width / 2.0;
    (0..ENCOUNTER_BATCH).map(move |i| {
        let offset = (i as f32 - 1.0) * ENEMY_SPACING;
        let speed = ENEMY_BASE_SPEED + i as f32 * ENEMY_SPEED_STEP;
        Enemy::new(
            kind,
            Vec2::new(center + offset, ENEMY_SPAWN_Y),
            Vec2::new(0.0, speed),
        )
    })
}
