//! Seeded randomness helpers
//!
//! Every helper takes its generator state explicitly and hands it back, so a
//! caller can replay an exact draw sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::EnemyKind;

/// Multiplier of the Park-Miller step used for sector jumps
pub const JUMP_MULTIPLIER: u64 = 16_807;
/// Modulus of the Park-Miller step (2^31 - 1)
pub const JUMP_MODULUS: u64 = 2_147_483_647;

/// Fresh generator for a seed
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Seed of the sector reached by jumping from `seed`
pub fn next_jump_seed(seed: u64) -> u64 {
    ((seed as u128 * JUMP_MULTIPLIER as u128) % JUMP_MODULUS as u128) as u64
}

/// Fold an arbitrary value into `1..JUMP_MODULUS`, where jumps never stall.
/// Seeds already in range are kept as-is.
pub fn normalize_seed(raw: u64) -> u64 {
    if (1..JUMP_MODULUS).contains(&raw) {
        raw
    } else {
        raw % (JUMP_MODULUS - 1) + 1
    }
}

/// Relative likelihood of each enemy type in an encounter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncounterWeights {
    pub scout: f32,
    pub tank: f32,
    pub pulsar: f32,
}

impl Default for EncounterWeights {
    fn default() -> Self {
        Self {
            scout: 0.7,
            tank: 0.2,
            pulsar: 0.1,
        }
    }
}

impl EncounterWeights {
    pub fn total(&self) -> f32 {
        self.scout.max(0.0) + self.tank.max(0.0) + self.pulsar.max(0.0)
    }
}

/// Pick an enemy type proportionally to `weights`
///
/// Consumes one draw from `rng` and returns the advanced generator. Negative
/// weights count as zero; an all-zero table always yields a scout.
pub fn weighted_choice(mut rng: Pcg32, weights: &EncounterWeights) -> (EnemyKind, Pcg32) {
    let roll: f32 = rng.random();
    let total = weights.total();
    if total <= 0.0 {
        return (EnemyKind::Scout, rng);
    }

    let mut threshold = roll * total;
    let table = [
        (EnemyKind::Scout, weights.scout.max(0.0)),
        (EnemyKind::Tank, weights.tank.max(0.0)),
        (EnemyKind::Pulsar, weights.pulsar.max(0.0)),
    ];
    for (kind, weight) in table {
        if weight > 0.0 && threshold < weight {
            return (kind, rng);
        }
        threshold -= weight;
    }

    // Float rounding can leave a sliver past the last bucket
    let last = table
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(k, _)| *k)
        .unwrap_or(EnemyKind::Scout);
    (last, rng)
}
