//! Seeded sector generation
//!
//! `generate` is a pure function of its seed. Draw order is fixed: stars
//! layer by layer, then planets, galaxies, nebulae, and finally the
//! encounter table. Reordering any draw changes every sector.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::{self, EncounterWeights};
use super::state::Bounds;

pub const STAR_LAYERS: usize = 3;
pub const STARS_PER_LAYER: usize = 200;

const GREEK: [&str; 24] = [
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu", "Nu", "Xi", "Omicron", "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi", "Chi",
    "Psi", "Omega",
];

const PLANET_TINTS: [u32; 6] = [
    0xd9_8c_5f, 0x6f_a8_dc, 0x9b_d1_7a, 0xe0_c0_68, 0xc2_7b_d8, 0xf2_f2_f2,
];
const NEBULA_COLORS: [u32; 4] = [0x5a_2a_8c, 0x1f_4e_8c, 0x8c_2a_4a, 0x2a_8c_7a];

/// A background star; deeper layers scroll faster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub pos: Vec2,
    pub scale: f32,
    /// 0xRRGGBB
    pub tint: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Galaxy {
    pub pos: Vec2,
    pub scale: f32,
    /// Radians
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nebula {
    pub pos: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    pub alpha: f32,
}

/// A generated world region. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub id: u64,
    pub star_layers: [Vec<Star>; STAR_LAYERS],
    pub planets: Vec<Planet>,
    pub galaxies: Vec<Galaxy>,
    pub nebulae: Vec<Nebula>,
    pub encounter_weights: EncounterWeights,
}

impl Sector {
    /// Display name, e.g. "Tau-000"
    pub fn name(&self) -> String {
        format!("{}-{:03}", GREEK[(self.id % 24) as usize], self.id % 1000)
    }
}

/// Depth factor of a star layer
pub fn layer_depth(layer: usize) -> f32 {
    0.2 + layer as f32 * 0.3
}

/// Generate the sector for `seed` over the default view bounds
pub fn generate(seed: u64) -> Sector {
    generate_in(seed, Bounds::default())
}

/// Generate the sector for `seed`, scattering features over `bounds`
pub fn generate_in(seed: u64, bounds: Bounds) -> Sector {
    let mut rng = rng::seeded(seed);

    let star_layers = std::array::from_fn(|layer| {
        let depth = layer_depth(layer);
        (0..STARS_PER_LAYER)
            .map(|_| Star {
                pos: random_point(&mut rng, bounds),
                depth,
            })
            .collect()
    });

    let planet_count = rng.random_range(1..=2);
    let planets = (0..planet_count)
        .map(|_| Planet {
            pos: random_point(&mut rng, bounds),
            scale: rng.random_range(0.5..1.5),
            tint: PLANET_TINTS[rng.random_range(0..PLANET_TINTS.len())],
        })
        .collect();

    let galaxy_count = rng.random_range(0..=1);
    let galaxies = (0..galaxy_count)
        .map(|_| Galaxy {
            pos: random_point(&mut rng, bounds),
            scale: rng.random_range(0.3..0.8),
            rotation: rng.random_range(0.0..std::f32::consts::TAU),
        })
        .collect();

    let nebula_count = rng.random_range(1..=2);
    let nebulae = (0..nebula_count)
        .map(|_| Nebula {
            pos: random_point(&mut rng, bounds),
            color: NEBULA_COLORS[rng.random_range(0..NEBULA_COLORS.len())],
            alpha: rng.random_range(0.15..0.4),
        })
        .collect();

    let encounter_weights = encounter_table(&mut rng);

    Sector {
        id: seed,
        star_layers,
        planets,
        galaxies,
        nebulae,
        encounter_weights,
    }
}

fn random_point(rng: &mut Pcg32, bounds: Bounds) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * bounds.width,
        rng.random::<f32>() * bounds.height,
    )
}

/// About a third of sectors are hostile and lean toward heavier enemies
fn encounter_table(rng: &mut Pcg32) -> EncounterWeights {
    let hostile_roll: f32 = rng.random();
    let danger: f32 = rng.random_range(0.05..0.2);
    if hostile_roll >= 0.3 {
        return EncounterWeights::default();
    }
    let base = EncounterWeights::default();
    EncounterWeights {
        scout: base.scout - danger,
        tank: base.tank + danger * 0.6,
        pulsar: base.pulsar + danger * 0.4,
    }
}
