//! Post-process stages: bloom, then vignette
//!
//! The core never owns the GPU pipeline. It asks a stage registry for the
//! named chain and pushes one scalar per stage each frame. The software
//! compositor below is a reference registry that runs the same math on a
//! CPU `Frame`.

use super::frame::{Frame, Rgb};
use crate::settings::Settings;
use crate::smoothstep;

/// Vignette darkening starts at this normalized distance from center...
pub const VIGNETTE_OUTER: f32 = 0.8;
/// ...and is complete at this one (smoothstep with reversed edges)
pub const VIGNETTE_INNER: f32 = 0.2;

/// Stages the core can request, in compositing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Bloom,
    Vignette,
}

impl StageKind {
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Bloom => "Bloom",
            StageKind::Vignette => "Vignette",
        }
    }
}

/// The chain requested from the registry, bloom first
pub const CHAIN: [StageKind; 2] = [StageKind::Bloom, StageKind::Vignette];

/// External owner of post-process stages
pub trait StageRegistry {
    /// Install (or keep) the named chain in order
    fn request_chain(&mut self, chain: &[StageKind]);

    /// Enable or disable one stage; a disabled stage is skipped entirely
    fn set_enabled(&mut self, stage: StageKind, enabled: bool);

    /// Set the stage's scalar (`intensity` for bloom, `strength` for vignette)
    fn set_parameter(&mut self, stage: StageKind, value: f32);
}

/// A compositing step over a finished frame
pub trait PostStage {
    fn kind(&self) -> StageKind;
    fn apply(&self, frame: &mut Frame);
}

/// Adds a 3x3 box-blurred copy of the frame, scaled by `intensity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bloom {
    pub intensity: f32,
}

impl PostStage for Bloom {
    fn kind(&self) -> StageKind {
        StageKind::Bloom
    }

    fn apply(&self, frame: &mut Frame) {
        let (w, h) = (frame.width(), frame.height());
        if w == 0 || h == 0 {
            return;
        }
        let source = frame.clone();
        for y in 0..h {
            for x in 0..w {
                let mut sum = Rgb::BLACK;
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        // Edges reuse the nearest pixel
                        let sx = (x as i64 + dx).clamp(0, w as i64 - 1) as usize;
                        let sy = (y as i64 + dy).clamp(0, h as i64 - 1) as usize;
                        sum = sum.add(source.get(sx, sy));
                    }
                }
                let glow = sum.scale(self.intensity / 9.0);
                frame.set(x, y, source.get(x, y).add(glow));
            }
        }
    }
}

/// Darkens toward the corners, blended in by `strength`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vignette {
    pub strength: f32,
}

impl Vignette {
    /// Brightness multiplier at a normalized distance from center
    pub fn falloff(distance: f32) -> f32 {
        smoothstep(VIGNETTE_OUTER, VIGNETTE_INNER, distance)
    }
}

impl PostStage for Vignette {
    fn kind(&self) -> StageKind {
        StageKind::Vignette
    }

    fn apply(&self, frame: &mut Frame) {
        let (w, h) = (frame.width(), frame.height());
        for y in 0..h {
            for x in 0..w {
                // Pixel centers in 0..1 uv space
                let u = (x as f32 + 0.5) / w as f32 - 0.5;
                let v = (y as f32 + 0.5) / h as f32 - 0.5;
                let distance = (u * u + v * v).sqrt();
                let color = frame.get(x, y);
                let darkened = color.scale(Self::falloff(distance));
                frame.set(x, y, color.lerp(darkened, self.strength));
            }
        }
    }
}

/// Per-frame stage settings pushed across the render boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostParams {
    /// Bloom intensity, `None` when disabled
    pub bloom: Option<f32>,
    /// Vignette strength, `None` when disabled
    pub vignette: Option<f32>,
}

impl PostParams {
    pub fn resolve(settings: &Settings, photo_mode: bool) -> Self {
        Self {
            bloom: settings
                .bloom_enabled
                .then(|| settings.effective_bloom_intensity(photo_mode)),
            vignette: settings
                .vignette_enabled
                .then_some(settings.vignette_strength),
        }
    }

    /// Push these settings into a registry
    pub fn apply_to(&self, registry: &mut dyn StageRegistry) {
        registry.request_chain(&CHAIN);
        for (stage, value) in [
            (StageKind::Bloom, self.bloom),
            (StageKind::Vignette, self.vignette),
        ] {
            registry.set_enabled(stage, value.is_some());
            if let Some(value) = value {
                registry.set_parameter(stage, value);
            }
        }
    }
}

/// Reference registry compositing on the CPU
#[derive(Debug, Clone)]
pub struct SoftwareCompositor {
    chain: Vec<StageKind>,
    bloom: Bloom,
    vignette: Vignette,
    bloom_enabled: bool,
    vignette_enabled: bool,
}

impl Default for SoftwareCompositor {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            chain: Vec::new(),
            bloom: Bloom {
                intensity: settings.bloom_intensity,
            },
            vignette: Vignette {
                strength: settings.vignette_strength,
            },
            bloom_enabled: false,
            vignette_enabled: false,
        }
    }
}

impl SoftwareCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(&self) -> &[StageKind] {
        &self.chain
    }

    pub fn is_enabled(&self, stage: StageKind) -> bool {
        match stage {
            StageKind::Bloom => self.bloom_enabled,
            StageKind::Vignette => self.vignette_enabled,
        }
    }

    pub fn parameter(&self, stage: StageKind) -> f32 {
        match stage {
            StageKind::Bloom => self.bloom.intensity,
            StageKind::Vignette => self.vignette.strength,
        }
    }

    /// Run every enabled stage of the requested chain over `frame`
    pub fn composite(&self, frame: &mut Frame) {
        let stages: [&dyn PostStage; 2] = [&self.bloom, &self.vignette];
        for kind in &self.chain {
            if !self.is_enabled(*kind) {
                continue;
            }
            if let Some(stage) = stages.iter().find(|s| s.kind() == *kind) {
                stage.apply(frame);
            }
        }
    }
}

impl StageRegistry for SoftwareCompositor {
    fn request_chain(&mut self, chain: &[StageKind]) {
        if self.chain != chain {
            log::debug!(
                "Post chain: {:?}",
                chain.iter().map(|s| s.name()).collect::<Vec<_>>()
            );
            self.chain = chain.to_vec();
        }
    }

    fn set_enabled(&mut self, stage: StageKind, enabled: bool) {
        match stage {
            StageKind::Bloom => self.bloom_enabled = enabled,
            StageKind::Vignette => self.vignette_enabled = enabled,
        }
    }

    fn set_parameter(&mut self, stage: StageKind, value: f32) {
        match stage {
            StageKind::Bloom => self.bloom.intensity = value,
            StageKind::Vignette => self.vignette.strength = value,
        }
    }
}
