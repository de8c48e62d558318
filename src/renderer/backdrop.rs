//! Sector backdrop rasterizer
//!
//! Plots a sector into a CPU frame so the post chain has something to work on
//! in the native driver and in tests. Deeper star layers are brighter and
//! scroll faster.

use glam::Vec2;

use super::frame::{Frame, Rgb};
use crate::sim::Sector;

/// Background color
pub const SPACE: Rgb = Rgb::new(0.01, 0.01, 0.03);

/// Planet radius in world units at scale 1.0
const PLANET_RADIUS: f32 = 24.0;
/// Nebula radius in world units
const NEBULA_RADIUS: f32 = 90.0;

/// Maps world coordinates onto frame pixels
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub world_width: f32,
    pub world_height: f32,
}

impl Viewport {
    fn to_pixel(&self, frame: &Frame, pos: Vec2) -> Option<(usize, usize)> {
        let x = pos.x / self.world_width * frame.width() as f32;
        let y = pos.y / self.world_height * frame.height() as f32;
        if x < 0.0 || y < 0.0 || x >= frame.width() as f32 || y >= frame.height() as f32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    fn pixels_per_unit(&self, frame: &Frame) -> f32 {
        frame.width() as f32 / self.world_width
    }
}

/// Draw nebulae, stars (scrolled by `scroll` world units), then planets
pub fn draw_sector(frame: &mut Frame, sector: &Sector, viewport: Viewport, scroll: f32) {
    for pixel in frame.pixels_mut() {
        *pixel = SPACE;
    }

    let ppu = viewport.pixels_per_unit(frame);
    for nebula in &sector.nebulae {
        let color = Rgb::from_hex(nebula.color).scale(nebula.alpha);
        disc(frame, viewport, nebula.pos, NEBULA_RADIUS * ppu, color, true);
    }

    for layer in &sector.star_layers {
        for star in layer {
            let y = (star.pos.y + scroll * star.depth).rem_euclid(viewport.world_height);
            let Some((x, y)) = viewport.to_pixel(frame, Vec2::new(star.pos.x, y)) else {
                continue;
            };
            let lit = frame.get(x, y).add(Rgb::splat(star.depth));
            frame.set(x, y, lit.clamped());
        }
    }

    for planet in &sector.planets {
        let color = Rgb::from_hex(planet.tint);
        disc(frame, viewport, planet.pos, PLANET_RADIUS * planet.scale * ppu, color, false);
    }
}

/// Filled disc; `soft` fades additively toward the rim
fn disc(
    frame: &mut Frame,
    viewport: Viewport,
    center: Vec2,
    radius_px: f32,
    color: Rgb,
    soft: bool,
) {
    let Some((cx, cy)) = viewport.to_pixel(frame, center) else {
        return;
    };
    let r = radius_px.ceil() as i64;
    let (w, h) = (frame.width() as i64, frame.height() as i64);
    for y in (cy as i64 - r).max(0)..(cy as i64 + r + 1).min(h) {
        for x in (cx as i64 - r).max(0)..(cx as i64 + r + 1).min(w) {
            let dx = (x - cx as i64) as f32;
            let dy = (y - cy as i64) as f32;
            let d = (dx * dx + dy * dy).sqrt();
            if d > radius_px {
                continue;
            }
            let (px, py) = (x as usize, y as usize);
            let out = if soft {
                let fade = 1.0 - d / radius_px.max(1.0);
                frame.get(px, py).add(color.scale(fade))
            } else {
                color
            };
            frame.set(px, py, out.clamped());
        }
    }
}
