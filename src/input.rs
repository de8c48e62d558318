//! Resolved player input
//!
//! Physical keys and gamepad buttons are mapped elsewhere; the core only sees
//! one `ActionSet` per tick.

use glam::Vec2;

/// One tick's worth of resolved input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSet {
    /// Desired movement direction; longer than 1 is clamped
    pub move_vector: Vec2,
    pub fire: bool,
    pub scan: bool,
    pub shield: bool,
    pub toggle_photo_mode: bool,
    pub pause: bool,
}

impl ActionSet {
    /// Movement direction clamped to unit length (NaN treated as idle)
    pub fn movement(&self) -> Vec2 {
        if !self.move_vector.is_finite() {
            return Vec2::ZERO;
        }
        self.move_vector.clamp_length_max(1.0)
    }
}

/// Every input source that can drive the ship this tick
#[derive(Debug, Clone, Default)]
pub struct InputSources {
    pub keyboard: ActionSet,
    /// `None` when no gamepad is connected
    pub gamepad: Option<ActionSet>,
}

impl InputSources {
    pub fn keyboard(actions: ActionSet) -> Self {
        Self {
            keyboard: actions,
            gamepad: None,
        }
    }

    /// Gamepad wins when connected; otherwise fall back to the keyboard
    pub fn resolve(&self) -> &ActionSet {
        self.gamepad.as_ref().unwrap_or(&self.keyboard)
    }
}

/// Tracks gamepad connection so a mid-session disconnect is logged once
#[derive(Debug, Default)]
pub struct SourceTracker {
    gamepad_connected: bool,
}

impl SourceTracker {
    pub fn observe(&mut self, sources: &InputSources) {
        let connected = sources.gamepad.is_some();
        if connected != self.gamepad_connected {
            if connected {
                log::info!("Gamepad connected; it now takes precedence");
            } else {
                log::warn!("Gamepad disconnected; falling back to keyboard");
            }
            self.gamepad_connected = connected;
        }
    }
}
