//! One-way display events
//!
//! The core pushes typed events into a sink; the display layer owns
//! everything after that and is never read back.

use serde::Serialize;

use crate::audio::SoundEffect;

/// Payloads for the HUD
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HudEvent {
    Discoveries(u32),
    Hull(u32),
    Sector(String),
    PhotoModeOn(bool),
}

/// Receiver for everything the core reports outward
pub trait EventSink {
    fn hud(&mut self, event: HudEvent);

    /// Tone cue; ignored unless the sink plays audio
    fn cue(&mut self, _effect: SoundEffect) {}
}

/// Collects events in order (tests, replays)
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<HudEvent>,
    pub cues: Vec<SoundEffect>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain collected HUD events
    pub fn take(&mut self) -> Vec<HudEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn hud(&mut self, event: HudEvent) {
        self.events.push(event);
    }

    fn cue(&mut self, effect: SoundEffect) {
        self.cues.push(effect);
    }
}

/// Writes each event to the log as JSON
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn hud(&mut self, event: HudEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => log::info!("hud {json}"),
            Err(e) => log::warn!("hud event not serializable: {e}"),
        }
    }

    fn cue(&mut self, effect: SoundEffect) {
        log::debug!("cue {:?}", effect);
    }
}

/// Drops events while photo mode hides the HUD; photo-mode events pass through
pub struct PhotoGate<'a> {
    inner: &'a mut dyn EventSink,
    hidden: bool,
}

impl<'a> PhotoGate<'a> {
    pub fn new(inner: &'a mut dyn EventSink, hidden: bool) -> Self {
        Self { inner, hidden }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

impl EventSink for PhotoGate<'_> {
    fn hud(&mut self, event: HudEvent) {
        if !self.hidden || matches!(event, HudEvent::PhotoModeOn(_)) {
            self.inner.hud(event);
        }
    }

    fn cue(&mut self, effect: SoundEffect) {
        self.inner.cue(effect);
    }
}
