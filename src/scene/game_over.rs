//! Game over screen
//!
//! Holds the session summary. Fire is ignored until the hold has elapsed.

use std::time::Duration;

use super::{Scene, SceneCommand, SceneKey};
use crate::hud::EventSink;
use crate::input::ActionSet;
use crate::renderer::{PostParams, StageRegistry};
use crate::settings::Settings;

/// Input is ignored for this long after entering
pub const GAME_OVER_HOLD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq)]
pub struct GameOverScene {
    pub discoveries: u32,
    pub jumps: u32,
    pub survived: Duration,
    held: Duration,
}

impl GameOverScene {
    pub fn new(discoveries: u32, jumps: u32, survived: Duration) -> Self {
        Self {
            discoveries,
            jumps,
            survived,
            held: Duration::ZERO,
        }
    }

    /// Whether fire is accepted yet
    pub fn accepts_input(&self) -> bool {
        self.held >= GAME_OVER_HOLD
    }
}

impl Scene for GameOverScene {
    fn on_enter(&mut self, _sink: &mut dyn EventSink) {
        self.held = Duration::ZERO;
        log::info!(
            "Game over: {} discoveries, {} jumps, {:.1}s",
            self.discoveries,
            self.jumps,
            self.survived.as_secs_f32()
        );
    }

    fn on_tick(
        &mut self,
        delta: Duration,
        input: &ActionSet,
        _settings: &Settings,
        _sink: &mut dyn EventSink,
    ) -> SceneCommand {
        let ready = self.accepts_input();
        self.held = self.held.saturating_add(delta);
        if ready && input.fire {
            SceneCommand::SwitchTo(SceneKey::Title)
        } else {
            SceneCommand::None
        }
    }

    fn on_exit(&mut self) {}

    fn render(&self, settings: &Settings, registry: &mut dyn StageRegistry) {
        PostParams::resolve(settings, false).apply_to(registry);
    }
}
