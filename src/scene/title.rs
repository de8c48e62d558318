//! Title screen: waits for fire

use std::time::Duration;

use super::{Scene, SceneCommand, SceneKey};
use crate::hud::EventSink;
use crate::input::ActionSet;
use crate::renderer::{PostParams, StageRegistry};
use crate::settings::Settings;

#[derive(Debug, Default)]
pub struct TitleScene {
    /// Time spent on the title screen
    idle: Duration,
}

impl TitleScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn idle(&self) -> Duration {
        self.idle
    }
}

impl Scene for TitleScene {
    fn on_enter(&mut self, _sink: &mut dyn EventSink) {
        self.idle = Duration::ZERO;
        log::info!("Title screen");
    }

    fn on_tick(
        &mut self,
        delta: Duration,
        input: &ActionSet,
        _settings: &Settings,
        _sink: &mut dyn EventSink,
    ) -> SceneCommand {
        self.idle = self.idle.saturating_add(delta);
        if input.fire {
            SceneCommand::SwitchTo(SceneKey::Playing)
        } else {
            SceneCommand::None
        }
    }

    fn on_exit(&mut self) {}

    fn render(&self, settings: &Settings, registry: &mut dyn StageRegistry) {
        PostParams::resolve(settings, false).apply_to(registry);
    }
}
