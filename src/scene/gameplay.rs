//! Playing scene: owns one session's `GameState`

use std::time::Duration;

use super::{Scene, SceneCommand, SceneKey};
use crate::hud::{EventSink, HudEvent};
use crate::input::ActionSet;
use crate::renderer::{PostParams, StageRegistry};
use crate::settings::Settings;
use crate::sim::{Bounds, GameState, TickOutcome, tick};

#[derive(Debug)]
pub struct GameplayScene {
    state: GameState,
}

impl GameplayScene {
    pub fn new(seed: u64, settings: &Settings, bounds: Bounds) -> Self {
        Self {
            state: GameState::new(seed, settings, bounds),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

impl Scene for GameplayScene {
    fn on_enter(&mut self, sink: &mut dyn EventSink) {
        let state = &self.state;
        log::info!(
            "Session started in sector {} (seed {}, {} planets)",
            state.sector.name(),
            state.seed,
            state.sector.planets.len()
        );
        sink.hud(HudEvent::Hull(state.player.hull));
        sink.hud(HudEvent::Discoveries(state.player.discoveries));
        sink.hud(HudEvent::Sector(state.sector.name()));
        sink.hud(HudEvent::PhotoModeOn(state.photo_mode));
    }

    fn on_tick(
        &mut self,
        delta: Duration,
        input: &ActionSet,
        settings: &Settings,
        sink: &mut dyn EventSink,
    ) -> SceneCommand {
        match tick(&mut self.state, input, delta, settings, sink) {
            TickOutcome::Continue => SceneCommand::None,
            TickOutcome::GameOver | TickOutcome::Ended => {
                SceneCommand::SwitchTo(SceneKey::GameOver)
            }
        }
    }

    fn on_exit(&mut self) {
        let state = &mut self.state;
        log::debug!(
            "Disposing session: {} projectiles, {} enemies, {} particles",
            state.projectiles.len(),
            state.enemies.len(),
            state.particles.len()
        );
        state.projectiles.clear();
        state.enemies.clear();
        state.particles.clear();
    }

    fn render(&self, settings: &Settings, registry: &mut dyn StageRegistry) {
        PostParams::resolve(settings, self.state.photo_mode).apply_to(registry);
    }
}
