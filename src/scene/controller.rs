//! Session controller
//!
//! Owns the active scene and the current `Settings`. `start_session`,
//! `pause_session` and `end_session` are the only lifecycle entry points;
//! everything else happens through `tick`.

use std::time::Duration;

use super::game_over::GameOverScene;
use super::gameplay::GameplayScene;
use super::title::TitleScene;
use super::{Scene, SceneCommand, SceneKey, SessionError};
use crate::hud::EventSink;
use crate::input::{InputSources, SourceTracker};
use crate::renderer::StageRegistry;
use crate::settings::{ConfigError, Settings};
use crate::sim::rng::normalize_seed;
use crate::sim::{Bounds, GameState};

/// The active scene, kept typed so session state stays inspectable
#[derive(Debug)]
enum ActiveScene {
    Title(TitleScene),
    Playing(GameplayScene),
    GameOver(GameOverScene),
}

impl ActiveScene {
    fn key(&self) -> SceneKey {
        match self {
            ActiveScene::Title(_) => SceneKey::Title,
            ActiveScene::Playing(_) => SceneKey::Playing,
            ActiveScene::GameOver(_) => SceneKey::GameOver,
        }
    }

    fn scene(&self) -> &dyn Scene {
        match self {
            ActiveScene::Title(s) => s,
            ActiveScene::Playing(s) => s,
            ActiveScene::GameOver(s) => s,
        }
    }

    fn scene_mut(&mut self) -> &mut dyn Scene {
        match self {
            ActiveScene::Title(s) => s,
            ActiveScene::Playing(s) => s,
            ActiveScene::GameOver(s) => s,
        }
    }
}

pub struct SceneController {
    bounds: Bounds,
    settings: Settings,
    active: ActiveScene,
    paused: bool,
    sources: SourceTracker,
    sessions: u32,
}

impl SceneController {
    /// Start at the title screen for a viewport of `bounds`
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            settings: Settings::default(),
            active: ActiveScene::Title(TitleScene::new()),
            paused: false,
            sources: SourceTracker::default(),
            sessions: 0,
        }
    }

    pub fn active(&self) -> SceneKey {
        self.active.key()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Sessions started since construction
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    /// The running session, if Playing
    pub fn gameplay(&self) -> Option<&GameState> {
        match &self.active {
            ActiveScene::Playing(scene) => Some(scene.state()),
            _ => None,
        }
    }

    pub fn gameplay_mut(&mut self) -> Option<&mut GameState> {
        match &mut self.active {
            ActiveScene::Playing(scene) => Some(scene.state_mut()),
            _ => None,
        }
    }

    /// Replace the settings. Takes effect on the next tick; pool capacities
    /// apply from the next session.
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        if let Err(e) = settings.validate() {
            log::warn!("Rejected settings: {e}");
            return Err(e);
        }
        self.settings = settings;
        Ok(())
    }

    /// Enter Playing with a fresh sector and ship
    pub fn start_session(
        &mut self,
        settings: Settings,
        sink: &mut dyn EventSink,
    ) -> Result<(), SessionError> {
        if self.active.key() != SceneKey::Title {
            return Err(SessionError::AlreadyActive);
        }
        let Bounds { width, height } = self.bounds;
        if !(width > 0.0 && height > 0.0) {
            return Err(SessionError::NoSurface { width, height });
        }
        settings.validate()?;

        let seed = normalize_seed(settings.seed.unwrap_or_else(rand::random));
        self.settings = settings;
        self.paused = false;
        self.sessions += 1;
        let scene = GameplayScene::new(seed, &self.settings, self.bounds);
        self.replace(ActiveScene::Playing(scene), sink);
        Ok(())
    }

    /// Toggle pause. Only a Playing session can be paused; returns the new state.
    pub fn pause_session(&mut self) -> bool {
        if self.active.key() != SceneKey::Playing {
            log::debug!("Pause ignored outside of a session");
            return false;
        }
        self.paused = !self.paused;
        log::info!("Session {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Return to the title screen, disposing the session
    pub fn end_session(&mut self, sink: &mut dyn EventSink) {
        if self.active.key() == SceneKey::Title {
            return;
        }
        self.paused = false;
        self.replace(ActiveScene::Title(TitleScene::new()), sink);
    }

    /// Dispatch one frame to the active scene
    pub fn tick(&mut self, delta: Duration, sources: &InputSources, sink: &mut dyn EventSink) {
        self.sources.observe(sources);
        let input = sources.resolve();
        if input.pause {
            self.pause_session();
        }
        if self.paused {
            return;
        }

        let command = self
            .active
            .scene_mut()
            .on_tick(delta, input, &self.settings, sink);
        if let SceneCommand::SwitchTo(key) = command {
            self.switch_to(key, sink);
        }
    }

    /// Push the active scene's post-process parameters
    pub fn render(&self, registry: &mut dyn StageRegistry) {
        self.active.scene().render(&self.settings, registry);
    }

    fn switch_to(&mut self, key: SceneKey, sink: &mut dyn EventSink) {
        match key {
            SceneKey::Title => self.end_session(sink),
            SceneKey::Playing => {
                if let Err(e) = self.start_session(self.settings.clone(), sink) {
                    log::error!("Failed to start session: {e}");
                }
            }
            SceneKey::GameOver => {
                let summary = match &self.active {
                    ActiveScene::Playing(scene) => {
                        let state = scene.state();
                        GameOverScene::new(state.player.discoveries, state.jumps, state.elapsed)
                    }
                    _ => GameOverScene::new(0, 0, Duration::ZERO),
                };
                self.replace(ActiveScene::GameOver(summary), sink);
            }
        }
    }

    fn replace(&mut self, next: ActiveScene, sink: &mut dyn EventSink) {
        let from = self.active.key();
        self.active.scene_mut().on_exit();
        self.active = next;
        log::debug!("Scene {:?} -> {:?}", from, self.active.key());
        self.active.scene_mut().on_enter(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::{EventLog, HudEvent};
    use crate::input::ActionSet;
    use crate::renderer::{SoftwareCompositor, StageKind};
    use crate::sim::{Enemy, EnemyKind, GamePhase};
    use glam::Vec2;

    fn seeded_settings(seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn input(f: impl FnOnce(&mut ActionSet)) -> InputSources {
        let mut actions = ActionSet::default();
        f(&mut actions);
        InputSources::keyboard(actions)
    }

    fn idle() -> InputSources {
        InputSources::default()
    }

    #[test]
    fn test_end_to_end_session() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        controller
            .start_session(seeded_settings(1000), &mut log)
            .unwrap();
        assert_eq!(controller.active(), SceneKey::Playing);

        let state = controller.gameplay().unwrap();
        assert_eq!(state.seed, 1000);
        assert_eq!(state.sector.id, 1000);
        assert_eq!(state.sector.star_layers.len(), 3);
        assert!(state.sector.star_layers.iter().all(|l| l.len() == 200));
        assert!((1..=2).contains(&state.sector.planets.len()));
        assert_eq!(state.player.hull, 3);
        assert!(!state.player.shielded);
        assert_eq!(state.player.discoveries, 0);

        // Three shots fit, the fourth is dropped
        let fire = input(|a| a.fire = true);
        for _ in 0..3 {
            controller.tick(Duration::ZERO, &fire, &mut log);
        }
        assert_eq!(controller.gameplay().unwrap().projectiles.len(), 3);
        controller.tick(Duration::ZERO, &fire, &mut log);
        assert_eq!(controller.gameplay().unwrap().projectiles.len(), 3);

        // One batch after 15001 ms, timer back at zero
        controller.tick(Duration::from_millis(15_001), &idle(), &mut log);
        let state = controller.gameplay().unwrap();
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.director.elapsed(), Duration::ZERO);

        // Last hull point
        let state = controller.gameplay_mut().unwrap();
        state.player.hull = 1;
        state.enemies.clear();
        let pos = state.player.pos;
        state
            .enemies
            .try_push(Enemy::new(EnemyKind::Scout, pos, Vec2::ZERO));
        log.take();
        controller.tick(Duration::ZERO, &idle(), &mut log);
        assert_eq!(controller.active(), SceneKey::GameOver);
        assert!(controller.gameplay().is_none());
        assert_eq!(log.take(), vec![HudEvent::Hull(0)]);
    }

    #[test]
    fn test_game_over_back_to_title_then_new_session() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        controller.start_session(seeded_settings(7), &mut log).unwrap();

        let state = controller.gameplay_mut().unwrap();
        state.player.hull = 1;
        let pos = state.player.pos;
        state
            .enemies
            .try_push(Enemy::new(EnemyKind::Tank, pos, Vec2::ZERO));
        controller.tick(Duration::ZERO, &idle(), &mut log);
        assert_eq!(controller.active(), SceneKey::GameOver);

        // Not restartable from GameOver
        assert!(matches!(
            controller.start_session(seeded_settings(7), &mut log),
            Err(SessionError::AlreadyActive)
        ));

        // Fire is ignored during the hold
        let fire = input(|a| a.fire = true);
        controller.tick(Duration::from_millis(16), &fire, &mut log);
        assert_eq!(controller.active(), SceneKey::GameOver);
        controller.tick(Duration::from_millis(1_000), &idle(), &mut log);
        controller.tick(Duration::from_millis(16), &fire, &mut log);
        assert_eq!(controller.active(), SceneKey::Title);

        // Fire on the title starts a fresh session
        controller.tick(Duration::from_millis(16), &fire, &mut log);
        assert_eq!(controller.active(), SceneKey::Playing);
        assert_eq!(controller.sessions(), 2);
        let state = controller.gameplay().unwrap();
        assert_eq!(state.player.hull, 3);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_start_while_active_is_rejected() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        controller.start_session(seeded_settings(1), &mut log).unwrap();
        assert!(matches!(
            controller.start_session(seeded_settings(2), &mut log),
            Err(SessionError::AlreadyActive)
        ));
        assert_eq!(controller.gameplay().unwrap().seed, 1);
    }

    #[test]
    fn test_zero_viewport_is_fatal() {
        let mut controller = SceneController::new(Bounds {
            width: 0.0,
            height: 600.0,
        });
        let mut log = EventLog::new();
        assert!(matches!(
            controller.start_session(Settings::default(), &mut log),
            Err(SessionError::NoSurface { .. })
        ));
        assert_eq!(controller.active(), SceneKey::Title);
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_invalid_settings_are_fatal() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        let settings = Settings {
            encounter_period_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            controller.start_session(settings, &mut log),
            Err(SessionError::InvalidConfig(ConfigError::ZeroEncounterPeriod))
        ));
        assert_eq!(controller.active(), SceneKey::Title);
    }

    #[test]
    fn test_pause_stops_dispatch() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        assert!(!controller.pause_session());
        controller.start_session(seeded_settings(1000), &mut log).unwrap();

        assert!(controller.pause_session());
        let before = controller.gameplay().unwrap().player.pos;
        let right = input(|a| a.move_vector = Vec2::X);
        controller.tick(Duration::from_millis(100), &right, &mut log);
        controller.tick(Duration::from_millis(20_000), &idle(), &mut log);
        let state = controller.gameplay().unwrap();
        assert_eq!(state.player.pos, before);
        assert!(state.enemies.is_empty());
        assert_eq!(state.elapsed, Duration::ZERO);

        // The pause action toggles back and the same tick runs
        let resume = input(|a| {
            a.pause = true;
            a.move_vector = Vec2::X;
        });
        controller.tick(Duration::from_millis(100), &resume, &mut log);
        assert!(!controller.is_paused());
        assert!(controller.gameplay().unwrap().player.pos.x > before.x);
    }

    #[test]
    fn test_end_session_disposes_and_allows_restart() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        controller.start_session(seeded_settings(3), &mut log).unwrap();
        controller.tick(Duration::from_millis(15_001), &idle(), &mut log);
        assert!(!controller.gameplay().unwrap().enemies.is_empty());

        controller.end_session(&mut log);
        assert_eq!(controller.active(), SceneKey::Title);
        assert!(controller.gameplay().is_none());
        controller.start_session(seeded_settings(3), &mut log).unwrap();
        assert!(controller.gameplay().unwrap().enemies.is_empty());
    }

    #[test]
    fn test_set_settings_validates_and_applies() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        controller.start_session(seeded_settings(1000), &mut log).unwrap();

        let bad = Settings {
            particle_density: f32::NAN,
            ..Default::default()
        };
        assert!(controller.set_settings(bad).is_err());
        assert!(controller.settings().bloom_enabled);

        controller
            .set_settings(Settings {
                bloom_enabled: false,
                encounter_period_ms: 500,
                ..Default::default()
            })
            .unwrap();
        let mut compositor = SoftwareCompositor::new();
        controller.render(&mut compositor);
        assert!(!compositor.is_enabled(StageKind::Bloom));
        assert!(compositor.is_enabled(StageKind::Vignette));

        controller.tick(Duration::from_millis(501), &idle(), &mut log);
        assert_eq!(controller.gameplay().unwrap().enemies.len(), 3);
    }

    #[test]
    fn test_new_session_shows_hud_after_photo_mode_exit() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        controller.start_session(seeded_settings(1000), &mut log).unwrap();
        controller.tick(Duration::ZERO, &input(|a| a.toggle_photo_mode = true), &mut log);
        assert!(controller.gameplay().unwrap().photo_mode);

        controller.end_session(&mut log);
        log.take();
        controller.start_session(seeded_settings(1000), &mut log).unwrap();
        assert!(!controller.gameplay().unwrap().photo_mode);
        assert_eq!(log.take().last(), Some(&HudEvent::PhotoModeOn(false)));
    }

    #[test]
    fn test_gamepad_drives_when_connected() {
        let mut controller = SceneController::new(Bounds::default());
        let mut log = EventLog::new();
        controller.start_session(seeded_settings(1000), &mut log).unwrap();

        let sources = InputSources {
            keyboard: ActionSet::default(),
            gamepad: Some(ActionSet {
                fire: true,
                ..Default::default()
            }),
        };
        controller.tick(Duration::ZERO, &sources, &mut log);
        assert_eq!(controller.gameplay().unwrap().projectiles.len(), 1);

        // Disconnect: keyboard takes over
        controller.tick(Duration::ZERO, &idle(), &mut log);
        assert_eq!(controller.gameplay().unwrap().projectiles.len(), 1);
    }
}
