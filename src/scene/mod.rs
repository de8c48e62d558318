//! Top-level scenes and the session controller
//!
//! Each scene is a plain value implementing `Scene`. The controller holds the
//! active one and calls its hooks; scenes ask for transitions by returning a
//! `SceneCommand` from `on_tick`.

pub mod controller;
pub mod game_over;
pub mod gameplay;
pub mod title;

use std::time::Duration;

use thiserror::Error;

use crate::hud::EventSink;
use crate::input::ActionSet;
use crate::renderer::StageRegistry;
use crate::settings::{ConfigError, Settings};

pub use controller::SceneController;
pub use game_over::GameOverScene;
pub use gameplay::GameplayScene;
pub use title::TitleScene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Title,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneKey),
}

/// Conditions that prevent a Playing session from starting
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no renderable surface (viewport {width}x{height})")]
    NoSurface { width: f32, height: f32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("a session is already active; return to the title first")]
    AlreadyActive,
}

/// Lifecycle hooks the controller drives
pub trait Scene {
    /// Called once when the scene becomes active
    fn on_enter(&mut self, sink: &mut dyn EventSink);

    /// Advance by `delta` with this tick's resolved input
    fn on_tick(
        &mut self,
        delta: Duration,
        input: &ActionSet,
        settings: &Settings,
        sink: &mut dyn EventSink,
    ) -> SceneCommand;

    /// Called once when the scene is replaced
    fn on_exit(&mut self);

    /// Push this frame's post-process parameters
    fn render(&self, settings: &Settings, registry: &mut dyn StageRegistry);
}
