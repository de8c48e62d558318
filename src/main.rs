//! Sector Scout entry point
//!
//! Native builds run a scripted headless session: the autopilot flies the
//! ship for a fixed number of 60 Hz frames while HUD events and cues go to the
//! log. The browser build starts from `wasm_start` in the library.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::Duration;

    use glam::Vec2;
    use sector_scout::audio::{AudioManager, SoundEffect};
    use sector_scout::hud::{EventSink, HudEvent, LogSink};
    use sector_scout::input::{ActionSet, InputSources};
    use sector_scout::renderer::{Frame, SoftwareCompositor, Viewport, draw_sector};
    use sector_scout::sim::Bounds;
    use sector_scout::{SceneController, SceneKey, SessionError, Settings};

    const FRAME: Duration = Duration::from_micros(16_667);
    const DEFAULT_FRAMES: u32 = 60 * 60;
    /// Composite a preview frame this often
    const PREVIEW_EVERY: u32 = 300;

    /// Logs HUD events and plays cues
    struct DemoSink {
        hud: LogSink,
        audio: AudioManager,
        cues: u32,
    }

    impl EventSink for DemoSink {
        fn hud(&mut self, event: HudEvent) {
            self.hud.hud(event);
        }

        fn cue(&mut self, effect: SoundEffect) {
            self.cues += 1;
            self.audio.play(effect);
        }
    }

    /// Scripted input for frame `n`
    fn autopilot(n: u32) -> InputSources {
        let t = n as f32 * FRAME.as_secs_f32();
        InputSources::keyboard(ActionSet {
            move_vector: Vec2::new((t * 0.7).sin(), (t * 0.3).cos() * 0.4),
            fire: n % 12 == 0,
            scan: n % 30 == 15,
            shield: n % 90 == 45,
            toggle_photo_mode: n == 900 || n == 1200,
            pause: false,
        })
    }

    pub fn run() -> Result<(), SessionError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load_from(&path)?,
            None => Settings::load(),
        };
        let frames = args
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);

        let bounds = Bounds::default();
        let mut controller = SceneController::new(bounds);
        let mut sink = DemoSink {
            hud: LogSink,
            audio: AudioManager::new(),
            cues: 0,
        };
        controller.start_session(settings, &mut sink)?;

        let mut compositor = SoftwareCompositor::new();
        let mut frame = Frame::new(200, 150);
        let viewport = Viewport {
            world_width: bounds.width,
            world_height: bounds.height,
        };

        for n in 0..frames {
            controller.tick(FRAME, &autopilot(n), &mut sink);
            if controller.active() != SceneKey::Playing {
                break;
            }
            if n % PREVIEW_EVERY == 0 {
                if let Some(state) = controller.gameplay() {
                    let scroll = state.elapsed.as_secs_f32() * 30.0;
                    draw_sector(&mut frame, &state.sector, viewport, scroll);
                    controller.render(&mut compositor);
                    compositor.composite(&mut frame);
                    let lum = frame.pixels().iter().map(|p| p.r + p.g + p.b).sum::<f32>()
                        / (frame.pixels().len() as f32 * 3.0);
                    log::info!("frame {n}: mean luminance {lum:.4}");
                }
            }
        }

        match controller.gameplay() {
            Some(state) => log::info!(
                "Autopilot finished: hull {}, {} discoveries, {} jumps, sector {}",
                state.player.hull,
                state.player.discoveries,
                state.jumps,
                state.sector.name()
            ),
            None => log::info!("Autopilot ended on {:?}", controller.active()),
        }
        log::info!("{} cues played", sink.cues);
        controller.end_session(&mut sink);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sector Scout (native) starting...");

    if let Err(e) = demo::run() {
        log::error!("Startup failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start in the library
}
