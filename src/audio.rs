//! Tone cues
//!
//! Each cue maps to one oscillator tone. On the web it plays through Web Audio;
//! native builds only log the cue.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile fired
    Fire,
    /// Discovery awarded (planet scan or kill)
    Discovery,
    /// Sector jump
    Jump,
    /// Hull damage
    Hit,
    /// Shield raised
    ShieldUp,
    /// Hull reached zero
    GameOver,
}

/// Oscillator shape, mirrored from Web Audio so it can be described natively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single tone: start pitch, end pitch, length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub seconds: f64,
    /// Relative loudness (0-1)
    pub level: f32,
}

impl SoundEffect {
    pub fn tone(self) -> Tone {
        let (waveform, start_hz, end_hz, seconds, level) = match self {
            SoundEffect::Fire => (Waveform::Square, 880.0, 440.0, 0.06, 0.2),
            SoundEffect::Discovery => (Waveform::Triangle, 660.0, 990.0, 0.2, 0.4),
            SoundEffect::Jump => (Waveform::Sawtooth, 120.0, 1600.0, 0.8, 0.3),
            SoundEffect::Hit => (Waveform::Square, 180.0, 60.0, 0.2, 0.5),
            SoundEffect::ShieldUp => (Waveform::Sine, 500.0, 700.0, 0.3, 0.3),
            SoundEffect::GameOver => (Waveform::Triangle, 440.0, 55.0, 1.2, 0.5),
        };
        Tone {
            waveform,
            start_hz,
            end_hz,
            seconds,
            level,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Trigger the tone for a cue
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let tone = effect.tone();

        #[cfg(target_arch = "wasm32")]
        {
            let Some(ctx) = &self.ctx else { return };
            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            play_tone(ctx, &tone, vol);
        }

        #[cfg(not(target_arch = "wasm32"))]
        log::debug!(
            "tone {:?}: {:?} {}->{} Hz for {}s at {:.2}",
            effect,
            tone.waveform,
            tone.start_hz,
            tone.end_hz,
            tone.seconds,
            tone.level * vol
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn create_osc(ctx: &AudioContext, tone: &Tone) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(match tone.waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Triangle => OscillatorType::Triangle,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
    });
    osc.frequency().set_value(tone.start_hz);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

#[cfg(target_arch = "wasm32")]
fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, tone) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * tone.level, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + tone.seconds)
        .ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(tone.end_hz, t + tone.seconds)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + tone.seconds + 0.05).ok();
}
