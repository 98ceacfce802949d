//! Audio system using Web Audio API
//!
//! Procedurally generated sound: explosions are a pitched-down thump layered
//! with low-passed noise, music is a slow two-voice drone.

use web_sys::{
    AudioBuffer, AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
};

use crate::settings::Settings;

/// Length of the noise burst in seconds
const NOISE_SECONDS: f32 = 0.5;

/// Running drone voices and their shared gain
struct Music {
    voices: Vec<OscillatorNode>,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// White noise generated once and replayed per explosion
    noise: Option<AudioBuffer>,
    music: Option<Music>,
    sfx_volume: f32,
    music_volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let noise = ctx.as_ref().and_then(make_noise_buffer);
        Self {
            ctx,
            noise,
            music: None,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volume or mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if let (Some(music), Some(ctx)) = (&self.music, &self.ctx) {
            music
                .gain
                .gain()
                .set_value_at_time(self.music_volume * 0.08, ctx.current_time())
                .ok();
        }
    }

    /// Live context, resumed if the browser suspended it
    fn context(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Explosion - deep thump plus filtered noise rumble
    pub fn play_explosion(&self) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else { return };
        let t = ctx.current_time();

        if let Some((osc, gain)) = create_osc(ctx, 100.0, OscillatorType::Sine) {
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        if let Some(buffer) = &self.noise {
            self.play_noise(ctx, buffer, vol, t);
        }
    }

    fn play_noise(
        &self,
        ctx: &AudioContext,
        buffer: &AudioBuffer,
        vol: f32,
        t: f64,
    ) -> Option<()> {
        let source = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(buffer));

        let filter = ctx.create_biquad_filter().ok()?;
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value_at_time(1000.0, t).ok();
        filter
            .frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.4)
            .ok();

        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();

        source.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        source.start_with_when(t).ok()?;
        source.stop_with_when(t + NOISE_SECONDS as f64).ok()?;
        Some(())
    }

    /// Start the background drone (no-op if already playing)
    pub fn start_music(&mut self) {
        if self.music.is_some() {
            return;
        }
        let Some(ctx) = self.context() else { return };
        let Ok(gain) = ctx.create_gain() else { return };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(self.music_volume * 0.08, t + 1.5)
            .ok();
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        // Slightly detuned fifth for a slow beat
        let mut voices = Vec::new();
        for (freq, osc_type) in [
            (55.0, OscillatorType::Sawtooth),
            (82.7, OscillatorType::Triangle),
        ] {
            let Ok(osc) = ctx.create_oscillator() else { continue };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                voices.push(osc);
            }
        }

        log::debug!("Music started ({} voices)", voices.len());
        self.music = Some(Music { voices, gain });
    }

    /// Fade out and stop the drone
    pub fn stop_music(&mut self) {
        let Some(music) = self.music.take() else { return };
        let Some(ctx) = &self.ctx else { return };
        let t = ctx.current_time();

        let level = music.gain.gain();
        level.cancel_scheduled_values(t).ok();
        level.set_value_at_time(level.value(), t).ok();
        level.linear_ramp_to_value_at_time(0.0, t + 0.3).ok();
        for osc in &music.voices {
            osc.stop_with_when(t + 0.35).ok();
        }
        log::debug!("Music stopped");
    }
}

/// Create an oscillator routed through its own gain to the destination
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

fn make_noise_buffer(ctx: &AudioContext) -> Option<AudioBuffer> {
    let rate = ctx.sample_rate();
    let len = (rate * NOISE_SECONDS) as u32;
    let buffer = ctx.create_buffer(1, len, rate).ok()?;
    let samples: Vec<f32> = (0..len)
        .map(|_| (js_sys::Math::random() * 2.0 - 1.0) as f32)
        .collect();
    buffer.copy_to_channel(&samples, 0).ok()?;
    Some(buffer)
}
