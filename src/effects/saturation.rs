//! Tube-style saturation effect
//!
//! The full block pipeline: smoothed drive into the tube waveshaper, a
//! tone filter, envelope-modulated pink noise, smoothed output gain, and
//! a dry/wet blend. Per-channel state (filters, envelope, noise rows)
//! persists across blocks; clearing it anywhere but a prepare/reset
//! boundary would click.
//!
//! Threading follows the usual split: setters store parameter targets
//! from the control thread, the audio thread reads a snapshot once per
//! `process` call. All allocation happens in `prepare`.

use crate::effects::waveshaper::tube_waveshape;
use crate::effects::BlockEffect;
use crate::envelope::EnvelopeFollower;
use crate::filters::{FirstOrderHighpass, ToneMode, ToneShaper};
use crate::gen::PinkNoise;
use crate::params::SaturationParams;
use crate::utils::db::db_to_gain;
use crate::utils::smoother::{SmoothedParam, DEFAULT_RAMP_MS};
use std::cell::UnsafeCell;

/// Noise gain in dB at amount 0; the amount sweeps upward from here.
pub const NOISE_FLOOR_DB: f32 = -60.0;

/// Default cutoff for the optional noise highpass stage.
pub const DEFAULT_NOISE_HP_HZ: f32 = 80.0;

/// Configuration-time choices. Everything here is fixed for the lifetime
/// of the effect instance; runtime knobs live in [`SaturationParams`].
#[derive(Clone, Copy, Debug)]
pub struct SaturationConfig {
    /// Which tone policy the tone knob drives.
    pub tone: ToneMode,
    /// Noise highpass cutoff in Hz. `None` leaves the stage out entirely.
    pub noise_highpass_hz: Option<f32>,
    /// Portion of the noise that is a constant floor (thermal hiss); the
    /// remainder follows the signal envelope. Must be in 0..=1.
    pub noise_floor_ratio: f32,
    /// dB span the noise amount sweeps, upward from [`NOISE_FLOOR_DB`].
    pub noise_range_db: f32,
    /// Base RNG seed; the channel index is folded in so stereo noise is
    /// decorrelated.
    pub seed: u64,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            tone: ToneMode::default(),
            noise_highpass_hz: None,
            // Noise-floor-dominant character: mostly constant hiss with a
            // subtle breathing component.
            noise_floor_ratio: 0.7,
            noise_range_db: 40.0,
            seed: 17,
        }
    }
}

/// State owned by exactly one channel. Never shared across channels.
struct ChannelState {
    tone: ToneShaper,
    noise_hp: Option<FirstOrderHighpass>,
    envelope: EnvelopeFollower,
    pink: PinkNoise,
    /// Dry copy of this channel's input, rebuilt every block for the mix.
    dry: Vec<f32>,
}

struct ProcessState {
    max_block_samples: usize,
    channels: Vec<ChannelState>,
    pre_gain: SmoothedParam,
    post_gain: SmoothedParam,
    /// Scratch for the per-block gain ramp so every channel sees the
    /// identical curve.
    gain_curve: Vec<f32>,
    prepared: bool,
}

/// Tube saturation processor.
///
/// Lifecycle: [`prepare`](TubeSaturation::prepare) once per stream format,
/// [`process`](TubeSaturation::process) per audio block,
/// [`reset`](TubeSaturation::reset) on transport stop/start. `prepare` and
/// `reset` must not overlap a `process` call; the parameter setters may be
/// called from any thread at any time.
pub struct TubeSaturation {
    config: SaturationConfig,
    params: SaturationParams,
    // Processing state, touched only by the audio thread (and by
    // prepare/reset, which the caller keeps off the audio path).
    state: UnsafeCell<ProcessState>,
}

// SAFETY: the UnsafeCell is only ever accessed from the single audio
// thread (process) or while no processing is running (prepare/reset);
// everything else on the struct is atomic.
unsafe impl Send for TubeSaturation {}
unsafe impl Sync for TubeSaturation {}

impl TubeSaturation {
    pub fn new(config: SaturationConfig) -> Self {
        let params = SaturationParams::new(
            config.tone.initial_value(),
            config.noise_highpass_hz.unwrap_or(DEFAULT_NOISE_HP_HZ),
        );
        Self {
            config,
            params,
            state: UnsafeCell::new(ProcessState {
                max_block_samples: 0,
                channels: Vec::new(),
                pre_gain: SmoothedParam::new(1.0, 44100.0, DEFAULT_RAMP_MS),
                post_gain: SmoothedParam::new(1.0, 44100.0, DEFAULT_RAMP_MS),
                gain_curve: Vec::new(),
                prepared: false,
            }),
        }
    }

    pub fn config(&self) -> &SaturationConfig {
        &self.config
    }

    // Parameter setters: store a target, audible within one ramp duration.
    // Callers keep values inside the documented knob ranges.

    /// Drive in dB (0–40).
    pub fn set_drive(&self, db: f32) {
        self.params.drive_db.store(db);
    }

    /// Output level in dB (-24–+6).
    pub fn set_output(&self, db: f32) {
        self.params.output_db.store(db);
    }

    /// Dry/wet mix (0–1).
    pub fn set_mix(&self, mix: f32) {
        self.params.mix.store(mix);
    }

    /// Tone knob: cutoff in Hz for the lowpass policy, -1..+1 for tilt.
    pub fn set_tone(&self, value: f32) {
        self.params.tone.store(value);
    }

    /// Analog noise amount (0–1).
    pub fn set_noise(&self, amount: f32) {
        self.params.noise.store(amount);
    }

    /// Noise highpass cutoff in Hz (20–1000). Ignored unless the stage
    /// was configured in.
    pub fn set_noise_highpass(&self, hz: f32) {
        self.params.noise_hp_hz.store(hz);
    }

    /// Allocate and size all per-channel state. Must run before the first
    /// `process` call and again whenever the stream format changes; never
    /// concurrently with `process`.
    pub fn prepare(&self, sample_rate: f64, max_block_samples: usize, num_channels: usize) {
        let state = unsafe { &mut *self.state.get() };
        let sr = sample_rate as f32;

        state.channels.clear();
        for ch in 0..num_channels {
            let seed = self
                .config
                .seed
                .wrapping_add((ch as u64).wrapping_mul(0x9e3779b97f4a7c15));
            state.channels.push(ChannelState {
                tone: ToneShaper::from_mode(self.config.tone, sr),
                noise_hp: self
                    .config
                    .noise_highpass_hz
                    .map(|hz| FirstOrderHighpass::new(sr, hz)),
                envelope: EnvelopeFollower::new(sr),
                pink: PinkNoise::new(seed),
                dry: vec![0.0; max_block_samples],
            });
        }
        state.gain_curve = vec![0.0; max_block_samples];
        state.max_block_samples = max_block_samples;

        // Start the gain stages settled at their published targets; a ramp
        // from stale state at stream start would itself be audible.
        let snap = self.params.snapshot();
        state.pre_gain = SmoothedParam::new(db_to_gain(snap.drive_db), sr, DEFAULT_RAMP_MS);
        state.post_gain = SmoothedParam::new(db_to_gain(snap.output_db), sr, DEFAULT_RAMP_MS);
        state.prepared = true;

        log::debug!(
            "prepared: {} Hz, {} channel(s), max block {}",
            sample_rate,
            num_channels,
            max_block_samples
        );
    }

    /// Zero all filter/generator/envelope state without deallocating.
    /// Never concurrently with `process`.
    pub fn reset(&self) {
        let state = unsafe { &mut *self.state.get() };
        for ch in state.channels.iter_mut() {
            ch.tone.reset();
            if let Some(hp) = ch.noise_hp.as_mut() {
                hp.reset();
            }
            ch.envelope.reset();
            ch.pink.reset();
        }
        let snap = self.params.snapshot();
        state.pre_gain.snap_to(db_to_gain(snap.drive_db));
        state.post_gain.snap_to(db_to_gain(snap.output_db));
    }

    /// Transform a channel-major buffer in place.
    ///
    /// Runs in bounded time proportional to channels × samples: no
    /// allocation, no locking, no I/O. NaN/Inf inputs are not sanitized;
    /// they propagate through the math.
    pub fn process(&self, channels: &mut [&mut [f32]]) {
        let state = unsafe { &mut *self.state.get() };
        debug_assert!(state.prepared, "process() called before prepare()");

        let num_samples = match channels.first() {
            Some(c) => c.len(),
            None => return,
        };
        if num_samples == 0 {
            return;
        }
        debug_assert!(num_samples <= state.max_block_samples);
        debug_assert_eq!(channels.len(), state.channels.len());
        debug_assert!(channels.iter().all(|c| c.len() == num_samples));

        let snap = self.params.snapshot();

        let ProcessState {
            channels: ch_states,
            pre_gain,
            post_gain,
            gain_curve,
            ..
        } = state;

        // 1. Save the dry signal for the mix
        for (data, ch) in channels.iter().zip(ch_states.iter_mut()) {
            ch.dry[..num_samples].copy_from_slice(&data[..num_samples]);
        }

        // 2. Drive (pre-gain), ramped per sample
        pre_gain.set_target(db_to_gain(snap.drive_db));
        apply_gain_ramp(pre_gain, &mut gain_curve[..num_samples], channels);

        // 3. Tube waveshaping
        for data in channels.iter_mut() {
            for s in data.iter_mut() {
                *s = tube_waveshape(*s);
            }
        }

        // 4. Tone shaping
        for (data, ch) in channels.iter_mut().zip(ch_states.iter_mut()) {
            ch.tone.set_tone(snap.tone);
            for s in data.iter_mut() {
                *s = ch.tone.process(*s);
            }
        }

        // 5. Analog noise, skipped entirely (no state updates) at amount 0
        if snap.noise > 0.0 {
            let noise_gain =
                db_to_gain(NOISE_FLOOR_DB + snap.noise * self.config.noise_range_db);
            let floor_ratio = self.config.noise_floor_ratio;
            let signal_ratio = 1.0 - floor_ratio;

            for (data, ch) in channels.iter_mut().zip(ch_states.iter_mut()) {
                if let Some(hp) = ch.noise_hp.as_mut() {
                    hp.set_cutoff(snap.noise_hp_hz);
                }
                for s in data.iter_mut() {
                    // Envelope tracks the saturated signal, clamped so the
                    // amount knob stays a hard ceiling on noise loudness
                    let env = ch.envelope.track(*s).min(1.0);

                    let mut noise = ch.pink.next_sample();
                    if let Some(hp) = ch.noise_hp.as_mut() {
                        noise = hp.process(noise);
                    }

                    *s += noise * noise_gain * (floor_ratio + signal_ratio * env);
                }
            }
        }

        // 6. Output gain, ramped per sample
        post_gain.set_target(db_to_gain(snap.output_db));
        apply_gain_ramp(post_gain, &mut gain_curve[..num_samples], channels);

        // 7. Dry/wet blend, skipped at full wet
        if snap.mix < 1.0 {
            let dry_amount = 1.0 - snap.mix;
            for (data, ch) in channels.iter_mut().zip(ch_states.iter()) {
                for (s, d) in data.iter_mut().zip(ch.dry.iter()) {
                    *s = *d * dry_amount + *s * snap.mix;
                }
            }
        }
    }
}

impl Default for TubeSaturation {
    fn default() -> Self {
        Self::new(SaturationConfig::default())
    }
}

impl BlockEffect for TubeSaturation {
    fn prepare(&self, sample_rate: f64, max_block_samples: usize, num_channels: usize) {
        TubeSaturation::prepare(self, sample_rate, max_block_samples, num_channels);
    }

    fn reset(&self) {
        TubeSaturation::reset(self);
    }

    fn process(&self, channels: &mut [&mut [f32]]) {
        TubeSaturation::process(self, channels);
    }
}

/// Fill `curve` with one smoother tick per frame, then multiply every
/// channel by it, so all channels ramp identically.
fn apply_gain_ramp(gain: &mut SmoothedParam, curve: &mut [f32], channels: &mut [&mut [f32]]) {
    for v in curve.iter_mut() {
        *v = gain.tick();
    }
    for data in channels.iter_mut() {
        for (s, g) in data.iter_mut().zip(curve.iter()) {
            *s *= *g;
        }
    }
}
