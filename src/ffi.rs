//! C FFI bindings for the saturation engine
//!
//! Exposes the effect lifecycle to C hosts (plugin shells, mobile audio
//! stacks). The surface mirrors the Rust API one-to-one: create, prepare,
//! set parameters, process channel-major buffers, free.

use crate::effects::{SaturationConfig, TubeSaturation};
use crate::filters::ToneMode;
use std::slice;

/// Create a saturator with the default (tilt-tone) configuration.
///
/// # Safety
/// The returned pointer must be freed with `triode_free`.
#[no_mangle]
pub extern "C" fn triode_new() -> *mut TubeSaturation {
    Box::into_raw(Box::new(TubeSaturation::default()))
}

/// Create a saturator whose tone knob is a lowpass cutoff in Hz instead
/// of a tilt.
///
/// # Safety
/// The returned pointer must be freed with `triode_free`.
#[no_mangle]
pub extern "C" fn triode_new_with_lowpass_tone(cutoff_hz: f32) -> *mut TubeSaturation {
    let config = SaturationConfig {
        tone: ToneMode::LowPass { cutoff_hz },
        ..SaturationConfig::default()
    };
    Box::into_raw(Box::new(TubeSaturation::new(config)))
}

/// Free a saturator.
///
/// # Safety
/// `effect` must be a pointer from one of the constructors, or null.
/// The pointer is invalid after this call.
#[no_mangle]
pub unsafe extern "C" fn triode_free(effect: *mut TubeSaturation) {
    if !effect.is_null() {
        drop(Box::from_raw(effect));
    }
}

/// Size internal state for the negotiated stream format. Must be called
/// before the first `triode_process`, never concurrently with it.
///
/// # Safety
/// `effect` must be a valid saturator pointer.
#[no_mangle]
pub unsafe extern "C" fn triode_prepare(
    effect: *mut TubeSaturation,
    sample_rate: f64,
    max_block_samples: u32,
    num_channels: u32,
) {
    if let Some(effect) = effect.as_ref() {
        effect.prepare(sample_rate, max_block_samples as usize, num_channels as usize);
    }
}

/// Zero all internal state (transport stop/start). Never concurrently
/// with `triode_process`.
///
/// # Safety
/// `effect` must be a valid saturator pointer.
#[no_mangle]
pub unsafe extern "C" fn triode_reset(effect: *mut TubeSaturation) {
    if let Some(effect) = effect.as_ref() {
        effect.reset();
    }
}

macro_rules! param_setter {
    ($(#[$doc:meta])* $name:ident, $method:ident) => {
        $(#[$doc])*
        ///
        /// Safe to call from a non-realtime thread while audio is running.
        ///
        /// # Safety
        /// `effect` must be a valid saturator pointer.
        #[no_mangle]
        pub unsafe extern "C" fn $name(effect: *mut TubeSaturation, value: f32) {
            if let Some(effect) = effect.as_ref() {
                effect.$method(value);
            }
        }
    };
}

param_setter!(
    /// Set drive in dB (0–40).
    triode_set_drive,
    set_drive
);
param_setter!(
    /// Set output level in dB (-24–+6).
    triode_set_output,
    set_output
);
param_setter!(
    /// Set dry/wet mix (0–1).
    triode_set_mix,
    set_mix
);
param_setter!(
    /// Set the tone knob (Hz for lowpass configs, -1..+1 for tilt).
    triode_set_tone,
    set_tone
);
param_setter!(
    /// Set the analog noise amount (0–1).
    triode_set_noise,
    set_noise
);
param_setter!(
    /// Set the noise highpass cutoff in Hz (20–1000).
    triode_set_noise_highpass,
    set_noise_highpass
);

/// Process a channel-major buffer in place. Call from the audio thread.
/// Only mono and stereo layouts are supported; anything else is ignored.
///
/// # Safety
/// - `effect` must be a valid saturator pointer with `triode_prepare`
///   already called for this layout.
/// - `channels` must point to `num_channels` valid, non-aliasing channel
///   pointers, each addressing `num_samples` floats.
#[no_mangle]
pub unsafe extern "C" fn triode_process(
    effect: *mut TubeSaturation,
    channels: *const *mut f32,
    num_channels: u32,
    num_samples: u32,
) {
    let effect = match effect.as_ref() {
        Some(effect) => effect,
        None => return,
    };
    if channels.is_null() {
        return;
    }
    let n = num_samples as usize;
    let ptrs = slice::from_raw_parts(channels, num_channels as usize);

    // Fixed-arity dispatch keeps the callback allocation-free
    match ptrs {
        [ch0] if !ch0.is_null() => {
            let mut chans = [slice::from_raw_parts_mut(*ch0, n)];
            effect.process(&mut chans);
        }
        [ch0, ch1] if !ch0.is_null() && !ch1.is_null() => {
            let mut chans = [
                slice::from_raw_parts_mut(*ch0, n),
                slice::from_raw_parts_mut(*ch1, n),
            ];
            effect.process(&mut chans);
        }
        _ => {}
    }
}
