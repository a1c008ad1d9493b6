//! Lock-free parameter publication
//!
//! The control thread (UI, host automation) writes parameter targets; the
//! audio thread reads them once per block. Values travel as `f32` bits in
//! an `AtomicU32` with relaxed ordering: single writer, single reader,
//! and a torn read is impossible because the whole value is one word.

use std::sync::atomic::{AtomicU32, Ordering};

/// An `f32` that can be shared across threads without locking.
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Parameter targets for the saturation effect.
///
/// Ranges are the caller's contract (the documented knob ranges); the core
/// does not re-validate them, it just behaves sanely for any finite value.
pub struct SaturationParams {
    /// Pre-waveshaper gain in dB, 0–40
    pub drive_db: AtomicF32,
    /// Post gain in dB, -24–+6
    pub output_db: AtomicF32,
    /// Dry/wet blend, 0–1
    pub mix: AtomicF32,
    /// Tone knob: cutoff in Hz (lowpass policy) or tilt -1..+1 (tilt policy)
    pub tone: AtomicF32,
    /// Analog noise amount, 0–1
    pub noise: AtomicF32,
    /// Noise highpass cutoff in Hz, 20–1000 (only read when the stage is configured)
    pub noise_hp_hz: AtomicF32,
}

impl SaturationParams {
    pub fn new(initial_tone: f32, initial_noise_hp_hz: f32) -> Self {
        Self {
            drive_db: AtomicF32::new(10.0),
            output_db: AtomicF32::new(0.0),
            mix: AtomicF32::new(1.0),
            tone: AtomicF32::new(initial_tone),
            noise: AtomicF32::new(0.0),
            noise_hp_hz: AtomicF32::new(initial_noise_hp_hz),
        }
    }

    /// Read every target once; the snapshot stays fixed for a whole block.
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            drive_db: self.drive_db.load(),
            output_db: self.output_db.load(),
            mix: self.mix.load(),
            tone: self.tone.load(),
            noise: self.noise.load(),
            noise_hp_hz: self.noise_hp_hz.load(),
        }
    }
}

/// Plain per-block copy of the published parameters.
#[derive(Clone, Copy, Debug)]
pub struct ParamSnapshot {
    pub drive_db: f32,
    pub output_db: f32,
    pub mix: f32,
    pub tone: f32,
    pub noise: f32,
    pub noise_hp_hz: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_f32_round_trip() {
        let a = AtomicF32::new(0.25);
        assert_eq!(a.load(), 0.25);
        a.store(-13.5);
        assert_eq!(a.load(), -13.5);
    }

    #[test]
    fn test_defaults_match_the_shipped_preset() {
        let params = SaturationParams::new(0.0, 80.0);
        let snap = params.snapshot();
        assert_eq!(snap.drive_db, 10.0);
        assert_eq!(snap.output_db, 0.0);
        assert_eq!(snap.mix, 1.0);
        assert_eq!(snap.noise, 0.0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let params = SaturationParams::new(0.0, 80.0);
        let snap = params.snapshot();
        params.drive_db.store(40.0);
        assert_eq!(snap.drive_db, 10.0);
        assert_eq!(params.snapshot().drive_db, 40.0);
    }
}
