//! Tone-shaping policies
//!
//! The tone control is one of two interchangeable filters, chosen when the
//! effect is configured and never re-decided at runtime: a lowpass whose
//! cutoff is the tone parameter ("brightness"), or a tilt shelf whose lean
//! is the tone parameter. The stateful side is a tagged enum so the per-
//! sample cost is a single dispatch, not a re-checked branch tree.

use crate::filters::biquad_lowpass::BiquadLowpass;
use crate::filters::tilt_shelf::TiltShelf;

/// Butterworth Q for the brightness lowpass
const TONE_Q: f32 = 0.707;

/// Configuration-time choice of tone policy, with the initial knob value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToneMode {
    /// Brightness control: the tone parameter is a cutoff in Hz (1 000–20 000).
    LowPass { cutoff_hz: f32 },
    /// Spectral tilt around 800 Hz: the tone parameter is -1 (dark) to +1 (bright).
    Tilt { tilt: f32 },
}

impl ToneMode {
    /// The initial tone parameter value this mode starts from.
    pub fn initial_value(&self) -> f32 {
        match *self {
            ToneMode::LowPass { cutoff_hz } => cutoff_hz,
            ToneMode::Tilt { tilt } => tilt,
        }
    }
}

impl Default for ToneMode {
    fn default() -> Self {
        ToneMode::Tilt { tilt: 0.0 }
    }
}

/// Per-channel tone filter state behind the configured policy.
pub enum ToneShaper {
    LowPass(BiquadLowpass),
    Tilt(TiltShelf),
}

impl ToneShaper {
    pub fn from_mode(mode: ToneMode, sample_rate: f32) -> Self {
        match mode {
            ToneMode::LowPass { cutoff_hz } => {
                ToneShaper::LowPass(BiquadLowpass::new(sample_rate, cutoff_hz, TONE_Q))
            }
            ToneMode::Tilt { tilt } => {
                let mut shelf = TiltShelf::new(sample_rate);
                shelf.set_tilt(tilt);
                ToneShaper::Tilt(shelf)
            }
        }
    }

    /// Apply the block's tone parameter. The underlying filters cache their
    /// coefficients, so calling this every block is cheap when nothing moved.
    #[inline]
    pub fn set_tone(&mut self, value: f32) {
        match self {
            ToneShaper::LowPass(filter) => filter.set_cutoff(value),
            ToneShaper::Tilt(shelf) => shelf.set_tilt(value),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        match self {
            ToneShaper::LowPass(filter) => filter.process(input),
            ToneShaper::Tilt(shelf) => shelf.process(input),
        }
    }

    pub fn reset(&mut self) {
        match self {
            ToneShaper::LowPass(filter) => filter.reset(),
            ToneShaper::Tilt(shelf) => shelf.reset(),
        }
    }
}
