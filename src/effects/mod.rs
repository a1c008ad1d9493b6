pub mod saturation;
pub mod waveshaper;

pub use self::saturation::{SaturationConfig, TubeSaturation};
pub use self::waveshaper::{tube_waveshape, TUBE_BIAS};

/// Trait for block-based effects driven by an audio callback.
///
/// `prepare` and `reset` happen off the real-time path and must never
/// overlap a `process` call; `process` must not allocate, lock, or block.
pub trait BlockEffect: Send {
    /// Size all internal state for the negotiated stream format.
    fn prepare(&self, sample_rate: f64, max_block_samples: usize, num_channels: usize);

    /// Zero filter/generator/envelope state without deallocating.
    fn reset(&self);

    /// Transform a channel-major buffer in place.
    fn process(&self, channels: &mut [&mut [f32]]);
}
