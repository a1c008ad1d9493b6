//! Offline render of the effect to a WAV file
//!
//! Lets parameter settings be auditioned without an audio device: the demo
//! tone runs through the saturator block by block and lands in a 32-bit
//! float stereo WAV.

use crate::effects::TubeSaturation;
use crate::platform::TestTone;

const BLOCK_SAMPLES: usize = 512;

/// Render `seconds` of the demo tone through `effect` into `path`.
///
/// Prepares and resets the effect for a stereo stream at `sample_rate`.
pub fn bounce_to_wav(
    effect: &TubeSaturation,
    path: &str,
    seconds: f32,
    sample_rate: u32,
) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;

    effect.prepare(sample_rate as f64, BLOCK_SAMPLES, 2);
    effect.reset();

    let mut tone = TestTone::new(sample_rate as f32);
    let mut left = vec![0.0f32; BLOCK_SAMPLES];
    let mut right = vec![0.0f32; BLOCK_SAMPLES];

    let mut remaining = (seconds.max(0.0) * sample_rate as f32) as usize;
    while remaining > 0 {
        let n = remaining.min(BLOCK_SAMPLES);
        for i in 0..n {
            let s = tone.tick();
            left[i] = s;
            right[i] = s;
        }
        {
            let mut chans = [&mut left[..n], &mut right[..n]];
            effect.process(&mut chans);
        }
        for i in 0..n {
            writer.write_sample(left[i])?;
            writer.write_sample(right[i])?;
        }
        remaining -= n;
    }

    writer.finalize()?;
    log::info!("bounced {:.1}s to {}", seconds, path);
    Ok(())
}
