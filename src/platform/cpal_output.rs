//! CPAL-backed live runner
//!
//! Plays the [`TestTone`] source through a shared [`TubeSaturation`] on the
//! default output device. The control thread keeps its own `Arc` to the
//! effect and pokes parameters while the stream runs.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SizedSample, Stream, StreamConfig};
use std::sync::Arc;

use crate::effects::TubeSaturation;
use crate::platform::TestTone;

/// Upper bound on frames handed to the effect per process call.
pub const MAX_BLOCK_SAMPLES: usize = 2048;

pub struct CpalOutput {
    stream: Option<Stream>,
    device: Option<Device>,
    config: Option<StreamConfig>,
    sample_rate: f32,
    is_active: bool,
}

impl CpalOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            device: None,
            config: None,
            sample_rate: 44100.0,
            is_active: false,
        }
    }

    /// Open the default host output device and remember its config.
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("no default output device available"))?;

        log::info!("output device: {}", device.name()?);

        let config = device.default_output_config()?;
        log::debug!("default output config: {:?}", config);

        self.sample_rate = config.sample_rate().0 as f32;
        self.device = Some(device);
        self.config = Some(config.into());
        Ok(())
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Build the output stream. Prepares the effect for this device's
    /// format, so call it after `initialize` and before `start`.
    pub fn create_stream(&mut self, effect: Arc<TubeSaturation>) -> anyhow::Result<()> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("device not initialized"))?;
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("config not initialized"))?;

        let supported = device.default_output_config()?;
        let stream = match supported.sample_format() {
            cpal::SampleFormat::I16 => Self::make_stream::<i16>(device, config, effect)?,
            cpal::SampleFormat::I32 => Self::make_stream::<i32>(device, config, effect)?,
            cpal::SampleFormat::U16 => Self::make_stream::<u16>(device, config, effect)?,
            cpal::SampleFormat::F32 => Self::make_stream::<f32>(device, config, effect)?,
            cpal::SampleFormat::F64 => Self::make_stream::<f64>(device, config, effect)?,
            other => return Err(anyhow::anyhow!("unsupported sample format '{}'", other)),
        };

        self.stream = Some(stream);
        Ok(())
    }

    fn make_stream<T>(
        device: &Device,
        config: &StreamConfig,
        effect: Arc<TubeSaturation>,
    ) -> anyhow::Result<Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let device_channels = config.channels.max(1) as usize;
        // The core handles mono and stereo; extra device channels mirror
        // the last processed one.
        let effect_channels = device_channels.min(2);
        let sample_rate = config.sample_rate.0 as f64;

        effect.prepare(sample_rate, MAX_BLOCK_SAMPLES, effect_channels);
        effect.reset();

        let mut tone = TestTone::new(sample_rate as f32);
        let mut planar: Vec<Vec<f32>> = vec![vec![0.0; MAX_BLOCK_SAMPLES]; effect_channels];

        let err_fn = |err| log::error!("output stream error: {}", err);

        let stream = device.build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                let total_frames = output.len() / device_channels;
                let mut done = 0;
                while done < total_frames {
                    let n = (total_frames - done).min(MAX_BLOCK_SAMPLES);

                    // Same source on every channel; the effect decorrelates
                    // only the noise
                    for i in 0..n {
                        let s = tone.tick();
                        for buf in planar.iter_mut() {
                            buf[i] = s;
                        }
                    }

                    if effect_channels == 2 {
                        let (left, right) = planar.split_at_mut(1);
                        let mut chans = [&mut left[0][..n], &mut right[0][..n]];
                        effect.process(&mut chans);
                    } else {
                        let mut chans = [&mut planar[0][..n]];
                        effect.process(&mut chans);
                    }

                    for i in 0..n {
                        let frame = &mut output
                            [(done + i) * device_channels..(done + i + 1) * device_channels];
                        for (ch, out) in frame.iter_mut().enumerate() {
                            let src = ch.min(effect_channels - 1);
                            *out = T::from_sample(planar[src][i]);
                        }
                    }

                    done += n;
                }
            },
            err_fn,
            None,
        )?;

        Ok(stream)
    }

    pub fn start(&mut self) -> anyhow::Result<()> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("stream not created"))?;
        stream.play()?;
        self.is_active = true;
        Ok(())
    }

    pub fn stop(&mut self) -> anyhow::Result<()> {
        if let Some(stream) = self.stream.as_ref() {
            stream.pause()?;
        }
        self.is_active = false;
        Ok(())
    }
}

impl Default for CpalOutput {
    fn default() -> Self {
        Self::new()
    }
}
