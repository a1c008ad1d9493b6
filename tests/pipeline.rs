//! End-to-end properties of the saturation pipeline

use triode::effects::{tube_waveshape, SaturationConfig, TubeSaturation};
use triode::utils::db_to_gain;

/// Run one block through the effect and return the processed channels.
fn process_copy(sat: &TubeSaturation, input: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let mut bufs = input.to_vec();
    let mut chans: Vec<&mut [f32]> = bufs.iter_mut().map(|b| b.as_mut_slice()).collect();
    sat.process(&mut chans);
    bufs
}

fn test_signal(len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| (n as f32 * 0.11).sin() * 0.8 + (n as f32 * 0.037).cos() * 0.15)
        .collect()
}

#[test]
fn test_waveshaper_is_the_only_nonlinearity_at_unity_settings() {
    // drive 0 dB, mix 1, noise 0, neutral tilt: the pipeline must collapse
    // to the bare transfer function.
    let sat = TubeSaturation::default();
    sat.set_drive(0.0);
    sat.set_mix(1.0);
    sat.set_noise(0.0);
    sat.set_tone(0.0);
    sat.prepare(44100.0, 512, 1);

    let input = test_signal(512);
    let out = process_copy(&sat, &[input.clone()]);

    for (x, y) in input.iter().zip(out[0].iter()) {
        let expected = tube_waveshape(*x);
        assert!(
            (y - expected).abs() < 1e-6,
            "expected pure waveshape {} for input {}, got {}",
            expected,
            x,
            y
        );
    }
}

#[test]
fn test_mix_is_a_linear_blend_of_dry_and_wet() {
    let make = || {
        let sat = TubeSaturation::default();
        sat.set_drive(18.0);
        sat.set_noise(0.0);
        sat.prepare(44100.0, 256, 1);
        sat
    };
    let input = test_signal(256);

    let full_wet = make();
    full_wet.set_mix(1.0);
    let wet = process_copy(&full_wet, &[input.clone()]);

    let half = make();
    half.set_mix(0.5);
    let blended = process_copy(&half, &[input.clone()]);

    for ((d, w), b) in input.iter().zip(wet[0].iter()).zip(blended[0].iter()) {
        assert_eq!(*b, d * 0.5 + w * 0.5);
    }
}

#[test]
fn test_noise_contribution_respects_the_amount_ceiling() {
    // Twin instances differing only in noise amount; the per-sample delta
    // is exactly the noise contribution, which must stay under the gain
    // derived from the amount alone, however hot the input is.
    let make = |noise: f32| {
        let sat = TubeSaturation::default();
        sat.set_drive(10.0);
        sat.set_noise(noise);
        sat.prepare(44100.0, 1024, 1);
        sat
    };
    let noise_amount = 0.5;
    let with_noise = make(noise_amount);
    let without = make(0.0);

    let input: Vec<f32> = (0..1024).map(|n| (n as f32 * 0.2).sin() * 0.95).collect();
    let noisy = process_copy(&with_noise, &[input.clone()]);
    let clean = process_copy(&without, &[input]);

    let config = with_noise.config();
    let ceiling = db_to_gain(-60.0 + noise_amount * config.noise_range_db);
    for (a, b) in noisy[0].iter().zip(clean[0].iter()) {
        assert!(
            (a - b).abs() <= ceiling + 1e-6,
            "noise contribution {} exceeds ceiling {}",
            (a - b).abs(),
            ceiling
        );
    }
}

#[test]
fn test_impulse_scenario_at_ten_db_drive() {
    // 44100 Hz, stereo, drive 10 dB, output 0 dB, mix 1, neutral tilt,
    // noise 0, unit impulse on both channels.
    let sat = TubeSaturation::default();
    sat.prepare(44100.0, 64, 2);

    let mut impulse = vec![0.0f32; 64];
    impulse[0] = 1.0;
    let out = process_copy(&sat, &[impulse.clone(), impulse]);

    let expected = tube_waveshape(db_to_gain(10.0));
    for ch in 0..2 {
        assert!(
            (out[ch][0] - expected).abs() < 1e-5,
            "channel {}: expected {}, got {}",
            ch,
            expected,
            out[ch][0]
        );
        // Neutral tone has no memory, so nothing rings after the impulse
        for (i, s) in out[ch].iter().enumerate().skip(1) {
            assert!(s.abs() < 1e-6, "channel {} sample {} rings: {}", ch, i, s);
        }
    }
    assert_eq!(out[0], out[1]);
}

#[test]
fn test_lowpass_tone_policy_tames_the_top_end() {
    use triode::ToneMode;

    let bright = TubeSaturation::new(SaturationConfig {
        tone: ToneMode::LowPass { cutoff_hz: 18_000.0 },
        ..SaturationConfig::default()
    });
    let dark = TubeSaturation::new(SaturationConfig {
        tone: ToneMode::LowPass { cutoff_hz: 1_000.0 },
        ..SaturationConfig::default()
    });
    for sat in [&bright, &dark] {
        sat.set_drive(20.0);
        sat.prepare(44100.0, 2048, 1);
    }
    dark.set_tone(1_000.0);
    bright.set_tone(18_000.0);

    // Hard-driven square-ish content is rich in upper harmonics
    let input: Vec<f32> = (0..2048)
        .map(|n| if (n / 4) % 2 == 0 { 0.8 } else { -0.8 })
        .collect();

    let out_bright = process_copy(&bright, &[input.clone()]);
    let out_dark = process_copy(&dark, &[input]);

    // Mean absolute first difference is a cheap high-frequency-energy proxy
    let hf = |buf: &[f32]| -> f32 {
        buf.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f32>() / (buf.len() - 1) as f32
    };
    let hf_bright = hf(&out_bright[0][256..]);
    let hf_dark = hf(&out_dark[0][256..]);
    assert!(
        hf_dark < hf_bright * 0.5,
        "1 kHz cutoff should strip harmonics: dark {} vs bright {}",
        hf_dark,
        hf_bright
    );
}
