//! Throughput benchmarks for the block pipeline
//!
//! The budget for real-time processing is `block / sample_rate` per call;
//! at 48 kHz a 512-sample block leaves about 10.7 ms. These benches keep
//! an eye on how much of that the saturator eats.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use triode::effects::TubeSaturation;
use triode::gen::PinkNoise;

const BLOCK_SIZES: [usize; 3] = [128, 512, 2048];

fn bench_process_stereo(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_stereo");
    for &block in BLOCK_SIZES.iter() {
        group.throughput(Throughput::Elements((block * 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(block), &block, |b, &block| {
            let sat = TubeSaturation::default();
            sat.set_drive(20.0);
            sat.set_noise(0.3);
            sat.set_mix(0.8);
            sat.prepare(48000.0, block, 2);

            let mut left = vec![0.1f32; block];
            let mut right = vec![0.1f32; block];
            b.iter(|| {
                let mut chans = [&mut left[..], &mut right[..]];
                sat.process(black_box(&mut chans));
            });
        });
    }
    group.finish();
}

fn bench_pink_noise(c: &mut Criterion) {
    c.bench_function("pink_noise_next_sample", |b| {
        let mut pink = PinkNoise::new(17);
        b.iter(|| black_box(pink.next_sample()));
    });
}

criterion_group!(benches, bench_process_stereo, bench_pink_noise);
criterion_main!(benches);
