//! Criterion benchmarks for matiz effect renders
//!
//! Run with: cargo bench
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use matiz_core::AudioBuffer;
use matiz_effects::{
    Chorus, Compressor, Distortion, Equalizer, Flanger, LowPass, Phaser, Render, Reverb, Wah,
};

const SAMPLE_RATE: u32 = 44100;
const BUFFER_LENGTHS: &[usize] = &[4096, 16384, 65536];

fn test_buffer(len: usize) -> AudioBuffer {
    let data: Vec<f32> = (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect();
    AudioBuffer::new(SAMPLE_RATE, vec![data.clone(), data]).unwrap()
}

fn bench_render(c: &mut Criterion, effect: &dyn Render) {
    let mut group = c.benchmark_group(effect.name());
    for &len in BUFFER_LENGTHS {
        let input = test_buffer(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| {
                let out = effect.apply(black_box(&input)).unwrap();
                black_box(out.channel(0)[0])
            });
        });
    }
    group.finish();
}

fn bench_all(c: &mut Criterion) {
    bench_render(
        c,
        &Reverb {
            decay_time: 1.0,
            ..Reverb::default()
        },
    );
    bench_render(c, &Chorus::default());
    bench_render(c, &Flanger::default());
    bench_render(c, &Distortion::default());
    bench_render(
        c,
        &Equalizer {
            gains_db: [3.0, -2.0, 4.0, 0.0, -6.0, 2.0, 0.0, 5.0, -3.0, 1.0],
        },
    );
    bench_render(
        c,
        &LowPass {
            slope: 48,
            ..LowPass::default()
        },
    );
    bench_render(c, &Wah::default());
    bench_render(c, &Compressor::default());
    bench_render(c, &Phaser::default());
}

criterion_group!(benches, bench_all);
criterion_main!(benches);
