//! Benchmarks for the attack/release envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monovoice::dsp::envelope::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Envelope::new();
        env.note_on(1.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Held at full level
        let mut env = Envelope::new();
        env.note_on(0.0, SAMPLE_RATE);
        for _ in 0..200 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("hold", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Release phase (ramping down)
        let mut env = Envelope::new();
        env.note_on(0.0, SAMPLE_RATE);
        for _ in 0..200 {
            env.next_sample();
        }
        env.note_off(1.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
