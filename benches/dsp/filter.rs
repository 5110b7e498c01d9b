//! Benchmarks for the resonant state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monovoice::dsp::filter::SVFilter;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, resonance) in [("flat", 0.0f32), ("resonant", 0.9)] {
            let mut filter = SVFilter::new();
            filter.update(0.5, resonance, SAMPLE_RATE);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer));
                })
            });
        }

        // Coefficient refresh when the cutoff moves every block
        let mut filter = SVFilter::new();
        let mut cutoff = 0.0f32;
        group.bench_with_input(BenchmarkId::new("coefficient_update", size), &size, |b, _| {
            b.iter(|| {
                cutoff = (cutoff + 0.001) % 1.0;
                filter.update(black_box(cutoff), 0.5, SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
