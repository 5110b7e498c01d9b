//! Benchmarks for waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monovoice::dsp::oscillator::{advance_phase, generate_sample, phase_increment, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let increment = phase_increment(440.0, SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for waveform in Waveform::ALL {
            let name = format!("{waveform:?}").to_lowercase();
            let mut phase = 0.0;
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = generate_sample(phase, black_box(waveform)) as f32;
                        phase = advance_phase(phase, increment);
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
