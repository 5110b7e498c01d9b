//! Benchmarks for the engine's block entry point.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monovoice::{
    dsp::Waveform,
    synth::{BlockInput, NoteEvent, ParamChange, ParamId, VoiceEngine},
    EngineConfig, Variant,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn playing_engine(variant: Variant, waveform: Waveform) -> VoiceEngine {
    let config = EngineConfig::for_variant(variant).with_sample_rate(SAMPLE_RATE);
    let mut engine = VoiceEngine::new(config).expect("valid config");
    engine.queue_param(ParamChange::new(ParamId::Waveform, waveform.normalized()));
    engine.queue_param(ParamChange::new(ParamId::Resonance, 0.7));
    engine.queue_note(NoteEvent::on(45)); // A2, typical bass note
    engine
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut out = [vec![0.0f32; size], vec![0.0f32; size]];

        // === BASIC ===
        // sine straight to the output, pitch from the knob
        let mut basic = playing_engine(Variant::Basic, Waveform::Sine);
        group.bench_with_input(BenchmarkId::new("basic_sine", size), &size, |b, _| {
            b.iter(|| {
                black_box(basic.process_block(&BlockInput::default(), black_box(&mut out)));
            })
        });

        // === FILTERED ===
        // saw through the resonant low-pass
        let mut filtered = playing_engine(Variant::Filtered, Waveform::Saw);
        group.bench_with_input(BenchmarkId::new("filtered_saw", size), &size, |b, _| {
            b.iter(|| {
                black_box(filtered.process_block(&BlockInput::default(), black_box(&mut out)));
            })
        });

        // === AUTOMATED ===
        // a cutoff change every block forces a coefficient refresh
        let mut automated = playing_engine(Variant::Filtered, Waveform::Square);
        let mut cutoff = 0.0f32;
        group.bench_with_input(BenchmarkId::new("automated_cutoff", size), &size, |b, _| {
            b.iter(|| {
                cutoff = (cutoff + 0.01) % 1.0;
                let changes = [ParamChange::new(ParamId::Tone, cutoff)];
                let input = BlockInput {
                    param_changes: &changes,
                    events: &[],
                };
                black_box(automated.process_block(&input, &mut out));
            })
        });
    }

    group.finish();
}
