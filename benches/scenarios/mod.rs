//! Real-world scenario benchmarks.
//!
//! The full per-block path as a host drives it: parameter intake, note
//! events, synthesis and stereo fan-out.

mod voices;

pub use voices::bench_voices;
