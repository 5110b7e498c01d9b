//! Low-level DSP primitives used by the voice.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside the voice state. They stay focused on the
//! signal-processing math; the voice layer owns the orchestration.

/// Attack/release envelope generator.
pub mod envelope;
/// Resonant state-variable filter.
pub mod filter;
/// Naive waveform oscillator.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeState};
pub use filter::{SVFilter, SvfCoefficients};
pub use oscillator::{generate_sample, Waveform};
