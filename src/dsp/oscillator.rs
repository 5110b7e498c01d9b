use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Naive Oscillator
================

The voice uses a single phase accumulator (radians, kept in [0, 2π)) and a
pure function that maps phase to a sample. There is no band-limiting: the saw
and square jump at their edges and alias at high pitches. That is the sound
of the instrument, not an oversight.

With t = phase / 2π in [0, 1):

  Sine      sin(phase)
  Saw       2t - 1              rises from -1 to +1, jumps back at wrap
  Square    +1 for t < 0.5      -1 for the second half
  Triangle  4|t - 0.5| - 1      starts at +1, dips to -1 at t = 0.5

      phase:  0        π        2π
  Sine       0 ──╱‾╲── 0 ──╲_╱── 0
  Saw       -1 ──────╱ 0 ──────╱ +1
  Square    +1 ‾‾‾‾‾‾‾‾╲________ -1
  Triangle  +1 ───────╲ -1 ╱─────── +1
*/

/// Oscillator waveform selector.
///
/// The discriminants are the waveform indices used by the parameter bank and
/// the state blob, so the order is part of the persisted format.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine = 0,
    Saw = 1,
    Square = 2,
    Triangle = 3,
}

impl Waveform {
    pub const COUNT: usize = 4;
    pub const ALL: [Waveform; Self::COUNT] = [
        Waveform::Sine,
        Waveform::Saw,
        Waveform::Square,
        Waveform::Triangle,
    ];

    /// Look up a waveform by index. Unknown indices fall back to sine.
    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Waveform::Sine)
    }

    /// Map a normalized knob value onto the waveform list:
    /// `round(value * (COUNT - 1))`, clamped to the valid range.
    pub fn from_normalized(value: f32) -> Self {
        let max = (Self::COUNT - 1) as f32;
        let index = (value.clamp(0.0, 1.0) * max).round();
        Self::from_index(index as i32)
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    /// Inverse of [`Waveform::from_normalized`].
    pub fn normalized(self) -> f32 {
        self.index() as f32 / (Self::COUNT - 1) as f32
    }
}

/// Sample the waveform at `phase` (radians, expected in [0, 2π)).
///
/// Pure and stateless; the output is always in [-1, 1].
#[inline]
pub fn generate_sample(phase: f64, waveform: Waveform) -> f64 {
    let t = phase / TAU;
    match waveform {
        Waveform::Sine => phase.sin(),
        Waveform::Saw => 2.0 * t - 1.0,
        Waveform::Square => {
            if t < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => 4.0 * (t - 0.5).abs() - 1.0,
    }
}

/// Per-sample phase step for `frequency` Hz at `sample_rate`.
#[inline]
pub fn phase_increment(frequency: f64, sample_rate: f64) -> f64 {
    TAU * frequency / sample_rate
}

/// Advance `phase` by `increment`, wrapping back into [0, 2π).
#[inline]
pub fn advance_phase(phase: f64, increment: f64) -> f64 {
    let next = phase + increment;
    if next >= TAU {
        // Increments above 2π (pitch above the sample rate) need more than one wrap.
        let wrapped = next - TAU;
        if wrapped >= TAU {
            wrapped.rem_euclid(TAU)
        } else {
            wrapped
        }
    } else {
        next
    }
}
