use std::f64::consts::PI;

/*
Resonant State-Variable Filter (TPT)
====================================

Two integrators with trapezoidal (topology-preserving) discretisation. The
structure gives low-, band- and high-pass taps from the same two memory
cells; the voice listens to the low-pass tap.

Coefficients, recomputed only when cutoff, resonance or sample rate change:

    cutoff_hz = 20 * 1000^cutoff          (20 Hz .. 20 kHz, exponential knob)
              <= 0.49 * sample_rate       (stay below Nyquist, or tan() explodes)
    g         = tan(π * cutoff_hz / sample_rate)
    k         = 2 - 2 * resonance * 0.95  (damping; never below 0.1)
    a1        = 1 / (1 + g * (g + k))
    a2        = g * a1

Per sample, with memory (ic1eq, ic2eq):

    hp    = a1 * (x - k*ic1eq - ic2eq)
    bp    = a2 * (x - k*ic1eq - ic2eq) + ic1eq
    lp    = a2 * ic1eq + ic2eq + g * hp
    ic1eq = 2*bp - ic1eq
    ic2eq = 2*lp - ic2eq

Stability: with g > 0 and k >= 0.1 the loop is strictly damped, so bounded
input keeps both memory cells bounded. Letting resonance reach 1.0 in the
damping term (k = 0) would make the filter a lossless oscillator; the 0.95
factor is what keeps it a filter.
*/

/// Exponential knob mapping shared by the cutoff and frequency knobs.
#[inline]
pub fn knob_to_hz(normalized: f32) -> f64 {
    20.0 * 1000.0_f64.powf(f64::from(normalized))
}

/// Precomputed filter coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfCoefficients {
    pub g: f64,
    pub k: f64,
    pub a1: f64,
    pub a2: f64,
}

impl SvfCoefficients {
    /// Build coefficients from normalized cutoff and resonance.
    pub fn new(cutoff: f32, resonance: f32, sample_rate: f64) -> Self {
        let cutoff_hz = knob_to_hz(cutoff.clamp(0.0, 1.0)).min(0.49 * sample_rate);
        Self::from_hz(cutoff_hz, resonance, sample_rate)
    }

    /// Build coefficients from a cutoff in Hz, clamped below Nyquist.
    pub fn from_hz(cutoff_hz: f64, resonance: f32, sample_rate: f64) -> Self {
        let cutoff_hz = cutoff_hz.clamp(0.0, 0.49 * sample_rate);
        let g = (PI * cutoff_hz / sample_rate).tan();
        let k = 2.0 - 2.0 * f64::from(resonance.clamp(0.0, 1.0)) * 0.95;
        let a1 = 1.0 / (1.0 + g * (g + k));
        let a2 = g * a1;
        Self { g, k, a1, a2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOutputs {
    pub lowpass: f64,
    pub bandpass: f64,
    pub highpass: f64,
}

/// Filter memory plus the cached coefficients for the current settings.
#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f64, // First integrator's memory
    ic2eq: f64, // Second integrator's memory

    coeffs: SvfCoefficients,
    settings: Option<(f32, f32, f64)>,
}

impl Default for SVFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SVFilter {
    pub fn new() -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            coeffs: SvfCoefficients::new(1.0, 0.0, 44_100.0),
            settings: None,
        }
    }

    /// Refresh coefficients if cutoff, resonance or sample rate changed.
    pub fn update(&mut self, cutoff: f32, resonance: f32, sample_rate: f64) {
        let settings = (cutoff, resonance, sample_rate);
        if self.settings != Some(settings) {
            self.coeffs = SvfCoefficients::new(cutoff, resonance, sample_rate);
            self.settings = Some(settings);
        }
    }

    /// Forget cached settings so the next `update` recomputes.
    pub fn invalidate(&mut self) {
        self.settings = None;
    }

    pub fn coefficients(&self) -> SvfCoefficients {
        self.coeffs
    }

    #[inline]
    pub fn next_sample(&mut self, x: f64) -> FilterOutputs {
        let SvfCoefficients { g, k, a1, a2 } = self.coeffs;

        let v = x - k * self.ic1eq - self.ic2eq;
        let hp = a1 * v;
        let bp = a2 * v + self.ic1eq;
        let lp = a2 * self.ic1eq + self.ic2eq + g * hp;

        self.ic1eq = 2.0 * bp - self.ic1eq;
        self.ic2eq = 2.0 * lp - self.ic2eq;

        FilterOutputs {
            lowpass: lp,
            bandpass: bp,
            highpass: hp,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        self.next_sample(x).lowpass
    }

    /// Low-pass a buffer in place.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(f64::from(*sample)) as f32;
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    /// Integrator memory `(ic1eq, ic2eq)`.
    pub fn memory(&self) -> (f64, f64) {
        (self.ic1eq, self.ic2eq)
    }
}
