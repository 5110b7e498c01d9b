#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which voice the engine runs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Oscillator straight to the output. The tone knob is the oscillator
    /// frequency; the state blob has seven fields.
    #[default]
    Basic,
    /// Oscillator through the resonant low-pass. The tone knob is the cutoff,
    /// resonance is live and the state blob has eight fields.
    Filtered,
}

impl Variant {
    pub fn has_filter(self) -> bool {
        matches!(self, Variant::Filtered)
    }

    /// Pitch source used when none is configured explicitly.
    pub fn default_pitch_mode(self) -> PitchMode {
        match self {
            Variant::Basic => PitchMode::Knob,
            Variant::Filtered => PitchMode::Note,
        }
    }
}

/// Where the sounding pitch comes from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitchMode {
    /// `20 * 1000^tone` Hz. Note events only open and close the envelope.
    #[default]
    Knob,
    /// The most recent note-on's MIDI pitch.
    Note,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f64,
    pub variant: Variant,
    pub pitch_mode: PitchMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            variant: Variant::Basic,
            pitch_mode: PitchMode::Knob,
        }
    }
}

impl EngineConfig {
    /// Config for `variant` with its default pitch source.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            pitch_mode: variant.default_pitch_mode(),
            ..Self::default()
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_pitch_mode(mut self, pitch_mode: PitchMode) -> Self {
        self.pitch_mode = pitch_mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sample_rate(self.sample_rate)?;
        if self.variant.has_filter() && self.pitch_mode == PitchMode::Knob {
            return Err(ConfigError::KnobPitchWithFilter);
        }
        Ok(())
    }
}

pub(crate) fn validate_sample_rate(sample_rate: f64) -> Result<(), ConfigError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSampleRate(sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::for_variant(Variant::Basic).validate().is_ok());
        assert!(EngineConfig::for_variant(Variant::Filtered).validate().is_ok());
    }

    #[test]
    fn filtered_variant_defaults_to_note_pitch() {
        let config = EngineConfig::for_variant(Variant::Filtered);
        assert_eq!(config.pitch_mode, PitchMode::Note);
    }

    #[test]
    fn knob_pitch_with_filter_is_rejected() {
        let config = EngineConfig::for_variant(Variant::Filtered).with_pitch_mode(PitchMode::Knob);
        assert_eq!(config.validate(), Err(ConfigError::KnobPitchWithFilter));
    }

    #[test]
    fn bad_sample_rates_are_rejected() {
        for rate in [0.0, -44_100.0, f64::NAN, f64::INFINITY] {
            let config = EngineConfig::default().with_sample_rate(rate);
            assert!(matches!(config.validate(), Err(ConfigError::InvalidSampleRate(_))));
        }
    }
}
