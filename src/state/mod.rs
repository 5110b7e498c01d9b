//! Flat binary parameter blob.
//!
//! Fields are written in a fixed order, four bytes each, little-endian.
//! Continuous values are `f32`; the waveform index and the bypass flag are
//! `i32`. The order is the compatibility contract: new fields may only be
//! appended.
//!
//! | # | basic      | filtered   | type |
//! |---|------------|------------|------|
//! | 0 | gain       | gain       | f32  |
//! | 1 | frequency  | cutoff     | f32  |
//! | 2 | fine       | fine       | f32  |
//! | 3 | waveform   | resonance  | f32 / i32 |
//! | 4 | attack     | waveform   | f32 / i32 |
//! | 5 | release    | attack     | f32  |
//! | 6 | bypass     | release    | i32 / f32 |
//! | 7 |            | bypass     | i32  |

use std::io::{self, Write};

use crate::{
    config::Variant,
    dsp::oscillator::Waveform,
    error::StateError,
    synth::params::ParameterSet,
};

const FIELD_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Gain,
    Tone,
    Fine,
    Resonance,
    Waveform,
    Attack,
    Release,
    Bypass,
}

const BASIC_LAYOUT: &[Field] = &[
    Field::Gain,
    Field::Tone,
    Field::Fine,
    Field::Waveform,
    Field::Attack,
    Field::Release,
    Field::Bypass,
];

const FILTERED_LAYOUT: &[Field] = &[
    Field::Gain,
    Field::Tone,
    Field::Fine,
    Field::Resonance,
    Field::Waveform,
    Field::Attack,
    Field::Release,
    Field::Bypass,
];

impl Field {
    fn name(self, variant: Variant) -> &'static str {
        match self {
            Field::Gain => "gain",
            Field::Tone => match variant {
                Variant::Basic => "frequency",
                Variant::Filtered => "cutoff",
            },
            Field::Fine => "fine",
            Field::Resonance => "resonance",
            Field::Waveform => "waveform",
            Field::Attack => "attack",
            Field::Release => "release",
            Field::Bypass => "bypass",
        }
    }

    fn encode(self, params: &ParameterSet) -> [u8; FIELD_WIDTH] {
        match self {
            Field::Gain => params.gain.to_le_bytes(),
            Field::Tone => params.tone.to_le_bytes(),
            Field::Fine => params.fine.to_le_bytes(),
            Field::Resonance => params.resonance.to_le_bytes(),
            Field::Waveform => params.waveform.index().to_le_bytes(),
            Field::Attack => params.attack.to_le_bytes(),
            Field::Release => params.release.to_le_bytes(),
            Field::Bypass => i32::from(params.bypass).to_le_bytes(),
        }
    }

    fn decode(
        self,
        raw: [u8; FIELD_WIDTH],
        variant: Variant,
        params: &mut ParameterSet,
    ) -> Result<(), StateError> {
        let float = |raw: [u8; FIELD_WIDTH]| -> Result<f32, StateError> {
            let value = f32::from_le_bytes(raw);
            if !value.is_finite() {
                return Err(StateError::NonFinite {
                    field: self.name(variant),
                });
            }
            if !(0.0..=1.0).contains(&value) {
                log::warn!(
                    "state field `{}` = {value} outside [0, 1], clamping",
                    self.name(variant)
                );
            }
            Ok(value.clamp(0.0, 1.0))
        };

        match self {
            Field::Gain => params.gain = float(raw)?,
            Field::Tone => params.tone = float(raw)?,
            Field::Fine => params.fine = float(raw)?,
            Field::Resonance => params.resonance = float(raw)?,
            Field::Attack => params.attack = float(raw)?,
            Field::Release => params.release = float(raw)?,
            Field::Waveform => {
                let index = i32::from_le_bytes(raw);
                params.waveform = Waveform::from_index(index);
                if params.waveform.index() != index {
                    log::warn!("unknown waveform index {index} in state, using sine");
                }
            }
            Field::Bypass => params.bypass = i32::from_le_bytes(raw) > 0,
        }
        Ok(())
    }
}

/// Reads and writes the parameter blob for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCodec {
    variant: Variant,
}

impl StateCodec {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    fn layout(&self) -> &'static [Field] {
        match self.variant {
            Variant::Basic => BASIC_LAYOUT,
            Variant::Filtered => FILTERED_LAYOUT,
        }
    }

    /// Size of a complete blob in bytes.
    pub fn encoded_len(&self) -> usize {
        self.layout().len() * FIELD_WIDTH
    }

    pub fn write_to<W: Write>(&self, params: &ParameterSet, writer: &mut W) -> io::Result<()> {
        for field in self.layout() {
            writer.write_all(&field.encode(params))?;
        }
        Ok(())
    }

    pub fn encode(&self, params: &ParameterSet) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        for field in self.layout() {
            bytes.extend_from_slice(&field.encode(params));
        }
        bytes
    }

    /// Decode a blob into a fresh parameter set.
    ///
    /// Fields the variant does not persist keep their power-on values.
    /// Trailing bytes beyond the known fields are ignored so newer blobs with
    /// appended fields still load.
    ///
    /// Re-encoding a decoded blob reproduces it byte for byte as long as its
    /// floats are in [0, 1]. Floats outside that range are clamped, so they
    /// re-encode as 0.0 or 1.0.
    pub fn decode(&self, bytes: &[u8]) -> Result<ParameterSet, StateError> {
        let mut params = ParameterSet::for_variant(self.variant);
        let mut offset = 0;

        for &field in self.layout() {
            let raw: [u8; FIELD_WIDTH] = bytes
                .get(offset..offset + FIELD_WIDTH)
                .and_then(|chunk| chunk.try_into().ok())
                .ok_or(StateError::Truncated {
                    field: field.name(self.variant),
                    offset,
                    available: bytes.len().saturating_sub(offset),
                })?;
            field.decode(raw, self.variant, &mut params)?;
            offset += FIELD_WIDTH;
        }

        if bytes.len() > offset {
            log::debug!("ignoring {} trailing state bytes", bytes.len() - offset);
        }
        Ok(params)
    }
}
