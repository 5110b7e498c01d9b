use thiserror::Error;

/// Failure to decode a state blob. The live parameter set is never touched
/// when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("state blob truncated: field `{field}` at byte {offset} needs 4 bytes, {available} left")]
    Truncated {
        field: &'static str,
        offset: usize,
        available: usize,
    },

    #[error("state field `{field}` is not a finite number")]
    NonFinite { field: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid sample rate {0} Hz")]
    InvalidSampleRate(f64),

    #[error("the filtered variant uses the tone knob as cutoff; knob pitch mode needs the basic variant")]
    KnobPitchWithFilter,
}
