// Purpose: the monophonic voice, its parameters and the host-facing engine

pub mod engine;
pub mod message;
pub mod params;
pub mod voice;

pub use engine::VoiceEngine;
pub use message::{NoteEvent, NoteKind, SynthMessage};
pub use params::{ParamChange, ParamId, ParameterBank, ParameterSet};
pub use voice::{BlockInput, VoiceProcessor, VoiceState};
