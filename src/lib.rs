//! Realtime-safe monophonic synthesizer voice.
//!
//! The host hands the engine normalized parameter changes and note events
//! once per block and gets back per-channel audio plus a silence hint:
//!
//! ```
//! use monovoice::{
//!     synth::{BlockInput, NoteEvent, VoiceEngine},
//!     EngineConfig,
//! };
//!
//! let mut engine = VoiceEngine::new(EngineConfig::default()).unwrap();
//! let mut out = [vec![0.0f32; 256], vec![0.0f32; 256]];
//! let events = [NoteEvent::on(60)];
//! let silence = engine.process_block(
//!     &BlockInput { events: &events, ..Default::default() },
//!     &mut out,
//! );
//! assert!(!silence.is_all(2));
//! ```

pub mod config;
pub mod dsp;
pub mod error;
pub mod io;
pub mod state; // Flat binary parameter blob
pub mod synth; // Voice, parameters and the host-facing engine

pub use config::{EngineConfig, PitchMode, Variant};
pub use error::{ConfigError, StateError};

/// Largest block the demo host renders at once.
pub const MAX_BLOCK_SIZE: usize = 2048;
