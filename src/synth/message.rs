#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::params::ParamId;

/// Note events a single block can hold. Further events in the same block are
/// dropped and counted.
pub const MAX_EVENTS_PER_BLOCK: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    NoteOn,
    NoteOff,
}

/// Note event as the voice consumes it. Velocity and channel are not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub kind: NoteKind,
    pub pitch: u8,
}

impl NoteEvent {
    pub fn on(pitch: u8) -> Self {
        Self {
            kind: NoteKind::NoteOn,
            pitch: pitch.min(127),
        }
    }

    pub fn off(pitch: u8) -> Self {
        Self {
            kind: NoteKind::NoteOff,
            pitch: pitch.min(127),
        }
    }
}

/// Messages a control thread sends to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8, velocity: u8 },
    Param { id: ParamId, value: f32 },
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Fixed-capacity FIFO of note events for one block. Never allocates after
/// construction.
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: [NoteEvent; MAX_EVENTS_PER_BLOCK],
    len: usize,
    dropped: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: [NoteEvent::off(0); MAX_EVENTS_PER_BLOCK],
            len: 0,
            dropped: 0,
        }
    }

    /// Append an event. Returns false (and counts the drop) when full.
    pub fn push(&mut self, event: NoteEvent) -> bool {
        if self.len == MAX_EVENTS_PER_BLOCK {
            self.dropped += 1;
            return false;
        }
        self.events[self.len] = event;
        self.len += 1;
        true
    }

    pub fn as_slice(&self) -> &[NoteEvent] {
        &self.events[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Number of events dropped since the last call.
    pub fn take_dropped(&mut self) -> usize {
        std::mem::take(&mut self.dropped)
    }
}
