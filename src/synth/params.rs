#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Variant;
use crate::dsp::oscillator::Waveform;

/// Parameter identifiers. The discriminants are the host-facing ids.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Gain = 0,
    /// Oscillator frequency (basic variant) or filter cutoff (filtered variant).
    Tone = 1,
    Fine = 2,
    Resonance = 3,
    Waveform = 4,
    Attack = 5,
    Release = 6,
    Bypass = 7,
}

impl ParamId {
    pub const COUNT: usize = 8;
    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::Gain,
        ParamId::Tone,
        ParamId::Fine,
        ParamId::Resonance,
        ParamId::Waveform,
        ParamId::Attack,
        ParamId::Release,
        ParamId::Bypass,
    ];

    pub fn from_raw(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Gain => "gain",
            ParamId::Tone => "tone",
            ParamId::Fine => "fine",
            ParamId::Resonance => "resonance",
            ParamId::Waveform => "waveform",
            ParamId::Attack => "attack",
            ParamId::Release => "release",
            ParamId::Bypass => "bypass",
        }
    }
}

/// The voice's control values.
///
/// Continuous values are normalized to [0, 1]; the waveform is kept as an
/// index and bypass as a flag, which is also how they are persisted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub gain: f32,
    pub tone: f32,
    pub fine: f32,
    pub resonance: f32,
    pub waveform: Waveform,
    pub attack: f32,
    pub release: f32,
    pub bypass: bool,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::for_variant(Variant::Basic)
    }
}

impl ParameterSet {
    /// Power-on values. The filtered variant starts with the cutoff fully open.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            gain: 0.5,
            tone: match variant {
                Variant::Basic => 0.5,
                Variant::Filtered => 1.0,
            },
            fine: 0.5,
            resonance: 0.0,
            waveform: Waveform::Sine,
            attack: 0.05,
            release: 0.3,
            bypass: false,
        }
    }

    /// All-zero set: every knob at its minimum, sine, bypass off.
    pub fn zeroed() -> Self {
        Self {
            gain: 0.0,
            tone: 0.0,
            fine: 0.0,
            resonance: 0.0,
            waveform: Waveform::Sine,
            attack: 0.0,
            release: 0.0,
            bypass: false,
        }
    }

    /// Apply a normalized host value. Non-finite values are ignored.
    pub fn set_normalized(&mut self, id: ParamId, value: f32) {
        if !value.is_finite() {
            return;
        }
        let value = value.clamp(0.0, 1.0);
        match id {
            ParamId::Gain => self.gain = value,
            ParamId::Tone => self.tone = value,
            ParamId::Fine => self.fine = value,
            ParamId::Resonance => self.resonance = value,
            ParamId::Waveform => self.waveform = Waveform::from_normalized(value),
            ParamId::Attack => self.attack = value,
            ParamId::Release => self.release = value,
            ParamId::Bypass => self.bypass = value > 0.5,
        }
    }

    /// Normalized value as a host would display it.
    pub fn normalized(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Gain => self.gain,
            ParamId::Tone => self.tone,
            ParamId::Fine => self.fine,
            ParamId::Resonance => self.resonance,
            ParamId::Waveform => self.waveform.normalized(),
            ParamId::Attack => self.attack,
            ParamId::Release => self.release,
            ParamId::Bypass => {
                if self.bypass {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Fine-tune offset in cents, -100..+100.
    pub fn fine_cents(&self) -> f64 {
        (f64::from(self.fine) - 0.5) * 200.0
    }
}

/// One automation point: `value` for `id` at `sample_offset` within the block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChange {
    pub id: ParamId,
    pub value: f32,
    pub sample_offset: u32,
}

impl ParamChange {
    pub fn new(id: ParamId, value: f32) -> Self {
        Self {
            id,
            value,
            sample_offset: 0,
        }
    }

    pub fn at(id: ParamId, value: f32, sample_offset: u32) -> Self {
        Self {
            id,
            value,
            sample_offset,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    sample_offset: u32,
    value: f32,
}

/// Current parameter values plus the changes queued for the next block.
///
/// Automation is block-rate: of all points queued for one id, only the one
/// with the latest sample offset is applied (arrival order breaks ties).
/// Large blocks can therefore step audibly under fast automation.
#[derive(Debug, Clone)]
pub struct ParameterBank {
    current: ParameterSet,
    pending: [Option<Pending>; ParamId::COUNT],
}

impl ParameterBank {
    pub fn new(initial: ParameterSet) -> Self {
        Self {
            current: initial,
            pending: [None; ParamId::COUNT],
        }
    }

    /// Queue a change for the next block boundary.
    pub fn queue(&mut self, change: ParamChange) {
        let slot = &mut self.pending[change.id.index()];
        let replace = match slot {
            Some(existing) => change.sample_offset >= existing.sample_offset,
            None => true,
        };
        if replace {
            *slot = Some(Pending {
                sample_offset: change.sample_offset,
                value: change.value,
            });
        }
    }

    /// Commit queued changes. Returns true if anything was pending.
    pub fn apply_pending(&mut self) -> bool {
        let mut applied = false;
        for id in ParamId::ALL {
            if let Some(pending) = self.pending[id.index()].take() {
                self.current.set_normalized(id, pending.value);
                applied = true;
            }
        }
        applied
    }

    /// Queue a block's worth of changes and commit them.
    pub fn absorb(&mut self, changes: &[ParamChange]) -> bool {
        for &change in changes {
            self.queue(change);
        }
        self.apply_pending()
    }

    pub fn params(&self) -> &ParameterSet {
        &self.current
    }

    /// Swap in a whole parameter set, dropping anything queued.
    pub fn replace(&mut self, params: ParameterSet) {
        self.current = params;
        self.pending = [None; ParamId::COUNT];
    }
}
