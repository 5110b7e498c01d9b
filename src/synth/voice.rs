use crate::{
    config::{EngineConfig, PitchMode, Variant},
    dsp::{
        envelope::{Envelope, EnvelopeState},
        filter::{knob_to_hz, SVFilter},
        oscillator::{advance_phase, generate_sample, phase_increment},
    },
    io::{converter::midi_note_to_freq, SilenceFlags},
    synth::{
        message::{NoteEvent, NoteKind},
        params::{ParamChange, ParameterBank, ParameterSet},
    },
};

/// Everything the voice mutates while it plays.
///
/// Owned by exactly one processor. `reset` puts it back to the state it has
/// right after activation.
#[derive(Debug, Clone)]
pub struct VoiceState {
    phase: f64,
    envelope: Envelope,
    filter: SVFilter,
    note_frequency: f64,
}

impl Default for VoiceState {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceState {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            envelope: Envelope::new(),
            filter: SVFilter::new(),
            note_frequency: 440.0,
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.envelope.reset();
        self.filter.reset();
        self.filter.invalidate();
        self.note_frequency = 440.0;
    }

    /// Oscillator phase in radians, always in [0, 2π).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn envelope_level(&self) -> f64 {
        self.envelope.level()
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    /// Filter integrator memory `(ic1eq, ic2eq)`.
    pub fn filter_memory(&self) -> (f64, f64) {
        self.filter.memory()
    }

    /// Frequency of the most recent note-on. Only sounds in note pitch mode.
    pub fn note_frequency(&self) -> f64 {
        self.note_frequency
    }
}

/// What the host hands over with each block besides the output buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockInput<'a> {
    pub param_changes: &'a [ParamChange],
    pub events: &'a [NoteEvent],
}

/// The monophonic voice: parameter bank, voice state and the per-block loop.
#[derive(Debug, Clone)]
pub struct VoiceProcessor {
    sample_rate: f64,
    variant: Variant,
    pitch_mode: PitchMode,
    bank: ParameterBank,
    state: VoiceState,
}

impl VoiceProcessor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            variant: config.variant,
            pitch_mode: config.pitch_mode,
            bank: ParameterBank::new(ParameterSet::for_variant(config.variant)),
            state: VoiceState::new(),
        }
    }

    /// Render one block.
    ///
    /// Order: parameter changes, then note events in arrival order, then
    /// synthesis. Every channel receives the same signal. The block length
    /// is the shortest channel.
    pub fn process_block<B: AsMut<[f32]>>(
        &mut self,
        input: &BlockInput<'_>,
        outputs: &mut [B],
    ) -> SilenceFlags {
        self.bank.absorb(input.param_changes);
        for &event in input.events {
            self.handle_event(event);
        }
        self.render(outputs)
    }

    /// Apply one note event immediately.
    pub fn handle_event(&mut self, event: NoteEvent) {
        let params = self.bank.params();
        match event.kind {
            NoteKind::NoteOn => {
                if !self.state.envelope.is_active() {
                    // Fresh note: don't carry the last note's filter memory.
                    self.state.filter.reset();
                }
                self.state.note_frequency = midi_note_to_freq(event.pitch);
                self.state.envelope.note_on(params.attack, self.sample_rate);
            }
            NoteKind::NoteOff => {
                self.state.envelope.note_off(params.release, self.sample_rate);
            }
        }
    }

    /// Synthesize a block with the current parameters and state.
    ///
    /// The block is as long as the shortest channel. Samples past that in
    /// longer channels are zeroed so a set silence bit always means an
    /// all-zero channel.
    pub fn render<B: AsMut<[f32]>>(&mut self, outputs: &mut [B]) -> SilenceFlags {
        let channels = outputs.len();
        let frames = outputs
            .iter_mut()
            .map(|channel| channel.as_mut().len())
            .min()
            .unwrap_or(0);
        let params = *self.bank.params();

        if params.bypass || frames == 0 {
            for channel in outputs.iter_mut() {
                channel.as_mut().fill(0.0);
            }
            return SilenceFlags::all(channels);
        }

        let increment = phase_increment(self.sounding_frequency(), self.sample_rate);
        let filtered = self.variant.has_filter();
        if filtered {
            self.state
                .filter
                .update(params.tone, params.resonance, self.sample_rate);
        }

        // frames > 0 implies at least one channel.
        let Some((first, rest)) = outputs.split_first_mut() else {
            return SilenceFlags::all(channels);
        };
        let (first, first_tail) = first.as_mut().split_at_mut(frames);
        first_tail.fill(0.0);

        let mut sounded = false;
        for out in first.iter_mut() {
            let (sample, active) = self.next_sample(&params, increment, filtered);
            sounded |= active;
            *out = sample;
        }
        for channel in rest {
            let channel = channel.as_mut();
            channel[..frames].copy_from_slice(first);
            channel[frames..].fill(0.0);
        }

        if !sounded && !self.state.envelope.is_active() {
            SilenceFlags::all(channels)
        } else {
            SilenceFlags::NONE
        }
    }

    #[inline]
    fn next_sample(&mut self, params: &ParameterSet, increment: f64, filtered: bool) -> (f32, bool) {
        let level = self.state.envelope.next_sample();
        if level <= 0.0 {
            // Phase holds while silent.
            return (0.0, false);
        }

        let raw = generate_sample(self.state.phase, params.waveform);
        let shaped = if filtered {
            self.state.filter.process(raw)
        } else {
            raw
        };
        self.state.phase = advance_phase(self.state.phase, increment);

        ((shaped * f64::from(params.gain) * level) as f32, true)
    }

    /// Frequency the oscillator runs at for the current parameters, in Hz.
    pub fn sounding_frequency(&self) -> f64 {
        let params = self.bank.params();
        let base = match self.pitch_mode {
            PitchMode::Knob => knob_to_hz(params.tone),
            PitchMode::Note => self.state.note_frequency,
        };
        base * 2.0_f64.powf(params.fine_cents() / 1200.0)
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.state.filter.invalidate();
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn pitch_mode(&self) -> PitchMode {
        self.pitch_mode
    }

    pub fn params(&self) -> &ParameterSet {
        self.bank.params()
    }

    pub fn bank_mut(&mut self) -> &mut ParameterBank {
        &mut self.bank
    }

    pub fn state(&self) -> &VoiceState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}
