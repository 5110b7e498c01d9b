use crate::{
    config::{validate_sample_rate, EngineConfig},
    error::{ConfigError, StateError},
    io::{AudioOutput, SilenceFlags},
    state::StateCodec,
    synth::{
        message::{EventQueue, MessageReceiver, NoteEvent, SynthMessage},
        params::{ParamChange, ParameterSet},
        voice::{BlockInput, VoiceProcessor, VoiceState},
    },
};

/// Host-facing wrapper around the voice.
///
/// Adds the lifecycle a plugin host drives (sample-rate setup, activation),
/// a fixed-capacity inbox for messages arriving between blocks, and state
/// persistence. `process_block` and `process` are the only calls meant for
/// the audio thread; they never allocate, lock or log.
pub struct VoiceEngine {
    config: EngineConfig,
    voice: VoiceProcessor,
    codec: StateCodec,
    events: EventQueue,
    active: bool,
}

impl VoiceEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "voice engine: {:?} variant, {:?} pitch, {} Hz",
            config.variant,
            config.pitch_mode,
            config.sample_rate
        );
        Ok(Self {
            config,
            voice: VoiceProcessor::new(&config),
            codec: StateCodec::new(config.variant),
            events: EventQueue::new(),
            active: true,
        })
    }

    /// Change the processing sample rate. Takes effect on the next block.
    pub fn setup(&mut self, sample_rate: f64) -> Result<(), ConfigError> {
        validate_sample_rate(sample_rate)?;
        log::debug!("sample rate {} -> {} Hz", self.config.sample_rate, sample_rate);
        self.config.sample_rate = sample_rate;
        self.voice.set_sample_rate(sample_rate);
        Ok(())
    }

    /// Activate or deactivate processing. Both directions reset the voice
    /// state; parameters are kept.
    pub fn set_active(&mut self, active: bool) {
        log::debug!("voice engine active={active}");
        self.voice.reset();
        self.events.clear();
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Queue a parameter change for the next block.
    pub fn queue_param(&mut self, change: ParamChange) {
        self.voice.bank_mut().queue(change);
    }

    /// Queue a note event for the next block. Returns false if the
    /// per-block inbox is full and the event was dropped.
    pub fn queue_note(&mut self, event: NoteEvent) -> bool {
        self.events.push(event)
    }

    /// Pull every pending message from `rx` into the next block's inbox.
    pub fn drain<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(message) = rx.pop() {
            match message {
                SynthMessage::NoteOn { note, .. } => {
                    self.events.push(NoteEvent::on(note));
                }
                SynthMessage::NoteOff { note, .. } => {
                    self.events.push(NoteEvent::off(note));
                }
                SynthMessage::AllNotesOff => {
                    self.events.push(NoteEvent::off(0));
                }
                SynthMessage::Param { id, value } => {
                    self.voice.bank_mut().queue(ParamChange::new(id, value));
                }
            }
        }
    }

    /// Render one block.
    ///
    /// Queued parameter changes come before `input.param_changes` and queued
    /// note events before `input.events`.
    pub fn process_block<B: AsMut<[f32]>>(
        &mut self,
        input: &BlockInput<'_>,
        outputs: &mut [B],
    ) -> SilenceFlags {
        if !self.active {
            self.voice.bank_mut().absorb(input.param_changes);
            self.events.clear();
            for channel in outputs.iter_mut() {
                channel.as_mut().fill(0.0);
            }
            return SilenceFlags::all(outputs.len());
        }

        if self.events.is_empty() {
            return self.voice.process_block(input, outputs);
        }

        for &event in input.events {
            self.events.push(event);
        }
        let flags = self.voice.process_block(
            &BlockInput {
                param_changes: input.param_changes,
                events: self.events.as_slice(),
            },
            outputs,
        );
        self.events.clear();
        flags
    }

    /// Render one block from the queued messages only.
    pub fn process(&mut self, output: &mut AudioOutput) -> SilenceFlags {
        self.process_block(&BlockInput::default(), &mut output.buffers)
    }

    /// Serialize the current parameters. Not for the audio thread.
    pub fn save_state(&self) -> Vec<u8> {
        self.codec.encode(self.voice.params())
    }

    /// Replace the parameters from a state blob.
    ///
    /// The blob is decoded completely before anything is applied; on error
    /// the current parameters are untouched. Not for the audio thread.
    pub fn load_state(&mut self, bytes: &[u8]) -> Result<(), StateError> {
        match self.codec.decode(bytes) {
            Ok(params) => {
                self.voice.bank_mut().replace(params);
                log::info!("loaded {} byte state", bytes.len());
                Ok(())
            }
            Err(err) => {
                log::warn!("rejected state blob: {err}");
                Err(err)
            }
        }
    }

    /// Events dropped because a block's inbox overflowed, since last asked.
    ///
    /// Safe to call from the audio thread; reporting is left to the caller.
    pub fn take_dropped_events(&mut self) -> usize {
        self.events.take_dropped()
    }

    pub fn params(&self) -> &ParameterSet {
        self.voice.params()
    }

    pub fn voice_state(&self) -> &VoiceState {
        self.voice.state()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Oscillator frequency for the current parameters and last note, in Hz.
    pub fn sounding_frequency(&self) -> f64 {
        self.voice.sounding_frequency()
    }
}
