//! Computer-keyboard controls for the demo host.

use crossterm::event::KeyCode;
use monovoice::{
    dsp::Waveform,
    synth::{ParamId, ParameterSet, SynthMessage},
    Variant,
};

/// C-major scale on the home row, in semitones above the octave's C.
const SCALE_KEYS: [(char, u8); 8] = [
    ('a', 0),
    ('s', 2),
    ('d', 4),
    ('f', 5),
    ('g', 7),
    ('h', 9),
    ('j', 11),
    ('k', 12),
];

const KNOB_STEP: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Note(u8),
    Release,
    Octave(i8),
    Waveform(Waveform),
    Nudge(ParamId, f32),
    ToggleBypass,
    Quit,
}

pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(' ') => Some(Action::Release),
        KeyCode::Char('z') => Some(Action::Octave(-1)),
        KeyCode::Char('x') => Some(Action::Octave(1)),
        KeyCode::Char('1') => Some(Action::Waveform(Waveform::Sine)),
        KeyCode::Char('2') => Some(Action::Waveform(Waveform::Saw)),
        KeyCode::Char('3') => Some(Action::Waveform(Waveform::Square)),
        KeyCode::Char('4') => Some(Action::Waveform(Waveform::Triangle)),
        KeyCode::Char('[') => Some(Action::Nudge(ParamId::Tone, -KNOB_STEP)),
        KeyCode::Char(']') => Some(Action::Nudge(ParamId::Tone, KNOB_STEP)),
        KeyCode::Char(',') => Some(Action::Nudge(ParamId::Resonance, -KNOB_STEP)),
        KeyCode::Char('.') => Some(Action::Nudge(ParamId::Resonance, KNOB_STEP)),
        KeyCode::Char('-') => Some(Action::Nudge(ParamId::Gain, -KNOB_STEP)),
        KeyCode::Char('=') => Some(Action::Nudge(ParamId::Gain, KNOB_STEP)),
        KeyCode::Char('b') => Some(Action::ToggleBypass),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c) => SCALE_KEYS
            .iter()
            .find(|(key, _)| *key == c)
            .map(|&(_, semitone)| Action::Note(semitone)),
        _ => None,
    }
}

/// Control-side mirror of the engine's parameters.
pub struct Controls {
    pub octave: i8,
    pub params: ParameterSet,
    held: Option<u8>,
}

impl Controls {
    pub fn new(variant: Variant) -> Self {
        Self {
            octave: 4,
            params: ParameterSet::for_variant(variant),
            held: None,
        }
    }

    /// Translate an action into the message for the audio thread.
    pub fn apply(&mut self, action: Action) -> Option<SynthMessage> {
        match action {
            Action::Note(semitone) => {
                let note = (i16::from(self.octave) + 1) * 12 + i16::from(semitone);
                let note = note.clamp(0, 127) as u8;
                self.held = Some(note);
                Some(SynthMessage::NoteOn { note, velocity: 100 })
            }
            Action::Release => self.held.take().map(|note| SynthMessage::NoteOff {
                note,
                velocity: 0,
            }),
            Action::Octave(delta) => {
                self.octave = (self.octave + delta).clamp(0, 8);
                None
            }
            Action::Waveform(waveform) => self.set(ParamId::Waveform, waveform.normalized()),
            Action::Nudge(id, delta) => self.set(id, self.params.normalized(id) + delta),
            Action::ToggleBypass => {
                let value = if self.params.bypass { 0.0 } else { 1.0 };
                self.set(ParamId::Bypass, value)
            }
            Action::Quit => None,
        }
    }

    fn set(&mut self, id: ParamId, value: f32) -> Option<SynthMessage> {
        self.params.set_normalized(id, value);
        Some(SynthMessage::Param {
            id,
            value: self.params.normalized(id),
        })
    }

    pub fn status(&self) -> String {
        let p = &self.params;
        format!(
            "oct {} | {:?} | tone {:.2} res {:.2} gain {:.2} | {}",
            self.octave,
            p.waveform,
            p.tone,
            p.resonance,
            p.gain,
            if p.bypass { "BYPASS" } else { "on" }
        )
    }
}
