use crate::{
    io::midi::MidiEvent,
    synth::{message::SynthMessage, params::ParamId},
};

/// Parameter driven by a MIDI controller number, if any.
pub fn controller_param(controller: u8) -> Option<ParamId> {
    match controller {
        7 => Some(ParamId::Gain),
        71 => Some(ParamId::Resonance),
        74 => Some(ParamId::Tone),
        _ => None,
    }
}

/// Message for a MIDI event on `channel_filter`. Controllers without a
/// mapping and events on other channels are dropped.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff {
            channel,
            key,
            velocity,
        } if channel == channel_filter => Some(SynthMessage::NoteOff {
            note: key,
            velocity,
        }),
        // CC 123: all notes off
        MidiEvent::ControlChange {
            channel,
            controller: 123,
            ..
        } if channel == channel_filter => Some(SynthMessage::AllNotesOff),
        MidiEvent::ControlChange {
            channel,
            controller,
            value,
        } if channel == channel_filter => {
            controller_param(controller).map(|id| SynthMessage::Param {
                id,
                value: f32::from(value) / 127.0,
            })
        }
        _ => None,
    }
}

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f64 {
    440.0 * 2.0_f64.powf((f64::from(note) - 69.0) / 12.0)
}

/// Copy a mono block into every channel of an interleaved buffer.
/// Writes as many frames as both sides hold.
pub fn fan_out(mono: &[f32], channels: usize, interleaved: &mut [f32]) {
    if channels == 0 {
        return;
    }
    for (frame, &sample) in interleaved.chunks_exact_mut(channels).zip(mono) {
        frame.fill(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_frequencies() {
        assert!((midi_note_to_freq(69) - 440.0).abs() < 1e-9);
        assert!((midi_note_to_freq(81) - 880.0).abs() < 1e-9);
        assert!((midi_note_to_freq(60) - 261.625_565).abs() < 1e-5);
    }

    #[test]
    fn channel_filter_applies() {
        let on = MidiEvent::NoteOn {
            channel: 2,
            key: 60,
            velocity: 90,
        };
        assert_eq!(
            midi_to_synth(on, 2),
            Some(SynthMessage::NoteOn {
                note: 60,
                velocity: 90
            })
        );
        assert_eq!(midi_to_synth(on, 0), None);
    }

    #[test]
    fn all_notes_off_controller() {
        let cc = MidiEvent::ControlChange {
            channel: 0,
            controller: 123,
            value: 0,
        };
        assert_eq!(midi_to_synth(cc, 0), Some(SynthMessage::AllNotesOff));
    }

    #[test]
    fn mapped_controllers_become_parameter_changes() {
        let cutoff = MidiEvent::ControlChange {
            channel: 0,
            controller: 74,
            value: 127,
        };
        assert_eq!(
            midi_to_synth(cutoff, 0),
            Some(SynthMessage::Param {
                id: ParamId::Tone,
                value: 1.0
            })
        );

        let volume = MidiEvent::from_bytes(&[0xb0, 7, 0]).unwrap();
        assert_eq!(
            midi_to_synth(volume, 0),
            Some(SynthMessage::Param {
                id: ParamId::Gain,
                value: 0.0
            })
        );

        let modwheel = MidiEvent::from_bytes(&[0xb0, 1, 64]).unwrap();
        assert_eq!(midi_to_synth(modwheel, 0), None);
    }

    #[test]
    fn fans_mono_out_to_every_channel() {
        let mono = [1.0, 2.0, 3.0];
        let mut out = [0.0f32; 6];
        fan_out(&mono, 2, &mut out);
        assert_eq!(out, [1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);

        let mut short = [9.0f32; 8];
        fan_out(&mono[..1], 4, &mut short);
        assert_eq!(short, [1.0, 1.0, 1.0, 1.0, 9.0, 9.0, 9.0, 9.0]);
    }
}
