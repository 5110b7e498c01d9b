/// Raw channel-voice MIDI messages as a host or device delivers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    /// Decode a three-byte channel message. Running status, system messages
    /// and channel messages the voice has no use for (aftertouch, program
    /// change, pitch bend) yield `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let [status, data1, data2, ..] = *bytes else {
            return None;
        };
        let channel = status & 0x0f;
        let (data1, data2) = (data1 & 0x7f, data2 & 0x7f);

        match status & 0xf0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data1,
                velocity: data2,
            }),
            // Note-on with velocity 0 is a note-off by convention.
            0x90 if data2 == 0 => Some(MidiEvent::NoteOff {
                channel,
                key: data1,
                velocity: 0,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: data1,
                velocity: data2,
            }),
            0xb0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data1,
                value: data2,
            }),
            _ => None,
        }
    }
}
