//! MIDI input from a hardware or virtual port.

use color_eyre::eyre::{eyre, Result as EyreResult};
use midir::{MidiInput, MidiInputConnection};
use rtrb::Producer;

use monovoice::{
    io::{converter::midi_to_synth, midi::MidiEvent},
    synth::SynthMessage,
};

const CLIENT_NAME: &str = "monovoice";

fn open_input() -> EyreResult<MidiInput> {
    MidiInput::new(CLIENT_NAME).map_err(|err| eyre!("failed to open MIDI input: {err}"))
}

/// Names of the MIDI input ports currently visible.
pub fn port_names() -> EyreResult<Vec<String>> {
    let midi_in = open_input()?;
    Ok(midi_in
        .ports()
        .iter()
        .filter_map(|port| midi_in.port_name(port).ok())
        .collect())
}

/// Connect to the first port whose name contains `name` and forward its
/// messages on `channel` (0-based) into `tx`. Input stops when the returned
/// connection is dropped.
pub fn connect(
    name: &str,
    channel: u8,
    mut tx: Producer<SynthMessage>,
) -> EyreResult<(String, MidiInputConnection<()>)> {
    let midi_in = open_input()?;
    let (port, port_name) = midi_in
        .ports()
        .into_iter()
        .find_map(|port| {
            let port_name = midi_in.port_name(&port).ok()?;
            port_name.contains(name).then_some((port, port_name))
        })
        .ok_or_else(|| eyre!("no MIDI input port matching '{name}'"))?;

    let connection = midi_in
        .connect(
            &port,
            "monovoice-in",
            move |_stamp, bytes, _| {
                let message = MidiEvent::from_bytes(bytes).and_then(|event| midi_to_synth(event, channel));
                let Some(message) = message else {
                    return;
                };
                if tx.push(message).is_err() {
                    log::warn!("MIDI queue full, dropped {message:?}");
                }
            },
            (),
        )
        .map_err(|err| eyre!("failed to connect to MIDI port '{port_name}': {err}"))?;
    Ok((port_name, connection))
}
