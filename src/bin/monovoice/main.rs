//! monovoice - play the voice from the terminal keyboard
//!
//! Run with: cargo run -- [--filtered] [--pitch knob|note] [--midi NAME]

mod app;
mod keys;
mod midi;

use clap::{Parser, ValueEnum};
use monovoice::{EngineConfig, PitchMode, Variant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PitchArg {
    /// Pitch from the tone knob; keys only gate the envelope
    Knob,
    /// Pitch from the key played
    Note,
}

#[derive(Debug, Parser)]
#[command(name = "monovoice", version, about = "Monophonic synth voice on the default audio device")]
struct Args {
    /// Run the filtered variant (tone knob becomes the cutoff)
    #[arg(long)]
    filtered: bool,

    /// Pitch source; defaults to knob for the basic variant, note for the filtered one
    #[arg(long, value_enum)]
    pitch: Option<PitchArg>,

    /// Also play from the first MIDI input port whose name contains NAME
    #[arg(long, value_name = "NAME")]
    midi: Option<String>,

    /// MIDI channel to listen on
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=16))]
    midi_channel: u8,

    /// Print the available MIDI input ports and exit
    #[arg(long)]
    list_midi: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    if args.list_midi {
        for name in midi::port_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    let variant = if args.filtered {
        Variant::Filtered
    } else {
        Variant::Basic
    };
    let mut config = EngineConfig::for_variant(variant);
    if let Some(pitch) = args.pitch {
        config = config.with_pitch_mode(match pitch {
            PitchArg::Knob => PitchMode::Knob,
            PitchArg::Note => PitchMode::Note,
        });
    }
    config.validate()?;

    let midi = args.midi.map(|port| app::MidiInputArgs {
        port,
        channel: args.midi_channel - 1,
    });
    app::run(config, midi)
}
