//! Audio device and keyboard loop.

use std::io::{stdout, Write};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    style::Print,
    terminal::{self, ClearType},
};
use rtrb::RingBuffer;

use monovoice::{
    io::converter::fan_out,
    synth::{BlockInput, SynthMessage, VoiceEngine},
    EngineConfig, MAX_BLOCK_SIZE,
};

use super::{
    keys::{action_for, Action, Controls},
    midi,
};

const MESSAGE_CAPACITY: usize = 256;

/// Which MIDI port to play from, and on which 0-based channel.
#[derive(Debug, Clone)]
pub struct MidiInputArgs {
    pub port: String,
    pub channel: u8,
}

/// Note events the engine dropped, counted on the audio thread and
/// reported from the keyboard loop.
#[derive(Debug, Clone, Default)]
struct DroppedEvents(Arc<AtomicUsize>);

impl DroppedEvents {
    fn record(&self, count: usize) {
        if count > 0 {
            self.0.fetch_add(count, Ordering::Relaxed);
        }
    }

    fn take(&self) -> usize {
        self.0.swap(0, Ordering::Relaxed)
    }
}

pub fn run(config: EngineConfig, midi_args: Option<MidiInputArgs>) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0 as f64;
    let channels = usize::from(stream_config.channels()).max(1);

    let mut engine = VoiceEngine::new(config.with_sample_rate(sample_rate))?;
    engine.set_active(true);

    let (mut tx, mut rx) = RingBuffer::<SynthMessage>::new(MESSAGE_CAPACITY);
    let (midi_tx, mut midi_rx) = RingBuffer::<SynthMessage>::new(MESSAGE_CAPACITY);
    let _midi_connection = match midi_args {
        Some(args) => {
            let (port_name, connection) = midi::connect(&args.port, args.channel, midi_tx)?;
            log::info!("MIDI input from '{port_name}' on channel {}", args.channel + 1);
            Some(connection)
        }
        None => None,
    };

    let dropped = DroppedEvents::default();
    let dropped_in_callback = dropped.clone();
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _| {
            engine.drain(&mut rx);
            engine.drain(&mut midi_rx);
            dropped_in_callback.record(engine.take_dropped_events());

            for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                let frames = chunk.len() / channels;
                let block = &mut mono[..frames];
                engine.process_block(&BlockInput::default(), &mut [&mut *block]);
                fan_out(block, channels, chunk);
            }
        },
        |err| eprintln!("Audio error: {}", err),
        None,
    )?;
    stream.play()?;

    println!("=== monovoice ===");
    println!(
        "{:?} variant, {:?} pitch, {} Hz, {} channels",
        config.variant, config.pitch_mode, sample_rate, channels
    );
    println!("keys: a-k play, space release, z/x octave, 1-4 waveform");
    println!("      [ ] tone, , . resonance, - = gain, b bypass, q quit");

    terminal::enable_raw_mode()?;
    let result = keyboard_loop(&mut tx, Controls::new(config.variant), &dropped);
    terminal::disable_raw_mode()?;
    println!();
    result
}

fn keyboard_loop(
    tx: &mut rtrb::Producer<SynthMessage>,
    mut controls: Controls,
    dropped: &DroppedEvents,
) -> EyreResult<()> {
    let mut out = stdout();
    loop {
        let count = dropped.take();
        if count > 0 {
            log::warn!("dropped {count} note events: more than one block can hold");
        }
        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(controls.status())
        )?;
        out.flush()?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = action_for(key.code) else {
            continue;
        };
        if action == Action::Quit {
            if let Some(message) = controls.apply(Action::Release) {
                let _ = tx.push(message);
            }
            return Ok(());
        }
        if let Some(message) = controls.apply(action) {
            if tx.push(message).is_err() {
                log::warn!("message queue full, dropped {message:?}");
            }
        }
    }
}
