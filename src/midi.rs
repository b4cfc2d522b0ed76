//! Standard MIDI File input.
//!
//! Parsing is delegated to `midly`; this module only flattens each track
//! into [`TimedEvent`]s with absolute ticks. Delta-times of every event
//! count toward the track length, including events the converter ignores
//! (text meta events, program changes, end-of-track).

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use crate::error::{Result, RollError};
use crate::model::{EventStream, TimedEvent, Track};

/// Parse SMF bytes into an event stream.
pub fn parse_smf(data: &[u8]) -> Result<EventStream> {
    let smf = Smf::parse(data)?;
    let ppq = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        Timing::Timecode(fps, subframes) => {
            return Err(RollError::UnsupportedTiming(format!(
                "SMPTE timecode at {} fps, {subframes} ticks per frame",
                fps.as_f32()
            )))
        }
    };
    let tracks = smf.tracks.iter().map(|t| flatten_track(t)).collect();
    Ok(EventStream::new(ppq, tracks))
}

/// Read and parse a MIDI file.
pub fn read_smf<P: AsRef<std::path::Path>>(path: P) -> Result<EventStream> {
    let data = std::fs::read(path)?;
    parse_smf(&data)
}

fn flatten_track(events: &[TrackEvent<'_>]) -> Track {
    let mut tick: u64 = 0;
    let mut out = Vec::new();

    for event in events {
        tick += event.delta.as_int() as u64;
        match event.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(us_per_beat)) => {
                out.push(TimedEvent::TempoChange { us_per_beat: us_per_beat.as_int(), tick });
            }
            TrackEventKind::Midi { channel, message } => {
                let channel = channel.as_int();
                match message {
                    MidiMessage::NoteOn { key, vel } => out.push(TimedEvent::NoteOn {
                        channel,
                        note: key.as_int(),
                        velocity: vel.as_int(),
                        tick,
                    }),
                    MidiMessage::NoteOff { key, .. } => out.push(TimedEvent::NoteOff {
                        channel,
                        note: key.as_int(),
                        tick,
                    }),
                    MidiMessage::Controller { controller, value } => {
                        out.push(TimedEvent::ControlChange {
                            channel,
                            controller: controller.as_int(),
                            value: value.as_int(),
                            tick,
                        })
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Track { events: out, end_tick: tick }
}
