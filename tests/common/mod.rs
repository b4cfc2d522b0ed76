//! Shared fixtures: a tiny Standard MIDI File writer and roll inspection
//! helpers.

#![allow(dead_code)]

use midi2roll::{EventStream, RollConfig, RollImage, TimedEvent, Track, TrackerBar, TrackerBarKind};

pub const WHITE: u8 = 255;
pub const PAPER: u8 = 120;

/// A raw MIDI event at an absolute tick.
pub struct RawEvent {
    pub tick: u32,
    pub bytes: Vec<u8>,
}

pub fn tempo(tick: u32, us_per_beat: u32) -> RawEvent {
    RawEvent {
        tick,
        bytes: vec![
            0xFF,
            0x51,
            0x03,
            ((us_per_beat >> 16) & 0xFF) as u8,
            ((us_per_beat >> 8) & 0xFF) as u8,
            (us_per_beat & 0xFF) as u8,
        ],
    }
}

pub fn note_on(tick: u32, channel: u8, note: u8, velocity: u8) -> RawEvent {
    RawEvent { tick, bytes: vec![0x90 | channel, note, velocity] }
}

pub fn note_off(tick: u32, channel: u8, note: u8) -> RawEvent {
    RawEvent { tick, bytes: vec![0x80 | channel, note, 0] }
}

pub fn control(tick: u32, channel: u8, controller: u8, value: u8) -> RawEvent {
    RawEvent { tick, bytes: vec![0xB0 | channel, controller, value] }
}

/// Write a variable-length quantity.
fn write_vlq(out: &mut Vec<u8>, mut value: u32) {
    let mut buf = [0u8; 5];
    let mut i = 0;
    loop {
        buf[i] = (value & 0x7F) as u8;
        if i > 0 {
            buf[i] |= 0x80;
        }
        value >>= 7;
        i += 1;
        if value == 0 {
            break;
        }
    }
    for j in (0..i).rev() {
        out.push(buf[j]);
    }
}

/// Encode one track: a name meta event, the events, then end-of-track
/// at `end_tick` (or right after the last event).
pub fn encode_track(events: &[RawEvent], name: &str, end_tick: Option<u32>) -> Vec<u8> {
    let mut data = Vec::new();
    data.push(0x00);
    data.extend_from_slice(&[0xFF, 0x03]);
    write_vlq(&mut data, name.len() as u32);
    data.extend_from_slice(name.as_bytes());

    let mut last_tick = 0u32;
    for event in events {
        write_vlq(&mut data, event.tick - last_tick);
        data.extend_from_slice(&event.bytes);
        last_tick = event.tick;
    }

    let end = end_tick.unwrap_or(last_tick).max(last_tick);
    write_vlq(&mut data, end - last_tick);
    data.extend_from_slice(&[0xFF, 0x2F, 0x00]);
    data
}

/// Assemble an SMF Type 1 file.
pub fn build_smf(ppq: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"MThd");
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    out.extend_from_slice(&ppq.to_be_bytes());
    for track in tracks {
        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(track.len() as u32).to_be_bytes());
        out.extend_from_slice(track);
    }
    out
}

/// One-track stream at ppq 480 with the given events.
pub fn stream(events: Vec<TimedEvent>) -> EventStream {
    EventStream::new(480, vec![Track::from_events(events)])
}

/// 96 BPM tempo event.
pub fn tempo_96(tick: u64) -> TimedEvent {
    TimedEvent::TempoChange { us_per_beat: 625_000, tick }
}

/// Config of the 88-note reference roll, acceleration off.
pub fn reference_config() -> RollConfig {
    RollConfig {
        dpi: 300,
        tempo: 80,
        roll_width: 11.25,
        roll_side_margin: 0.25,
        hole_width: 0.07,
        leftest_hole_center: 0.14,
        rightest_hole_center: 0.14,
        compensate_accel: false,
        ..Default::default()
    }
}

/// Centre column of a hole's lane.
pub fn lane_centre(kind: TrackerBarKind, config: &RollConfig, hole: i32) -> i64 {
    let bar = TrackerBar::new(kind, config).unwrap();
    bar.lane_x(hole).unwrap() + config.layout().hole_width_px / 2
}

/// Runs of white pixels down column `x`, as inclusive `(first, last)` rows.
pub fn white_runs(image: &RollImage, x: i64) -> Vec<(i64, i64)> {
    let mut runs = Vec::new();
    let mut start = None;
    for y in 0..image.height() as i64 {
        let white = image.pixel(x, y) == Some(WHITE);
        match (white, start) {
            (true, None) => start = Some(y),
            (false, Some(s)) => {
                runs.push((s, y - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, image.height() as i64 - 1));
    }
    runs
}
