//! Data model for the timed event stream fed to the roll converter.
//!
//! The stream keeps the track structure of the source file: each track is
//! an ordered list of events stamped with absolute ticks counted from the
//! start of that track.

use serde::{Deserialize, Serialize};

/// A single channel or tempo event at an absolute tick within its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEvent {
    NoteOn {
        channel: u8,
        note: u8,
        velocity: u8,
        tick: u64,
    },
    NoteOff {
        channel: u8,
        note: u8,
        tick: u64,
    },
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
        tick: u64,
    },
    TempoChange {
        /// Microseconds per quarter note
        us_per_beat: u32,
        tick: u64,
    },
}

impl TimedEvent {
    /// Absolute tick of this event within its track.
    pub fn tick(&self) -> u64 {
        match *self {
            TimedEvent::NoteOn { tick, .. }
            | TimedEvent::NoteOff { tick, .. }
            | TimedEvent::ControlChange { tick, .. }
            | TimedEvent::TempoChange { tick, .. } => tick,
        }
    }
}

/// One track of the stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Events in file order (ticks are non-decreasing)
    pub events: Vec<TimedEvent>,
    /// Sum of every delta-time in the track, including events that are
    /// not represented in `events` (meta text, end-of-track, ...)
    pub end_tick: u64,
}

impl Track {
    /// Build a track whose end tick is the tick of its last event.
    pub fn from_events(events: Vec<TimedEvent>) -> Self {
        let end_tick = events.last().map_or(0, |e| e.tick());
        Self { events, end_tick }
    }
}

/// A parsed event stream: pulses per quarter note plus tracks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStream {
    /// Pulses (ticks) per quarter note from the file header
    pub ppq: u16,
    pub tracks: Vec<Track>,
}

impl EventStream {
    pub fn new(ppq: u16, tracks: Vec<Track>) -> Self {
        Self { ppq, tracks }
    }

    /// Longest track length in ticks.
    pub fn total_ticks(&self) -> u64 {
        self.tracks.iter().map(|t| t.end_tick).max().unwrap_or(0)
    }

    /// True if any track carries a tempo event.
    pub fn has_tempo(&self) -> bool {
        self.tracks.iter().any(|t| {
            t.events
                .iter()
                .any(|e| matches!(e, TimedEvent::TempoChange { .. }))
        })
    }

    /// Total number of events across all tracks.
    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(|t| t.events.len()).sum()
    }
}
