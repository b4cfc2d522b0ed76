//! Aeolian Duo-Art / 176-note organ tracker bar.
//!
//! Two interleaved 58-note keyboards (Great and Swell) occupy the middle of
//! the bar, with a bank of control holes per manual at each end. Which MIDI
//! channel and note drives each hole comes from [`DuoArtSettings`], the
//! "detailed settings" table edited in the desktop shell.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::HoleOffset;
use crate::error::{Result, RollError};
use crate::units::inches_to_pixels;

pub(super) const HOLE_COUNT: usize = 176;
pub(super) const LANE_COUNT: usize = 256;

/// Even holes are punched this far ahead of their odd neighbours.
const EVEN_HOLE_LEAD: f64 = 0.25;

/// One hole's MIDI assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleAssignment {
    pub hole_no: u32,
    pub midi_note_no: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardHoles {
    #[serde(rename = "Lowest Note")]
    pub lowest: HoleAssignment,
    #[serde(rename = "Highest Note")]
    pub highest: HoleAssignment,
}

/// A playing keyboard: consecutive semitones every second hole between the
/// lowest and highest hole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardSection {
    /// 1-based MIDI channel
    #[serde(rename = "Midi Channel")]
    pub midi_channel: u8,
    #[serde(rename = "Holes")]
    pub holes: KeyboardHoles,
}

/// A bank of named control holes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSection {
    /// 1-based MIDI channel
    #[serde(rename = "Midi Channel")]
    pub midi_channel: u8,
    #[serde(rename = "Holes")]
    pub holes: BTreeMap<String, HoleAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuoArtSettings {
    #[serde(rename = "Upper playing 58 notes (Swell)")]
    pub upper_playing: KeyboardSection,
    #[serde(rename = "Upper control holes (Swell)")]
    pub upper_control: ControlSection,
    #[serde(rename = "Lower playing 58 notes (Great)")]
    pub lower_playing: KeyboardSection,
    #[serde(rename = "Lower control holes (Great)")]
    pub lower_control: ControlSection,
}

impl Default for DuoArtSettings {
    fn default() -> Self {
        Self {
            upper_playing: keyboard(2, 32, 146, 36),
            upper_control: control_bank(16, "Swell", 1),
            lower_playing: keyboard(1, 33, 147, 36),
            lower_control: control_bank(15, "Great", 0),
        }
    }
}

fn keyboard(channel: u8, lowest_hole: u32, highest_hole: u32, lowest_note: u8) -> KeyboardSection {
    let span = ((highest_hole - lowest_hole) / 2) as u8;
    KeyboardSection {
        midi_channel: channel,
        holes: KeyboardHoles {
            lowest: HoleAssignment { hole_no: lowest_hole, midi_note_no: lowest_note },
            highest: HoleAssignment { hole_no: highest_hole, midi_note_no: lowest_note + span },
        },
    }
}

/// Sixteen control holes left of the keyboards and fourteen right of them,
/// every second hole starting at `first_hole`.
fn control_bank(channel: u8, manual: &str, first_hole: u32) -> ControlSection {
    let left = (0..16).map(|k| first_hole + 2 * k);
    let right = (0..14).map(|k| 148 + first_hole + 2 * k);
    let holes = left
        .chain(right)
        .enumerate()
        .map(|(k, hole_no)| {
            (
                format!("{manual} {}", k + 1),
                HoleAssignment { hole_no, midi_note_no: k as u8 },
            )
        })
        .collect();
    ControlSection { midi_channel: channel, holes }
}

fn channel_index(section: &str, midi_channel: u8) -> Result<u8> {
    if (1..=16).contains(&midi_channel) {
        Ok(midi_channel - 1)
    } else {
        Err(RollError::InvalidConfig(format!(
            "{section}: MIDI channel {midi_channel} is not in 1..=16"
        )))
    }
}

fn check_hole(section: &str, hole_no: u32) -> Result<i32> {
    if (hole_no as usize) < HOLE_COUNT {
        Ok(hole_no as i32)
    } else {
        Err(RollError::InvalidConfig(format!(
            "{section}: hole {hole_no} is outside the {HOLE_COUNT}-hole tracker bar"
        )))
    }
}

/// (0-based channel, MIDI note) → logical hole index. Keyboard entries are
/// applied after control entries and win on conflict.
pub(super) fn note_map(settings: &DuoArtSettings) -> Result<HashMap<(u8, u8), i32>> {
    let mut map = HashMap::new();

    for (name, section) in [
        ("Lower control holes (Great)", &settings.lower_control),
        ("Upper control holes (Swell)", &settings.upper_control),
    ] {
        let channel = channel_index(name, section.midi_channel)?;
        for assignment in section.holes.values() {
            let hole = check_hole(name, assignment.hole_no)?;
            map.insert((channel, assignment.midi_note_no), hole);
        }
    }

    for (name, section) in [
        ("Lower playing 58 notes (Great)", &settings.lower_playing),
        ("Upper playing 58 notes (Swell)", &settings.upper_playing),
    ] {
        let channel = channel_index(name, section.midi_channel)?;
        let lowest = check_hole(name, section.holes.lowest.hole_no)?;
        let highest = check_hole(name, section.holes.highest.hole_no)?;
        if lowest > highest {
            return Err(RollError::InvalidConfig(format!(
                "{name}: lowest hole {lowest} is above highest hole {highest}"
            )));
        }
        let notes = section.holes.lowest.midi_note_no..=127u8;
        for (hole, note) in (lowest..=highest).step_by(2).zip(notes) {
            map.insert((channel, note), hole);
        }
    }

    Ok(map)
}

pub(super) fn offsets(dpi: u32) -> HashMap<i32, HoleOffset> {
    let lead = inches_to_pixels(EVEN_HOLE_LEAD, dpi) as f64;
    (0..HOLE_COUNT as i32)
        .step_by(2)
        .map(|hole| (hole, HoleOffset::shifted(-lead)))
        .collect()
}
