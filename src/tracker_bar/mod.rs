//! Tracker bars: note-to-hole mapping per instrument.
//!
//! Every tracker bar shares the same geometry engine and differs only in
//! data: how many holes it has, how (channel, note) and controller numbers
//! land on logical hole indices, and which holes get custom top/bottom
//! offsets.
//!
//! Logical hole index 0 is the leftmost hole and corresponds to tracker
//! note 15 ([`FIRST_HOLE_NOTE`]).

mod ampico;
mod duo_art;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::config::RollConfig;
use crate::error::{Result, RollError};
use crate::units::inches_to_pixels;

pub use duo_art::{ControlSection, DuoArtSettings, HoleAssignment, KeyboardHoles, KeyboardSection};

/// Tracker note that lines up with logical hole 0.
pub const FIRST_HOLE_NOTE: i32 = 15;

/// Size of the note-on table; covers every addressable lane of every
/// tracker bar.
pub const NOTE_TABLE_SIZE: usize = 512;

/// The supported tracker bar layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerBarKind {
    EightyEightNote,
    AmpicoA,
    AmpicoB,
    DuoArtOrgan,
}

impl TrackerBarKind {
    pub const ALL: [TrackerBarKind; 4] = [
        TrackerBarKind::EightyEightNote,
        TrackerBarKind::AmpicoA,
        TrackerBarKind::AmpicoB,
        TrackerBarKind::DuoArtOrgan,
    ];

    /// Display name, as listed in the shell's tracker bar selector.
    pub fn name(&self) -> &'static str {
        match self {
            TrackerBarKind::EightyEightNote => "88-Note",
            TrackerBarKind::AmpicoA => "Ampico A",
            TrackerBarKind::AmpicoB => "Ampico B",
            TrackerBarKind::DuoArtOrgan => "Aeolian 176-note",
        }
    }
}

impl fmt::Display for TrackerBarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrackerBarKind {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "88-Note" | "88-note" => Ok(TrackerBarKind::EightyEightNote),
            "Ampico A" | "AmpicoA" => Ok(TrackerBarKind::AmpicoA),
            "Ampico B" | "AmpicoB" => Ok(TrackerBarKind::AmpicoB),
            "Aeolian 176-note" | "Duo-Art Organ" | "DuoArtOrgan" => {
                Ok(TrackerBarKind::DuoArtOrgan)
            }
            other => Err(RollError::UnknownTrackerBar(other.to_string())),
        }
    }
}

/// Signed pixel offsets added to a hole's start (`top`) and end (`bottom`)
/// edge in roll space, before shortening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleOffset {
    pub top: f64,
    pub bottom: f64,
}

impl HoleOffset {
    /// Offsets for a hole punched `shaped_px` long instead of `normal_px`;
    /// the extra length is taken off the note symmetrically.
    pub fn shaped(shaped_px: f64, normal_px: f64) -> Self {
        let half = (shaped_px - normal_px) / 2.0;
        Self { top: half, bottom: -half }
    }

    /// Move the whole hole by `px` without changing its length.
    pub fn shifted(px: f64) -> Self {
        Self { top: px, bottom: px }
    }
}

/// A tracker bar resolved against one roll config.
#[derive(Debug, Clone)]
pub struct TrackerBar {
    kind: TrackerBarKind,
    hole_count: usize,
    lane_count: usize,
    control_map: Vec<(u8, i32)>,
    note_map: HashMap<(u8, u8), i32>,
    offsets: HashMap<i32, HoleOffset>,
    lanes: Vec<i64>,
}

impl TrackerBar {
    /// Look up a tracker bar by display name.
    pub fn from_name(name: &str, config: &RollConfig) -> Result<Self> {
        Self::new(name.parse()?, config)
    }

    pub fn new(kind: TrackerBarKind, config: &RollConfig) -> Result<Self> {
        let dpi = config.dpi;
        let (hole_count, lane_count, control_map, note_map, offsets) = match kind {
            TrackerBarKind::EightyEightNote => (
                100,
                128,
                vec![(64, hole_index(18)), (67, hole_index(113))],
                HashMap::new(),
                HashMap::new(),
            ),
            TrackerBarKind::AmpicoA => {
                (100, 128, Vec::new(), HashMap::new(), ampico::ampico_a_offsets(dpi))
            }
            TrackerBarKind::AmpicoB => {
                (100, 128, Vec::new(), HashMap::new(), ampico::ampico_b_offsets(dpi))
            }
            TrackerBarKind::DuoArtOrgan => {
                let settings = config.detailed_settings.clone().unwrap_or_default();
                (
                    duo_art::HOLE_COUNT,
                    duo_art::LANE_COUNT,
                    Vec::new(),
                    duo_art::note_map(&settings)?,
                    duo_art::offsets(dpi),
                )
            }
        };

        Ok(Self {
            kind,
            hole_count,
            lane_count,
            control_map,
            note_map,
            offsets,
            lanes: lane_table(config, hole_count),
        })
    }

    pub fn kind(&self) -> TrackerBarKind {
        self.kind
    }

    /// Number of physical holes across the bar (sets the lane pitch).
    pub fn hole_count(&self) -> usize {
        self.hole_count
    }

    /// Width of the addressable index space reserved for this bar in the
    /// note-on table. Only indices below [`Self::hole_count`] are punched.
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Logical hole index for a note event. Notes without a channel
    /// mapping use the tracker note directly.
    pub fn resolve_hole_index(&self, channel: u8, note: u8) -> i32 {
        self.note_map
            .get(&(channel, note))
            .copied()
            .unwrap_or_else(|| hole_index(note as i32))
    }

    /// Logical hole index for a control change, if the controller drives
    /// a hole on this tracker bar.
    pub fn resolve_control_hole_index(&self, controller: u8) -> Option<i32> {
        self.control_map
            .iter()
            .find(|(cc, _)| *cc == controller)
            .map(|&(_, hole)| hole)
    }

    pub fn offset(&self, hole: i32) -> Option<HoleOffset> {
        self.offsets.get(&hole).copied()
    }

    pub fn offsets(&self) -> &HashMap<i32, HoleOffset> {
        &self.offsets
    }

    /// True if `hole` is a physical hole on this bar.
    pub fn contains(&self, hole: i32) -> bool {
        hole >= 0 && (hole as usize) < self.hole_count
    }

    /// Left pixel edge of the hole's lane, margin included.
    pub fn lane_x(&self, hole: i32) -> Option<i64> {
        if self.contains(hole) {
            Some(self.lanes[hole as usize])
        } else {
            None
        }
    }

    pub fn lanes(&self) -> &[i64] {
        &self.lanes
    }
}

/// Logical hole index of a tracker note.
pub fn hole_index(note: i32) -> i32 {
    note - FIRST_HOLE_NOTE
}

/// Left edge of every hole's lane, holes spaced evenly between the
/// leftmost and rightmost hole centers.
fn lane_table(config: &RollConfig, hole_count: usize) -> Vec<i64> {
    let left = config.leftest_hole_center;
    let right = config.rightmost_hole_center();
    let pitch = (right - left) / (hole_count - 1) as f64;
    (0..hole_count)
        .map(|i| {
            let inches =
                config.roll_side_margin + left + i as f64 * pitch - config.hole_width / 2.0;
            inches_to_pixels(inches, config.dpi)
        })
        .collect()
}
