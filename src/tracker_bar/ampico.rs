//! Ampico A and B hole offsets.
//!
//! Ampico expression holes are punched longer than note holes, but the
//! MIDI note carries the musical length, so the shaped holes are taken in
//! at both ends. Ampico B intensity holes sit 1/64" later than the note
//! timing.

use std::collections::HashMap;

use super::{hole_index, HoleOffset};

/// Length of an ordinary note hole, in inches.
const NORMAL_HOLE_LEN: f64 = 0.0625;
/// Fast crescendo, sustain pedal and amplifier holes.
const TYPE1_HOLE_LEN: f64 = 0.175;
/// Slow crescendo and soft pedal holes.
const TYPE2_HOLE_LEN: f64 = 0.34;
/// Ampico B intensity shift. Measured rolls show 1/64", not 1/32".
const INTENSITY_SHIFT: f64 = 1.0 / 64.0;

struct Shapes {
    type1: HoleOffset,
    type2: HoleOffset,
    intensity: HoleOffset,
}

impl Shapes {
    fn at(dpi: u32) -> Self {
        let dpi = dpi as f64;
        let normal = NORMAL_HOLE_LEN * dpi;
        Self {
            type1: HoleOffset::shaped(TYPE1_HOLE_LEN * dpi, normal),
            type2: HoleOffset::shaped(TYPE2_HOLE_LEN * dpi, normal),
            intensity: HoleOffset::shifted(INTENSITY_SHIFT * dpi),
        }
    }
}

fn by_note(entries: &[(i32, HoleOffset)]) -> HashMap<i32, HoleOffset> {
    entries
        .iter()
        .map(|&(note, offset)| (hole_index(note), offset))
        .collect()
}

pub(super) fn ampico_a_offsets(dpi: u32) -> HashMap<i32, HoleOffset> {
    let s = Shapes::at(dpi);
    by_note(&[
        (16, s.type2),  // bass slow crescendo
        (18, s.type1),  // sustain pedal
        (20, s.type1),  // bass fast crescendo
        (109, s.type1), // treble fast crescendo
        (111, s.type2), // soft pedal
        (113, s.type2), // treble slow crescendo
    ])
}

pub(super) fn ampico_b_offsets(dpi: u32) -> HashMap<i32, HoleOffset> {
    let s = Shapes::at(dpi);
    by_note(&[
        (15, s.type1),      // amplifier
        (17, s.intensity),  // bass intensity 2
        (18, s.type1),      // sustain pedal
        (19, s.intensity),  // bass intensity 4
        (21, s.intensity),  // bass intensity 6
        (22, s.intensity),  // bass intensity cancel
        (107, s.intensity), // treble intensity cancel
        (108, s.intensity), // treble intensity 6
        (109, s.type1),     // treble fast crescendo
        (110, s.intensity), // treble intensity 4
        (111, s.type2),     // soft pedal
        (112, s.intensity), // treble intensity 2
        (113, s.type2),     // treble slow crescendo
    ])
}
