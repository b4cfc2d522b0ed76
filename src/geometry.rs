//! Hole geometry: from a tick interval to the shapes punched in the roll.
//!
//! Roll space runs upward from the roll start (tick 0 is just above the
//! start padding). Image space runs downward, so the first note of the
//! piece lands near the bottom of the image and the roll plays bottom to
//! top, the way the paper unwinds.

use crate::config::RollLayout;
use crate::tracker_bar::HoleOffset;
use crate::units::ticks_to_pixels;

/// Vertical extent of one hole in image rows, `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleSpan {
    pub top: i64,
    pub bottom: i64,
}

impl HoleSpan {
    pub fn len(&self) -> i64 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

/// One painted shape. Bounding boxes are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleShape {
    /// A round chain-perforation dot of diameter `size`.
    Dot { x: i64, y: i64, size: i64 },
    /// A slot with rounded ends.
    Slot {
        x: i64,
        top: i64,
        bottom: i64,
        width: i64,
        radius: i64,
    },
}

impl HoleShape {
    /// First image row covered by the shape.
    pub fn top(&self) -> i64 {
        match *self {
            HoleShape::Dot { y, .. } => y,
            HoleShape::Slot { top, .. } => top,
        }
    }

    /// Last image row covered by the shape.
    pub fn bottom(&self) -> i64 {
        match *self {
            HoleShape::Dot { y, size, .. } => y + size,
            HoleShape::Slot { bottom, .. } => bottom,
        }
    }
}

/// Total image height for a roll of `total_ticks`: music plus start and
/// end padding, stretched by the acceleration at the roll end.
pub fn image_height(layout: &RollLayout, total_ticks: u64, bpm: f64, ppq: u16) -> i64 {
    let music = ticks_to_pixels(total_ticks, layout.dpi, layout.tempo, bpm, ppq);
    let px = (music + layout.start_pad_px + layout.end_pad_px) as f64;
    layout.acceleration.apply(px) as i64
}

/// Geometry of every hole on one roll: layout plus the timing and image
/// height fixed when the roll was allocated.
#[derive(Debug, Clone, Copy)]
pub struct HoleGeometry {
    layout: RollLayout,
    bpm: f64,
    ppq: u16,
    image_height: i64,
}

impl HoleGeometry {
    pub fn new(layout: RollLayout, bpm: f64, ppq: u16, image_height: i64) -> Self {
        Self { layout, bpm, ppq, image_height }
    }

    pub fn layout(&self) -> &RollLayout {
        &self.layout
    }

    pub fn image_height(&self) -> i64 {
        self.image_height
    }

    fn ticks_to_pixels(&self, ticks: u64) -> i64 {
        ticks_to_pixels(ticks, self.layout.dpi, self.layout.tempo, self.bpm, self.ppq)
    }

    /// Hole edges in roll space before acceleration, as `(start, end)`.
    ///
    /// An off tick before the on tick (a note closed by a later track)
    /// counts as zero length.
    pub fn roll_span(&self, on_tick: u64, off_tick: u64, offset: Option<HoleOffset>) -> (f64, f64) {
        let hole_h = self.ticks_to_pixels(off_tick.saturating_sub(on_tick)) as f64;
        let mut y1 = (self.ticks_to_pixels(on_tick) + self.layout.start_pad_px) as f64;
        let mut y2 = y1 + hole_h;

        if let Some(offset) = offset {
            y1 += offset.top;
            y2 += offset.bottom;
        }

        let shorten = self.layout.shorten_px / 2.0;
        y1 += shorten;
        y2 -= shorten;

        // A hole is never shorter than it is wide.
        let min_len = self.layout.hole_width_px as f64;
        let len = y2 - y1;
        if len < min_len {
            let grow = (min_len - len) / 2.0;
            y1 -= grow;
            y2 += grow;
        }

        (y1, y2)
    }

    /// Hole extent in image rows.
    pub fn hole_span(&self, on_tick: u64, off_tick: u64, offset: Option<HoleOffset>) -> HoleSpan {
        let (y1, y2) = self.roll_span(on_tick, off_tick, offset);
        let accel = &self.layout.acceleration;
        let y1 = accel.apply(y1) as i64;
        let mut y2 = accel.apply(y2) as i64;
        // Truncation can eat a pixel below roll start.
        y2 = y2.max(y1 + self.layout.hole_width_px);

        HoleSpan {
            top: self.image_height - y2,
            bottom: self.image_height - y1,
        }
    }

    /// Shapes for a hole in the lane starting at `x`.
    ///
    /// Holes longer than the single-slot limit are chain-perforated: round
    /// dots walk down from the top, one hole width plus the chain spacing
    /// apart, and whatever remains is one rounded slot ending at the
    /// hole's bottom.
    pub fn perforations(&self, x: i64, span: HoleSpan) -> Vec<HoleShape> {
        let width = self.layout.hole_width_px;
        let pitch = self.layout.chain_spacing_px + width;
        let chain_until = span.bottom - self.layout.single_hole_max_len_px;

        let mut shapes = Vec::new();
        let mut y = span.top;
        while y < chain_until {
            shapes.push(HoleShape::Dot { x, y, size: width });
            y += pitch;
        }
        if y <= span.bottom {
            shapes.push(HoleShape::Slot {
                x,
                top: y,
                bottom: span.bottom,
                width,
                radius: width / 2,
            });
        }
        shapes
    }
}
