//! The conversion driver: walks an event stream and punches the roll.
//!
//! A [`RollConverter`] runs exactly one conversion:
//!
//! ```text
//! Idle ──convert──▶ AwaitingTempo ──first tempo──▶ Streaming ──▶ Done
//!                         │                            │
//!                         └────────── error ───────────┴──▶ Failed
//! ```
//!
//! The image height depends on the BPM, so nothing is allocated until the
//! first tempo event. Events that come before it are dropped. A stream
//! with no tempo event at all streams from the start at the default BPM.
//!
//! Tracks are walked one after another, each with its own tick counter,
//! and share a single note-on table.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{RollConfig, RollLayout, HOLE_COLOR, ROLL_COLOR};
use crate::error::{Result, RollError};
use crate::geometry::{image_height, HoleGeometry};
use crate::model::{EventStream, TimedEvent};
use crate::raster::encode::{encode_png, write_png};
use crate::raster::RollImage;
use crate::tracker_bar::{TrackerBar, TrackerBarKind, NOTE_TABLE_SIZE};
use crate::units::{bpm_from_us_per_beat, pixels_to_feet, DEFAULT_BPM, METERS_PER_FOOT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Idle,
    AwaitingTempo,
    Streaming,
    Done,
    Failed,
}

/// Tick at which each hole was opened. `None` means the hole is closed,
/// which is distinct from a hole opened at tick 0.
#[derive(Debug, Clone)]
struct NoteOnTicks {
    ticks: Vec<Option<u64>>,
}

impl NoteOnTicks {
    fn new() -> Self {
        Self { ticks: vec![None; NOTE_TABLE_SIZE] }
    }

    fn open(&mut self, hole: usize, tick: u64) {
        self.ticks[hole] = Some(tick);
    }

    /// Close the hole, returning its on tick if it was open.
    fn close(&mut self, hole: usize) -> Option<u64> {
        self.ticks[hole].take()
    }
}

/// Roll being punched, allocated at the first tempo event.
struct Canvas {
    image: RollImage,
    geometry: HoleGeometry,
    note_on: NoteOnTicks,
    bpm: f64,
    holes_painted: usize,
    events_skipped: usize,
}

impl Canvas {
    fn allocate(layout: RollLayout, bpm: f64, ppq: u16, total_ticks: u64) -> Result<Self> {
        let height = image_height(&layout, total_ticks, bpm, ppq);
        let width = layout.image_width();
        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(RollError::InvalidConfig(format!(
                "roll image {width} x {height} px is out of range"
            )));
        };
        if w == 0 || h == 0 {
            return Err(RollError::InvalidConfig(format!("roll image {w} x {h} px is empty")));
        }
        if (w as u64).checked_mul(h as u64).map_or(true, |n| n > isize::MAX as u64) {
            return Err(RollError::InvalidConfig(format!("roll image {w} x {h} px is too large")));
        }

        let mut image = RollImage::new(w, h, ROLL_COLOR);
        image.paint_margins(layout.margin_px, layout.roll_width_px, HOLE_COLOR);

        Ok(Self {
            image,
            geometry: HoleGeometry::new(layout, bpm, ppq, height),
            note_on: NoteOnTicks::new(),
            bpm,
            holes_painted: 0,
            events_skipped: 0,
        })
    }

    fn handle(&mut self, tracker: &TrackerBar, event: &TimedEvent) {
        match *event {
            TimedEvent::NoteOn { channel, note, velocity, tick } if velocity > 0 => {
                let hole = tracker.resolve_hole_index(channel, note);
                self.open(tracker, hole, tick);
            }
            TimedEvent::NoteOn { channel, note, tick, .. }
            | TimedEvent::NoteOff { channel, note, tick } => {
                let hole = tracker.resolve_hole_index(channel, note);
                self.close(tracker, hole, tick);
            }
            TimedEvent::ControlChange { controller, value, tick, .. } => {
                if let Some(hole) = tracker.resolve_control_hole_index(controller) {
                    if value > 0 {
                        self.open(tracker, hole, tick);
                    } else {
                        self.close(tracker, hole, tick);
                    }
                }
            }
            // Only the first tempo event shapes the roll.
            TimedEvent::TempoChange { .. } => {}
        }
    }

    fn slot(&mut self, tracker: &TrackerBar, hole: i32, tick: u64) -> Option<usize> {
        if tracker.contains(hole) {
            Some(hole as usize)
        } else {
            warn!(hole, tick, "Skipping event outside the {} tracker bar", tracker.kind());
            self.events_skipped += 1;
            None
        }
    }

    fn open(&mut self, tracker: &TrackerBar, hole: i32, tick: u64) {
        if let Some(slot) = self.slot(tracker, hole, tick) {
            self.note_on.open(slot, tick);
        }
    }

    fn close(&mut self, tracker: &TrackerBar, hole: i32, off_tick: u64) {
        let Some(slot) = self.slot(tracker, hole, off_tick) else {
            return;
        };
        // Some files repeat note-offs; only the first one closes the hole.
        if let Some(on_tick) = self.note_on.close(slot) {
            self.punch(tracker, hole, on_tick, off_tick);
        }
    }

    fn punch(&mut self, tracker: &TrackerBar, hole: i32, on_tick: u64, off_tick: u64) {
        let Some(x) = tracker.lane_x(hole) else {
            return;
        };
        let span = self.geometry.hole_span(on_tick, off_tick, tracker.offset(hole));
        for shape in self.geometry.perforations(x, span) {
            self.image.paint_shape(&shape, HOLE_COLOR);
        }
        self.holes_painted += 1;
    }
}

/// Facts about a finished roll, serializable for hosts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollSummary {
    pub tracker_bar: String,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
    /// Roll tempo
    pub tempo: u32,
    /// Musical tempo from the first tempo event
    pub bpm: f64,
    pub ppq: u16,
    pub total_ticks: u64,
    pub length_feet: f64,
    pub length_meters: f64,
    pub holes_painted: usize,
    /// Events dropped for falling outside the tracker bar
    pub events_skipped: usize,
}

/// A finished roll image and its summary.
#[derive(Debug, Clone)]
pub struct ConvertedRoll {
    pub image: RollImage,
    pub summary: RollSummary,
}

impl ConvertedRoll {
    /// Encode as PNG with the roll's DPI.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image, self.summary.dpi)
    }

    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        write_png(&self.image, self.summary.dpi, path)
    }
}

/// One conversion session.
#[derive(Debug)]
pub struct RollConverter {
    config: RollConfig,
    tracker: TrackerBar,
    state: ConversionState,
}

impl RollConverter {
    /// Validate `config` and resolve the tracker bar by name.
    pub fn new(tracker_name: &str, config: RollConfig) -> Result<Self> {
        let kind: TrackerBarKind = tracker_name.parse()?;
        Self::with_kind(kind, config)
    }

    pub fn with_kind(kind: TrackerBarKind, config: RollConfig) -> Result<Self> {
        config.validate()?;
        let tracker = TrackerBar::new(kind, &config)?;
        Ok(Self { config, tracker, state: ConversionState::Idle })
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    pub fn tracker(&self) -> &TrackerBar {
        &self.tracker
    }

    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    /// Convert `stream` into a roll image. A converter runs once; later
    /// calls fail with [`RollError::SessionFinished`].
    pub fn convert(&mut self, stream: &EventStream) -> Result<ConvertedRoll> {
        if self.state != ConversionState::Idle {
            return Err(RollError::SessionFinished);
        }
        match self.run(stream) {
            Ok(roll) => {
                self.transition(ConversionState::Done);
                info!(
                    "Converted roll: {} x {} px, {:.1} ft, {} holes",
                    roll.summary.width_px,
                    roll.summary.height_px,
                    roll.summary.length_feet,
                    roll.summary.holes_painted
                );
                Ok(roll)
            }
            Err(e) => {
                self.transition(ConversionState::Failed);
                warn!("Conversion failed: {e}");
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: ConversionState) {
        debug!("Converter state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn run(&mut self, stream: &EventStream) -> Result<ConvertedRoll> {
        let ppq = stream.ppq;
        if ppq == 0 {
            return Err(RollError::InvalidConfig("ppq must be positive".into()));
        }
        let layout = self.config.layout();
        let total_ticks = stream.total_ticks();

        self.transition(ConversionState::AwaitingTempo);
        let mut canvas = None;
        if !stream.has_tempo() {
            debug!("No tempo event, using {DEFAULT_BPM} BPM");
            canvas = Some(Canvas::allocate(layout, DEFAULT_BPM, ppq, total_ticks)?);
            self.transition(ConversionState::Streaming);
        }

        let mut pre_tempo = 0usize;
        for track in &stream.tracks {
            for event in &track.events {
                if let Some(canvas) = canvas.as_mut() {
                    canvas.handle(&self.tracker, event);
                } else if let TimedEvent::TempoChange { us_per_beat, tick } = *event {
                    if us_per_beat == 0 {
                        return Err(RollError::InvalidTempo { tick, us_per_beat });
                    }
                    let bpm = bpm_from_us_per_beat(us_per_beat);
                    info!("Tempo event at tick {tick}: {bpm:.2} BPM");
                    canvas = Some(Canvas::allocate(layout, bpm, ppq, total_ticks)?);
                    self.transition(ConversionState::Streaming);
                } else {
                    pre_tempo += 1;
                }
            }
        }
        if pre_tempo > 0 {
            debug!("Dropped {pre_tempo} events before the first tempo event");
        }

        let Some(canvas) = canvas else {
            // has_tempo() guarantees a tempo event was seen
            return Err(RollError::InvalidConfig("stream has no usable tempo event".into()));
        };

        let height_px = canvas.image.height();
        let length_feet = pixels_to_feet(height_px as i64, layout.dpi);
        let summary = RollSummary {
            tracker_bar: self.tracker.kind().name().to_string(),
            width_px: canvas.image.width(),
            height_px,
            dpi: layout.dpi,
            tempo: layout.tempo,
            bpm: canvas.bpm,
            ppq,
            total_ticks,
            length_feet,
            length_meters: length_feet * METERS_PER_FOOT,
            holes_painted: canvas.holes_painted,
            events_skipped: canvas.events_skipped,
        };
        Ok(ConvertedRoll { image: canvas.image, summary })
    }
}
