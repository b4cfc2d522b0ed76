//! Physical-unit arithmetic: inches and ticks to roll pixels.
//!
//! All pixel results are truncated toward zero, never rounded, so that
//! generated rolls line up with rolls produced by earlier converters.

/// Default musical tempo when the stream has no tempo event.
pub const DEFAULT_BPM: f64 = 80.0;

/// Microseconds per minute, for tempo meta events.
pub const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Inches per foot, for roll-length reporting and the acceleration model.
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Meters per foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Paper feed per minute per roll-tempo unit is 1.2 inches. Kept as the
/// ratio 12/10 so integral inputs stay exact in floating point.
const FEED_NUMERATOR: f64 = 12.0;
const FEED_DENOMINATOR: f64 = 10.0;

/// `floor(inches * dpi)`.
pub fn inches_to_pixels(inches: f64, dpi: u32) -> i64 {
    (inches * dpi as f64).floor() as i64
}

/// Roll distance covered by `tick_len` ticks:
/// `floor(tick_len * dpi * tempo * 1.2 / (bpm * ppq))`.
///
/// `bpm` and `ppq` must be positive; the converter validates both before
/// calling.
pub fn ticks_to_pixels(tick_len: u64, dpi: u32, tempo: u32, bpm: f64, ppq: u16) -> i64 {
    let numerator = tick_len as f64 * dpi as f64 * tempo as f64 * FEED_NUMERATOR;
    let denominator = bpm * ppq as f64 * FEED_DENOMINATOR;
    (numerator / denominator).floor() as i64
}

/// BPM from a tempo meta event.
pub fn bpm_from_us_per_beat(us_per_beat: u32) -> f64 {
    MICROS_PER_MINUTE / us_per_beat as f64
}

/// Roll length in feet for an image height at the given DPI.
pub fn pixels_to_feet(px: i64, dpi: u32) -> f64 {
    px as f64 / dpi as f64 / INCHES_PER_FOOT
}
