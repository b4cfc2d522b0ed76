//! Roll configuration.
//!
//! `RollConfig` is the immutable per-conversion parameter set, in inches
//! where it describes paper. Field names follow the JSON keys of the
//! tracker config files written by the desktop shell, so those files can
//! be passed straight to [`RollConfig::from_json`]. `RollLayout` is the
//! same configuration converted once to pixels.

use serde::{Deserialize, Serialize};

use crate::acceleration::Acceleration;
use crate::error::{Result, RollError};
use crate::tracker_bar::DuoArtSettings;
use crate::units::inches_to_pixels;

/// Blank paper before the first hole, in inches.
pub const ROLL_START_PAD: f64 = 2.0;
/// Blank paper after the last hole, in inches.
pub const ROLL_END_PAD: f64 = 2.0;

/// Grayscale value of the paper.
pub const ROLL_COLOR: u8 = 120;
/// Grayscale value of holes and side margins.
pub const HOLE_COLOR: u8 = 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    /// Output resolution in dots per inch
    pub dpi: u32,
    /// Roll tempo (feed rate setting, independent of the music's BPM)
    pub tempo: u32,
    /// Paper width in inches
    pub roll_width: f64,
    /// White margin painted on each side of the paper, in inches
    pub roll_side_margin: f64,
    /// Hole width in inches (also the minimum hole length)
    pub hole_width: f64,
    /// Gap between chain perforation dots, in inches
    pub chain_perf_spacing: f64,
    /// Longest single slot before a hole is chain-perforated, in inches
    pub single_hole_max_len: f64,
    /// Center of the leftmost hole from the left paper edge, in inches
    pub leftest_hole_center: f64,
    /// Center of the rightmost hole from the right paper edge, in inches
    pub rightest_hole_center: f64,
    /// Pixels removed from every hole (half at each end)
    pub shorten_len: f64,
    /// Compensate for roll acceleration
    pub compensate_accel: bool,
    /// Acceleration in percent per foot of roll played
    pub accel_rate: f64,
    /// Duo-Art organ hole assignments; defaults are used when absent
    pub detailed_settings: Option<DuoArtSettings>,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            tempo: 80,
            roll_width: 11.25,
            roll_side_margin: 0.25,
            hole_width: 0.07,
            chain_perf_spacing: 0.04,
            single_hole_max_len: 3.0,
            leftest_hole_center: 0.14,
            rightest_hole_center: 0.14,
            shorten_len: 4.0,
            compensate_accel: false,
            accel_rate: 0.45,
            detailed_settings: None,
        }
    }
}

impl RollConfig {
    /// Parse a config from JSON. Missing keys take their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RollConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Acceleration per foot as a fraction; zero when compensation is off.
    pub fn rate_per_foot(&self) -> f64 {
        if self.compensate_accel {
            self.accel_rate / 100.0
        } else {
            0.0
        }
    }

    /// Center of the rightmost hole from the left paper edge, in inches.
    pub fn rightmost_hole_center(&self) -> f64 {
        self.roll_width - self.rightest_hole_center
    }

    /// Reject configs that cannot produce a roll.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(RollError::InvalidConfig(msg));

        if self.dpi == 0 {
            return invalid("dpi must be positive".into());
        }
        if self.tempo == 0 {
            return invalid("tempo must be positive".into());
        }
        let lengths = [
            ("roll_width", self.roll_width),
            ("roll_side_margin", self.roll_side_margin),
            ("hole_width", self.hole_width),
            ("chain_perf_spacing", self.chain_perf_spacing),
            ("single_hole_max_len", self.single_hole_max_len),
            ("leftest_hole_center", self.leftest_hole_center),
            ("rightest_hole_center", self.rightest_hole_center),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a non-negative length, got {value}"));
            }
        }
        if self.roll_width <= 0.0 {
            return invalid("roll_width must be positive".into());
        }
        if inches_to_pixels(self.hole_width, self.dpi) <= 0 {
            return invalid(format!(
                "hole_width {} is less than one pixel at {} dpi",
                self.hole_width, self.dpi
            ));
        }
        if self.leftest_hole_center >= self.rightmost_hole_center() {
            return invalid(format!(
                "leftmost hole center {} must lie left of rightmost hole center {}",
                self.leftest_hole_center,
                self.rightmost_hole_center()
            ));
        }
        if !self.shorten_len.is_finite() {
            return invalid("shorten_len must be finite".into());
        }
        if !self.accel_rate.is_finite() || self.accel_rate <= -100.0 {
            return invalid(format!("accel_rate {} is out of range", self.accel_rate));
        }
        // A chain step longer than the single-slot limit would overshoot the
        // hole's bottom with its last dot.
        let layout = self.layout();
        let pitch = layout.chain_spacing_px + layout.hole_width_px;
        if layout.single_hole_max_len_px < pitch {
            return invalid(format!(
                "single_hole_max_len {} is shorter than one chain step ({pitch} px at {} dpi)",
                self.single_hole_max_len, self.dpi
            ));
        }
        Ok(())
    }

    /// Pixel layout for this config.
    pub fn layout(&self) -> RollLayout {
        let dpi = self.dpi;
        RollLayout {
            dpi,
            tempo: self.tempo,
            start_pad_px: inches_to_pixels(ROLL_START_PAD, dpi),
            end_pad_px: inches_to_pixels(ROLL_END_PAD, dpi),
            margin_px: inches_to_pixels(self.roll_side_margin, dpi),
            roll_width_px: inches_to_pixels(self.roll_width, dpi),
            hole_width_px: inches_to_pixels(self.hole_width, dpi),
            chain_spacing_px: inches_to_pixels(self.chain_perf_spacing, dpi),
            single_hole_max_len_px: inches_to_pixels(self.single_hole_max_len, dpi),
            shorten_px: self.shorten_len,
            acceleration: Acceleration::new(dpi, self.rate_per_foot()),
        }
    }
}

/// A `RollConfig` converted to pixels at its DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollLayout {
    pub dpi: u32,
    pub tempo: u32,
    pub start_pad_px: i64,
    pub end_pad_px: i64,
    pub margin_px: i64,
    pub roll_width_px: i64,
    pub hole_width_px: i64,
    pub chain_spacing_px: i64,
    pub single_hole_max_len_px: i64,
    pub shorten_px: f64,
    pub acceleration: Acceleration,
}

impl RollLayout {
    /// Paper plus both side margins.
    pub fn image_width(&self) -> i64 {
        self.roll_width_px + 2 * self.margin_px
    }
}
