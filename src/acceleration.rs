//! Roll acceleration model.
//!
//! A paper roll speeds up as its take-up spool fills, so the linear feed
//! rate grows with the distance already played. The multiplier is
//! `(1 + rate_per_foot) ^ feet`, where `feet` is the distance from the
//! roll start.

use crate::units::INCHES_PER_FOOT;

/// `(1 + rate_per_foot) ^ (position_px / dpi / 12)`.
pub fn acceleration_rate(position_px: f64, dpi: u32, rate_per_foot: f64) -> f64 {
    let feet = position_px / dpi as f64 / INCHES_PER_FOOT;
    (1.0 + rate_per_foot).powf(feet)
}

/// Acceleration settings bound to one roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceleration {
    dpi: u32,
    rate_per_foot: f64,
}

impl Acceleration {
    pub fn new(dpi: u32, rate_per_foot: f64) -> Self {
        Self { dpi, rate_per_foot }
    }

    /// No acceleration: every position maps to itself.
    pub fn none(dpi: u32) -> Self {
        Self::new(dpi, 0.0)
    }

    pub fn rate_per_foot(&self) -> f64 {
        self.rate_per_foot
    }

    pub fn rate_at(&self, position_px: f64) -> f64 {
        acceleration_rate(position_px, self.dpi, self.rate_per_foot)
    }

    /// Scale a roll position by the multiplier at that position.
    pub fn apply(&self, position_px: f64) -> f64 {
        position_px * self.rate_at(position_px)
    }
}
