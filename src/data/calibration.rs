//! Pixel-to-real-world scale calibration.
//!
//! Calibration is a two-step handshake: the user draws a reference line on
//! the plan (pixel distance), then asserts its real-world length. Only once
//! both halves are present does a scale factor exist. Every real-unit value
//! in the engine is a pure function of (stored pixel value, current scale
//! factor), so re-running either step later rescales the whole session
//! without touching any drawn geometry.

use crate::data::geometry::{self, PlanPoint};
use crate::data::units::{LengthUnit, UnitMode};
use crate::error::EngineError;

/// Scale state for one editing session. Canonical unit is meters.
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    reference_pixel_distance: Option<f64>,
    reference_real_m: Option<f64>,
    meters_per_pixel: Option<f64>,
    /// Display/input mode only; stored values are always metric.
    pub unit_mode: UnitMode,
}

impl Calibration {
    /// Store the pixel length of a freshly drawn reference line.
    ///
    /// Does not derive a scale factor yet; that needs the asserted real
    /// distance. A zero-length or non-finite line is rejected and leaves
    /// the previous reference (if any) untouched.
    pub fn set_reference_line(&mut self, p1: PlanPoint, p2: PlanPoint) -> Result<f64, EngineError> {
        if !geometry::is_finite_point(p1) || !geometry::is_finite_point(p2) {
            return Err(EngineError::InvalidCalibrationInput(
                "reference line coordinates must be finite",
            ));
        }
        let px = geometry::dist(p1, p2);
        if px <= 0.0 {
            return Err(EngineError::InvalidCalibrationInput(
                "reference line must have non-zero length",
            ));
        }
        self.reference_pixel_distance = Some(px);
        Ok(px)
    }

    /// Assert the real-world length of the current reference line and
    /// derive `meters_per_pixel`.
    ///
    /// `value` is interpreted in `unit` and converted to canonical meters.
    /// Fails if the value is non-positive or non-finite, or if no reference
    /// line has been set yet. On success the new scale factor is returned;
    /// the caller is responsible for recomputing dependent measurements.
    pub fn set_reference_distance(
        &mut self,
        value: f64,
        unit: LengthUnit,
    ) -> Result<f64, EngineError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(EngineError::InvalidCalibrationInput(
                "reference distance must be positive and finite",
            ));
        }
        let px = self.reference_pixel_distance.ok_or(
            EngineError::InvalidCalibrationInput("no reference line has been drawn yet"),
        )?;
        let meters = unit.to_meters(value);
        let mpp = meters / px;
        self.reference_real_m = Some(meters);
        self.meters_per_pixel = Some(mpp);
        Ok(mpp)
    }

    /// The derived scale factor, if calibration has completed at least once.
    pub fn meters_per_pixel(&self) -> Option<f64> {
        self.meters_per_pixel
    }

    pub fn is_calibrated(&self) -> bool {
        self.meters_per_pixel.is_some()
    }

    /// Pixel length of the current reference line, if one has been drawn.
    pub fn reference_pixel_distance(&self) -> Option<f64> {
        self.reference_pixel_distance
    }

    /// Asserted real length of the reference line, in canonical meters.
    pub fn reference_real_m(&self) -> Option<f64> {
        self.reference_real_m
    }

    /// Rebuild calibration from a persisted session snapshot. The snapshot
    /// carries only the derived scale factor; a fresh reference line must be
    /// drawn before `set_reference_distance` can succeed again.
    pub(crate) fn from_snapshot(meters_per_pixel: Option<f64>, unit_mode: UnitMode) -> Self {
        Self {
            reference_pixel_distance: None,
            reference_real_m: None,
            meters_per_pixel: meters_per_pixel.filter(|m| m.is_finite() && *m > 0.0),
            unit_mode,
        }
    }
}
