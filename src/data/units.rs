//! Length units and display-mode formatting.
//!
//! Canonical storage everywhere in the engine is meters (lengths) and
//! square meters (areas). Units only matter at two edges: parsing the
//! user's calibration input, and formatting values for the table and the
//! overlay labels.

use serde::{Deserialize, Serialize};

const M_PER_FT: f64 = 0.3048;
const M_PER_IN: f64 = 0.0254;
const M_PER_YD: f64 = 0.9144;

/// A length unit the calibration input accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Meters,
    Centimeters,
    Millimeters,
    Feet,
    Inches,
    Yards,
}

impl LengthUnit {
    /// All units, in the order the calibration unit selector cycles them.
    pub fn all() -> &'static [LengthUnit] {
        &[
            LengthUnit::Meters,
            LengthUnit::Feet,
            LengthUnit::Centimeters,
            LengthUnit::Millimeters,
            LengthUnit::Inches,
            LengthUnit::Yards,
        ]
    }

    /// Convert a value in this unit to canonical meters.
    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            LengthUnit::Meters => value,
            LengthUnit::Centimeters => value * 0.01,
            LengthUnit::Millimeters => value * 0.001,
            LengthUnit::Feet => value * M_PER_FT,
            LengthUnit::Inches => value * M_PER_IN,
            LengthUnit::Yards => value * M_PER_YD,
        }
    }

    /// Short label for the unit selector.
    pub fn label(self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Feet => "ft",
            LengthUnit::Inches => "in",
            LengthUnit::Yards => "yd",
        }
    }
}

/// Display mode for measured values. Only affects formatting and input
/// defaults; stored values stay metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    #[default]
    Metric,
    Imperial,
}

impl UnitMode {
    /// Wire string for the session snapshot ("metric" / "imperial").
    pub fn as_str(self) -> &'static str {
        match self {
            UnitMode::Metric => "metric",
            UnitMode::Imperial => "imperial",
        }
    }

    pub fn from_str(s: &str) -> Option<UnitMode> {
        match s {
            "metric" => Some(UnitMode::Metric),
            "imperial" => Some(UnitMode::Imperial),
            _ => None,
        }
    }

    /// Unit label baked into length values, e.g. "מ'" in the report table.
    pub fn length_label(self) -> &'static str {
        match self {
            UnitMode::Metric => "מ'",
            UnitMode::Imperial => "ft",
        }
    }

    /// Unit label baked into area values, e.g. "מ\"ר" in the report table.
    pub fn area_label(self) -> &'static str {
        match self {
            UnitMode::Metric => "מ\"ר",
            UnitMode::Imperial => "sq ft",
        }
    }

    /// Canonical meters to display units.
    pub fn length_from_meters(self, m: f64) -> f64 {
        match self {
            UnitMode::Metric => m,
            UnitMode::Imperial => m / M_PER_FT,
        }
    }

    /// Canonical square meters to display units.
    pub fn area_from_sq_meters(self, m2: f64) -> f64 {
        match self {
            UnitMode::Metric => m2,
            UnitMode::Imperial => m2 / (M_PER_FT * M_PER_FT),
        }
    }

    /// Format a canonical length with the unit label baked in.
    pub fn format_length(self, m: f64) -> String {
        format!("{:.2} {}", self.length_from_meters(m), self.length_label())
    }

    /// Format a canonical area with the unit label baked in.
    pub fn format_area(self, m2: f64) -> String {
        format!("{:.2} {}", self.area_from_sq_meters(m2), self.area_label())
    }
}
