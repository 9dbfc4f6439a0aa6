//! The measurement list's element type.

use egui::Color32;

use crate::data::geometry::{self, PlanPoint};
use crate::data::units::UnitMode;

/// Stable identifier of a measurement. Ids are handed out in creation
/// order and never reused within a session.
pub type MeasurementId = u64;

/// What a measurement measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// The calibration reference line itself.
    Calibration,
    /// An open polyline measured by total length.
    Distance,
    /// A closed polygon measured by area. The closing edge is implicit.
    Area,
}

impl ShapeKind {
    /// Wire string used in snapshots ("calibration" / "distance" / "area").
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Calibration => "calibration",
            ShapeKind::Distance => "distance",
            ShapeKind::Area => "area",
        }
    }

    pub fn from_str(s: &str) -> Option<ShapeKind> {
        match s {
            "calibration" => Some(ShapeKind::Calibration),
            "distance" => Some(ShapeKind::Distance),
            "area" => Some(ShapeKind::Area),
            _ => None,
        }
    }
}

/// Pixel geometry of one measurement. Each variant carries exactly the
/// fields its kind needs; there is no optional-field soup to keep in sync.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Calibration { p1: PlanPoint, p2: PlanPoint },
    Distance { points: Vec<PlanPoint> },
    Area { points: Vec<PlanPoint> },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Calibration { .. } => ShapeKind::Calibration,
            Shape::Distance { .. } => ShapeKind::Distance,
            Shape::Area { .. } => ShapeKind::Area,
        }
    }

    /// The vertices in draw order. For a calibration line these are its two
    /// endpoints; for an area the closing edge back to the first vertex is
    /// implied, not stored.
    pub fn vertices(&self) -> Vec<PlanPoint> {
        match self {
            Shape::Calibration { p1, p2 } => vec![*p1, *p2],
            Shape::Distance { points } | Shape::Area { points } => points.clone(),
        }
    }

    /// Raw geometric quantity in pixel space: length in px for lines and
    /// polylines, area in px² for polygons.
    pub fn pixel_value(&self) -> f64 {
        match self {
            Shape::Calibration { p1, p2 } => geometry::dist(*p1, *p2),
            Shape::Distance { points } => geometry::polyline_length(points),
            Shape::Area { points } => geometry::polygon_area(points),
        }
    }

    /// Where the overlay anchors this shape's value label.
    pub fn label_anchor(&self) -> Option<PlanPoint> {
        match self {
            Shape::Calibration { p1, p2 } => {
                Some([(p1[0] + p2[0]) * 0.5, (p1[1] + p2[1]) * 0.5])
            }
            Shape::Distance { points } => geometry::path_midpoint(points),
            Shape::Area { points } => geometry::centroid(points),
        }
    }
}

/// One named, colored, orderable user-drawn measurement.
///
/// `pixel_value` is frozen when the shape is committed and is the single
/// source of truth; `real_value` is re-derived from it whenever the scale
/// factor changes, never the other way around.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub id: MeasurementId,
    /// User-editable label. Defaults to an auto-generated unique name.
    pub name: String,
    pub shape: Shape,
    /// Raw quantity in pixel space (px or px²). Immutable once drawn.
    pub pixel_value: f64,
    /// Canonical real-world quantity (m or m²). `None` until the session
    /// has been calibrated — distinct from a genuine zero.
    pub real_value: Option<f64>,
    pub color: Color32,
    pub notes: String,
    /// Drawn on the overlay when true. Hidden measurements still export.
    pub visible: bool,
    /// Dense display/report position, maintained by the engine.
    pub order: usize,
}

impl Measurement {
    pub(crate) fn new(id: MeasurementId, name: String, shape: Shape, color: Color32) -> Self {
        let pixel_value = shape.pixel_value();
        Self {
            id,
            name,
            shape,
            pixel_value,
            real_value: None,
            color,
            notes: String::new(),
            visible: true,
            order: 0,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Display string for the real value in the given mode, with the unit
    /// label baked in; "—" while uncalibrated.
    pub fn value_label(&self, mode: UnitMode) -> String {
        match (self.real_value, self.kind()) {
            (None, _) => "—".to_string(),
            (Some(v), ShapeKind::Area) => mode.format_area(v),
            (Some(v), _) => mode.format_length(v),
        }
    }

    /// Unit label for this measurement's kind in the given mode.
    pub fn unit_label(&self, mode: UnitMode) -> &'static str {
        match self.kind() {
            ShapeKind::Area => mode.area_label(),
            _ => mode.length_label(),
        }
    }
}
