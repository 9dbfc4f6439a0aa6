//! Serializable snapshot of a measurement session.
//!
//! This is the exact structure the enclosing report pipeline consumes: a
//! `measurementTable` array plus the calibration fields, serialized with
//! camelCase keys. The rows additionally carry the pixel geometry so a
//! reloaded session can recompute every real value from pixels — pixel
//! data is the source of truth, the baked display values are not.

use std::io::Write;
use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::data::geometry::PlanPoint;
use crate::data::measurement::{Measurement, Shape, ShapeKind};
use crate::data::units::UnitMode;

/// One row of the exported measurement table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRow {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    /// "calibration" / "distance" / "area".
    pub kind: String,
    /// Vertices in plan-image pixel coordinates.
    #[serde(default)]
    pub points: Vec<PlanPoint>,
    /// Raw pixel quantity (px or px²).
    pub pixel_measurement: f64,
    /// Real-world value converted to the session's display mode;
    /// `null` while uncalibrated.
    pub measurement: Option<f64>,
    /// Unit label baked in for the report table (e.g. "מ\"ר").
    pub unit: String,
    #[serde(default)]
    pub notes: String,
    /// Overlay color as "#rrggbb".
    pub color: String,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

impl MeasurementRow {
    pub fn from_measurement(m: &Measurement, mode: UnitMode) -> Self {
        let measurement = m.real_value.map(|v| match m.kind() {
            ShapeKind::Area => mode.area_from_sq_meters(v),
            _ => mode.length_from_meters(v),
        });
        Self {
            id: m.id,
            name: m.name.clone(),
            kind: m.kind().as_str().to_string(),
            points: m.shape.vertices(),
            pixel_measurement: m.pixel_value,
            measurement,
            unit: m.unit_label(mode).to_string(),
            notes: m.notes.clone(),
            color: color_to_hex(m.color),
            visible: m.visible,
        }
    }

    /// Rebuild the pixel shape this row was exported from. Fails on an
    /// unknown kind string or a vertex count too small for the kind.
    pub fn to_shape(&self) -> Result<Shape, String> {
        let kind = ShapeKind::from_str(&self.kind)
            .ok_or_else(|| format!("unknown kind {:?}", self.kind))?;
        match kind {
            ShapeKind::Calibration => match self.points.as_slice() {
                [p1, p2] => Ok(Shape::Calibration { p1: *p1, p2: *p2 }),
                other => Err(format!(
                    "calibration rows need exactly 2 points, got {}",
                    other.len()
                )),
            },
            ShapeKind::Distance => {
                if self.points.len() < 2 {
                    return Err(format!(
                        "distance rows need at least 2 points, got {}",
                        self.points.len()
                    ));
                }
                Ok(Shape::Distance {
                    points: self.points.clone(),
                })
            }
            ShapeKind::Area => {
                if self.points.len() < 3 {
                    return Err(format!(
                        "area rows need at least 3 points, got {}",
                        self.points.len()
                    ));
                }
                Ok(Shape::Area {
                    points: self.points.clone(),
                })
            }
        }
    }
}

/// Everything the session store persists for one plan: the measurement
/// table plus calibration state and source-file metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub measurement_table: Vec<MeasurementRow>,
    pub meters_per_pixel: Option<f64>,
    /// "metric" / "imperial".
    pub unit_mode: String,
    pub is_calibrated: bool,
    /// Source floor-plan image/PDF name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Rendered annotated-plan snapshot file name, produced by the overlay
    /// exporter (or the enclosing product), not by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png_export: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

/// `Color32` to "#rrggbb".
pub fn color_to_hex(c: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b())
}

/// "#rrggbb" back to `Color32`.
pub fn color_from_hex(s: &str) -> Option<Color32> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write the measurement table as CSV for spreadsheet import.
pub fn save_table_csv<P: AsRef<Path>>(path: P, rows: &[MeasurementRow]) -> std::io::Result<()> {
    let mut f = std::fs::File::create(path)?;
    writeln!(f, "order,name,kind,measurement,unit,notes")?;
    for (i, row) in rows.iter().enumerate() {
        let value = row
            .measurement
            .map(|v| format!("{:.3}", v))
            .unwrap_or_default();
        writeln!(
            f,
            "{},{},{},{},{},{}",
            i,
            csv_field(&row.name),
            row.kind,
            value,
            csv_field(&row.unit),
            csv_field(&row.notes)
        )?;
    }
    Ok(())
}
