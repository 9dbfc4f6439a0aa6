//! The measurement engine: calibration, the ordered measurement list, and
//! the in-progress sketch, owned together for one editing session.
//!
//! One instance per open plan, constructed by the caller and discarded when
//! the editing view goes away — there is no ambient global state. The UI
//! layer dispatches pointer and form events into the engine; the report
//! pipeline consumes [`SessionSnapshot`]s. Every public operation completes
//! synchronously and is atomic with respect to engine state: on any `Err`
//! nothing has changed.

use egui::Color32;
use tracing::warn;

use crate::color_scheme;
use crate::data::calibration::Calibration;
use crate::data::export::{MeasurementRow, SessionSnapshot};
use crate::data::geometry::PlanPoint;
use crate::data::measurement::{Measurement, MeasurementId, Shape, ShapeKind};
use crate::data::sketch::{SketchKind, SketchState};
use crate::data::units::{LengthUnit, UnitMode};
use crate::error::EngineError;

/// What a click did while a shape was being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexOutcome {
    /// The point became a new vertex.
    Added,
    /// The click closed a polygon; the committed measurement's id.
    Closed(MeasurementId),
    /// No sketch was active; nothing happened.
    Ignored,
}

/// Default name of the calibration entry in the measurement list.
pub const CALIBRATION_NAME: &str = "כיול";

/// Measurement state for one plan editing session.
#[derive(Debug)]
pub struct PlanEngine {
    calibration: Calibration,
    /// Committed measurements, kept in display order (`order == index`).
    measurements: Vec<Measurement>,
    sketch: SketchState,
    next_id: MeasurementId,
    /// Endpoints of the most recently drawn reference line, pending the
    /// user's real-distance input.
    pending_reference: Option<(PlanPoint, PlanPoint)>,
    file_name: Option<String>,
    png_export: Option<String>,
}

impl Default for PlanEngine {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            measurements: Vec::new(),
            sketch: SketchState::Idle,
            // Id 0 is reserved so "no id" in restored snapshots is unambiguous.
            next_id: 1,
            pending_reference: None,
            file_name: None,
            png_export: None,
        }
    }
}

impl PlanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn unit_mode(&self) -> UnitMode {
        self.calibration.unit_mode
    }

    /// Switch the display mode. Stored values are canonical metric and are
    /// not touched; only formatting and future exports change.
    pub fn set_unit_mode(&mut self, mode: UnitMode) {
        self.calibration.unit_mode = mode;
    }

    /// Committed measurements in display order. Never includes the
    /// in-progress sketch.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn get(&self, id: MeasurementId) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.id == id)
    }

    pub fn sketch(&self) -> &SketchState {
        &self.sketch
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, name: Option<String>) {
        self.file_name = name;
    }

    /// Record the file name of a rendered overlay snapshot. The rendering
    /// itself happens outside the engine.
    pub fn set_png_export(&mut self, name: Option<String>) {
        self.png_export = name;
    }

    // ── Calibration ──────────────────────────────────────────────────────

    /// Store a freshly drawn reference line (step one of calibration).
    pub fn set_reference_line(
        &mut self,
        p1: PlanPoint,
        p2: PlanPoint,
    ) -> Result<f64, EngineError> {
        let px = self.calibration.set_reference_line(p1, p2)?;
        self.pending_reference = Some((p1, p2));
        Ok(px)
    }

    /// Assert the reference line's real length (step two of calibration).
    ///
    /// On success every stored measurement's real value is re-derived from
    /// its pixel value; names, colors, notes and order survive untouched.
    /// The reference line itself is recorded as the list's single
    /// calibration entry, updated in place on recalibration.
    pub fn set_reference_distance(
        &mut self,
        value: f64,
        unit: LengthUnit,
    ) -> Result<f64, EngineError> {
        let mpp = self.calibration.set_reference_distance(value, unit)?;
        if let Some((p1, p2)) = self.pending_reference.take() {
            self.upsert_calibration_entry(p1, p2);
        }
        self.recalibrate_all();
        Ok(mpp)
    }

    fn upsert_calibration_entry(&mut self, p1: PlanPoint, p2: PlanPoint) {
        let shape = Shape::Calibration { p1, p2 };
        if let Some(m) = self
            .measurements
            .iter_mut()
            .find(|m| m.kind() == ShapeKind::Calibration)
        {
            m.pixel_value = shape.pixel_value();
            m.shape = shape;
        } else {
            self.commit(shape, Some(CALIBRATION_NAME.to_string()));
        }
    }

    /// Re-derive every measurement's real value from its stored pixel value
    /// and the current scale factor. Idempotent; never touches pixel data.
    pub fn recalibrate_all(&mut self) {
        let mpp = self.calibration.meters_per_pixel();
        for m in &mut self.measurements {
            m.real_value = Self::real_from_pixels(m.kind(), m.pixel_value, mpp);
        }
    }

    fn real_from_pixels(kind: ShapeKind, pixel_value: f64, mpp: Option<f64>) -> Option<f64> {
        let mpp = mpp?;
        Some(match kind {
            ShapeKind::Area => pixel_value * mpp * mpp,
            ShapeKind::Calibration | ShapeKind::Distance => pixel_value * mpp,
        })
    }

    // ── Drawing ──────────────────────────────────────────────────────────

    /// Start capturing a new distance or area shape. Abandons any shape
    /// already in progress, with no side effects on committed data.
    pub fn begin_shape(&mut self, kind: SketchKind) {
        self.sketch.begin(kind);
    }

    /// Feed a click into the active sketch. A click within the closure
    /// radius of a polygon's first vertex closes and commits it instead of
    /// adding a vertex.
    pub fn add_vertex(&mut self, p: PlanPoint) -> Result<VertexOutcome, EngineError> {
        if !self.sketch.is_drawing() {
            return Ok(VertexOutcome::Ignored);
        }
        if self.sketch.would_close(p) {
            // would_close guarantees the minimum vertex count, so this
            // finish cannot be a degenerate no-op.
            return match self.finish_shape() {
                Some(id) => Ok(VertexOutcome::Closed(id)),
                None => Ok(VertexOutcome::Ignored),
            };
        }
        self.sketch.add_point(p)?;
        Ok(VertexOutcome::Added)
    }

    /// Finish the active sketch (double-click for polylines, explicit close
    /// action for polygons) and commit it as a measurement. Returns `None`
    /// without creating anything when the sketch had too few points or no
    /// sketch was active.
    pub fn finish_shape(&mut self) -> Option<MeasurementId> {
        let (kind, points) = self.sketch.finish()?;
        let shape = match kind {
            SketchKind::Distance => Shape::Distance { points },
            SketchKind::Area => Shape::Area { points },
        };
        Some(self.commit(shape, None))
    }

    /// Abandon the in-progress shape, if any.
    pub fn cancel_shape(&mut self) {
        self.sketch.cancel();
    }

    fn commit(&mut self, shape: Shape, name: Option<String>) -> MeasurementId {
        let id = self.next_id;
        self.next_id += 1;
        let name = name.unwrap_or_else(|| self.next_default_name());
        let used: Vec<Color32> = self.measurements.iter().map(|m| m.color).collect();
        let color = color_scheme::alloc_color(&used);
        let mut m = Measurement::new(id, name, shape, color);
        m.real_value =
            Self::real_from_pixels(m.kind(), m.pixel_value, self.calibration.meters_per_pixel());
        m.order = self.measurements.len();
        self.measurements.push(m);
        id
    }

    /// Smallest "מדידה N" not already taken. User renames cannot make the
    /// generator collide.
    fn next_default_name(&self) -> String {
        let mut n = self.measurements.len() + 1;
        loop {
            let candidate = format!("מדידה {}", n);
            if !self.measurements.iter().any(|m| m.name == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    // ── List management ──────────────────────────────────────────────────

    fn find_mut(&mut self, id: MeasurementId) -> Result<&mut Measurement, EngineError> {
        match self.measurements.iter_mut().find(|m| m.id == id) {
            Some(m) => Ok(m),
            None => {
                warn!(id, "measurement not found; ignoring");
                Err(EngineError::NotFound(id))
            }
        }
    }

    pub fn rename(&mut self, id: MeasurementId, new_name: &str) -> Result<(), EngineError> {
        let m = self.find_mut(id)?;
        m.name = new_name.to_string();
        Ok(())
    }

    pub fn set_notes(&mut self, id: MeasurementId, notes: &str) -> Result<(), EngineError> {
        let m = self.find_mut(id)?;
        m.notes = notes.to_string();
        Ok(())
    }

    pub fn set_visible(&mut self, id: MeasurementId, visible: bool) -> Result<(), EngineError> {
        let m = self.find_mut(id)?;
        m.visible = visible;
        Ok(())
    }

    /// Cycle the measurement to the next palette color, avoiding colors the
    /// rest of the list currently holds where the palette allows.
    pub fn recolor(&mut self, id: MeasurementId) -> Result<Color32, EngineError> {
        let taken: Vec<Color32> = self
            .measurements
            .iter()
            .filter(|m| m.id != id)
            .map(|m| m.color)
            .collect();
        let m = self.find_mut(id)?;
        m.color = color_scheme::next_color(m.color, &taken);
        Ok(m.color)
    }

    /// Set an explicit color, e.g. from a color-picker widget.
    pub fn set_color(&mut self, id: MeasurementId, color: Color32) -> Result<(), EngineError> {
        let m = self.find_mut(id)?;
        m.color = color;
        Ok(())
    }

    /// Move the measurement to `new_order` (clamped) and renumber the whole
    /// list so `order` stays dense `0..n-1`.
    pub fn reorder(&mut self, id: MeasurementId, new_order: usize) -> Result<(), EngineError> {
        let from = match self.measurements.iter().position(|m| m.id == id) {
            Some(i) => i,
            None => {
                warn!(id, "measurement not found; ignoring");
                return Err(EngineError::NotFound(id));
            }
        };
        let to = new_order.min(self.measurements.len() - 1);
        let m = self.measurements.remove(from);
        self.measurements.insert(to, m);
        self.renumber();
        Ok(())
    }

    /// Remove the measurement. Other ids are untouched; only `order` is
    /// compacted.
    pub fn delete(&mut self, id: MeasurementId) -> Result<(), EngineError> {
        let idx = match self.measurements.iter().position(|m| m.id == id) {
            Some(i) => i,
            None => {
                warn!(id, "measurement not found; ignoring");
                return Err(EngineError::NotFound(id));
            }
        };
        self.measurements.remove(idx);
        self.renumber();
        Ok(())
    }

    fn renumber(&mut self) {
        for (i, m) in self.measurements.iter_mut().enumerate() {
            m.order = i;
        }
    }

    // ── Export ───────────────────────────────────────────────────────────

    /// The ordered, serializable table the report renderer consumes.
    /// Reflects only committed measurements; safe to call mid-drawing.
    pub fn export_table(&self) -> Vec<MeasurementRow> {
        let mode = self.unit_mode();
        self.measurements
            .iter()
            .map(|m| MeasurementRow::from_measurement(m, mode))
            .collect()
    }

    /// Full session snapshot in the persisted wire shape. `saved_at` is
    /// left for the persistence layer to stamp.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            measurement_table: self.export_table(),
            meters_per_pixel: self.calibration.meters_per_pixel(),
            unit_mode: self.unit_mode().as_str().to_string(),
            is_calibrated: self.calibration.is_calibrated(),
            file_name: self.file_name.clone(),
            png_export: self.png_export.clone(),
            saved_at: None,
        }
    }

    /// Rebuild an engine from restored parts. Ids of 0 (absent on the wire)
    /// are reassigned; `order` is renumbered densely from list position.
    pub(crate) fn from_parts(
        calibration: Calibration,
        mut measurements: Vec<Measurement>,
        file_name: Option<String>,
        png_export: Option<String>,
    ) -> Self {
        let mut next_id = measurements.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        for m in &mut measurements {
            if m.id == 0 {
                m.id = next_id;
                next_id += 1;
            }
        }
        let mut engine = Self {
            calibration,
            measurements,
            sketch: SketchState::Idle,
            next_id,
            pending_reference: None,
            file_name,
            png_export,
        };
        engine.renumber();
        engine.recalibrate_all();
        engine
    }
}
