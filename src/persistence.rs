//! Session persistence: save and load measurement sessions as JSON files.
//!
//! The on-disk shape is exactly the [`SessionSnapshot`] wire contract the
//! enclosing report pipeline reads, so a file saved here can be attached to
//! a session record unmodified. Loading rebuilds a fully working engine:
//! real values are recomputed from the stored pixel geometry, not trusted
//! from the file.

use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::data::calibration::Calibration;
use crate::data::engine::PlanEngine;
use crate::data::export::{color_from_hex, SessionSnapshot};
use crate::data::measurement::Measurement;
use crate::data::units::UnitMode;
use crate::error::PersistError;

/// Serialize a snapshot as pretty JSON.
pub fn snapshot_to_json(snapshot: &SessionSnapshot) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Deserialize a snapshot from JSON.
pub fn snapshot_from_json(json: &str) -> Result<SessionSnapshot, PersistError> {
    Ok(serde_json::from_str(json)?)
}

/// Snapshot the engine and write it to `path`, stamping `saved_at`.
pub fn save_session(engine: &PlanEngine, path: &Path) -> Result<(), PersistError> {
    let mut snapshot = engine.snapshot();
    snapshot.saved_at = Some(Local::now().to_rfc3339());
    let txt = snapshot_to_json(&snapshot)?;
    std::fs::write(path, txt)?;
    info!(path = %path.display(), "session saved");
    Ok(())
}

/// Read a session file and rebuild an engine from it.
pub fn load_session(path: &Path) -> Result<PlanEngine, PersistError> {
    let txt = std::fs::read_to_string(path)?;
    let snapshot = snapshot_from_json(&txt)?;
    let engine = engine_from_snapshot(&snapshot)?;
    info!(path = %path.display(), "session loaded");
    Ok(engine)
}

/// Rebuild an engine from a snapshot.
///
/// Each row's pixel shape is reconstructed and its real value re-derived
/// from the snapshot's scale factor via [`PlanEngine::recalibrate_all`];
/// the baked display values in the file are ignored. A malformed row fails
/// the whole load — a half-restored session would silently drop
/// measurements from the report.
pub fn engine_from_snapshot(snapshot: &SessionSnapshot) -> Result<PlanEngine, PersistError> {
    let unit_mode = UnitMode::from_str(&snapshot.unit_mode).unwrap_or_default();
    let calibration = Calibration::from_snapshot(snapshot.meters_per_pixel, unit_mode);

    let mut measurements = Vec::with_capacity(snapshot.measurement_table.len());
    for (i, row) in snapshot.measurement_table.iter().enumerate() {
        let shape = row
            .to_shape()
            .map_err(|reason| PersistError::MalformedRow { row: i, reason })?;
        let color = color_from_hex(&row.color).ok_or_else(|| PersistError::MalformedRow {
            row: i,
            reason: format!("bad color {:?}", row.color),
        })?;
        let mut m = Measurement::new(row.id, row.name.clone(), shape, color);
        m.notes = row.notes.clone();
        m.visible = row.visible;
        measurements.push(m);
    }

    Ok(PlanEngine::from_parts(
        calibration,
        measurements,
        snapshot.file_name.clone(),
        snapshot.png_export.clone(),
    ))
}

/// Default session file name, e.g. `planmeter-20260807-141502.json`.
pub fn default_session_file_name() -> String {
    format!("planmeter-{}.json", Local::now().format("%Y%m%d-%H%M%S"))
}
