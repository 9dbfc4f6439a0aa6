//! PlanMeter crate root: re-exports and module wiring.
//!
//! PlanMeter turns user-drawn pixel geometry on a floor-plan image into
//! real-world distances and areas via an explicit reference calibration,
//! and keeps a named, ordered, recolorable measurement list that report
//! generation consumes as a serializable table.
//!
//! The crate is split into cohesive modules:
//! - `data`: the UI-independent measurement core (geometry, units,
//!   calibration, drawing state machine, engine, export contract)
//! - `panels`: egui panels (plan canvas, table, calibration, export)
//! - `app`: standalone eframe application and run helpers
//! - `persistence`: session JSON save/load in the exported wire shape

pub mod app;
pub mod color_scheme;
pub mod config;
pub mod data;
pub mod error;
pub mod panels;
pub mod persistence;

#[cfg(feature = "overlay-export")]
pub mod overlay;

// Public re-exports for a compact external API
pub use app::{run_planmeter, run_planmeter_with_config, PlanMeterApp};
pub use color_scheme::{ColorScheme, CustomColorScheme};
pub use config::{FeatureFlags, PlanMeterConfig};
pub use data::calibration::Calibration;
pub use data::engine::{PlanEngine, VertexOutcome};
pub use data::export::{MeasurementRow, SessionSnapshot};
pub use data::measurement::{Measurement, MeasurementId, Shape, ShapeKind};
pub use data::sketch::{SketchKind, SketchState, CLOSE_RADIUS_PX};
pub use data::units::{LengthUnit, UnitMode};
pub use error::{EngineError, PersistError};
