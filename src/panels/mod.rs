pub mod calibration_ui;
pub mod export_ui;
pub mod measurements_ui;
pub mod panel_trait;
pub mod plan_ui;

pub use calibration_ui::CalibrationPanel;
pub use export_ui::ExportPanel;
pub use measurements_ui::MeasurementsPanel;
pub use panel_trait::{Panel, PanelState};
pub use plan_ui::{PlanPanel, Tool};
