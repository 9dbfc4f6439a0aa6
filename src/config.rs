//! Configuration types shared across the measurement UI.

use crate::color_scheme::ColorScheme;
use crate::data::units::UnitMode;

// ─────────────────────────────────────────────────────────────────────────────
// Feature flags
// ─────────────────────────────────────────────────────────────────────────────

/// Toggle individual UI features on or off.
///
/// All features default to `true` (enabled). Disable features to embed a
/// minimal, focused measuring surface in a host application.
#[derive(Clone, Debug)]
pub struct FeatureFlags {
    /// Show the top menu bar with the tool buttons.
    pub top_bar: bool,
    /// Enable the measurement table panel.
    pub table: bool,
    /// Enable the calibration panel.
    pub calibration: bool,
    /// Enable the export panel.
    pub export: bool,
    /// Show value labels next to shapes on the plan.
    pub shape_labels: bool,
    /// Show vertex markers on committed shapes.
    pub vertex_markers: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            top_bar: true,
            table: true,
            calibration: true,
            export: true,
            shape_labels: true,
            vertex_markers: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PlanMeterConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration for the measurement tool.
pub struct PlanMeterConfig {
    /// Native window title.
    pub title: String,
    /// Plan image to open on startup. `None` shows the open-file prompt.
    pub plan_path: Option<std::path::PathBuf>,
    /// Initial display mode for measured values.
    pub unit_mode: UnitMode,
    /// Color scheme / visual theme.
    pub color_scheme: ColorScheme,
    /// Toggle individual UI features on/off.
    pub features: FeatureFlags,
    /// Optional eframe native-window options.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Clone for PlanMeterConfig {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            plan_path: self.plan_path.clone(),
            unit_mode: self.unit_mode,
            color_scheme: self.color_scheme.clone(),
            features: self.features.clone(),
            native_options: self.native_options.clone(),
        }
    }
}

impl Default for PlanMeterConfig {
    fn default() -> Self {
        Self {
            title: "PlanMeter".to_string(),
            plan_path: None,
            unit_mode: UnitMode::default(),
            color_scheme: ColorScheme::default(),
            features: FeatureFlags::default(),
            native_options: None,
        }
    }
}
