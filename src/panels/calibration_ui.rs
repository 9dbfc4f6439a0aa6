//! Calibration panel: asserts the real-world length of the drawn
//! reference line and switches the display unit mode.

use egui::Color32;

use super::panel_trait::{Panel, PanelState};
use crate::data::engine::PlanEngine;
use crate::data::units::{LengthUnit, UnitMode};

pub struct CalibrationPanel {
    state: PanelState,
    distance_input: String,
    unit: LengthUnit,
    /// Last rejected calibration attempt, shown until the next success.
    error: Option<String>,
}

impl Default for CalibrationPanel {
    fn default() -> Self {
        Self {
            state: PanelState { visible: true },
            distance_input: String::new(),
            unit: LengthUnit::Meters,
            error: None,
        }
    }
}

impl Panel for CalibrationPanel {
    fn title(&self) -> &'static str {
        "Calibration"
    }

    fn state(&self) -> &PanelState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut egui::Ui, engine: &mut PlanEngine) {
        let cal = engine.calibration();
        match cal.reference_pixel_distance() {
            Some(px) => {
                ui.label(format!("Reference line: {:.1} px", px));
            }
            None => {
                ui.weak("Draw a reference line on the plan with the calibrate tool.");
            }
        }

        ui.horizontal(|ui| {
            ui.label("Real length");
            ui.add(
                egui::TextEdit::singleline(&mut self.distance_input)
                    .desired_width(72.0)
                    .hint_text("4.50"),
            );
            egui::ComboBox::from_id_salt("calibration_unit")
                .selected_text(self.unit.label())
                .show_ui(ui, |ui| {
                    for unit in LengthUnit::all() {
                        ui.selectable_value(&mut self.unit, *unit, unit.label());
                    }
                });
            if ui.button("Apply").clicked() {
                self.apply(engine);
            }
        });

        if let Some(err) = &self.error {
            ui.colored_label(Color32::LIGHT_RED, err);
        }

        if let Some(mpp) = engine.calibration().meters_per_pixel() {
            ui.label(format!("Scale: {:.5} m/px", mpp));
        } else {
            ui.weak("Not calibrated — measurements show pixel values only.");
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Units");
            let mut mode = engine.unit_mode();
            let changed = ui
                .selectable_value(&mut mode, UnitMode::Metric, "Metric")
                .changed()
                | ui.selectable_value(&mut mode, UnitMode::Imperial, "Imperial")
                    .changed();
            if changed {
                engine.set_unit_mode(mode);
            }
        });
    }
}

impl CalibrationPanel {
    fn apply(&mut self, engine: &mut PlanEngine) {
        let value = match self.distance_input.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                self.error = Some("Enter a number, e.g. 4.50".to_string());
                return;
            }
        };
        match engine.set_reference_distance(value, self.unit) {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}
