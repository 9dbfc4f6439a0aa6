//! Export panel: session JSON save/load and CSV table export.

use egui::{Color32, Ui};
use egui_phosphor::regular::{FILE_CSV, FLOPPY_DISK, FOLDER_OPEN};

use super::panel_trait::{Panel, PanelState};
use crate::data::engine::PlanEngine;
use crate::data::export;
use crate::persistence;

pub struct ExportPanel {
    state: PanelState,
    status: Option<String>,
    error: Option<String>,
}

impl Default for ExportPanel {
    fn default() -> Self {
        Self {
            state: PanelState { visible: true },
            status: None,
            error: None,
        }
    }
}

impl Panel for ExportPanel {
    fn title(&self) -> &'static str {
        "Export"
    }

    fn state(&self) -> &PanelState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, engine: &mut PlanEngine) {
        if ui
            .button(format!("{FLOPPY_DISK} Save session…"))
            .clicked()
        {
            self.save_session(engine);
        }
        if ui
            .button(format!("{FOLDER_OPEN} Load session…"))
            .clicked()
        {
            self.load_session(engine);
        }
        if ui.button(format!("{FILE_CSV} Export CSV…")).clicked() {
            self.export_csv(engine);
        }

        if let Some(status) = &self.status {
            ui.weak(status);
        }
        if let Some(err) = &self.error {
            ui.colored_label(Color32::LIGHT_RED, err);
        }
    }
}

impl ExportPanel {
    /// Report the outcome of an export triggered elsewhere (e.g. the
    /// app menu's overlay export) in this panel's status line.
    pub fn note_export(&mut self, result: Result<String, String>) {
        match result {
            Ok(status) => {
                self.status = Some(status);
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
    }

    fn save_session(&mut self, engine: &PlanEngine) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("session", &["json"])
            .set_file_name(persistence::default_session_file_name())
            .save_file()
        else {
            return;
        };
        match persistence::save_session(engine, &path) {
            Ok(()) => {
                self.status = Some(format!("Saved {}", path.display()));
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn load_session(&mut self, engine: &mut PlanEngine) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("session", &["json"])
            .pick_file()
        else {
            return;
        };
        match persistence::load_session(&path) {
            Ok(loaded) => {
                *engine = loaded;
                self.status = Some(format!("Loaded {}", path.display()));
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn export_csv(&mut self, engine: &PlanEngine) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("csv", &["csv"])
            .set_file_name("measurements.csv")
            .save_file()
        else {
            return;
        };
        match export::save_table_csv(&path, &engine.export_table()) {
            Ok(()) => {
                self.status = Some(format!("Exported {}", path.display()));
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}
