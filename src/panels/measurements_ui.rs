//! The measurement table: rename, reorder, recolor, annotate, hide and
//! delete committed measurements.
//!
//! Rows are rendered from a snapshot of the engine list and every edit is
//! queued and applied after the loop, so a delete or drag mid-frame never
//! invalidates what is still being rendered.

use std::hash::{Hash, Hasher};

use egui::Color32;
use egui_dnd::dnd;
use egui_phosphor::regular::{
    CROSSHAIR, DOTS_SIX_VERTICAL, EYE, EYE_SLASH, PALETTE, POLYGON, RULER, TRASH,
};

use super::panel_trait::{Panel, PanelState};
use crate::data::engine::PlanEngine;
use crate::data::measurement::{MeasurementId, ShapeKind};

struct Row {
    id: MeasurementId,
    name: String,
    kind: ShapeKind,
    value: String,
    color: Color32,
    notes: String,
    visible: bool,
}

// egui_dnd identifies rows by hash; the id alone is the stable identity.
impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

enum RowEdit {
    Rename(MeasurementId, String),
    Notes(MeasurementId, String),
    Color(MeasurementId, Color32),
    Visible(MeasurementId, bool),
    Recolor(MeasurementId),
    Delete(MeasurementId),
}

pub struct MeasurementsPanel {
    state: PanelState,
    /// Row currently in rename mode, with its edit buffer.
    renaming: Option<MeasurementId>,
    rename_buffer: String,
    /// Row whose notes editor is expanded.
    notes_open: Option<MeasurementId>,
}

impl Default for MeasurementsPanel {
    fn default() -> Self {
        Self {
            state: PanelState { visible: true },
            renaming: None,
            rename_buffer: String::new(),
            notes_open: None,
        }
    }
}

fn kind_icon(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Calibration => CROSSHAIR,
        ShapeKind::Distance => RULER,
        ShapeKind::Area => POLYGON,
    }
}

impl Panel for MeasurementsPanel {
    fn title(&self) -> &'static str {
        "Measurements"
    }

    fn state(&self) -> &PanelState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut egui::Ui, engine: &mut PlanEngine) {
        let mode = engine.unit_mode();
        let mut rows: Vec<Row> = engine
            .measurements()
            .iter()
            .map(|m| Row {
                id: m.id,
                name: m.name.clone(),
                kind: m.kind(),
                value: m.value_label(mode),
                color: m.color,
                notes: m.notes.clone(),
                visible: m.visible,
            })
            .collect();

        if rows.is_empty() {
            ui.weak("Draw a shape on the plan to add a measurement.");
            return;
        }

        let ids_before: Vec<MeasurementId> = rows.iter().map(|r| r.id).collect();
        let mut edits: Vec<RowEdit> = Vec::new();
        let renaming = self.renaming;
        let notes_open = self.notes_open;
        let mut rename_buffer = std::mem::take(&mut self.rename_buffer);
        let mut next_renaming = renaming;
        let mut next_notes_open = notes_open;

        let resp = dnd(ui, "measurement_rows").show_vec(&mut rows, |ui, row, handle, _state| {
            ui.horizontal(|ui| {
                handle.ui(ui, |ui| {
                    ui.label(DOTS_SIX_VERTICAL);
                });
                ui.label(kind_icon(row.kind));

                let mut color = row.color;
                if ui.color_edit_button_srgba(&mut color).changed() {
                    edits.push(RowEdit::Color(row.id, color));
                }

                if renaming == Some(row.id) {
                    let edit = ui.text_edit_singleline(&mut rename_buffer);
                    let commit = edit.lost_focus() || ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if commit {
                        edits.push(RowEdit::Rename(row.id, rename_buffer.clone()));
                        next_renaming = None;
                    }
                } else {
                    let label = ui.add(
                        egui::Label::new(&row.name).sense(egui::Sense::click()),
                    );
                    if label.double_clicked() {
                        next_renaming = Some(row.id);
                        rename_buffer = row.name.clone();
                    }
                    label.on_hover_text("Double-click to rename");
                }

                ui.label(&row.value);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(TRASH).on_hover_text("Delete").clicked() {
                        edits.push(RowEdit::Delete(row.id));
                    }
                    if ui.button(PALETTE).on_hover_text("Next color").clicked() {
                        edits.push(RowEdit::Recolor(row.id));
                    }
                    let eye = if row.visible { EYE } else { EYE_SLASH };
                    if ui.button(eye).on_hover_text("Show on plan").clicked() {
                        edits.push(RowEdit::Visible(row.id, !row.visible));
                    }
                    let notes_label = if row.notes.is_empty() { "🗒" } else { "🗒•" };
                    if ui.button(notes_label).on_hover_text("Notes").clicked() {
                        next_notes_open = if notes_open == Some(row.id) {
                            None
                        } else {
                            Some(row.id)
                        };
                    }
                });
            });
            if notes_open == Some(row.id) {
                let mut notes = row.notes.clone();
                if ui.text_edit_multiline(&mut notes).changed() {
                    edits.push(RowEdit::Notes(row.id, notes));
                }
            }
        });

        self.renaming = next_renaming;
        self.notes_open = next_notes_open;
        self.rename_buffer = rename_buffer;

        // A finished drag already moved the local rows; mirror it in the
        // engine so `order` stays dense and persisted.
        if let Some(update) = resp.final_update() {
            if let Some(&moved) = ids_before.get(update.from) {
                if let Some(new_idx) = rows.iter().position(|r| r.id == moved) {
                    let _ = engine.reorder(moved, new_idx);
                }
            }
        }

        for edit in edits {
            // NotFound here means the row disappeared mid-frame; the engine
            // already logs it and the next frame re-renders from truth.
            let _ = match edit {
                RowEdit::Rename(id, name) => engine.rename(id, &name),
                RowEdit::Notes(id, notes) => engine.set_notes(id, &notes),
                RowEdit::Color(id, color) => engine.set_color(id, color),
                RowEdit::Visible(id, v) => engine.set_visible(id, v),
                RowEdit::Recolor(id) => engine.recolor(id).map(|_| ()),
                RowEdit::Delete(id) => engine.delete(id),
            };
        }
    }
}
