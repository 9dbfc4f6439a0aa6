//! Standalone eframe wrapper: menu bar, side panels, and the plan canvas.

use std::path::PathBuf;

use eframe::egui;
use tracing::warn;

use crate::color_scheme::ColorScheme;
use crate::config::PlanMeterConfig;
use crate::data::engine::PlanEngine;
use crate::panels::{CalibrationPanel, ExportPanel, MeasurementsPanel, Panel, PlanPanel};

pub struct PlanMeterApp {
    config: PlanMeterConfig,
    engine: PlanEngine,
    plan: PlanPanel,
    panels: Vec<Box<dyn Panel>>,
    /// Full path of the loaded plan image; needed for overlay export.
    plan_path: Option<PathBuf>,
    /// Plan image queued for loading on the next frame (needs a context).
    pending_plan: Option<PathBuf>,
    theme_applied: bool,
}

impl PlanMeterApp {
    pub fn new(config: PlanMeterConfig) -> Self {
        let mut engine = PlanEngine::new();
        engine.set_unit_mode(config.unit_mode);

        let mut panels: Vec<Box<dyn Panel>> = Vec::new();
        if config.features.calibration {
            panels.push(Box::new(CalibrationPanel::default()));
        }
        if config.features.table {
            panels.push(Box::new(MeasurementsPanel::default()));
        }
        if config.features.export {
            panels.push(Box::new(ExportPanel::default()));
        }

        let pending_plan = config.plan_path.clone();
        Self {
            config,
            engine,
            plan: PlanPanel::default(),
            panels,
            plan_path: None,
            pending_plan,
            theme_applied: false,
        }
    }

    /// Locate a specific panel by its concrete type.
    fn panel_mut<T: Panel>(&mut self) -> Option<&mut T> {
        self.panels.iter_mut().find_map(|p| p.downcast_mut::<T>())
    }

    fn open_plan(&mut self, ctx: &egui::Context, path: PathBuf) {
        match self.plan.load_plan(ctx, &path, &mut self.engine) {
            Ok(()) => self.plan_path = Some(path),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load plan image"),
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("planmeter_menu").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open plan…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("images", &["png", "jpg", "jpeg", "bmp", "tiff"])
                            .pick_file()
                        {
                            self.pending_plan = Some(path);
                        }
                        ui.close();
                    }
                    #[cfg(feature = "overlay-export")]
                    if ui.button("Export annotated PNG…").clicked() {
                        self.export_overlay();
                        ui.close();
                    }
                });
                ui.menu_button("View", |ui| {
                    for panel in &mut self.panels {
                        let mut visible = panel.state().visible;
                        if ui.checkbox(&mut visible, panel.title()).changed() {
                            panel.state_mut().visible = visible;
                        }
                    }
                    ui.separator();
                    ui.menu_button("Color scheme", |ui| {
                        for scheme in ColorScheme::all() {
                            if ui
                                .selectable_label(
                                    self.config.color_scheme == *scheme,
                                    scheme.label(),
                                )
                                .clicked()
                            {
                                self.config.color_scheme = scheme.clone();
                                self.theme_applied = false;
                                ui.close();
                            }
                        }
                    });
                });
            });
        });
    }

    #[cfg(feature = "overlay-export")]
    fn export_overlay(&mut self) {
        let Some(plan_path) = self.plan_path.clone() else {
            warn!("no plan loaded; nothing to export");
            return;
        };
        let Some(out) = rfd::FileDialog::new()
            .add_filter("png", &["png"])
            .set_file_name("plan-annotated.png")
            .save_file()
        else {
            return;
        };
        let result = crate::overlay::export_overlay_png(&plan_path, &self.engine, &out)
            .map(|()| format!("Exported {}", out.display()))
            .map_err(|e| e.to_string());
        if result.is_ok() {
            self.engine
                .set_png_export(out.file_name().map(|n| n.to_string_lossy().into_owned()));
        }
        if let Some(panel) = self.panel_mut::<ExportPanel>() {
            panel.note_export(result);
        } else if let Err(e) = result {
            warn!(error = %e, "overlay export failed");
        }
    }
}

impl eframe::App for PlanMeterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            self.config.color_scheme.apply(ctx);
            self.theme_applied = true;
        }
        if let Some(path) = self.pending_plan.take() {
            self.open_plan(ctx, path);
        }

        if self.config.features.top_bar {
            self.menu_bar(ctx);
        }

        egui::SidePanel::right("planmeter_side")
            .resizable(true)
            .default_width(340.0)
            .show_animated(ctx, self.panels.iter().any(|p| p.state().visible), |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for panel in &mut self.panels {
                        if !panel.state().visible {
                            continue;
                        }
                        ui.strong(panel.title());
                        panel.render_panel(ui, &mut self.engine);
                        ui.separator();
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.plan
                .render(ui, &mut self.engine, &self.config.features);
        });
    }
}
