//! Top-level entry point for running PlanMeter as a native window.

use eframe::egui;

use super::planmeter_app::PlanMeterApp;
use crate::config::PlanMeterConfig;

/// Open the measurement tool with default configuration.
pub fn run_planmeter() -> eframe::Result<()> {
    run_planmeter_with_config(PlanMeterConfig::default())
}

/// Open the measurement tool with the given configuration.
pub fn run_planmeter_with_config(mut config: PlanMeterConfig) -> eframe::Result<()> {
    let title = config.title.clone();
    let mut opts = config
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    // Set a bigger default window size if one is not provided by config.
    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(1400.0, 900.0));
    }

    let app = PlanMeterApp::new(config);
    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
