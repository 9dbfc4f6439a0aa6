use downcast_rs::{impl_downcast, Downcast};
use egui::Ui;

use crate::data::engine::PlanEngine;

#[derive(Debug, Clone, Copy, Default)]
pub struct PanelState {
    pub visible: bool,
}

pub trait Panel: Downcast {
    fn title(&self) -> &'static str;
    fn state(&self) -> &PanelState;
    fn state_mut(&mut self) -> &mut PanelState;

    // Optional hook with a default empty impl
    fn render_panel(&mut self, _ui: &mut Ui, _engine: &mut PlanEngine) {}
}

impl_downcast!(Panel);
