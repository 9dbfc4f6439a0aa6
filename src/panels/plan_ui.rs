//! The central plan canvas: displays the floor-plan image, translates
//! pointer events into image coordinates, dispatches them into the engine,
//! and draws committed shapes plus the in-progress sketch.
//!
//! All geometry decisions (closure radius, minimum vertex counts, vertex
//! validation) live in the engine; this panel only routes events and
//! paints.

use std::path::Path;

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, TextureHandle, Ui, Vec2};
use egui_phosphor::regular::{CROSSHAIR, CURSOR, POLYGON, RULER};

use crate::config::FeatureFlags;
use crate::data::engine::PlanEngine;
use crate::data::geometry::PlanPoint;
use crate::data::measurement::ShapeKind;
use crate::data::sketch::{SketchKind, CLOSE_RADIUS_PX};

/// Active pointer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pan/zoom only.
    #[default]
    Select,
    /// Two clicks define the calibration reference line.
    Calibrate,
    /// Polyline measurement; double-click ends it.
    Distance,
    /// Polygon measurement; clicking near the first vertex closes it.
    Area,
}

pub struct PlanPanel {
    texture: Option<TextureHandle>,
    image_size: Vec2,
    pub tool: Tool,
    /// First endpoint of a reference line being placed.
    pending_reference: Option<PlanPoint>,
    /// Screen pixels per image pixel; `0.0` requests fit-to-view.
    zoom: f32,
    pan: Vec2,
    error: Option<String>,
}

impl Default for PlanPanel {
    fn default() -> Self {
        Self {
            texture: None,
            image_size: Vec2::ZERO,
            tool: Tool::Select,
            pending_reference: None,
            zoom: 0.0,
            pan: Vec2::ZERO,
            error: None,
        }
    }
}

impl PlanPanel {
    /// Load a floor-plan raster and make it the session's plan.
    pub fn load_plan(
        &mut self,
        ctx: &egui::Context,
        path: &Path,
        engine: &mut PlanEngine,
    ) -> Result<(), String> {
        let img = image::open(path).map_err(|e| e.to_string())?;
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [w as usize, h as usize],
            rgba.as_raw(),
        );
        self.texture = Some(ctx.load_texture("plan", color_image, egui::TextureOptions::LINEAR));
        self.image_size = Vec2::new(w as f32, h as f32);
        self.zoom = 0.0; // refit on next frame
        self.pan = Vec2::ZERO;
        engine.set_file_name(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned()),
        );
        Ok(())
    }

    pub fn has_plan(&self) -> bool {
        self.texture.is_some()
    }

    pub fn set_tool(&mut self, tool: Tool, engine: &mut PlanEngine) {
        if self.tool != tool {
            // Switching tools abandons whatever was half-drawn.
            engine.cancel_shape();
            self.pending_reference = None;
            self.tool = tool;
        }
    }

    fn to_screen(&self, origin: Pos2, p: PlanPoint) -> Pos2 {
        origin + Vec2::new(p[0] as f32, p[1] as f32) * self.zoom
    }

    fn to_image(&self, origin: Pos2, pos: Pos2) -> PlanPoint {
        let v = (pos - origin) / self.zoom;
        [v.x as f64, v.y as f64]
    }

    pub fn render(&mut self, ui: &mut Ui, engine: &mut PlanEngine, features: &FeatureFlags) {
        self.toolbar(ui, engine);
        ui.separator();

        let Some(texture) = self.texture.clone() else {
            ui.centered_and_justified(|ui| {
                ui.weak("Open a floor plan to start measuring (File → Open plan…).");
            });
            return;
        };

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas = response.rect;

        if self.zoom <= 0.0 {
            let fit = (canvas.width() / self.image_size.x)
                .min(canvas.height() / self.image_size.y)
                .min(1.0);
            self.zoom = fit.max(0.05);
            self.pan = (canvas.size() - self.image_size * self.zoom) * 0.5;
        }

        // Zoom anchored at the pointer; plain scroll pans.
        if response.hovered() {
            let zoom_delta = ui.input(|i| i.zoom_delta());
            if zoom_delta != 1.0 {
                if let Some(hover) = response.hover_pos() {
                    let origin = canvas.min + self.pan;
                    let anchor = self.to_image(origin, hover);
                    self.zoom = (self.zoom * zoom_delta).clamp(0.05, 20.0);
                    self.pan = hover - canvas.min
                        - Vec2::new(anchor[0] as f32, anchor[1] as f32) * self.zoom;
                }
            }
            let scroll = ui.input(|i| i.raw_scroll_delta);
            self.pan += scroll;
        }
        if self.tool == Tool::Select && response.dragged() {
            self.pan += response.drag_delta();
        }

        let origin = canvas.min + self.pan;
        let image_rect = Rect::from_min_size(origin, self.image_size * self.zoom);
        painter.image(
            texture.id(),
            image_rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        self.handle_pointer(ui, &response, origin, engine);
        self.draw_measurements(&painter, origin, engine, features);
        self.draw_sketch(&painter, &response, origin, engine);
        self.draw_pending_reference(&painter, &response, origin);

        if let Some(err) = &self.error {
            painter.text(
                canvas.left_bottom() + Vec2::new(8.0, -8.0),
                Align2::LEFT_BOTTOM,
                err,
                FontId::proportional(14.0),
                Color32::LIGHT_RED,
            );
        }
    }

    fn toolbar(&mut self, ui: &mut Ui, engine: &mut PlanEngine) {
        ui.horizontal(|ui| {
            let tools = [
                (Tool::Select, CURSOR, "Pan and zoom"),
                (Tool::Calibrate, CROSSHAIR, "Draw the calibration reference line"),
                (Tool::Distance, RULER, "Measure a distance (double-click to end)"),
                (Tool::Area, POLYGON, "Measure an area (click the first point to close)"),
            ];
            for (tool, icon, hint) in tools {
                if ui
                    .selectable_label(self.tool == tool, icon)
                    .on_hover_text(hint)
                    .clicked()
                {
                    self.set_tool(tool, engine);
                }
            }
            if engine.sketch().is_drawing() {
                ui.separator();
                if ui.button("Finish").clicked() {
                    engine.finish_shape();
                }
                if ui.button("Cancel").clicked() {
                    engine.cancel_shape();
                }
            }
        });
    }

    fn handle_pointer(
        &mut self,
        ui: &mut Ui,
        response: &egui::Response,
        origin: Pos2,
        engine: &mut PlanEngine,
    ) {
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            engine.cancel_shape();
            self.pending_reference = None;
        }

        if response.double_clicked() && matches!(self.tool, Tool::Distance | Tool::Area) {
            engine.finish_shape();
            return;
        }

        if !response.clicked() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let p = self.to_image(origin, pos);

        match self.tool {
            Tool::Select => {}
            Tool::Calibrate => match self.pending_reference {
                None => self.pending_reference = Some(p),
                Some(p1) => match engine.set_reference_line(p1, p) {
                    Ok(_) => {
                        self.pending_reference = None;
                        self.error = None;
                    }
                    Err(e) => self.error = Some(e.to_string()),
                },
            },
            Tool::Distance | Tool::Area => {
                if !engine.sketch().is_drawing() {
                    let kind = if self.tool == Tool::Area {
                        SketchKind::Area
                    } else {
                        SketchKind::Distance
                    };
                    engine.begin_shape(kind);
                }
                // A glitched (non-finite) point is dropped by the engine
                // and the sketch keeps going.
                let _ = engine.add_vertex(p);
            }
        }
    }

    fn draw_measurements(
        &self,
        painter: &egui::Painter,
        origin: Pos2,
        engine: &PlanEngine,
        features: &FeatureFlags,
    ) {
        let mode = engine.unit_mode();
        for m in engine.measurements().iter().filter(|m| m.visible) {
            let pts: Vec<Pos2> = m
                .shape
                .vertices()
                .iter()
                .map(|p| self.to_screen(origin, *p))
                .collect();
            if pts.len() < 2 {
                continue;
            }
            let stroke = Stroke::new(2.5, m.color);
            match m.kind() {
                ShapeKind::Calibration => {
                    painter.extend(egui::Shape::dashed_line(&pts, stroke, 8.0, 4.0));
                }
                ShapeKind::Distance => {
                    painter.add(egui::Shape::line(pts.clone(), stroke));
                }
                ShapeKind::Area => {
                    painter.add(egui::Shape::closed_line(pts.clone(), stroke));
                }
            }
            if features.vertex_markers {
                for p in &pts {
                    painter.circle_filled(*p, 3.0, m.color);
                }
            }
            if features.shape_labels {
                if let Some(anchor) = m.shape.label_anchor() {
                    painter.text(
                        self.to_screen(origin, anchor),
                        Align2::CENTER_CENTER,
                        format!("{}\n{}", m.name, m.value_label(mode)),
                        FontId::proportional(13.0),
                        m.color,
                    );
                }
            }
        }
    }

    fn draw_sketch(
        &self,
        painter: &egui::Painter,
        response: &egui::Response,
        origin: Pos2,
        engine: &PlanEngine,
    ) {
        let sketch = engine.sketch();
        if !sketch.is_drawing() {
            return;
        }
        let mut pts: Vec<Pos2> = sketch
            .points()
            .iter()
            .map(|p| self.to_screen(origin, *p))
            .collect();
        // Rubber band to the pointer.
        if let Some(hover) = response.hover_pos() {
            pts.push(hover);
        }
        if pts.len() >= 2 {
            painter.add(egui::Shape::line(pts.clone(), Stroke::new(2.0, Color32::YELLOW)));
        }
        for p in &pts {
            painter.circle_filled(*p, 3.0, Color32::YELLOW);
        }
        // Closure hint on the first vertex of a polygon sketch.
        if sketch.kind() == Some(SketchKind::Area) {
            if let Some(first) = sketch.points().first() {
                painter.circle_stroke(
                    self.to_screen(origin, *first),
                    CLOSE_RADIUS_PX as f32 * self.zoom,
                    Stroke::new(1.0, Color32::YELLOW),
                );
            }
        }
    }

    fn draw_pending_reference(
        &self,
        painter: &egui::Painter,
        response: &egui::Response,
        origin: Pos2,
    ) {
        let Some(p1) = self.pending_reference else {
            return;
        };
        let a = self.to_screen(origin, p1);
        painter.circle_filled(a, 4.0, Color32::LIGHT_BLUE);
        if let Some(hover) = response.hover_pos() {
            painter.extend(egui::Shape::dashed_line(
                &[a, hover],
                Stroke::new(2.0, Color32::LIGHT_BLUE),
                8.0,
                4.0,
            ));
        }
    }
}
