//! Rasterized annotated-plan export.
//!
//! Renders the committed shapes over the source plan image and writes a
//! PNG. This is the `pngExport` artifact the session snapshot refers to;
//! the engine itself never touches pixels.

use std::path::Path;

use thiserror::Error;
use tiny_skia::{IntSize, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use crate::data::engine::PlanEngine;
use crate::data::measurement::ShapeKind;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("plan image has zero size")]
    EmptyImage,

    #[error("png encode error: {0}")]
    Encode(String),
}

/// Render every visible measurement over the plan image at `plan_path` and
/// write the result to `out_path`.
pub fn export_overlay_png(
    plan_path: &Path,
    engine: &PlanEngine,
    out_path: &Path,
) -> Result<(), OverlayError> {
    let img = image::open(plan_path)?.to_rgba8();
    let (w, h) = img.dimensions();
    let size = IntSize::from_wh(w, h).ok_or(OverlayError::EmptyImage)?;
    // Plan scans are opaque, so straight RGBA is already premultiplied.
    let mut pixmap = Pixmap::from_vec(img.into_raw(), size).ok_or(OverlayError::EmptyImage)?;

    for m in engine.measurements().iter().filter(|m| m.visible) {
        let vs = m.shape.vertices();
        if vs.len() < 2 {
            continue;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(vs[0][0] as f32, vs[0][1] as f32);
        for p in &vs[1..] {
            pb.line_to(p[0] as f32, p[1] as f32);
        }
        if m.kind() == ShapeKind::Area {
            pb.close();
        }
        let Some(path) = pb.finish() else { continue };

        let mut paint = Paint::default();
        paint.anti_alias = true;
        let c = m.color;

        if m.kind() == ShapeKind::Area {
            paint.set_color_rgba8(c.r(), c.g(), c.b(), 60);
            pixmap.fill_path(
                &path,
                &paint,
                tiny_skia::FillRule::EvenOdd,
                Transform::identity(),
                None,
            );
        }

        paint.set_color_rgba8(c.r(), c.g(), c.b(), 255);
        let mut stroke = Stroke {
            width: 3.0,
            ..Stroke::default()
        };
        if m.kind() == ShapeKind::Calibration {
            stroke.dash = StrokeDash::new(vec![8.0, 4.0], 0.0);
        }
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    pixmap
        .save_png(out_path)
        .map_err(|e| OverlayError::Encode(e.to_string()))?;
    Ok(())
}
