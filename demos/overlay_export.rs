//! Render an annotated copy of a plan image from the command line.
//!
//! Usage: `cargo run --example overlay_export --features overlay-export -- plan.png out.png`

use std::path::PathBuf;

use planmeter::{LengthUnit, PlanEngine, SketchKind};

fn main() {
    tracing_subscriber::fmt().init();

    let mut args = std::env::args().skip(1);
    let usage = "usage: overlay_export <plan.png> <out.png>";
    let plan: PathBuf = args.next().expect(usage).into();
    let out: PathBuf = args.next().expect(usage).into();

    let mut engine = PlanEngine::new();
    engine
        .set_reference_line([50.0, 50.0], [250.0, 50.0])
        .unwrap();
    engine
        .set_reference_distance(4.0, LengthUnit::Meters)
        .unwrap();

    engine.begin_shape(SketchKind::Area);
    for p in [
        [100.0, 100.0],
        [500.0, 100.0],
        [500.0, 400.0],
        [100.0, 400.0],
    ] {
        engine.add_vertex(p).unwrap();
    }
    engine.finish_shape().unwrap();

    planmeter::overlay::export_overlay_png(&plan, &engine, &out).unwrap();
    println!("wrote {}", out.display());
}
