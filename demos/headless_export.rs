//! Drive the measurement engine without any UI and print the session
//! snapshot JSON that the report pipeline would consume.

use planmeter::{persistence, LengthUnit, PlanEngine, SketchKind};

fn main() {
    tracing_subscriber::fmt().init();

    let mut engine = PlanEngine::new();

    // Calibrate: a 200 px reference line asserted to be 4.5 m.
    engine.set_reference_line([0.0, 0.0], [200.0, 0.0]).unwrap();
    engine
        .set_reference_distance(4.5, LengthUnit::Meters)
        .unwrap();

    // A rectangular room, 400 × 300 px.
    engine.begin_shape(SketchKind::Area);
    for p in [[0.0, 0.0], [400.0, 0.0], [400.0, 300.0], [0.0, 300.0]] {
        engine.add_vertex(p).unwrap();
    }
    engine.finish_shape().unwrap();

    // A wall run, 3-4-5 triangle for an easily checked length.
    engine.begin_shape(SketchKind::Distance);
    for p in [[0.0, 0.0], [300.0, 400.0]] {
        engine.add_vertex(p).unwrap();
    }
    engine.finish_shape().unwrap();

    let json = persistence::snapshot_to_json(&engine.snapshot()).unwrap();
    println!("{json}");
}
