use planmeter::{EngineError, LengthUnit, PlanEngine, ShapeKind, SketchKind, VertexOutcome};

fn draw_square(engine: &mut PlanEngine, origin: [f64; 2], side: f64) -> planmeter::MeasurementId {
    engine.begin_shape(SketchKind::Area);
    for p in [
        origin,
        [origin[0] + side, origin[1]],
        [origin[0] + side, origin[1] + side],
        [origin[0], origin[1] + side],
    ] {
        engine.add_vertex(p).unwrap();
    }
    engine.finish_shape().unwrap()
}

fn draw_line(engine: &mut PlanEngine, a: [f64; 2], b: [f64; 2]) -> planmeter::MeasurementId {
    engine.begin_shape(SketchKind::Distance);
    engine.add_vertex(a).unwrap();
    engine.add_vertex(b).unwrap();
    engine.finish_shape().unwrap()
}

#[test]
fn recalibration_rescales_without_touching_pixels() {
    let mut engine = PlanEngine::new();
    // 100 × 100 px square: 10_000 px².
    let id = draw_square(&mut engine, [0.0, 0.0], 100.0);

    engine.set_reference_line([0.0, 0.0], [100.0, 0.0]).unwrap();
    engine
        .set_reference_distance(2.0, LengthUnit::Meters)
        .unwrap(); // 0.02 m/px
    {
        let m = engine.get(id).unwrap();
        assert_eq!(m.pixel_value, 10_000.0);
        assert!((m.real_value.unwrap() - 4.0).abs() < 1e-12);
    }

    let name_before = engine.get(id).unwrap().name.clone();
    let color_before = engine.get(id).unwrap().color;

    engine.set_reference_line([0.0, 0.0], [100.0, 0.0]).unwrap();
    engine
        .set_reference_distance(5.0, LengthUnit::Meters)
        .unwrap(); // 0.05 m/px
    let m = engine.get(id).unwrap();
    assert_eq!(m.pixel_value, 10_000.0);
    assert!((m.real_value.unwrap() - 25.0).abs() < 1e-12);
    assert_eq!(m.name, name_before);
    assert_eq!(m.color, color_before);
}

#[test]
fn recalibrate_all_is_idempotent() {
    let mut engine = PlanEngine::new();
    let id = draw_line(&mut engine, [0.0, 0.0], [3.0, 4.0]);
    engine.set_reference_line([0.0, 0.0], [10.0, 0.0]).unwrap();
    engine
        .set_reference_distance(1.0, LengthUnit::Meters)
        .unwrap();

    let before = engine.get(id).unwrap().real_value;
    engine.recalibrate_all();
    engine.recalibrate_all();
    assert_eq!(engine.get(id).unwrap().real_value, before);
    assert_eq!(engine.get(id).unwrap().pixel_value, 5.0);
}

#[test]
fn polygon_area_matches_shoelace_either_winding() {
    let mut engine = PlanEngine::new();

    engine.begin_shape(SketchKind::Area);
    for p in [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]] {
        engine.add_vertex(p).unwrap();
    }
    let ccw = engine.finish_shape().unwrap();

    engine.begin_shape(SketchKind::Area);
    for p in [[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]] {
        engine.add_vertex(p).unwrap();
    }
    let cw = engine.finish_shape().unwrap();

    assert_eq!(engine.get(ccw).unwrap().pixel_value, 100.0);
    assert_eq!(engine.get(cw).unwrap().pixel_value, 100.0);
}

#[test]
fn degenerate_finishes_create_nothing() {
    let mut engine = PlanEngine::new();

    engine.begin_shape(SketchKind::Distance);
    engine.add_vertex([1.0, 1.0]).unwrap();
    assert_eq!(engine.finish_shape(), None);
    assert!(engine.measurements().is_empty());

    engine.begin_shape(SketchKind::Area);
    engine.add_vertex([0.0, 0.0]).unwrap();
    engine.add_vertex([10.0, 0.0]).unwrap();
    assert_eq!(engine.finish_shape(), None);
    assert!(engine.measurements().is_empty());

    // Finishing while idle is also a no-op.
    assert_eq!(engine.finish_shape(), None);
}

#[test]
fn polygon_closes_on_click_near_first_vertex() {
    let mut engine = PlanEngine::new();
    engine.begin_shape(SketchKind::Area);
    engine.add_vertex([0.0, 0.0]).unwrap();
    engine.add_vertex([100.0, 0.0]).unwrap();
    engine.add_vertex([100.0, 100.0]).unwrap();

    // 5 px from the first vertex: inside the 10 px closure radius.
    let outcome = engine.add_vertex([3.0, 4.0]).unwrap();
    let VertexOutcome::Closed(id) = outcome else {
        panic!("expected the click to close the polygon, got {:?}", outcome);
    };
    let m = engine.get(id).unwrap();
    assert_eq!(m.kind(), ShapeKind::Area);
    // The closing click is not stored as a vertex.
    assert_eq!(m.shape.vertices().len(), 3);
    assert!(!engine.sketch().is_drawing());
}

#[test]
fn glitched_vertex_is_dropped_mid_shape() {
    let mut engine = PlanEngine::new();
    engine.begin_shape(SketchKind::Distance);
    engine.add_vertex([0.0, 0.0]).unwrap();
    assert_eq!(
        engine.add_vertex([f64::INFINITY, 5.0]),
        Err(EngineError::InvalidVertex)
    );
    engine.add_vertex([3.0, 4.0]).unwrap();
    let id = engine.finish_shape().unwrap();
    assert_eq!(engine.get(id).unwrap().pixel_value, 5.0);
}

#[test]
fn order_stays_dense_through_delete_and_reorder() {
    let mut engine = PlanEngine::new();
    let a = draw_line(&mut engine, [0.0, 0.0], [10.0, 0.0]);
    let b = draw_line(&mut engine, [0.0, 0.0], [20.0, 0.0]);
    let c = draw_line(&mut engine, [0.0, 0.0], [30.0, 0.0]);
    let d = draw_line(&mut engine, [0.0, 0.0], [40.0, 0.0]);

    engine.delete(b).unwrap();
    let orders: Vec<usize> = engine.measurements().iter().map(|m| m.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    engine.reorder(d, 0).unwrap();
    let ids: Vec<_> = engine.measurements().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![d, a, c]);
    let orders: Vec<usize> = engine.measurements().iter().map(|m| m.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    // Reordering to the same slot is a no-op on the sequence.
    engine.reorder(d, 0).unwrap();
    let orders: Vec<usize> = engine.measurements().iter().map(|m| m.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    // Out-of-range targets clamp to the end.
    engine.reorder(d, 99).unwrap();
    let ids: Vec<_> = engine.measurements().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![a, c, d]);
}

#[test]
fn missing_id_is_a_noop_error() {
    let mut engine = PlanEngine::new();
    let a = draw_line(&mut engine, [0.0, 0.0], [10.0, 0.0]);

    assert_eq!(engine.rename(999, "x"), Err(EngineError::NotFound(999)));
    assert_eq!(engine.delete(999), Err(EngineError::NotFound(999)));
    assert_eq!(engine.reorder(999, 0), Err(EngineError::NotFound(999)));
    assert_eq!(engine.set_notes(999, "x"), Err(EngineError::NotFound(999)));

    // Nothing changed.
    assert_eq!(engine.measurements().len(), 1);
    assert_eq!(engine.get(a).unwrap().order, 0);
}

#[test]
fn deleting_twice_reports_not_found() {
    let mut engine = PlanEngine::new();
    let a = draw_line(&mut engine, [0.0, 0.0], [10.0, 0.0]);
    engine.delete(a).unwrap();
    assert_eq!(engine.delete(a), Err(EngineError::NotFound(a)));
}

#[test]
fn default_names_never_collide() {
    let mut engine = PlanEngine::new();
    let a = draw_line(&mut engine, [0.0, 0.0], [10.0, 0.0]);
    let b = draw_line(&mut engine, [0.0, 0.0], [20.0, 0.0]);
    assert_eq!(engine.get(a).unwrap().name, "מדידה 1");
    assert_eq!(engine.get(b).unwrap().name, "מדידה 2");

    // A user rename onto the next default must not produce a duplicate.
    engine.rename(a, "מדידה 3").unwrap();
    let c = draw_line(&mut engine, [0.0, 0.0], [30.0, 0.0]);
    assert_eq!(engine.get(c).unwrap().name, "מדידה 4");
}

#[test]
fn neighbouring_measurements_get_distinct_colors() {
    let mut engine = PlanEngine::new();
    let ids: Vec<_> = (1..=4)
        .map(|i| draw_line(&mut engine, [0.0, 0.0], [10.0 * i as f64, 0.0]))
        .collect();
    let colors: Vec<_> = ids
        .iter()
        .map(|id| engine.get(*id).unwrap().color)
        .collect();
    for w in colors.windows(2) {
        assert_ne!(w[0], w[1]);
    }
}

#[test]
fn recolor_cycles_to_an_unused_color() {
    let mut engine = PlanEngine::new();
    let a = draw_line(&mut engine, [0.0, 0.0], [10.0, 0.0]);
    let b = draw_line(&mut engine, [0.0, 0.0], [20.0, 0.0]);

    let before = engine.get(a).unwrap().color;
    let after = engine.recolor(a).unwrap();
    assert_ne!(after, before);
    assert_ne!(after, engine.get(b).unwrap().color);
}

#[test]
fn export_reflects_only_committed_measurements() {
    let mut engine = PlanEngine::new();
    draw_line(&mut engine, [0.0, 0.0], [10.0, 0.0]);

    engine.begin_shape(SketchKind::Area);
    engine.add_vertex([0.0, 0.0]).unwrap();
    engine.add_vertex([50.0, 0.0]).unwrap();

    // Mid-drawing export must not see the unfinished polygon.
    let table = engine.export_table();
    assert_eq!(table.len(), 1);
    assert!(engine.sketch().is_drawing());
}

#[test]
fn cancelling_a_sketch_has_no_side_effects() {
    let mut engine = PlanEngine::new();
    draw_line(&mut engine, [0.0, 0.0], [10.0, 0.0]);

    engine.begin_shape(SketchKind::Area);
    engine.add_vertex([0.0, 0.0]).unwrap();
    engine.cancel_shape();

    assert!(!engine.sketch().is_drawing());
    assert_eq!(engine.measurements().len(), 1);
}
