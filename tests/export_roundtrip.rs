use planmeter::data::export::save_table_csv;
use planmeter::{persistence, LengthUnit, PlanEngine, SketchKind, UnitMode};

fn build_session() -> PlanEngine {
    let mut engine = PlanEngine::new();
    engine.set_reference_line([0.0, 0.0], [200.0, 0.0]).unwrap();
    engine
        .set_reference_distance(4.5, LengthUnit::Meters)
        .unwrap();

    engine.begin_shape(SketchKind::Area);
    for p in [[0.0, 0.0], [400.0, 0.0], [400.0, 300.0], [0.0, 300.0]] {
        engine.add_vertex(p).unwrap();
    }
    let room = engine.finish_shape().unwrap();
    engine.rename(room, "סלון").unwrap();
    engine.set_notes(room, "כולל מרפסת, בדיקה").unwrap();

    engine.begin_shape(SketchKind::Distance);
    for p in [[10.0, 10.0], [310.0, 410.0]] {
        engine.add_vertex(p).unwrap();
    }
    engine.finish_shape().unwrap();

    engine.set_file_name(Some("garmushka.png".to_string()));
    engine
}

#[test]
fn snapshot_uses_the_wire_contract_keys() {
    let engine = build_session();
    let value = serde_json::to_value(engine.snapshot()).unwrap();

    let obj = value.as_object().unwrap();
    assert!(obj.contains_key("measurementTable"));
    assert!(obj.contains_key("metersPerPixel"));
    assert!(obj.contains_key("unitMode"));
    assert!(obj.contains_key("isCalibrated"));
    assert!(obj.contains_key("fileName"));
    assert_eq!(obj["unitMode"], "metric");
    assert_eq!(obj["isCalibrated"], true);

    let rows = obj["measurementTable"].as_array().unwrap();
    assert_eq!(rows.len(), 3); // calibration entry + area + distance
    let row = rows[1].as_object().unwrap();
    assert!(row.contains_key("pixelMeasurement"));
    assert!(row.contains_key("measurement"));
    assert!(row.contains_key("unit"));
    assert!(row.contains_key("notes"));
    assert!(row["color"].as_str().unwrap().starts_with('#'));
}

#[test]
fn area_rows_bake_the_area_unit_label() {
    let engine = build_session();
    let table = engine.export_table();

    let room = table.iter().find(|r| r.name == "סלון").unwrap();
    assert_eq!(room.kind, "area");
    assert_eq!(room.unit, "מ\"ר");
    // 400 × 300 px at 0.0225 m/px → 120_000 px² → 60.75 m².
    assert!((room.measurement.unwrap() - 60.75).abs() < 1e-9);

    let line = table.iter().find(|r| r.kind == "distance").unwrap();
    assert_eq!(line.unit, "מ'");
    assert!((line.measurement.unwrap() - 500.0 * 0.0225).abs() < 1e-9);
}

#[test]
fn imperial_mode_changes_display_values_not_pixels() {
    let mut engine = build_session();
    let metric = engine.export_table();
    engine.set_unit_mode(UnitMode::Imperial);
    let imperial = engine.export_table();

    let m_room = metric.iter().find(|r| r.kind == "area").unwrap();
    let i_room = imperial.iter().find(|r| r.kind == "area").unwrap();
    assert_eq!(m_room.pixel_measurement, i_room.pixel_measurement);
    assert_eq!(i_room.unit, "sq ft");
    let expected = m_room.measurement.unwrap() / (0.3048 * 0.3048);
    assert!((i_room.measurement.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn snapshot_restore_reproduces_real_values() {
    let engine = build_session();
    let snapshot = engine.snapshot();

    let mut restored = persistence::engine_from_snapshot(&snapshot).unwrap();
    restored.recalibrate_all();

    assert_eq!(
        restored.calibration().meters_per_pixel(),
        engine.calibration().meters_per_pixel()
    );
    assert_eq!(restored.measurements().len(), engine.measurements().len());
    for (orig, back) in engine.measurements().iter().zip(restored.measurements()) {
        assert_eq!(back.name, orig.name);
        assert_eq!(back.kind(), orig.kind());
        assert_eq!(back.notes, orig.notes);
        assert_eq!(back.color, orig.color);
        assert_eq!(back.order, orig.order);
        assert_eq!(back.pixel_value, orig.pixel_value);
        let (a, b) = (orig.real_value.unwrap(), back.real_value.unwrap());
        assert!((a - b).abs() < 1e-9);
    }
    assert_eq!(restored.file_name(), Some("garmushka.png"));
}

#[test]
fn uncalibrated_snapshot_restores_uncalibrated() {
    let mut engine = PlanEngine::new();
    engine.begin_shape(SketchKind::Distance);
    engine.add_vertex([0.0, 0.0]).unwrap();
    engine.add_vertex([3.0, 4.0]).unwrap();
    engine.finish_shape().unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.meters_per_pixel, None);
    assert!(!snapshot.is_calibrated);

    let restored = persistence::engine_from_snapshot(&snapshot).unwrap();
    assert!(!restored.calibration().is_calibrated());
    assert_eq!(restored.measurements()[0].real_value, None);
    assert_eq!(restored.measurements()[0].pixel_value, 5.0);
}

#[test]
fn json_file_roundtrip() {
    let engine = build_session();
    let path = std::env::temp_dir().join("planmeter_session_roundtrip.json");
    persistence::save_session(&engine, &path).unwrap();

    let restored = persistence::load_session(&path).unwrap();
    assert_eq!(restored.measurements().len(), engine.measurements().len());
    for (orig, back) in engine.measurements().iter().zip(restored.measurements()) {
        assert_eq!(back.pixel_value, orig.pixel_value);
        assert!((back.real_value.unwrap() - orig.real_value.unwrap()).abs() < 1e-9);
    }
    std::fs::remove_file(&path).ok();
}

#[test]
fn malformed_rows_fail_the_load() {
    let engine = build_session();
    let mut snapshot = engine.snapshot();
    snapshot.measurement_table[0].kind = "perimeter".to_string();
    assert!(persistence::engine_from_snapshot(&snapshot).is_err());

    let mut snapshot = engine.snapshot();
    snapshot.measurement_table[1].points.truncate(2); // area needs ≥ 3
    assert!(persistence::engine_from_snapshot(&snapshot).is_err());

    let mut snapshot = engine.snapshot();
    snapshot.measurement_table[2].color = "red".to_string();
    assert!(persistence::engine_from_snapshot(&snapshot).is_err());
}

#[test]
fn csv_export_writes_one_row_per_measurement() {
    let engine = build_session();
    let path = std::env::temp_dir().join("planmeter_table.csv");
    save_table_csv(&path, &engine.export_table()).unwrap();

    let txt = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = txt.lines().collect();
    assert_eq!(lines[0], "order,name,kind,measurement,unit,notes");
    assert_eq!(lines.len(), 1 + engine.measurements().len());
    // Notes containing commas survive quoted.
    assert!(txt.contains("\"כולל מרפסת, בדיקה\""));
    std::fs::remove_file(&path).ok();
}
