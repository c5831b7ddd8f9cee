use app_bridge::*;
use kernel_bridge::{Kernel, MockKernel, MockOp};
use resonator_types::{PartKind, ResonatorParams, ShapeKind};
use serde_json::json;

fn app() -> App {
    App::new(Box::new(MockKernel::new()))
}

fn send(app: &mut App, msg: serde_json::Value) -> AppToUi {
    dispatch_json(app, &msg.to_string())
}

#[test]
fn creation_runs_initial_update() {
    let app = app();
    let AppToUi::ModelUpdated {
        scene,
        readout,
        groups,
        warnings,
        error,
    } = app.model_updated()
    else {
        panic!("expected ModelUpdated");
    };

    assert_eq!(scene.items.len(), 5);
    assert!(error.is_none());
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(groups, visible_groups(ShapeKind::Ellipse));
    assert_eq!(readout.resonator_material, "131.95 mm²");
    assert_eq!(readout.inner_object, "28.35 mm²");
    assert_eq!(readout.net_material, "103.59 mm²");
    assert_eq!(readout.equivalent_material, "103.59 mm²");
}

#[test]
fn repeated_updates_release_old_solids() {
    let mut app = app();
    assert_eq!(app.kernel().solid_count(), 5);
    for _ in 0..3 {
        send(&mut app, json!({"type": "Update"}));
    }
    assert_eq!(app.kernel().solid_count(), 5);
}

#[test]
fn set_field_reports_stored_value() {
    let mut app = app();
    let reply = send(
        &mut app,
        json!({"type": "SetField", "field": "length", "value": 123456.0}),
    );
    assert!(matches!(
        reply,
        AppToUi::FieldChanged {
            field: Field::Length,
            value
        } if value == 10000.0
    ));
    // Values only take effect on the next update.
    assert_eq!(app.snapshot().unwrap().params.tube.length, 100.0);
    send(&mut app, json!({"type": "Update"}));
    assert_eq!(app.snapshot().unwrap().params.tube.length, 10000.0);
}

#[test]
fn zero_diameter_clears_the_view() {
    let mut app = app();
    send(
        &mut app,
        json!({"type": "SetField", "field": "inner_diameter", "value": 0.0}),
    );
    let AppToUi::ModelUpdated {
        scene,
        readout,
        error,
        ..
    } = send(&mut app, json!({"type": "Update"}))
    else {
        panic!("expected ModelUpdated");
    };

    assert!(scene.items.is_empty());
    assert!(error.unwrap().contains("inner diameter"));
    assert_eq!(readout, AreaReadout::unavailable());
    assert!(app.snapshot().is_none());
    assert_eq!(app.kernel().solid_count(), 0);
}

#[test]
fn export_without_geometry_is_an_error() {
    let mut app = app();
    app.set_field(Field::Length, 0.0).unwrap();
    app.update();
    let dir = tempfile::tempdir().unwrap();

    let reply = send(
        &mut app,
        json!({"type": "Export", "path": dir.path().join("x.stl")}),
    );
    let AppToUi::Error { message } = reply else {
        panic!("expected Error");
    };
    assert_eq!(message, "no geometry available for export");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn export_writes_files() {
    let mut app = app();
    let dir = tempfile::tempdir().unwrap();
    let reply = send(
        &mut app,
        json!({"type": "Export", "path": dir.path().join("res.stl"), "ascii": true}),
    );
    let AppToUi::ExportFinished { report } = reply else {
        panic!("expected ExportFinished");
    };
    assert!(report.all_written());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 5);
    let text = std::fs::read_to_string(dir.path().join("res_tapa_sola.stl")).unwrap();
    assert!(text.starts_with("solid "));
}

#[test]
fn select_shape_switches_groups() {
    let mut app = app();
    let reply = send(&mut app, json!({"type": "SelectShape", "shape": "Star"}));
    let AppToUi::ShapeSelected { shape, groups } = reply else {
        panic!("expected ShapeSelected");
    };
    assert_eq!(shape, ShapeKind::Star);
    assert!(groups.star && !groups.ellipse && !groups.polygon);
    assert_eq!(app.params().inner.kind, ShapeKind::Star);
}

#[test]
fn degenerate_shape_keeps_other_parts() {
    let mut app = app();
    app.select_shape(ShapeKind::Ellipse);
    app.set_field(Field::AreaRatio, 0.0).unwrap();
    app.update();

    let scene = app.scene();
    assert!(scene.item(PartKind::InnerObject).is_none());
    assert!(scene.item(PartKind::CapWithInnerObject).is_none());
    assert_eq!(scene.items.len(), 3);
    assert_eq!(app.readout().inner_object, "0.00 mm²");
    assert_eq!(app.readout().net_material, app.readout().resonator_material);
}

#[test]
fn describe_form_lists_fields_and_values() {
    let mut app = app();
    let AppToUi::FormDescribed {
        schema,
        values,
        groups,
    } = send(&mut app, json!({"type": "DescribeForm"}))
    else {
        panic!("expected FormDescribed");
    };
    assert_eq!(schema.fields.len(), 10);
    assert_eq!(values, ResonatorParams::default());
    assert!(groups.ellipse);
}

#[test]
fn set_params_normalizes_everything() {
    let mut app = app();
    let mut params = ResonatorParams::default();
    params.tube.wall_thickness = 250.0;
    params.inner.kind = ShapeKind::Polygon;
    params.inner.settings.polygon_sides = 1;

    let reply = send(&mut app, json!({"type": "SetParams", "params": params}));
    let AppToUi::FormDescribed { values, .. } = reply else {
        panic!("expected FormDescribed");
    };
    assert_eq!(values.tube.wall_thickness, 100.0);
    assert_eq!(values.inner.settings.polygon_sides, 3);
    assert_eq!(values.inner.kind, ShapeKind::Polygon);
}

#[test]
fn malformed_json_is_reported() {
    let mut app = app();
    let reply = dispatch_json(&mut app, "{not json");
    let AppToUi::Error { message } = reply else {
        panic!("expected Error");
    };
    assert!(message.starts_with("bad message"));

    let reply = send(&mut app, json!({"type": "SetField", "field": "nope", "value": 1}));
    assert!(matches!(reply, AppToUi::Error { .. }));
}

#[test]
fn kernel_failures_surface_as_warnings() {
    let mut kernel = MockKernel::new();
    kernel.fail_on(MockOp::Union);
    let app = App::new(Box::new(kernel));

    let AppToUi::ModelUpdated {
        scene, warnings, ..
    } = app.model_updated()
    else {
        panic!("expected ModelUpdated");
    };
    assert_eq!(scene.items.len(), 4);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("cap with inner object"));
}

#[test]
fn model_update_serializes() {
    let app = app();
    let json = serde_json::to_value(app.model_updated()).unwrap();
    assert_eq!(json["type"], "ModelUpdated");
    assert_eq!(json["scene"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(json["scene"]["items"][0]["part"], "Resonator");
    assert_eq!(json["readout"]["resonator_material"], "131.95 mm²");
}
