use std::path::Path;

use kernel_bridge::{MockKernel, MockOp};
use mesh_export::*;
use resonator_ops::{recompute, GeometrySnapshot};
use resonator_types::{PartKind, ResonatorParams, ShapeKind};

fn snapshot(kernel: &mut MockKernel) -> GeometrySnapshot {
    recompute(&ResonatorParams::default(), kernel).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn writes_five_suffixed_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    let snap = snapshot(&mut kernel);

    let report = export_parts(
        &snap,
        &mut kernel,
        &dir.path().join("design.stl"),
        &ExportOptions::default(),
    )
    .unwrap();

    assert!(report.all_written(), "{report:?}");
    assert_eq!(report.base, dir.path().join("design"));
    let parts: Vec<PartKind> = report.files.iter().map(|f| f.part).collect();
    assert_eq!(parts, PartKind::ALL.to_vec());

    assert_eq!(
        file_names(dir.path()),
        vec![
            "design_cilindro_equivalente.stl",
            "design_objeto_interno_solo.stl",
            "design_resonador_hueco.stl",
            "design_tapa_con_objeto_interno.stl",
            "design_tapa_sola.stl",
        ]
    );

    for f in &report.files {
        let mesh = read_stl_file(&f.path).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(f.status, ExportStatus::Written { triangles: 12 });
    }
}

#[test]
fn path_without_extension_is_used_as_base() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    let snap = snapshot(&mut kernel);

    let report = export_parts(&snap, &mut kernel, &dir.path().join("tube"), &ExportOptions::default())
        .unwrap();
    assert!(report.files[0].path.ends_with("tube_resonador_hueco.stl"));
}

#[test]
fn ascii_option_writes_text_stl() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    let snap = snapshot(&mut kernel);
    let options = ExportOptions {
        format: StlFormat::Ascii,
        ..ExportOptions::default()
    };

    let report = export_parts(&snap, &mut kernel, &dir.path().join("a.stl"), &options).unwrap();
    let text = std::fs::read_to_string(&report.files[1].path).unwrap();
    assert!(text.starts_with("solid a_tapa_sola"));
    assert_eq!(read_stl_file(&report.files[1].path).unwrap().triangle_count(), 12);
}

#[test]
fn missing_directory_fails_each_part_and_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    let snap = snapshot(&mut kernel);
    let target = dir.path().join("no_such_dir").join("design.stl");

    let report = export_parts(&snap, &mut kernel, &target, &ExportOptions::default()).unwrap();

    assert_eq!(report.failed().count(), 5);
    assert_eq!(report.written().count(), 0);
    assert!(file_names(dir.path()).is_empty());
    // Every part was still attempted.
    assert_eq!(kernel.count_ops(MockOp::Tessellate), 5);
}

#[test]
fn tessellation_failure_is_per_part() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    let snap = snapshot(&mut kernel);
    kernel.fail_on(MockOp::Tessellate);

    let report = export_parts(&snap, &mut kernel, &dir.path().join("d"), &ExportOptions::default())
        .unwrap();
    assert_eq!(report.failed().count(), 5);
    for f in report.failed() {
        let ExportStatus::Failed { reason } = &f.status else {
            unreachable!()
        };
        assert!(reason.starts_with("tessellation failed"), "{reason}");
    }
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn unbuilt_parts_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    let mut params = ResonatorParams::default();
    params.inner.kind = ShapeKind::Star;
    params.inner.settings.star_radius_ratio = 1.0;
    let snap = recompute(&params, &mut kernel).unwrap();

    let report = export_parts(&snap, &mut kernel, &dir.path().join("d"), &ExportOptions::default())
        .unwrap();

    let status = |kind| {
        report
            .files
            .iter()
            .find(|f| f.part == kind)
            .map(|f| f.status.clone())
            .unwrap()
    };
    assert_eq!(status(PartKind::InnerObject), ExportStatus::Skipped);
    assert_eq!(status(PartKind::CapWithInnerObject), ExportStatus::Skipped);
    assert_eq!(report.written().count(), 3);
    assert_eq!(file_names(dir.path()).len(), 3);
}

#[test]
fn no_geometry_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    kernel.fail_on(MockOp::Extrude);
    let snap = snapshot(&mut kernel);

    let err = export_parts(&snap, &mut kernel, &dir.path().join("d"), &ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, ExportError::NoGeometry));
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn report_serializes_with_tagged_status() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = MockKernel::new();
    let snap = snapshot(&mut kernel);
    let report = export_parts(&snap, &mut kernel, &dir.path().join("d"), &ExportOptions::default())
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["files"][0]["part"], "Resonator");
    assert_eq!(json["files"][0]["status"]["type"], "Written");
    assert_eq!(json["files"][0]["status"]["triangles"], 12);
}
