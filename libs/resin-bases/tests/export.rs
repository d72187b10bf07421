//! Batch export scenarios.

use glam::DVec3;
use resin_bases::{
    run_action, Action, BspKernel, MemoryScene, MeshExporter, ModelObject, ObjectId, Scene,
    SessionConfig, StlExporter, ToolContext, ToolError, Transform,
};
use resin_mesh::primitives::create_cube;
use resin_mesh::stl::read_stl_file;
use resin_mesh::{MeshError, MeshResult};
use std::path::{Path, PathBuf};

fn scene_with(names: &[&str]) -> (MemoryScene, Vec<ObjectId>) {
    let mut scene = MemoryScene::new();
    let ids: Vec<ObjectId> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cube = create_cube(DVec3::splat(2.0), false).unwrap();
            let placed = Transform::from_translation(DVec3::new(i as f64 * 5.0, 0.0, 0.0));
            scene.add_object(name, cube, placed)
        })
        .collect();
    (scene, ids)
}

fn export(
    scene: &mut MemoryScene,
    exporter: &dyn MeshExporter,
    session: &mut SessionConfig,
    action: Action,
) -> Result<String, ToolError> {
    let mut ctx = ToolContext::new(scene, &BspKernel, exporter, session);
    run_action(&mut ctx, &action).map(|report| report.message)
}

/// Exporter that refuses one object by name.
struct RefuseExporter(&'static str);

impl MeshExporter for RefuseExporter {
    fn export(&self, object: &ModelObject, path: &Path) -> MeshResult<()> {
        if object.name == self.0 {
            return Err(MeshError::unsupported("refused"));
        }
        StlExporter.export(object, path)
    }
}

#[test]
fn test_exports_each_selected_object() {
    let dir = tempfile::tempdir().unwrap();
    let (mut scene, ids) = scene_with(&["A", "B", "C", "D"]);
    scene.set_selection(&ids[..3]);
    scene.set_active(Some(ids[1]));
    let mut session = SessionConfig::default();

    let message = export(
        &mut scene,
        &StlExporter,
        &mut session,
        Action::ExportTo {
            destination: dir.path().to_path_buf(),
            sub_folder: None,
        },
    )
    .unwrap();

    assert_eq!(message, "3 files exported!");
    for name in ["A", "B", "C"] {
        assert!(dir.path().join(format!("{name}.stl")).is_file());
    }
    assert!(!dir.path().join("D.stl").exists());

    assert_eq!(scene.selected(), ids[..3].to_vec());
    assert_eq!(scene.active(), Some(ids[1]));
    assert_eq!(session.export_dir.as_deref(), Some(dir.path()));
}

#[test]
fn test_export_writes_world_space() {
    let dir = tempfile::tempdir().unwrap();
    let (mut scene, ids) = scene_with(&["A", "B"]);
    scene.set_selection(&[ids[1]]);
    let mut session = SessionConfig::default();

    export(
        &mut scene,
        &StlExporter,
        &mut session,
        Action::ExportTo {
            destination: dir.path().to_path_buf(),
            sub_folder: None,
        },
    )
    .unwrap();

    let mesh = read_stl_file(dir.path().join("B.stl")).unwrap();
    let (min, max) = mesh.bounding_box();
    assert_eq!(min, DVec3::new(5.0, 0.0, 0.0));
    assert_eq!(max, DVec3::new(7.0, 2.0, 2.0));
}

#[test]
fn test_file_destination_and_sub_folder() {
    let dir = tempfile::tempdir().unwrap();
    let (mut scene, ids) = scene_with(&["A"]);
    scene.set_selection(&ids);
    let mut session = SessionConfig::default();

    export(
        &mut scene,
        &StlExporter,
        &mut session,
        Action::ExportTo {
            destination: dir.path().join("picked.stl"),
            sub_folder: Some("bases".to_string()),
        },
    )
    .unwrap();

    let expected: PathBuf = dir.path().join("bases");
    assert!(expected.join("A.stl").is_file());
    assert!(!dir.path().join("picked.stl").exists());
    assert_eq!(session.export_dir, Some(expected));
}

#[test]
fn test_repeat_export() {
    let dir = tempfile::tempdir().unwrap();
    let (mut scene, ids) = scene_with(&["A", "B"]);
    let mut session = SessionConfig::default();

    scene.set_selection(&ids);
    let result = export(&mut scene, &StlExporter, &mut session, Action::RepeatExport);
    assert!(matches!(result, Err(ToolError::Precondition { .. })));

    session.export_dir = Some(dir.path().to_path_buf());
    let message = export(&mut scene, &StlExporter, &mut session, Action::RepeatExport).unwrap();
    assert_eq!(message, "2 files exported!");
    assert!(dir.path().join("B.stl").is_file());
}

#[test]
fn test_empty_selection_exports_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (mut scene, _) = scene_with(&["A"]);
    let mut session = SessionConfig::default();

    let message = export(
        &mut scene,
        &StlExporter,
        &mut session,
        Action::ExportTo {
            destination: dir.path().to_path_buf(),
            sub_folder: None,
        },
    )
    .unwrap();
    assert_eq!(message, "0 files exported!");
}

#[test]
fn test_failed_export_names_file_and_restores_selection() {
    let dir = tempfile::tempdir().unwrap();
    let (mut scene, ids) = scene_with(&["A", "B", "C"]);
    scene.set_selection(&ids);
    scene.set_active(Some(ids[0]));
    let mut session = SessionConfig::default();

    let result = export(
        &mut scene,
        &RefuseExporter("B"),
        &mut session,
        Action::ExportTo {
            destination: dir.path().to_path_buf(),
            sub_folder: None,
        },
    );

    match result {
        Err(ToolError::Export { path, .. }) => assert_eq!(path, dir.path().join("B.stl")),
        other => panic!("expected export error, got {other:?}"),
    }
    assert!(dir.path().join("A.stl").is_file());
    assert_eq!(scene.selected(), ids);
    assert_eq!(scene.active(), Some(ids[0]));
}
