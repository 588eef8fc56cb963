//! End-to-end scenarios: creation, export, import and history properties.

use blockcad_lib::codec::{self, CodecError};
use blockcad_lib::fixtures;
use blockcad_lib::harness::TestHarness;
use blockcad_lib::state::{EditorSession, ToolMode, TransformUpdate};
use shared::{Pose, SolidKind};

#[test]
fn test_box_at_snapped_point_survives_roundtrip() {
    let mut h = TestHarness::new();
    h.session.set_tool(ToolMode::CreateBox);
    h.click(1.1, 1.9);
    let json = h.export_scene_json();

    let mut fresh = EditorSession::default();
    assert_eq!(fresh.import_json(&json).unwrap(), 1);
    let entity = &fresh.scene.entities()[0];
    assert_eq!(entity.solid.kind(), SolidKind::Box);
    assert_eq!(entity.pose.position, [1.0, 0.5, 2.0]);
    assert_eq!(entity.pose.rotation, [0.0, 0.0, 0.0]);
    assert_eq!(entity.pose.scale, [1.0, 1.0, 1.0]);
}

#[test]
fn test_export_import_preserves_every_kind() {
    let mut first = EditorSession::default();
    first.import_document(&fixtures::mixed_document()).unwrap();
    let before = first.export_document();

    let mut second = EditorSession::default();
    second.import_json(&first.export_json().unwrap()).unwrap();
    let after = second.export_document();

    assert_eq!(before, after);
    assert_eq!(after.selection.unwrap().id, "sphere");
}

#[test]
fn test_import_without_items_keeps_scene() {
    let mut s = EditorSession::default();
    s.import_document(&fixtures::mixed_document()).unwrap();
    let err = s.import_json(r#"{"selection": null}"#).unwrap_err();
    assert!(matches!(err, CodecError::MissingItems));
    assert_eq!(s.scene.len(), 4);
}

#[test]
fn test_import_regenerates_duplicate_ids() {
    let mut s = EditorSession::default();
    let doc = fixtures::document(
        vec![
            fixtures::item("dup", fixtures::unit_box_solid(), [0.0, 0.5, 0.0]),
            fixtures::item("dup", fixtures::sphere_solid(1.0), [3.0, 1.0, 0.0]),
        ],
        None,
    );
    s.import_document(&doc).unwrap();
    let ids: Vec<&str> = s.scene.entities().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids[0], "dup");
    assert_ne!(ids[1], "dup");
}

#[test]
fn test_n_updates_then_n_undos_restore_initial_poses() {
    let mut s = EditorSession::default();
    s.import_document(&fixtures::mixed_document()).unwrap();
    let initial: Vec<Pose> = s.scene.entities().iter().map(|e| e.pose.clone()).collect();
    let ids: Vec<String> = s.scene.entities().iter().map(|e| e.id.clone()).collect();

    for (i, id) in ids.iter().enumerate() {
        let update = TransformUpdate {
            position: [None, None, Some(i as f64 + 1.0)],
            rotation: [Some(0.5), None, None],
            ..Default::default()
        };
        s.set_transform(id, &update).unwrap();
    }
    while s.undo() {}

    let restored: Vec<Pose> = s.scene.entities().iter().map(|e| e.pose.clone()).collect();
    assert_eq!(restored, initial);
}

#[test]
fn test_history_survives_deleted_entity() {
    let mut s = EditorSession::default();
    s.import_document(&fixtures::mixed_document()).unwrap();
    let update = TransformUpdate {
        position: [Some(9.0), None, None],
        ..Default::default()
    };
    s.set_transform("box", &update).unwrap();
    s.set_transform("sphere", &update).unwrap();
    s.select_entity("box");
    s.delete_selected();

    while s.undo() {}
    assert_eq!(s.scene.get("sphere").unwrap().pose.position, [2.0, 0.5, 0.0]);
    assert!(s.scene.get("box").is_none());
}

#[test]
fn test_document_file_roundtrip() {
    let path = std::env::temp_dir().join(format!("blockcad-scenario-{}.json", uuid::Uuid::new_v4()));
    let mut s = EditorSession::default();
    s.import_document(&fixtures::mixed_document()).unwrap();
    codec::save_document(&s.export_document(), &path).unwrap();

    let loaded = codec::load_document(&path).unwrap();
    assert_eq!(loaded, s.export_document());
    let _ = std::fs::remove_file(&path);
}
