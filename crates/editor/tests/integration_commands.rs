//! Integration tests for the EditorCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use blockcad_lib::command::{execute_json, execute_json_batch};
use blockcad_lib::harness::TestHarness;

#[test]
fn test_command_create_and_inspect() {
    let mut h = TestHarness::new();
    let batch = r#"[
        {"command": "set_tool", "tool": "create_box"},
        {"command": "click", "ray": {"x": 0, "z": 0}},
        {"command": "set_tool", "tool": "create_cylinder"},
        {"command": "click", "ray": {"x": 3, "z": 0}},
        {"command": "inspect"}
    ]"#;
    let responses = execute_json_batch(&mut h.session, batch).unwrap();
    assert!(responses.iter().all(|r| r.success));
    let data = responses[4].data.as_ref().unwrap();
    assert_eq!(data["entity_count"], 2);
    assert_eq!(data["entities"][1]["kind"], "cylinder");
    assert_eq!(data["entities"][1]["pose"]["position"][0], 3.0);
    assert_eq!(data["tool"], "create_cylinder");
}

#[test]
fn test_command_face_pick_reports_descriptor() {
    let mut h = TestHarness::new();
    h.add_box_at(0.0, 0.0);
    let batch = r#"[
        {"command": "set_granularity", "granularity": "face"},
        {"command": "click", "ray": {"x": 0.2, "z": 0.1}}
    ]"#;
    let responses = execute_json_batch(&mut h.session, batch).unwrap();
    let hit = &responses[1].data.as_ref().unwrap()["up"]["hit"];
    assert_eq!(hit["type"], "face");
    assert!((hit["area"].as_f64().unwrap() - 0.5).abs() < 1e-5);
    assert!((hit["normal"][1].as_f64().unwrap() - 1.0).abs() < 1e-5);
    assert!((hit["centroid"][1].as_f64().unwrap() - 1.0).abs() < 1e-5);
}

#[test]
fn test_command_edge_pick() {
    let mut h = TestHarness::new();
    h.add_box_at(0.0, 0.0);
    let batch = r#"[
        {"command": "set_granularity", "granularity": "edge"},
        {"command": "click", "ray": {"x": 0.5, "z": 0.0}}
    ]"#;
    let responses = execute_json_batch(&mut h.session, batch).unwrap();
    let hit = &responses[1].data.as_ref().unwrap()["up"]["hit"];
    assert_eq!(hit["type"], "edge");
    assert!((hit["length"].as_f64().unwrap() - 1.0).abs() < 1e-5);
    assert!((hit["midpoint"][0].as_f64().unwrap() - 0.5).abs() < 1e-5);
    assert!((hit["midpoint"][2].as_f64().unwrap()).abs() < 1e-5);
    assert!((hit["direction"][2].as_f64().unwrap().abs() - 1.0).abs() < 1e-5);
}

#[test]
fn test_command_sketch_and_extrude() {
    let mut h = TestHarness::new();
    let batch = r#"[
        {"command": "set_tool", "tool": "sketch_circle"},
        {"command": "pointer_down", "ray": {"x": 1, "z": 1}},
        {"command": "pointer_move", "ray": {"x": 2, "z": 1}},
        {"command": "pointer_move", "ray": {"x": 3, "z": 1}},
        {"command": "pointer_up", "ray": {"x": 3, "z": 1}},
        {"command": "extrude"},
        {"command": "inspect"}
    ]"#;
    let responses = execute_json_batch(&mut h.session, batch).unwrap();
    assert!(responses.iter().all(|r| r.success), "{responses:?}");
    let data = responses[6].data.as_ref().unwrap();
    assert_eq!(data["entity_count"], 1);
    let solid = &data["entities"][0]["solid"];
    assert_eq!(solid["kind"], "extrude");
    assert_eq!(solid["params"]["shape"]["type"], "circle");
    assert_eq!(solid["params"]["shape"]["radius"], 2.0);
    assert_eq!(solid["params"]["extrudeOptions"]["depth"], 1.0);
    assert_eq!(data["sketch"]["previews"], 1);
}

#[test]
fn test_command_set_transform_and_undo() {
    let mut h = TestHarness::new();
    let id = h.add_box_at(0.0, 0.0);
    let set = format!(r#"{{"command": "set_transform", "id": "{id}", "position": [2.0, null, -1.0]}}"#);
    let resp = execute_json(&mut h.session, &set).unwrap();
    assert!(resp.success);
    assert_eq!(h.position_of(&id), Some([2.0, 0.5, -1.0]));

    let resp = execute_json(&mut h.session, r#"{"command": "undo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["undone"], true);
    assert_eq!(h.position_of(&id), Some([0.0, 0.5, 0.0]));

    let resp = execute_json(&mut h.session, r#"{"command": "redo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["redone"], true);
    assert_eq!(h.position_of(&id), Some([2.0, 0.5, -1.0]));
}

#[test]
fn test_command_set_transform_defaults_to_selection() {
    let mut h = TestHarness::new();
    let id = h.add_box_at(0.0, 0.0);
    let resp = execute_json(
        &mut h.session,
        r#"{"command": "set_transform", "scale": [2, 2, 2]}"#,
    )
    .unwrap();
    assert!(!resp.success);

    execute_json(&mut h.session, &format!(r#"{{"command": "select", "id": "{id}"}}"#)).unwrap();
    let resp = execute_json(
        &mut h.session,
        r#"{"command": "set_transform", "scale": [2, 2, 2]}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert_eq!(h.pose_of(&id).unwrap().scale, [2.0, 2.0, 2.0]);
}

#[test]
fn test_command_set_visible_hides_from_picking() {
    let mut h = TestHarness::new();
    let id = h.add_box_at(0.0, 0.0);
    execute_json(&mut h.session, r#"{"command": "set_tool", "tool": "translate"}"#).unwrap();
    execute_json(&mut h.session, &format!(r#"{{"command": "select", "id": "{id}"}}"#)).unwrap();
    assert!(h.session.gizmo.is_attached());

    let hide = format!(r#"{{"command": "set_visible", "id": "{id}", "visible": false}}"#);
    let resp = execute_json(&mut h.session, &hide).unwrap();
    assert!(resp.success);
    assert!(h.selected().is_none());
    assert!(!h.session.gizmo.is_attached());

    let resp = execute_json(&mut h.session, r#"{"command": "click", "ray": {"x": 0, "z": 0}}"#).unwrap();
    assert_eq!(resp.data.unwrap()["up"]["outcome"], "missed");

    let show = format!(r#"{{"command": "set_visible", "id": "{id}", "visible": true}}"#);
    assert!(execute_json(&mut h.session, &show).unwrap().success);
    let resp = execute_json(&mut h.session, r#"{"command": "inspect"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["entities"][0]["visible"], true);

    let resp = execute_json(
        &mut h.session,
        r#"{"command": "set_visible", "id": "ghost", "visible": false}"#,
    )
    .unwrap();
    assert!(!resp.success);
}

#[test]
fn test_command_delete_selected() {
    let mut h = TestHarness::new();
    let id = h.add_box_at(0.0, 0.0);
    execute_json(&mut h.session, r#"{"command": "set_tool", "tool": "translate"}"#).unwrap();
    execute_json(&mut h.session, &format!(r#"{{"command": "select", "id": "{id}"}}"#)).unwrap();
    assert!(h.session.gizmo.is_attached());

    let resp = execute_json(&mut h.session, r#"{"command": "delete_selected"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["removed"], id.as_str());
    assert_eq!(h.entity_count(), 0);
    assert!(h.session.selection.highlight().is_none());
    assert!(!h.session.gizmo.is_attached());

    let resp = execute_json(&mut h.session, r#"{"command": "delete_selected"}"#).unwrap();
    assert!(resp.data.unwrap()["removed"].is_null());
}

#[test]
fn test_command_gizmo_drag_session() {
    let mut h = TestHarness::new();
    let id = h.add_box_at(0.0, 0.0);
    let batch = format!(
        r#"[
        {{"command": "set_tool", "tool": "translate"}},
        {{"command": "select", "id": "{id}"}},
        {{"command": "gizmo_drag_start"}},
        {{"command": "gizmo_change", "pose": {{"position": [0.4, 0.5, 0.0]}}}},
        {{"command": "gizmo_change", "pose": {{"position": [1.2, 0.5, 0.7]}}}},
        {{"command": "gizmo_drag_end"}}
    ]"#
    );
    let responses = execute_json_batch(&mut h.session, &batch).unwrap();
    assert!(responses.iter().all(|r| r.success), "{responses:?}");
    assert_eq!(h.position_of(&id), Some([1.0, 0.5, 0.5]));

    assert!(h.undo());
    assert!(h.undo());
    assert_eq!(h.position_of(&id), Some([0.0, 0.5, 0.0]));
}

#[test]
fn test_command_gizmo_drag_without_attachment_fails() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h.session, r#"{"command": "gizmo_drag_start"}"#).unwrap();
    assert!(!resp.success);
    let resp = execute_json(
        &mut h.session,
        r#"{"command": "gizmo_change", "pose": {"position": [1, 0, 0]}}"#,
    )
    .unwrap();
    assert!(!resp.success);
}

#[test]
fn test_command_keyboard() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h.session, r#"{"command": "key", "key": "g"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["handled"], true);
    assert!(!h.session.settings.snap.enabled);

    let resp = execute_json(&mut h.session, r#"{"command": "key", "key": "z", "ctrl": true}"#).unwrap();
    assert_eq!(resp.data.unwrap()["handled"], false);
}

#[test]
fn test_command_export_import_roundtrip() {
    let mut h = TestHarness::new();
    h.add_box_at(1.0, 2.0);
    let resp = execute_json(&mut h.session, r#"{"command": "export_scene"}"#).unwrap();
    let text = resp.data.unwrap()["scene_json"].as_str().unwrap().to_string();

    let mut other = TestHarness::new();
    let document: serde_json::Value = serde_json::from_str(&text).unwrap();
    let cmd = serde_json::json!({"command": "import_scene", "document": document});
    let resp = execute_json(&mut other.session, &cmd.to_string()).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["entity_count"], 1);
    assert_eq!(other.export_scene_json(), text);
}

#[test]
fn test_command_import_rejects_bad_document() {
    let mut h = TestHarness::new();
    h.add_box_at(0.0, 0.0);
    let resp = execute_json(
        &mut h.session,
        r#"{"command": "import_scene", "document": {"items": [{"kind": "box", "params": {"w": 0, "h": 1, "d": 1}}]}}"#,
    )
    .unwrap();
    assert!(!resp.success);
    assert_eq!(h.entity_count(), 1);
}

#[test]
fn test_command_clear_and_tick() {
    let mut h = TestHarness::new();
    h.add_box_at(0.0, 0.0);
    let responses = execute_json_batch(
        &mut h.session,
        r#"[{"command": "clear"}, {"command": "tick"}, {"command": "inspect"}]"#,
    )
    .unwrap();
    assert_eq!(responses[2].data.as_ref().unwrap()["entity_count"], 0);
    assert_eq!(responses[2].data.as_ref().unwrap()["history"]["len"], 0);
}

#[test]
fn test_command_invalid_batch() {
    let mut h = TestHarness::new();
    assert!(execute_json_batch(&mut h.session, r#"{"command": "undo"}"#).is_err());
    assert!(execute_json(&mut h.session, r#"{"command": "pointer_down"}"#).is_err());
}
