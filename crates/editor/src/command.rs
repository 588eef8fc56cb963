//! JSON command protocol driving an editor session.
//!
//! Each command is `{"command": "<name>", ...}`; batches are JSON arrays.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::{Granularity, Pose};

use crate::interaction::{Key, Modifiers, PointerOutcome};
use crate::state::selection::{Selection, SelectionTarget};
use crate::state::{entity_display_name, EditorSession, ToolMode, TransformUpdate};
use crate::viewport::picking::{PickHit, Ray};

/// Where a pointer event points
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RayInput {
    /// Explicit world-space ray
    Ray { origin: [f32; 3], direction: [f32; 3] },
    /// Straight down onto ground `(x, z)`
    Ground { x: f32, z: f32 },
}

impl RayInput {
    pub fn to_ray(self) -> Ray {
        match self {
            RayInput::Ray { origin, direction } => {
                Ray::new(Vec3::from_array(origin), Vec3::from_array(direction))
            }
            RayInput::Ground { x, z } => Ray::down_at(x, z),
        }
    }
}

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    SetTool {
        tool: ToolMode,
    },
    SetGranularity {
        granularity: Granularity,
    },
    PointerDown {
        ray: RayInput,
    },
    PointerMove {
        ray: RayInput,
    },
    PointerUp {
        ray: RayInput,
    },
    /// Press and release at the same ray.
    Click {
        ray: RayInput,
    },
    Key {
        key: Key,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
    /// Extrude the newest sketch profile.
    Extrude,
    ClearSketch,
    /// Partial pose update; `null` components are kept. Defaults to the selection.
    SetTransform {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        position: [Option<f64>; 3],
        #[serde(default)]
        rotation: [Option<f64>; 3],
        #[serde(default)]
        scale: [Option<f64>; 3],
    },
    DeleteSelected,
    ConfigureSnap {
        #[serde(default)]
        enabled: Option<bool>,
        #[serde(default)]
        step: Option<f64>,
    },
    ExportScene,
    ImportScene {
        document: Value,
    },
    Undo,
    Redo,
    /// Select a whole entity by ID.
    Select {
        id: String,
    },
    /// Show or hide an entity; hidden entities cannot be picked.
    SetVisible {
        id: String,
        visible: bool,
    },
    ClearSelection,
    /// Inspect the session: entities, selection, tool and history.
    Inspect,
    /// Clear the entire scene.
    Clear,
    /// Per-frame housekeeping.
    Tick,
    GizmoDragStart,
    GizmoChange {
        pose: Pose,
    },
    GizmoDragEnd,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the session.
pub fn execute_command(session: &mut EditorSession, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::SetTool { tool } => {
            session.set_tool(tool);
            CommandResponse::ok_with_data(json!({ "tool": tool }))
        }

        EditorCommand::SetGranularity { granularity } => {
            session.set_granularity(granularity);
            CommandResponse::ok_with_data(json!({ "granularity": granularity }))
        }

        EditorCommand::PointerDown { ray } => {
            let outcome = session.pointer_down(&ray.to_ray());
            CommandResponse::ok_with_data(outcome_json(&outcome))
        }

        EditorCommand::PointerMove { ray } => {
            let outcome = session.pointer_move(&ray.to_ray());
            CommandResponse::ok_with_data(outcome_json(&outcome))
        }

        EditorCommand::PointerUp { ray } => {
            let outcome = session.pointer_up(&ray.to_ray());
            CommandResponse::ok_with_data(outcome_json(&outcome))
        }

        EditorCommand::Click { ray } => {
            let ray = ray.to_ray();
            let down = session.pointer_down(&ray);
            let up = session.pointer_up(&ray);
            CommandResponse::ok_with_data(json!({
                "down": outcome_json(&down),
                "up": outcome_json(&up),
            }))
        }

        EditorCommand::Key { key, ctrl, shift } => {
            let handled = session.key_pressed(key, Modifiers { ctrl, shift });
            CommandResponse::ok_with_data(json!({ "handled": handled }))
        }

        EditorCommand::Extrude => match session.extrude() {
            Some(id) => CommandResponse::ok_with_data(json!({ "id": id })),
            None => CommandResponse::err("No sketch profile to extrude"),
        },

        EditorCommand::ClearSketch => {
            session.clear_sketch();
            CommandResponse::ok()
        }

        EditorCommand::SetTransform {
            id,
            position,
            rotation,
            scale,
        } => {
            let Some(id) = id.or_else(|| session.selection.primary().cloned()) else {
                return CommandResponse::err("No entity given and nothing selected");
            };
            let update = TransformUpdate {
                position,
                rotation,
                scale,
            };
            match session.set_transform(&id, &update) {
                Some(pose) => CommandResponse::ok_with_data(json!({ "id": id, "pose": pose })),
                None => CommandResponse::err(format!("Entity not found: {id}")),
            }
        }

        EditorCommand::DeleteSelected => {
            let removed = session.delete_selected();
            CommandResponse::ok_with_data(json!({ "removed": removed }))
        }

        EditorCommand::ConfigureSnap { enabled, step } => {
            if let Some(step) = step.filter(|s| !s.is_finite() || *s < 0.0) {
                return CommandResponse::err(format!("Invalid snap step: {step}"));
            }
            session.configure_snap(enabled, step);
            CommandResponse::ok_with_data(json!({ "snap": session.settings.snap }))
        }

        EditorCommand::ExportScene => match session.export_json() {
            Ok(json) => CommandResponse::ok_with_data(json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::ImportScene { document } => match session.import_value(document) {
            Ok(count) => CommandResponse::ok_with_data(json!({ "entity_count": count })),
            Err(e) => CommandResponse::err(format!("Import failed: {e}")),
        },

        EditorCommand::Undo => {
            let success = session.undo();
            CommandResponse::ok_with_data(json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = session.redo();
            CommandResponse::ok_with_data(json!({ "redone": success }))
        }

        EditorCommand::Select { id } => {
            if session.select_entity(&id) {
                CommandResponse::ok_with_data(json!({ "selected": id }))
            } else {
                CommandResponse::err(format!("Entity not found: {id}"))
            }
        }

        EditorCommand::SetVisible { id, visible } => {
            if session.set_visible(&id, visible) {
                CommandResponse::ok_with_data(json!({ "id": id, "visible": visible }))
            } else {
                CommandResponse::err(format!("Entity not found: {id}"))
            }
        }

        EditorCommand::ClearSelection => {
            session.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::Inspect => CommandResponse::ok_with_data(inspect(session)),

        EditorCommand::Clear => {
            session.clear_scene();
            CommandResponse::ok()
        }

        EditorCommand::Tick => {
            session.frame_tick();
            CommandResponse::ok()
        }

        EditorCommand::GizmoDragStart => {
            if session.gizmo_drag_start() {
                CommandResponse::ok()
            } else {
                CommandResponse::err("Gizmo is not attached")
            }
        }

        EditorCommand::GizmoChange { pose } => match session.gizmo_change(pose) {
            Some(pose) => CommandResponse::ok_with_data(json!({ "pose": pose })),
            None => CommandResponse::err("No gizmo drag in progress"),
        },

        EditorCommand::GizmoDragEnd => {
            session.gizmo_drag_end();
            CommandResponse::ok()
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(session: &mut EditorSession, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(session, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    session: &mut EditorSession,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(session, cmd))
        .collect())
}

fn inspect(session: &EditorSession) -> Value {
    let entities: Vec<Value> = session
        .scene
        .entities()
        .iter()
        .map(|entity| {
            json!({
                "id": entity.id,
                "name": entity_display_name(entity),
                "kind": entity.solid.kind(),
                "solid": entity.solid,
                "pose": entity.pose,
                "visible": entity.visible,
            })
        })
        .collect();
    json!({
        "entity_count": entities.len(),
        "entities": entities,
        "selection": session.selection.current().map(selection_json),
        "tool": session.tool,
        "granularity": session.granularity,
        "gizmo": {
            "attached": session.gizmo.attached(),
            "mode": session.gizmo.mode,
            "dragging": session.gizmo.dragging,
        },
        "sketch": {
            "mode": session.sketch.mode(),
            "drawing": session.sketch.is_drawing(),
            "previews": session.sketch.preview_count(),
        },
        "history": {
            "len": session.history.len(),
            "cursor": session.history.cursor(),
            "can_undo": session.history.can_undo(),
            "can_redo": session.history.can_redo(),
        },
        "snap": session.settings.snap,
    })
}

fn selection_json(selection: &Selection) -> Value {
    match &selection.target {
        SelectionTarget::Shape => json!({ "type": "shape", "id": selection.entity_id }),
        SelectionTarget::Face(face) => json!({
            "type": "face",
            "id": face.entity_id,
            "triangle_index": face.triangle_index,
            "vertices": face.vertices.map(|v| v.to_array()),
            "normal": face.normal.to_array(),
            "area": face.area,
            "centroid": face.centroid().to_array(),
        }),
        SelectionTarget::Edge(edge) => json!({
            "type": "edge",
            "id": edge.entity_id,
            "edge_index": edge.edge_index,
            "start": edge.start.to_array(),
            "end": edge.end.to_array(),
            "length": edge.length(),
            "midpoint": edge.midpoint().to_array(),
            "direction": edge.direction().to_array(),
        }),
    }
}

fn hit_json(hit: &PickHit) -> Value {
    match hit {
        PickHit::Shape {
            entity_id,
            distance,
        } => json!({ "type": "shape", "id": entity_id, "distance": distance }),
        PickHit::Face(face) => selection_json(&Selection::face(face.clone())),
        PickHit::Edge(edge) => selection_json(&Selection::edge(edge.clone())),
    }
}

fn outcome_json(outcome: &PointerOutcome) -> Value {
    match outcome {
        PointerOutcome::Ignored => json!({ "outcome": "ignored" }),
        PointerOutcome::Pressed => json!({ "outcome": "pressed" }),
        PointerOutcome::Blocked(id) => json!({ "outcome": "blocked", "id": id }),
        PointerOutcome::Created(id) => json!({ "outcome": "created", "id": id }),
        PointerOutcome::SketchStarted => json!({ "outcome": "sketch_started" }),
        PointerOutcome::SketchUpdated => json!({ "outcome": "sketch_updated" }),
        PointerOutcome::SketchEnded => json!({ "outcome": "sketch_ended" }),
        PointerOutcome::Picked(hit) => json!({ "outcome": "picked", "hit": hit_json(hit) }),
        PointerOutcome::Missed => json!({ "outcome": "missed" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_undo() {
        let json = r#"{"command": "undo"}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, EditorCommand::Undo));
    }

    #[test]
    fn test_command_serde_pointer_ground() {
        let json = r#"{"command": "pointer_down", "ray": {"x": 1.0, "z": 2.0}}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            EditorCommand::PointerDown { ray } => {
                let ray = ray.to_ray();
                assert_eq!(ray.ground_hit().map(|p| (p.x, p.z)), Some((1.0, 2.0)));
            }
            _ => panic!("Expected PointerDown"),
        }
    }

    #[test]
    fn test_command_serde_pointer_explicit_ray() {
        let json = r#"{"command": "pointer_up", "ray": {"origin": [0, 5, 0], "direction": [0, -2, 0]}}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            EditorCommand::PointerUp { ray } => {
                assert!((ray.to_ray().direction - Vec3::NEG_Y).length() < 1e-6);
            }
            _ => panic!("Expected PointerUp"),
        }
    }

    #[test]
    fn test_command_serde_set_transform_partial() {
        let json = r#"{"command": "set_transform", "id": "a", "position": [1.0, null, null]}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            EditorCommand::SetTransform {
                id,
                position,
                rotation,
                ..
            } => {
                assert_eq!(id.as_deref(), Some("a"));
                assert_eq!(position, [Some(1.0), None, None]);
                assert_eq!(rotation, [None, None, None]);
            }
            _ => panic!("Expected SetTransform"),
        }
    }

    #[test]
    fn test_execute_create_via_click() {
        let mut s = EditorSession::default();
        execute_json(&mut s, r#"{"command": "set_tool", "tool": "create_box"}"#).unwrap();
        let resp = execute_json(&mut s, r#"{"command": "click", "ray": {"x": 0.9, "z": 2.1}}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["down"]["outcome"], "created");
        assert_eq!(data["up"]["outcome"], "ignored");
        assert_eq!(s.scene.len(), 1);
        assert_eq!(s.scene.entities()[0].pose.position, [1.0, 0.5, 2.0]);
    }

    #[test]
    fn test_execute_select_missing_entity() {
        let mut s = EditorSession::default();
        let resp = execute_json(&mut s, r#"{"command": "select", "id": "nope"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("nope"));
    }

    #[test]
    fn test_execute_extrude_without_sketch() {
        let mut s = EditorSession::default();
        let resp = execute_json(&mut s, r#"{"command": "extrude"}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_execute_configure_snap() {
        let mut s = EditorSession::default();
        let resp = execute_json(&mut s, r#"{"command": "configure_snap", "step": 0.25}"#).unwrap();
        assert!(resp.success);
        assert_eq!(s.settings.snap.step, 0.25);
        let resp = execute_json(&mut s, r#"{"command": "configure_snap", "step": -1}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(s.settings.snap.step, 0.25);
    }

    #[test]
    fn test_execute_import_missing_items() {
        let mut s = EditorSession::default();
        let resp = execute_json(
            &mut s,
            r#"{"command": "import_scene", "document": {"selection": null}}"#,
        )
        .unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("items"));
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut s = EditorSession::default();
        assert!(execute_json(&mut s, "not json").is_err());
        assert!(execute_json(&mut s, r#"{"command": "fly"}"#).is_err());
    }

    #[test]
    fn test_execute_batch() {
        let mut s = EditorSession::default();
        let batch = r#"[
            {"command": "set_tool", "tool": "create_sphere"},
            {"command": "click", "ray": {"x": 0, "z": 0}},
            {"command": "set_tool", "tool": "select"},
            {"command": "click", "ray": {"x": 0, "z": 0}},
            {"command": "inspect"}
        ]"#;
        let responses = execute_json_batch(&mut s, batch).unwrap();
        assert_eq!(responses.len(), 5);
        assert!(responses.iter().all(|r| r.success));
        let data = responses[4].data.as_ref().unwrap();
        assert_eq!(data["entity_count"], 1);
        assert_eq!(data["selection"]["type"], "shape");
        assert_eq!(data["entities"][0]["kind"], "sphere");
    }

    #[test]
    fn test_response_serialization_skips_none() {
        let json = serde_json::to_string(&CommandResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }
}
