//! Scene document import/export.
//!
//! Import is all-or-nothing: every item is checked and turned into an
//! entity before the caller touches the live scene.

use std::path::Path;

use shared::{Pose, Profile, SceneDocument, SceneItem, SelectionRef, Solid};

use crate::state::scene::{Entity, SceneState};
use crate::state::selection::Selection;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("document has no `items` array")]
    MissingItems,
    #[error("item {index}: {reason}")]
    Invalid { index: usize, reason: String },
}

/// Snapshot the scene (and selection) as a document
pub fn export_document(scene: &SceneState, selection: Option<&Selection>) -> SceneDocument {
    let items = scene
        .entities()
        .iter()
        .map(|entity| SceneItem {
            id: Some(entity.id.clone()),
            solid: entity.solid.clone(),
            position: entity.pose.position,
            rotation: entity.pose.rotation,
            scale: entity.pose.scale,
        })
        .collect();
    let selection = selection.map(|sel| SelectionRef {
        id: sel.entity_id.clone(),
        granularity: sel.granularity(),
    });
    SceneDocument { items, selection }
}

/// Pretty-printed document text
pub fn to_json(doc: &SceneDocument) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Decode a document from an already parsed JSON value
pub fn document_from_value(value: serde_json::Value) -> Result<SceneDocument, CodecError> {
    if !value.get("items").is_some_and(serde_json::Value::is_array) {
        return Err(CodecError::MissingItems);
    }
    Ok(serde_json::from_value(value)?)
}

pub fn parse_document(text: &str) -> Result<SceneDocument, CodecError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    document_from_value(value)
}

/// Build one entity per item. Items without an ID get a fresh one.
pub fn entities_from_document(doc: &SceneDocument) -> Result<Vec<Entity>, CodecError> {
    doc.items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            check_solid(&item.solid).map_err(|reason| CodecError::Invalid { index, reason })?;
            let pose = item.pose();
            check_pose(&pose).map_err(|reason| CodecError::Invalid { index, reason })?;
            let id = item
                .id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            Ok(Entity::new(id, item.solid.clone(), pose))
        })
        .collect()
}

pub fn save_document(doc: &SceneDocument, path: &Path) -> Result<(), CodecError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, to_json(doc)?)?;
    Ok(())
}

pub fn load_document(path: &Path) -> Result<SceneDocument, CodecError> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}

fn positive(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("`{name}` must be a positive number, got {value}"))
    }
}

fn check_solid(solid: &Solid) -> Result<(), String> {
    match solid {
        Solid::Box { w, h, d } => {
            positive("w", *w)?;
            positive("h", *h)?;
            positive("d", *d)
        }
        Solid::Sphere { r } => positive("r", *r),
        Solid::Cylinder { r, h } => {
            positive("r", *r)?;
            positive("h", *h)
        }
        Solid::Extrude {
            shape,
            extrude_options,
        } => {
            positive("depth", extrude_options.depth)?;
            match shape {
                Profile::Rectangle { min, max } => {
                    positive("width", max[0] - min[0])?;
                    positive("length", max[1] - min[1])
                }
                Profile::Circle { center, radius } => {
                    if !center.iter().all(|c| c.is_finite()) {
                        return Err("circle center must be finite".into());
                    }
                    positive("radius", *radius)
                }
            }
        }
    }
}

fn check_pose(pose: &Pose) -> Result<(), String> {
    let mut components = pose.position.iter().chain(&pose.rotation).chain(&pose.scale);
    if components.all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err("pose components must be finite".into())
    }
}
