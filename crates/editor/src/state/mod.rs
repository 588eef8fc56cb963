pub mod history;
pub mod scene;
pub mod selection;
pub mod settings;
pub mod sketch;
pub mod tool;

use shared::{EntityId, Granularity, Pose, SceneDocument};

use crate::codec::{self, CodecError};
use crate::interaction::GestureState;
use crate::viewport::gizmo::GizmoState;
use crate::viewport::picking::{self, PickHit, Ray};

use history::TransformHistory;
pub use history::HistoryEntry;
pub use scene::{entity_display_name, short_id, SceneState, TransformUpdate};
use selection::{EdgeSelection, FaceSelection, Highlight, Selection, SelectionState, SelectionTarget};
pub use settings::AppSettings;
use sketch::SketchState;
pub use tool::ToolMode;

/// Everything an editor handler reads or mutates
#[derive(Default)]
pub struct EditorSession {
    pub scene: SceneState,
    pub selection: SelectionState,
    pub sketch: SketchState,
    pub history: TransformHistory,
    pub gizmo: GizmoState,
    pub settings: AppSettings,
    pub tool: ToolMode,
    pub granularity: Granularity,
    pub(crate) gesture: GestureState,
}

impl EditorSession {
    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ── Selection ─────────────────────────────────────────────

    /// Pick along `ray` with the active granularity and select the result.
    ///
    /// A miss clears the selection and detaches the gizmo.
    pub fn select_at(&mut self, ray: &Ray) -> Option<PickHit> {
        let hit = picking::pick(
            ray,
            &self.scene,
            self.granularity,
            self.settings.pick.edge_threshold,
        );
        match &hit {
            Some(PickHit::Shape { entity_id, .. }) => {
                self.select_entity(entity_id);
            }
            Some(PickHit::Face(face)) => {
                self.gizmo.detach();
                self.apply_selection(Selection::face(face.clone()));
            }
            Some(PickHit::Edge(edge)) => {
                self.gizmo.detach();
                self.apply_selection(Selection::edge(edge.clone()));
            }
            None => self.clear_selection(),
        }
        hit
    }

    /// Select a whole entity; transform tools attach the gizmo to it
    pub fn select_entity(&mut self, id: &str) -> bool {
        if !self.scene.contains(id) {
            tracing::debug!(id = %id, "select: entity not in scene");
            return false;
        }
        self.apply_selection(Selection::shape(id.to_string()));
        match self.tool.gizmo_mode() {
            Some(mode) => {
                self.gizmo.mode = mode;
                self.gizmo.attach(id, &self.scene);
            }
            None => self.gizmo.detach(),
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.gizmo.detach();
    }

    /// Highlight mirroring `selection`, or `None` if its entity is gone
    pub fn highlight_for(&self, selection: &Selection) -> Option<Highlight> {
        match &selection.target {
            SelectionTarget::Shape => self
                .scene
                .get(&selection.entity_id)
                .map(|e| Highlight::BoxOutline(e.world_aabb())),
            SelectionTarget::Face(face) => Some(Highlight::TrianglePatch(face.vertices)),
            SelectionTarget::Edge(edge) => Some(Highlight::Segment(edge.start, edge.end)),
        }
    }

    fn apply_selection(&mut self, selection: Selection) {
        match self.highlight_for(&selection) {
            Some(highlight) => self.selection.select(selection, highlight),
            None => self.clear_selection(),
        }
    }

    /// Recompute the selection descriptor and highlight after `id` moved
    fn refresh_selection(&mut self, id: &str) {
        let Some(current) = self
            .selection
            .current()
            .filter(|s| s.entity_id == id)
            .cloned()
        else {
            return;
        };
        let Some(entity) = self.scene.get(id) else {
            self.clear_selection();
            return;
        };
        let refreshed = match &current.target {
            SelectionTarget::Shape => Some(current.clone()),
            SelectionTarget::Face(face) => entity
                .world_mesh()
                .triangle(face.triangle_index)
                .map(|v| Selection::face(FaceSelection::new(id.to_string(), face.triangle_index, v))),
            SelectionTarget::Edge(edge) => entity
                .world_outline()
                .segments
                .get(edge.edge_index)
                .map(|[start, end]| {
                    Selection::edge(EdgeSelection {
                        entity_id: id.to_string(),
                        edge_index: edge.edge_index,
                        start: *start,
                        end: *end,
                    })
                }),
        };
        match refreshed {
            Some(selection) => self.apply_selection(selection),
            None => self.clear_selection(),
        }
    }

    // ── Scene edits ───────────────────────────────────────────

    /// Delete the selected entity. Returns its ID.
    pub fn delete_selected(&mut self) -> Option<EntityId> {
        let id = self.selection.primary()?.clone();
        self.clear_selection();
        if self.history.drag_target() == Some(&id) {
            self.history.end_drag();
        }
        self.scene.remove_entity(&id).map(|entity| entity.id)
    }

    /// Show or hide an entity. Hiding drops it from the selection and gizmo.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        if !self.scene.set_visible(id, visible) {
            return false;
        }
        if !visible && self.selection.is_selected(id) {
            self.clear_selection();
        }
        if !visible && self.gizmo.attached().is_some_and(|a| a == id) {
            self.gizmo.detach();
        }
        tracing::info!(id = %id, visible, "visibility set");
        true
    }

    /// Apply a partial pose update, recording before/after in history
    pub fn set_transform(&mut self, id: &str, update: &TransformUpdate) -> Option<Pose> {
        let (before, after) = self.scene.update_transform(id, update)?;
        if before != after {
            self.history.push(HistoryEntry::new(id, before));
            self.history.push(HistoryEntry::new(id, after.clone()));
        }
        tracing::info!(id = %id, position = ?after.position, "transform set");
        self.refresh_selection(id);
        Some(after)
    }

    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo().cloned() else {
            return false;
        };
        self.apply_history_entry(entry);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo().cloned() else {
            return false;
        };
        self.apply_history_entry(entry);
        true
    }

    fn apply_history_entry(&mut self, entry: HistoryEntry) {
        if self.scene.set_pose(&entry.id, entry.pose) {
            self.refresh_selection(&entry.id);
        } else {
            tracing::debug!(id = %entry.id, "history entry refers to a removed entity");
        }
    }

    /// Extrude the newest sketch profile into a solid
    pub fn extrude(&mut self) -> Option<EntityId> {
        let profile = self.sketch.take_latest_profile()?;
        let id = self
            .scene
            .create_entity(sketch::extrude_solid(profile), Pose::identity());
        Some(id)
    }

    pub fn clear_sketch(&mut self) {
        self.sketch.clear();
    }

    pub fn configure_snap(&mut self, enabled: Option<bool>, step: Option<f64>) {
        if let Some(enabled) = enabled {
            self.settings.snap.enabled = enabled;
        }
        if let Some(step) = step {
            self.settings.snap.step = step;
        }
        tracing::info!(
            enabled = self.settings.snap.enabled,
            step = self.settings.snap.step,
            "snap configured"
        );
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.settings.snap.enabled = !self.settings.snap.enabled;
        self.settings.snap.enabled
    }

    /// Switch tools. Any sketch drag in progress is abandoned; its previews stay.
    pub fn set_tool(&mut self, tool: ToolMode) {
        if tool == self.tool {
            return;
        }
        self.sketch.end();
        self.gesture.reset();
        self.tool = tool;
        match tool.gizmo_mode() {
            Some(mode) => {
                self.gizmo.mode = mode;
                let target = self
                    .selection
                    .current()
                    .filter(|s| s.granularity() == Granularity::Shape)
                    .map(|s| s.entity_id.clone());
                if let Some(id) = target {
                    self.gizmo.attach(&id, &self.scene);
                }
            }
            None => self.gizmo.detach(),
        }
        tracing::debug!(?tool, "tool changed");
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Remove every entity, preview and history entry
    pub fn clear_scene(&mut self) {
        self.clear_selection();
        self.scene.clear();
        self.sketch.clear();
        self.history.clear();
        self.gesture.reset();
    }

    // ── Import / export ───────────────────────────────────────

    pub fn export_document(&self) -> SceneDocument {
        codec::export_document(&self.scene, self.selection.current())
    }

    pub fn export_json(&self) -> Result<String, CodecError> {
        codec::to_json(&self.export_document())
    }

    /// Replace the scene with a document. On error nothing changes.
    pub fn import_document(&mut self, doc: &SceneDocument) -> Result<usize, CodecError> {
        let entities = codec::entities_from_document(doc).inspect_err(|e| {
            tracing::warn!("Rejected scene import: {e}");
        })?;
        self.clear_selection();
        self.history.clear();
        self.scene.replace_all(entities);
        if let Some(sel) = &doc.selection {
            if !self.select_entity(&sel.id) {
                tracing::debug!(id = %sel.id, "saved selection does not resolve");
            }
        }
        tracing::info!(count = self.scene.len(), "scene imported");
        Ok(self.scene.len())
    }

    pub fn import_value(&mut self, value: serde_json::Value) -> Result<usize, CodecError> {
        let doc = codec::document_from_value(value).inspect_err(|e| {
            tracing::warn!("Rejected scene import: {e}");
        })?;
        self.import_document(&doc)
    }

    pub fn import_json(&mut self, text: &str) -> Result<usize, CodecError> {
        let doc = codec::parse_document(text).inspect_err(|e| {
            tracing::warn!("Rejected scene import: {e}");
        })?;
        self.import_document(&doc)
    }

    pub fn autosave(&self) {
        self.scene.autosave();
    }
}
