//! Pointer and keyboard dispatch by tool mode.

use serde::{Deserialize, Serialize};
use shared::{EntityId, Granularity, Pose};

use crate::state::EditorSession;
use crate::viewport::picking::{self, PickHit, Ray};

/// Flags of the pointer gesture in progress
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GestureState {
    /// A pointer-down started this gesture
    pub pressed: bool,
    /// The pointer-down placed a primitive; the release must not pick
    pub created: bool,
}

impl GestureState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Z,
    Y,
    G,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
}

/// Result of a pointer event
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Nothing happened
    Ignored,
    /// Press remembered for a click on release
    Pressed,
    /// A creation tool pressed on an existing entity
    Blocked(EntityId),
    Created(EntityId),
    SketchStarted,
    SketchUpdated,
    SketchEnded,
    Picked(PickHit),
    /// Release over empty space
    Missed,
}

impl EditorSession {
    /// Pointer pressed along `ray`
    pub fn pointer_down(&mut self, ray: &Ray) -> PointerOutcome {
        if self.gesture.pressed {
            tracing::debug!("pointer down without release; abandoning previous gesture");
            self.sketch.end();
        }
        self.gesture = GestureState {
            pressed: true,
            created: false,
        };

        if let Some(solid) = self.tool.primitive() {
            let blocker = picking::pick(
                ray,
                &self.scene,
                Granularity::Shape,
                self.settings.pick.edge_threshold,
            );
            if let Some(hit) = blocker {
                return PointerOutcome::Blocked(hit.entity_id().clone());
            }
            let Some(ground) = ray.ground_hit() else {
                return PointerOutcome::Ignored;
            };
            let [x, z] = self.settings.snap.apply2([ground.x as f64, ground.z as f64]);
            let pose = Pose::at([x, solid.half_height(), z]);
            let id = self.scene.create_entity(solid, pose);
            self.gesture.created = true;
            return PointerOutcome::Created(id);
        }

        if self.tool.is_sketch() {
            let Some(ground) = ray.ground_hit() else {
                return PointerOutcome::Ignored;
            };
            let point = self.settings.snap.apply2([ground.x as f64, ground.z as f64]);
            return if self.sketch.begin(self.tool.sketch_mode(), point) {
                PointerOutcome::SketchStarted
            } else {
                PointerOutcome::Ignored
            };
        }

        PointerOutcome::Pressed
    }

    pub fn pointer_move(&mut self, ray: &Ray) -> PointerOutcome {
        if !self.sketch.is_drawing() {
            return PointerOutcome::Ignored;
        }
        let Some(ground) = ray.ground_hit() else {
            return PointerOutcome::Ignored;
        };
        let point = self.settings.snap.apply2([ground.x as f64, ground.z as f64]);
        if self.sketch.update(point) {
            PointerOutcome::SketchUpdated
        } else {
            PointerOutcome::Ignored
        }
    }

    /// Pointer released along `ray`. Completes the gesture started by
    /// [`EditorSession::pointer_down`].
    pub fn pointer_up(&mut self, ray: &Ray) -> PointerOutcome {
        if !self.gesture.pressed {
            tracing::debug!("pointer up without matching pointer down");
            return PointerOutcome::Ignored;
        }
        let gesture = self.gesture;
        self.gesture.reset();

        if self.sketch.is_drawing() {
            self.sketch.end();
            return PointerOutcome::SketchEnded;
        }
        if gesture.created {
            return PointerOutcome::Ignored;
        }
        match self.select_at(ray) {
            Some(hit) => PointerOutcome::Picked(hit),
            None => PointerOutcome::Missed,
        }
    }

    /// Keyboard shortcut. Returns true if the key was handled.
    pub fn key_pressed(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match (key, modifiers.ctrl, modifiers.shift) {
            (Key::Delete | Key::Backspace, false, _) => self.delete_selected().is_some(),
            (Key::Escape, _, _) => {
                self.clear_selection();
                true
            }
            (Key::Z, true, false) => self.undo(),
            (Key::Z, true, true) | (Key::Y, true, _) => self.redo(),
            (Key::G, false, _) => {
                let enabled = self.toggle_snap();
                tracing::info!(enabled, "snap toggled");
                true
            }
            _ => false,
        }
    }

    /// Per-frame housekeeping: drop a gizmo whose entity is gone
    pub fn frame_tick(&mut self) {
        if self.gizmo.revalidate(&self.scene) {
            self.selection.clear();
            self.history.end_drag();
        }
        let stale = self
            .selection
            .primary()
            .is_some_and(|id| !self.scene.contains(id));
        if stale {
            self.selection.clear();
        }
    }

    // ── Gizmo drag session ────────────────────────────────────

    /// The gizmo widget started dragging its attached entity
    pub fn gizmo_drag_start(&mut self) -> bool {
        let Some(id) = self.gizmo.attached().cloned() else {
            return false;
        };
        let Some(entity) = self.scene.get(&id) else {
            self.gizmo.detach();
            return false;
        };
        self.history.begin_drag(id, entity.pose.clone());
        self.gizmo.dragging = true;
        true
    }

    /// The gizmo widget committed a new pose for the dragged entity
    pub fn gizmo_change(&mut self, pose: Pose) -> Option<Pose> {
        let id = self.history.drag_target()?.clone();
        if !self.scene.contains(&id) {
            tracing::debug!(id = %id, "discarding drag of removed entity");
            self.history.end_drag();
            self.gizmo.detach();
            return None;
        }
        let origin = self.history.drag_origin().cloned().unwrap_or_else(|| pose.clone());
        let pose = self.gizmo.mode.constrain(pose, &origin, &self.settings.snap);
        self.scene.set_pose(&id, pose.clone());
        self.history.record_change(pose.clone());
        if let Some(selected) = self.selection.current().filter(|s| s.entity_id == id).cloned() {
            if let Some(highlight) = self.highlight_for(&selected) {
                self.selection.refresh_highlight(highlight);
            }
        }
        Some(pose)
    }

    pub fn gizmo_drag_end(&mut self) {
        self.history.end_drag();
        self.gizmo.end_drag();
    }
}
