use serde::{Deserialize, Serialize};
use shared::{EntityId, Pose};

use crate::state::scene::SceneState;
use crate::state::settings::SnapSettings;

/// What the transform gizmo manipulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    /// Pose reported by the gizmo, with grid snapping applied to the
    /// translation delta from `origin` (the pose at drag start)
    pub fn constrain(&self, pose: Pose, origin: &Pose, snap: &SnapSettings) -> Pose {
        match self {
            GizmoMode::Translate => {
                let mut position = origin.position;
                for (axis, p) in position.iter_mut().enumerate() {
                    *p += snap.apply(pose.position[axis] - origin.position[axis]);
                }
                Pose { position, ..pose }
            }
            GizmoMode::Rotate | GizmoMode::Scale => pose,
        }
    }
}

/// Attachment state of the transform gizmo
#[derive(Debug, Default)]
pub struct GizmoState {
    attached: Option<EntityId>,
    pub mode: GizmoMode,
    /// Whether a gizmo drag is in progress
    pub dragging: bool,
}

impl GizmoState {
    pub fn attached(&self) -> Option<&EntityId> {
        self.attached.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Attach to `id` if it is still in the scene
    pub fn attach(&mut self, id: &str, scene: &SceneState) -> bool {
        if !scene.contains(id) {
            tracing::debug!(id = %id, "gizmo target not in scene");
            self.detach();
            return false;
        }
        if self.attached.as_deref() != Some(id) {
            self.dragging = false;
        }
        self.attached = Some(id.to_string());
        true
    }

    pub fn detach(&mut self) {
        self.attached = None;
        self.dragging = false;
    }

    /// Detach if the attached entity left the scene. Returns true if detached.
    pub fn revalidate(&mut self, scene: &SceneState) -> bool {
        match &self.attached {
            Some(id) if !scene.contains(id) => {
                tracing::debug!(id = %id, "detaching gizmo from removed entity");
                self.detach();
                true
            }
            _ => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }
}
