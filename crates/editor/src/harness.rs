//! Headless test harness for driving an editor session the way a user would.

use glam::Vec3;
use shared::{EntityId, Granularity, Pose, Solid};

use crate::interaction::{Key, Modifiers, PointerOutcome};
use crate::state::{AppSettings, EditorSession, ToolMode};
use crate::validation::MeshValidator;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Ray;

/// Headless harness: an editor session plus a camera for screen-space clicks
pub struct TestHarness {
    pub session: EditorSession,
    pub camera: ArcBallCamera,
    /// Viewport width / height used for screen rays
    pub aspect: f32,
}

impl TestHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(AppSettings::default())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            session: EditorSession::with_settings(settings),
            camera: ArcBallCamera::default(),
            aspect: 16.0 / 9.0,
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Place a solid directly, bypassing tools
    pub fn add(&mut self, solid: Solid, position: [f64; 3]) -> EntityId {
        self.session.scene.create_entity(solid, Pose::at(position))
    }

    /// Box resting on the ground centered at `(x, z)`
    pub fn add_box_at(&mut self, x: f64, z: f64) -> EntityId {
        self.add(
            Solid::Box {
                w: 1.0,
                h: 1.0,
                d: 1.0,
            },
            [x, 0.5, z],
        )
    }

    /// Create a primitive with a creation tool click at ground `(x, z)`
    pub fn create_with_tool(&mut self, tool: ToolMode, x: f32, z: f32) -> Option<EntityId> {
        self.session.set_tool(tool);
        let outcome = self.click(x, z).0;
        match outcome {
            PointerOutcome::Created(id) => Some(id),
            _ => None,
        }
    }

    pub fn create_box_at(&mut self, x: f32, z: f32) -> Option<EntityId> {
        self.create_with_tool(ToolMode::CreateBox, x, z)
    }

    // ── Pointer input ─────────────────────────────────────────

    /// Press and release straight above ground `(x, z)`.
    /// Returns the outcomes of the press and the release.
    pub fn click(&mut self, x: f32, z: f32) -> (PointerOutcome, PointerOutcome) {
        let ray = Ray::down_at(x, z);
        let down = self.session.pointer_down(&ray);
        let up = self.session.pointer_up(&ray);
        (down, up)
    }

    /// Click through the camera at normalized device coordinates
    pub fn click_screen(&mut self, ndc: [f32; 2]) -> PointerOutcome {
        let ray = self.camera.screen_ray(ndc, self.aspect);
        self.session.pointer_down(&ray);
        self.session.pointer_up(&ray)
    }

    /// Click the projection of a world point
    pub fn click_world(&mut self, point: Vec3) -> Option<PointerOutcome> {
        let ndc = self.camera.project(point, self.aspect)?;
        Some(self.click_screen(ndc))
    }

    /// Drag from `from` to `to` on the ground through `steps` intermediate moves
    pub fn drag(&mut self, from: [f32; 2], to: [f32; 2], steps: usize) -> PointerOutcome {
        self.session.pointer_down(&Ray::down_at(from[0], from[1]));
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let x = from[0] + (to[0] - from[0]) * t;
            let z = from[1] + (to[1] - from[1]) * t;
            self.session.pointer_move(&Ray::down_at(x, z));
        }
        self.session.pointer_up(&Ray::down_at(to[0], to[1]))
    }

    /// Sketch a profile with the given sketch tool
    pub fn sketch(&mut self, tool: ToolMode, from: [f32; 2], to: [f32; 2]) {
        self.session.set_tool(tool);
        self.drag(from, to, 4);
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn select_at(&mut self, x: f32, z: f32, granularity: Granularity) -> bool {
        self.session.set_granularity(granularity);
        self.session.select_at(&Ray::down_at(x, z)).is_some()
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.session.selection.primary()
    }

    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    // ── Keyboard / history ────────────────────────────────────

    pub fn press(&mut self, key: Key) -> bool {
        self.session.key_pressed(key, Modifiers::default())
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    /// Drag the gizmo through `poses`, as the widget would report them
    pub fn gizmo_drag(&mut self, poses: &[Pose]) -> bool {
        if !self.session.gizmo_drag_start() {
            return false;
        }
        for pose in poses {
            self.session.gizmo_change(pose.clone());
        }
        self.session.gizmo_drag_end();
        true
    }

    // ── Import / export ───────────────────────────────────────

    /// Load a scene from JSON string
    pub fn load_scene_json(&mut self, json: &str) -> Result<usize, String> {
        self.session.import_json(json).map_err(|e| e.to_string())
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        self.session.export_json().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.session.clear_scene();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn entity_count(&self) -> usize {
        self.session.scene.len()
    }

    pub fn pose_of(&self, id: &str) -> Option<Pose> {
        self.session.scene.get(id).map(|e| e.pose.clone())
    }

    pub fn position_of(&self, id: &str) -> Option<[f64; 3]> {
        self.session.scene.get(id).map(|e| e.pose.position)
    }

    /// World mesh of an entity
    pub fn mesh_of(&self, id: &str) -> Option<MeshData> {
        self.session.scene.get(id).map(|e| e.world_mesh())
    }

    /// Run `check` against a validator for an entity's world mesh
    pub fn validate_mesh<R>(&self, id: &str, check: impl FnOnce(&MeshValidator) -> R) -> Option<R> {
        let mesh = self.mesh_of(id)?;
        Some(check(&MeshValidator::new(&mesh)))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
