//! Scene state management
//!
//! This module holds the registry of placed entities. Entities are kept in
//! insertion order and looked up by id; membership in the registry is the
//! only notion of "still part of the scene".

mod display;
mod entity_ops;
mod persistence;
mod transform_ops;

pub use display::{entity_display_name, short_id};
pub use transform_ops::TransformUpdate;

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{EntityId, Pose, Solid};

use crate::viewport::mesh::{self, EdgeOutline, MeshData};
use crate::viewport::picking::Aabb;

/// A placed solid
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub solid: Solid,
    pub pose: Pose,
    /// Hidden entities stay in the scene but are never picked
    pub visible: bool,
}

impl Entity {
    pub fn new(id: EntityId, solid: Solid, pose: Pose) -> Self {
        Self {
            id,
            solid,
            pose,
            visible: true,
        }
    }

    /// Local → world matrix (scale, then XYZ Euler rotation, then translation)
    pub fn world_matrix(&self) -> Mat4 {
        let [px, py, pz] = self.pose.position;
        let [rx, ry, rz] = self.pose.rotation;
        let [sx, sy, sz] = self.pose.scale;
        Mat4::from_scale_rotation_translation(
            Vec3::new(sx as f32, sy as f32, sz as f32),
            Quat::from_euler(EulerRot::XYZ, rx as f32, ry as f32, rz as f32),
            Vec3::new(px as f32, py as f32, pz as f32),
        )
    }

    /// Triangle mesh in world space
    pub fn world_mesh(&self) -> MeshData {
        mesh::tessellate(&self.solid).transformed(&self.world_matrix())
    }

    /// Sharp-edge outline in world space
    pub fn world_outline(&self) -> EdgeOutline {
        mesh::outline(&self.solid).transformed(&self.world_matrix())
    }

    pub fn world_aabb(&self) -> Aabb {
        Aabb::from_mesh(&self.world_mesh())
    }
}

/// Scene state: entity registry plus a version counter
#[derive(Default)]
pub struct SceneState {
    entities: Vec<Entity>,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl SceneState {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get an entity by ID
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get mutable entity by ID
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Whether `id` is still part of the live scene
    pub fn contains(&self, id: &str) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }
}
