//! Entity CRUD operations

use shared::{EntityId, Pose, Solid};

use super::{Entity, SceneState};

impl SceneState {
    /// Place a new solid and return its generated ID
    pub fn create_entity(&mut self, solid: Solid, pose: Pose) -> EntityId {
        let id = uuid::Uuid::new_v4().to_string();
        tracing::info!(id = %id, kind = solid.kind().as_str(), "created entity");
        self.entities.push(Entity::new(id.clone(), solid, pose));
        self.version += 1;
        id
    }

    /// Insert a fully built entity. A colliding ID is replaced by a fresh one.
    pub fn insert_entity(&mut self, mut entity: Entity) -> EntityId {
        if entity.id.is_empty() || self.contains(&entity.id) {
            let fresh = uuid::Uuid::new_v4().to_string();
            tracing::debug!(old = %entity.id, new = %fresh, "regenerated entity id");
            entity.id = fresh;
        }
        let id = entity.id.clone();
        self.entities.push(entity);
        self.version += 1;
        id
    }

    /// Remove an entity. Returns it if it was present.
    pub fn remove_entity(&mut self, id: &str) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        let removed = self.entities.remove(idx);
        tracing::info!(id = %id, "removed entity");
        self.version += 1;
        Some(removed)
    }

    /// Show or hide an entity
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.visible = visible;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        self.entities.clear();
        self.version += 1;
    }

    /// Replace the whole entity set (used by import)
    pub fn replace_all(&mut self, entities: Vec<Entity>) {
        self.entities.clear();
        for entity in entities {
            self.insert_entity(entity);
        }
        self.version += 1;
    }
}
