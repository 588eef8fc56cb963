//! Pose updates

use serde::{Deserialize, Serialize};
use shared::Pose;

use super::SceneState;

/// Partial pose update: `None` components keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformUpdate {
    #[serde(default)]
    pub position: [Option<f64>; 3],
    #[serde(default)]
    pub rotation: [Option<f64>; 3],
    #[serde(default)]
    pub scale: [Option<f64>; 3],
}

impl TransformUpdate {
    pub fn is_empty(&self) -> bool {
        self.position
            .iter()
            .chain(&self.rotation)
            .chain(&self.scale)
            .all(Option::is_none)
    }

    /// Pose with this update applied on top of `pose`
    pub fn apply_to(&self, pose: &Pose) -> Pose {
        let merge = |current: [f64; 3], update: [Option<f64>; 3]| -> [f64; 3] {
            [
                update[0].unwrap_or(current[0]),
                update[1].unwrap_or(current[1]),
                update[2].unwrap_or(current[2]),
            ]
        };
        Pose {
            position: merge(pose.position, self.position),
            rotation: merge(pose.rotation, self.rotation),
            scale: merge(pose.scale, self.scale),
        }
    }
}

impl SceneState {
    /// Overwrite an entity's pose. Returns false if the entity is gone.
    pub fn set_pose(&mut self, id: &str, pose: Pose) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.pose = pose;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Apply a partial update. Returns the (before, after) poses.
    pub fn update_transform(&mut self, id: &str, update: &TransformUpdate) -> Option<(Pose, Pose)> {
        let entity = self.get_mut(id)?;
        let before = entity.pose.clone();
        let after = update.apply_to(&before);
        entity.pose = after.clone();
        self.version += 1;
        Some((before, after))
    }
}
