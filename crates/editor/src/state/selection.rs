use glam::Vec3;
use shared::{EntityId, Granularity};

use crate::viewport::picking::Aabb;

/// A picked triangle on an entity's solid surface (world space)
#[derive(Clone, Debug, PartialEq)]
pub struct FaceSelection {
    pub entity_id: EntityId,
    /// Index of the triangle in the entity's mesh
    pub triangle_index: usize,
    pub vertices: [Vec3; 3],
    /// Unit normal of the triangle
    pub normal: Vec3,
    /// Triangle area in square units
    pub area: f32,
}

impl FaceSelection {
    pub fn new(entity_id: EntityId, triangle_index: usize, vertices: [Vec3; 3]) -> Self {
        let [v0, v1, v2] = vertices;
        let cross = (v1 - v0).cross(v2 - v0);
        Self {
            entity_id,
            triangle_index,
            vertices,
            normal: cross.normalize_or_zero(),
            area: cross.length() * 0.5,
        }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }
}

/// A picked outline edge (world space)
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSelection {
    pub entity_id: EntityId,
    /// Index of this edge in the entity's outline
    pub edge_index: usize,
    pub start: Vec3,
    pub end: Vec3,
}

impl EdgeSelection {
    /// Get edge length
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Get edge direction (normalized)
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Get edge midpoint
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }
}

/// What part of the entity is selected
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionTarget {
    Shape,
    Face(FaceSelection),
    Edge(EdgeSelection),
}

impl SelectionTarget {
    pub fn granularity(&self) -> Granularity {
        match self {
            SelectionTarget::Shape => Granularity::Shape,
            SelectionTarget::Face(_) => Granularity::Face,
            SelectionTarget::Edge(_) => Granularity::Edge,
        }
    }
}

/// The active selection: one entity plus the picked part
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub entity_id: EntityId,
    pub target: SelectionTarget,
}

impl Selection {
    pub fn shape(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            target: SelectionTarget::Shape,
        }
    }

    pub fn face(face: FaceSelection) -> Self {
        Self {
            entity_id: face.entity_id.clone(),
            target: SelectionTarget::Face(face),
        }
    }

    pub fn edge(edge: EdgeSelection) -> Self {
        Self {
            entity_id: edge.entity_id.clone(),
            target: SelectionTarget::Edge(edge),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.target.granularity()
    }
}

/// Ephemeral overlay mirroring the selection
#[derive(Clone, Debug, PartialEq)]
pub enum Highlight {
    /// Bounding-box outline around a whole entity
    BoxOutline(Aabb),
    /// A single triangle patch
    TrianglePatch([Vec3; 3]),
    /// A single line segment
    Segment(Vec3, Vec3),
}

/// Selection state.
///
/// The selection and its highlight live in one slot so that a highlight
/// exists exactly when something is selected.
#[derive(Default)]
pub struct SelectionState {
    active: Option<(Selection, Highlight)>,
    /// Version counter for selection changes (for cache invalidation)
    version: u64,
}

impl SelectionState {
    pub fn current(&self) -> Option<&Selection> {
        self.active.as_ref().map(|(s, _)| s)
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.active.as_ref().map(|(_, h)| h)
    }

    /// Selected entity, if any
    pub fn primary(&self) -> Option<&EntityId> {
        self.current().map(|s| &s.entity_id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.primary().is_some_and(|p| p == id)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the selection and its highlight
    pub fn select(&mut self, selection: Selection, highlight: Highlight) {
        self.active = Some((selection, highlight));
        self.version += 1;
    }

    /// Swap the highlight of the current selection (after the entity moved)
    pub fn refresh_highlight(&mut self, highlight: Highlight) {
        if let Some((_, h)) = self.active.as_mut() {
            *h = highlight;
            self.version += 1;
        }
    }

    /// Clear selection and highlight
    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            self.version += 1;
        }
    }

    /// Clear if the selection refers to `id`. Returns true if cleared.
    pub fn clear_if(&mut self, id: &str) -> bool {
        if self.is_selected(id) {
            self.clear();
            true
        } else {
            false
        }
    }
}
