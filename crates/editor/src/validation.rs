//! Mesh and scene-document validation utilities.
//!
//! `MeshValidator` checks tessellated meshes (index stride, index range,
//! degenerate triangles, AABB dimensions). `DocumentValidator` checks the
//! raw JSON shape of a scene document before it is decoded.

use serde_json::Value;

use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Aabb;

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Number of triangles (indices buffer length / 3).
    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    /// Check that the index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    /// Number of triangles whose area is below `epsilon`
    pub fn degenerate_triangle_count(&self, epsilon: f32) -> usize {
        self.mesh
            .triangles()
            .filter(|[a, b, c]| (*b - *a).cross(*c - *a).length() * 0.5 < epsilon)
            .count()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_mesh(self.mesh)
    }

    /// Compute the dimensions (width, height, depth) of the bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb().size().to_array()
    }

    /// Check that the AABB dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        dims.iter()
            .zip(expected)
            .all(|(d, e)| (d - e).abs() < tolerance)
    }

    pub fn is_valid(&self) -> bool {
        self.validate_all().is_empty()
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        } else {
            let degenerate = self.degenerate_triangle_count(1e-9);
            if degenerate > 0 {
                errors.push(format!("{degenerate} degenerate triangles"));
            }
        }

        errors
    }
}

/// Structural checks on a scene document, before typed decoding
pub struct DocumentValidator<'a> {
    doc: &'a Value,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(doc: &'a Value) -> Self {
        Self { doc }
    }

    pub fn items(&self) -> Option<&'a Vec<Value>> {
        self.doc.get("items").and_then(Value::as_array)
    }

    /// Run all checks and return a list of error messages.
    pub fn validate_all(&self) -> Vec<String> {
        let Some(items) = self.items() else {
            return vec!["`items` must be an array".to_string()];
        };

        let mut errors = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if !item.get("kind").is_some_and(Value::is_string) {
                errors.push(format!("items[{i}]: missing `kind`"));
            }
            let position_ok = item
                .get("position")
                .and_then(Value::as_array)
                .is_some_and(|p| p.len() == 3 && p.iter().all(Value::is_number));
            if !position_ok {
                errors.push(format!("items[{i}]: `position` must be a 3-element number array"));
            }
        }

        errors
    }
}
