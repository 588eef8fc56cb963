use glam::Vec3;
use shared::{EntityId, Granularity};

use super::mesh::MeshData;
use crate::state::scene::SceneState;
use crate::state::selection::{EdgeSelection, FaceSelection};

/// A ray in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray looking straight down onto the ground at `(x, z)`
    pub fn down_at(x: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, 50.0, z), Vec3::NEG_Y)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with the ground plane (y = 0), if in front of the origin
    pub fn ground_hit(&self) -> Option<Vec3> {
        if self.direction.y.abs() < 1e-7 {
            return None;
        }
        let t = -self.origin.y / self.direction.y;
        if t < 0.0 {
            return None;
        }
        let mut p = self.at(t);
        p.y = 0.0;
        Some(p)
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from mesh positions
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in &data.positions {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Nearest triangle of a mesh hit by the ray: (triangle index, distance)
pub fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for tri_idx in 0..mesh.triangle_count() {
        let Some([v0, v1, v2]) = mesh.triangle(tri_idx) else {
            continue;
        };
        if let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) {
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((tri_idx, dist));
            }
        }
    }
    best
}

/// Minimum distance between a ray and a line segment, with the ray parameter
/// of the closest point: (distance, t).
pub fn ray_segment_distance(ray: &Ray, seg_start: Vec3, seg_end: Vec3) -> (f32, f32) {
    let u = ray.direction;
    let v = seg_end - seg_start;
    let w = ray.origin - seg_start;

    let a = u.dot(u);
    let b = u.dot(v);
    let c = v.dot(v);
    let d = u.dot(w);
    let e = v.dot(w);

    let denom = a * c - b * b;

    let (sc, tc);
    if denom < 1e-7 {
        // Nearly parallel
        sc = 0.0;
        tc = if c > 1e-12 { e / c } else { 0.0 };
    } else {
        sc = (b * e - c * d) / denom;
        tc = (a * e - b * d) / denom;
    }

    let tc = tc.clamp(0.0, 1.0);
    // Re-project the clamped segment point onto the ray
    let seg_point = seg_start + v * tc;
    let sc = if denom < 1e-7 {
        sc
    } else {
        ((seg_point - ray.origin).dot(u) / a).max(0.0)
    };

    let closest_ray = ray.origin + u * sc;
    ((closest_ray - seg_point).length(), sc)
}

/// Result of a pick under one granularity
#[derive(Clone, Debug, PartialEq)]
pub enum PickHit {
    Shape { entity_id: EntityId, distance: f32 },
    Face(FaceSelection),
    Edge(EdgeSelection),
}

impl PickHit {
    pub fn entity_id(&self) -> &EntityId {
        match self {
            PickHit::Shape { entity_id, .. } => entity_id,
            PickHit::Face(face) => &face.entity_id,
            PickHit::Edge(edge) => &edge.entity_id,
        }
    }
}

/// Resolve the topmost visible entity under the ray for the given granularity.
///
/// `edge_threshold` is the world-space distance within which a ray counts as
/// touching an outline edge.
pub fn pick(
    ray: &Ray,
    scene: &SceneState,
    granularity: Granularity,
    edge_threshold: f32,
) -> Option<PickHit> {
    match granularity {
        Granularity::Face => pick_face(ray, scene).map(|(face, _)| PickHit::Face(face)),
        Granularity::Edge => pick_edge(ray, scene, edge_threshold).map(|(edge, _)| PickHit::Edge(edge)),
        Granularity::Shape => {
            // Outline edges belong to their entity, so either kind of hit resolves to it
            let face = pick_face(ray, scene).map(|(f, t)| (f.entity_id, t));
            let edge = pick_edge(ray, scene, edge_threshold).map(|(e, t)| (e.entity_id, t));
            let (entity_id, distance) = match (face, edge) {
                (Some(f), Some(e)) => if e.1 < f.1 { e } else { f },
                (Some(hit), None) | (None, Some(hit)) => hit,
                (None, None) => return None,
            };
            Some(PickHit::Shape {
                entity_id,
                distance,
            })
        }
    }
}

/// Nearest solid triangle across all visible entities, with its ray distance
pub fn pick_face(ray: &Ray, scene: &SceneState) -> Option<(FaceSelection, f32)> {
    let mut best: Option<(FaceSelection, f32)> = None;

    for entity in scene.entities().iter().filter(|e| e.visible) {
        let mesh = entity.world_mesh();
        let Some((tri_idx, dist)) = pick_triangle(ray, &mesh) else {
            continue;
        };
        if best.as_ref().is_some_and(|(_, best_t)| *best_t <= dist) {
            continue;
        }
        if let Some(vertices) = mesh.triangle(tri_idx) {
            best = Some((FaceSelection::new(entity.id.clone(), tri_idx, vertices), dist));
        }
    }

    best
}

/// First outline edge in ray order within `threshold` of the ray
pub fn pick_edge(ray: &Ray, scene: &SceneState, threshold: f32) -> Option<(EdgeSelection, f32)> {
    let mut best: Option<(EdgeSelection, f32)> = None;

    for entity in scene.entities().iter().filter(|e| e.visible) {
        let edges = entity.world_outline();
        for (edge_index, [start, end]) in edges.segments.iter().enumerate() {
            let (dist, t) = ray_segment_distance(ray, *start, *end);
            if dist > threshold {
                continue;
            }
            if best.as_ref().is_none_or(|(_, best_t)| t < *best_t) {
                best = Some((
                    EdgeSelection {
                        entity_id: entity.id.clone(),
                        edge_index,
                        start: *start,
                        end: *end,
                    },
                    t,
                ));
            }
        }
    }

    best
}
