//! CPU-side triangle meshes and edge outlines for the solid kinds.
//!
//! Meshes are built in the solid's local frame and moved into world space by
//! the entity's pose. They exist for picking; nothing here is uploaded to a GPU.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use shared::Solid;

use crate::state::sketch::profile_outline;

pub const SPHERE_WIDTH_SEGMENTS: u32 = 32;
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 16;
pub const CYLINDER_SEGMENTS: u32 = 32;

/// Dihedral angle (degrees) above which a mesh edge becomes an outline edge
pub const EDGE_THRESHOLD_DEGREES: f32 = 30.0;

/// Triangle soup: every three indices form one triangle
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertices of a triangle by index
    pub fn triangle(&self, tri_idx: usize) -> Option<[Vec3; 3]> {
        let base = tri_idx * 3;
        let idx = self.indices.get(base..base + 3)?;
        Some([
            *self.positions.get(idx[0] as usize)?,
            *self.positions.get(idx[1] as usize)?,
            *self.positions.get(idx[2] as usize)?,
        ])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).filter_map(move |i| self.triangle(i))
    }

    /// Copy of the mesh with every vertex transformed by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> MeshData {
        MeshData {
            positions: self
                .positions
                .iter()
                .map(|p| matrix.transform_point3(*p))
                .collect(),
            indices: self.indices.clone(),
        }
    }
}

/// Line segments drawn over a solid's sharp edges
#[derive(Clone, Debug, Default)]
pub struct EdgeOutline {
    pub segments: Vec<[Vec3; 2]>,
}

impl EdgeOutline {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn transformed(&self, matrix: &Mat4) -> EdgeOutline {
        EdgeOutline {
            segments: self
                .segments
                .iter()
                .map(|[a, b]| [matrix.transform_point3(*a), matrix.transform_point3(*b)])
                .collect(),
        }
    }
}

/// Accumulates triangles of a convex solid, winding each one so that its
/// normal points away from `center`.
struct MeshBuilder {
    center: Vec3,
    mesh: MeshData,
}

impl MeshBuilder {
    fn new(center: Vec3) -> Self {
        Self {
            center,
            mesh: MeshData::default(),
        }
    }

    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a);
        if normal.length_squared() < 1e-12 {
            return;
        }
        let centroid = (a + b + c) / 3.0;
        let (b, c) = if normal.dot(centroid - self.center) < 0.0 {
            (c, b)
        } else {
            (b, c)
        };
        let base = self.mesh.positions.len() as u32;
        self.mesh.positions.extend_from_slice(&[a, b, c]);
        self.mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    fn push_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        self.push_triangle(a, b, c);
        self.push_triangle(a, c, d);
    }

    fn finish(self) -> MeshData {
        self.mesh
    }
}

/// Tessellate a solid in its local frame
pub fn tessellate(solid: &Solid) -> MeshData {
    match solid {
        Solid::Box { w, h, d } => cuboid(*w as f32, *h as f32, *d as f32),
        Solid::Sphere { r } => sphere(*r as f32, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS),
        Solid::Cylinder { r, h } => cylinder(*r as f32, *h as f32, CYLINDER_SEGMENTS),
        Solid::Extrude {
            shape,
            extrude_options,
        } => extrusion(&profile_outline(shape), extrude_options.depth as f32),
    }
}

/// Sharp-edge outline of a solid in its local frame
pub fn outline(solid: &Solid) -> EdgeOutline {
    feature_edges(&tessellate(solid), EDGE_THRESHOLD_DEGREES)
}

pub fn cuboid(w: f32, h: f32, d: f32) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [[Vec3; 4]; 6] = [
        // Front (+Z)
        [Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)],
        // Back (-Z)
        [Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)],
        // Right (+X)
        [Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)],
        // Left (-X)
        [Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)],
        // Top (+Y)
        [Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)],
        // Bottom (-Y)
        [Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)],
    ];

    let mut builder = MeshBuilder::new(Vec3::ZERO);
    for [a, b, c, d] in faces {
        builder.push_quad(a, b, c, d);
    }
    builder.finish()
}

pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let vertex = |iy: u32, ix: u32| -> Vec3 {
        let theta = iy as f32 / hs as f32 * std::f32::consts::PI;
        let phi = ix as f32 / ws as f32 * std::f32::consts::TAU;
        Vec3::new(
            -radius * phi.cos() * theta.sin(),
            radius * theta.cos(),
            radius * phi.sin() * theta.sin(),
        )
    };

    let mut builder = MeshBuilder::new(Vec3::ZERO);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = vertex(iy, ix);
            let b = vertex(iy, ix + 1);
            let c = vertex(iy + 1, ix + 1);
            let d = vertex(iy + 1, ix);
            // Pole rows collapse to a single triangle; the degenerate half is dropped
            builder.push_triangle(a, b, d);
            builder.push_triangle(b, c, d);
        }
    }
    builder.finish()
}

pub fn cylinder(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let hh = height * 0.5;

    let ring = |i: u32, y: f32| -> Vec3 {
        let angle = (i % segments) as f32 * std::f32::consts::TAU / segments as f32;
        Vec3::new(radius * angle.sin(), y, radius * angle.cos())
    };

    let mut builder = MeshBuilder::new(Vec3::ZERO);
    let top = Vec3::new(0.0, hh, 0.0);
    let bottom = Vec3::new(0.0, -hh, 0.0);
    for i in 0..segments {
        builder.push_quad(ring(i, hh), ring(i, -hh), ring(i + 1, -hh), ring(i + 1, hh));
        builder.push_triangle(top, ring(i, hh), ring(i + 1, hh));
        builder.push_triangle(bottom, ring(i + 1, -hh), ring(i, -hh));
    }
    builder.finish()
}

/// Extrude a convex ground-plane outline (`[x, z]` points) along +Y.
pub fn extrusion(outline: &[[f64; 2]], depth: f32) -> MeshData {
    if outline.len() < 3 {
        return MeshData::default();
    }

    let points: Vec<(f32, f32)> = outline.iter().map(|p| (p[0] as f32, p[1] as f32)).collect();
    let n = points.len() as f32;
    let (sx, sz) = points
        .iter()
        .fold((0.0, 0.0), |(ax, az), (x, z)| (ax + x, az + z));
    let center = Vec3::new(sx / n, depth * 0.5, sz / n);

    let bottom = |(x, z): (f32, f32)| Vec3::new(x, 0.0, z);
    let top = |(x, z): (f32, f32)| Vec3::new(x, depth, z);

    let mut builder = MeshBuilder::new(center);
    for i in 1..points.len() - 1 {
        builder.push_triangle(bottom(points[0]), bottom(points[i]), bottom(points[i + 1]));
        builder.push_triangle(top(points[0]), top(points[i + 1]), top(points[i]));
    }
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        builder.push_quad(bottom(a), bottom(b), top(b), top(a));
    }
    builder.finish()
}

type QuantizedPos = (i64, i64, i64);

fn quantize_position(pos: Vec3) -> QuantizedPos {
    let scale = 10000.0;
    (
        (pos.x * scale).round() as i64,
        (pos.y * scale).round() as i64,
        (pos.z * scale).round() as i64,
    )
}

fn edge_key(p1: QuantizedPos, p2: QuantizedPos) -> (QuantizedPos, QuantizedPos) {
    if p1 < p2 { (p1, p2) } else { (p2, p1) }
}

struct EdgeRecord {
    start: Vec3,
    end: Vec3,
    normal1: Vec3,
    normal2: Option<Vec3>,
}

/// Extract edges whose adjacent faces meet at more than `threshold_degrees`,
/// plus open boundary edges. Output order follows triangle order.
pub fn feature_edges(mesh: &MeshData, threshold_degrees: f32) -> EdgeOutline {
    let mut records: Vec<EdgeRecord> = Vec::new();
    let mut lookup: HashMap<(QuantizedPos, QuantizedPos), usize> = HashMap::new();

    for [v0, v1, v2] in mesh.triangles() {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
            let key = edge_key(quantize_position(a), quantize_position(b));
            match lookup.get(&key) {
                Some(&idx) => {
                    let record = &mut records[idx];
                    if record.normal2.is_none() {
                        record.normal2 = Some(normal);
                    }
                }
                None => {
                    lookup.insert(key, records.len());
                    records.push(EdgeRecord {
                        start: a,
                        end: b,
                        normal1: normal,
                        normal2: None,
                    });
                }
            }
        }
    }

    let threshold = threshold_degrees.to_radians();
    let segments = records
        .into_iter()
        .filter(|r| match r.normal2 {
            Some(n2) => r.normal1.dot(n2).clamp(-1.0, 1.0).acos() > threshold,
            None => true,
        })
        .map(|r| [r.start, r.end])
        .collect();

    EdgeOutline { segments }
}
