//! Factory functions for creating test data.
//!
//! Provides helpers to construct `Solid`, `Entity`, `SceneItem` and
//! `SceneDocument` values used in tests and by the command protocol examples.

use shared::*;

use crate::state::scene::{Entity, SceneState};

// ── Solid factories ─────────────────────────────────────────────

pub fn box_solid(w: f64, h: f64, d: f64) -> Solid {
    Solid::Box { w, h, d }
}

/// 1x1x1 box, the default created by the box tool.
pub fn unit_box_solid() -> Solid {
    box_solid(1.0, 1.0, 1.0)
}

pub fn sphere_solid(r: f64) -> Solid {
    Solid::Sphere { r }
}

pub fn cylinder_solid(r: f64, h: f64) -> Solid {
    Solid::Cylinder { r, h }
}

/// Extruded rectangle spanning `min..max` on the ground.
pub fn rect_extrude_solid(min: [f64; 2], max: [f64; 2], depth: f64) -> Solid {
    Solid::Extrude {
        shape: Profile::Rectangle { min, max },
        extrude_options: ExtrudeOptions {
            depth,
            ..ExtrudeOptions::default()
        },
    }
}

pub fn circle_extrude_solid(center: [f64; 2], radius: f64, depth: f64) -> Solid {
    Solid::Extrude {
        shape: Profile::Circle { center, radius },
        extrude_options: ExtrudeOptions {
            depth,
            ..ExtrudeOptions::default()
        },
    }
}

// ── Entity factories ────────────────────────────────────────────

pub fn entity_at(id: &str, solid: Solid, position: [f64; 3]) -> Entity {
    Entity::new(id.to_string(), solid, Pose::at(position))
}

/// Unit box resting on the ground at the origin.
pub fn unit_box(id: &str) -> Entity {
    entity_at(id, unit_box_solid(), [0.0, 0.5, 0.0])
}

pub fn box_at(id: &str, w: f64, h: f64, d: f64, pos: [f64; 3]) -> Entity {
    entity_at(id, box_solid(w, h, d), pos)
}

pub fn sphere_at(id: &str, r: f64, pos: [f64; 3]) -> Entity {
    entity_at(id, sphere_solid(r), pos)
}

pub fn cylinder_at(id: &str, r: f64, h: f64, pos: [f64; 3]) -> Entity {
    entity_at(id, cylinder_solid(r, h), pos)
}

/// Scene holding `entities` in order.
pub fn scene_with(entities: Vec<Entity>) -> SceneState {
    let mut scene = SceneState::default();
    for entity in entities {
        scene.insert_entity(entity);
    }
    scene
}

// ── Document factories ──────────────────────────────────────────

pub fn item(id: &str, solid: Solid, position: [f64; 3]) -> SceneItem {
    SceneItem {
        id: Some(id.to_string()),
        solid,
        position,
        rotation: [0.0; 3],
        scale: [1.0; 3],
    }
}

/// Document with `items` and an optional `(id, granularity)` selection.
pub fn document(items: Vec<SceneItem>, selection: Option<(&str, Granularity)>) -> SceneDocument {
    SceneDocument {
        items,
        selection: selection.map(|(id, granularity)| SelectionRef {
            id: id.to_string(),
            granularity,
        }),
    }
}

/// One of each solid kind, spread along X.
pub fn mixed_document() -> SceneDocument {
    document(
        vec![
            item("box", unit_box_solid(), [0.0, 0.5, 0.0]),
            item("sphere", sphere_solid(0.5), [2.0, 0.5, 0.0]),
            item("cylinder", cylinder_solid(0.5, 1.0), [4.0, 0.5, 0.0]),
            item(
                "extrude",
                rect_extrude_solid([5.5, -0.5], [6.5, 0.5], 1.0),
                [0.0, 0.0, 0.0],
            ),
        ],
        Some(("sphere", Granularity::Shape)),
    )
}
