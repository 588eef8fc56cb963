use serde::{Deserialize, Serialize};
use shared::Solid;

use super::sketch::SketchMode;
use crate::viewport::gizmo::GizmoMode;

/// Active toolbar tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMode {
    #[default]
    Select,
    Translate,
    Rotate,
    Scale,
    CreateBox,
    CreateSphere,
    CreateCylinder,
    SketchRectangle,
    SketchCircle,
}

impl ToolMode {
    /// Default primitive placed by a creation tool
    pub fn primitive(&self) -> Option<Solid> {
        match self {
            ToolMode::CreateBox => Some(Solid::Box {
                w: 1.0,
                h: 1.0,
                d: 1.0,
            }),
            ToolMode::CreateSphere => Some(Solid::Sphere { r: 0.5 }),
            ToolMode::CreateCylinder => Some(Solid::Cylinder { r: 0.5, h: 1.0 }),
            _ => None,
        }
    }

    pub fn sketch_mode(&self) -> SketchMode {
        match self {
            ToolMode::SketchRectangle => SketchMode::Rectangle,
            ToolMode::SketchCircle => SketchMode::Circle,
            _ => SketchMode::None,
        }
    }

    pub fn gizmo_mode(&self) -> Option<GizmoMode> {
        match self {
            ToolMode::Translate => Some(GizmoMode::Translate),
            ToolMode::Rotate => Some(GizmoMode::Rotate),
            ToolMode::Scale => Some(GizmoMode::Scale),
            _ => None,
        }
    }

    pub fn is_sketch(&self) -> bool {
        self.sketch_mode() != SketchMode::None
    }
}
