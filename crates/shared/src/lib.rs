use serde::{Deserialize, Serialize};

/// Stable identifier of an entity in the scene
pub type EntityId = String;

fn zero3() -> [f64; 3] {
    [0.0, 0.0, 0.0]
}

fn unit3() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// Solid kind tag, without parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolidKind {
    Box,
    Sphere,
    Cylinder,
    Extrude,
}

impl SolidKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolidKind::Box => "box",
            SolidKind::Sphere => "sphere",
            SolidKind::Cylinder => "cylinder",
            SolidKind::Extrude => "extrude",
        }
    }

    /// Human-readable label used for display names
    pub fn label(&self) -> &'static str {
        match self {
            SolidKind::Box => "Box",
            SolidKind::Sphere => "Sphere",
            SolidKind::Cylinder => "Cylinder",
            SolidKind::Extrude => "Extrude",
        }
    }
}

/// Closed 2D outline on the ground plane.
///
/// Coordinates are `[x, z]` in world units; extrusion runs along +Y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Profile {
    Rectangle { min: [f64; 2], max: [f64; 2] },
    Circle { center: [f64; 2], radius: f64 },
}

impl Profile {
    /// Center of the profile in ground coordinates
    pub fn center(&self) -> [f64; 2] {
        match self {
            Profile::Rectangle { min, max } => [(min[0] + max[0]) * 0.5, (min[1] + max[1]) * 0.5],
            Profile::Circle { center, .. } => *center,
        }
    }
}

/// Extrusion parameters stored alongside an extruded profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrudeOptions {
    pub depth: f64,
    #[serde(default)]
    pub bevel_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: 1.0,
            bevel_enabled: false,
            steps: Some(1),
        }
    }
}

/// Solid kind with its construction parameters.
///
/// Serialized adjacently tagged so a scene item reads
/// `{"kind": "box", "params": {"w": 1, "h": 1, "d": 1}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum Solid {
    Box {
        w: f64,
        h: f64,
        d: f64,
    },
    Sphere {
        r: f64,
    },
    Cylinder {
        r: f64,
        h: f64,
    },
    Extrude {
        shape: Profile,
        #[serde(rename = "extrudeOptions")]
        extrude_options: ExtrudeOptions,
    },
}

impl Solid {
    pub fn kind(&self) -> SolidKind {
        match self {
            Solid::Box { .. } => SolidKind::Box,
            Solid::Sphere { .. } => SolidKind::Sphere,
            Solid::Cylinder { .. } => SolidKind::Cylinder,
            Solid::Extrude { .. } => SolidKind::Extrude,
        }
    }

    /// Distance from the local origin down to the solid's base.
    ///
    /// Primitives are centered on their origin; extrusions start at the ground.
    pub fn half_height(&self) -> f64 {
        match self {
            Solid::Box { h, .. } => h * 0.5,
            Solid::Sphere { r } => *r,
            Solid::Cylinder { h, .. } => h * 0.5,
            Solid::Extrude { .. } => 0.0,
        }
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default = "zero3")]
    pub position: [f64; 3],
    #[serde(default = "zero3")]
    pub rotation: [f64; 3],
    #[serde(default = "unit3")]
    pub scale: [f64; 3],
}

impl Pose {
    pub fn identity() -> Self {
        Self {
            position: zero3(),
            rotation: zero3(),
            scale: unit3(),
        }
    }

    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Selection resolution level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Shape,
    Face,
    Edge,
}

/// Selection reference stored in a scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRef {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub granularity: Granularity,
}

/// One placed solid in a scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(flatten)]
    pub solid: Solid,
    #[serde(default = "zero3")]
    pub position: [f64; 3],
    #[serde(default = "zero3")]
    pub rotation: [f64; 3],
    #[serde(default = "unit3")]
    pub scale: [f64; 3],
}

impl SceneItem {
    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

/// Persisted scene: placed solids plus the selection at export time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    pub items: Vec<SceneItem>,
    #[serde(default)]
    pub selection: Option<SelectionRef>,
}
