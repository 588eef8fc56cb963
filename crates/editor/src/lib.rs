// Library crate: the headless editor core plus the command protocol and
// test harness used by the runner binaries and integration tests.

pub mod codec;
pub mod command;
pub mod fixtures;
pub mod harness;
pub mod interaction;
pub mod state;
pub mod validation;

/// Geometry the editor picks against. Rendering lives outside this crate.
pub mod viewport {
    pub mod camera;
    pub mod gizmo;
    pub mod mesh;
    pub mod picking;
}
