//! Ground-plane sketching: rectangle and circle profiles built from a drag.

use kurbo::{Circle, PathEl, Point, Rect, Shape};
use serde::{Deserialize, Serialize};
use shared::{ExtrudeOptions, Profile, Solid};

/// Smallest extent a sketched profile may have in any direction
pub const MIN_EXTENT: f64 = 0.01;

/// Flattening tolerance relative to the profile size
const FLATTEN_TOLERANCE: f64 = 0.005;

/// Which profile a sketch gesture produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchMode {
    #[default]
    None,
    Rectangle,
    Circle,
}

/// A profile together with its outline polyline
#[derive(Debug, Clone, PartialEq)]
pub struct SketchPreview {
    pub profile: Profile,
    /// Closed outline in ground coordinates, without a repeated closing point
    pub outline: Vec<[f64; 2]>,
}

impl SketchPreview {
    pub fn new(profile: Profile) -> Self {
        let outline = profile_outline(&profile);
        Self { profile, outline }
    }
}

/// Sketch session: the live preview being dragged plus earlier previews
/// that stay on screen until cleared.
#[derive(Debug, Default)]
pub struct SketchState {
    mode: SketchMode,
    drawing: bool,
    start: Option<[f64; 2]>,
    live: Option<SketchPreview>,
    frozen: Vec<SketchPreview>,
}

impl SketchState {
    pub fn mode(&self) -> SketchMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn start(&self) -> Option<[f64; 2]> {
        self.start
    }

    pub fn live(&self) -> Option<&SketchPreview> {
        self.live.as_ref()
    }

    pub fn frozen(&self) -> &[SketchPreview] {
        &self.frozen
    }

    /// Number of previews currently on screen
    pub fn preview_count(&self) -> usize {
        self.frozen.len() + usize::from(self.live.is_some())
    }

    /// Start drawing at `point`. A live preview from an earlier drag is kept
    /// as a frozen preview.
    pub fn begin(&mut self, mode: SketchMode, point: [f64; 2]) -> bool {
        if mode == SketchMode::None {
            return false;
        }
        self.freeze_live();
        self.mode = mode;
        self.drawing = true;
        self.start = Some(point);
        tracing::debug!(?mode, x = point[0], z = point[1], "sketch started");
        true
    }

    /// Recompute the live preview from the start point to `point`.
    pub fn update(&mut self, point: [f64; 2]) -> bool {
        if !self.drawing {
            return false;
        }
        let Some(start) = self.start else {
            return false;
        };
        let Some(profile) = profile_between(self.mode, start, point) else {
            return false;
        };
        self.freeze_live();
        self.live = Some(SketchPreview::new(profile));
        true
    }

    /// Stop drawing. Previews stay.
    pub fn end(&mut self) {
        if self.drawing {
            tracing::debug!(previews = self.preview_count(), "sketch ended");
        }
        self.drawing = false;
        self.start = None;
    }

    /// Remove every preview and reset the session
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Take the profile to extrude: the live preview, else the newest frozen one.
    pub fn take_latest_profile(&mut self) -> Option<Profile> {
        self.live
            .take()
            .or_else(|| self.frozen.pop())
            .map(|preview| preview.profile)
    }

    fn freeze_live(&mut self) {
        if let Some(preview) = self.live.take() {
            self.frozen.push(preview);
        }
    }
}

/// Profile spanned by a drag from `start` to `end`.
///
/// Rectangles are axis aligned with each extent at least [`MIN_EXTENT`];
/// circles are centered at `start`.
pub fn profile_between(mode: SketchMode, start: [f64; 2], end: [f64; 2]) -> Option<Profile> {
    match mode {
        SketchMode::None => None,
        SketchMode::Rectangle => {
            let min_x = start[0].min(end[0]);
            let min_z = start[1].min(end[1]);
            let w = (end[0] - start[0]).abs().max(MIN_EXTENT);
            let d = (end[1] - start[1]).abs().max(MIN_EXTENT);
            Some(Profile::Rectangle {
                min: [min_x, min_z],
                max: [min_x + w, min_z + d],
            })
        }
        SketchMode::Circle => {
            let radius = (end[0] - start[0]).hypot(end[1] - start[1]).max(MIN_EXTENT);
            Some(Profile::Circle {
                center: start,
                radius,
            })
        }
    }
}

/// Flatten a profile into a closed polyline
pub fn profile_outline(profile: &Profile) -> Vec<[f64; 2]> {
    match profile {
        Profile::Rectangle { min, max } => {
            let rect = Rect::new(min[0], min[1], max[0], max[1]);
            flatten_shape(&rect, rect.width().min(rect.height()))
        }
        Profile::Circle { center, radius } => {
            let circle = Circle::new(Point::new(center[0], center[1]), *radius);
            flatten_shape(&circle, *radius)
        }
    }
}

fn flatten_shape(shape: &impl Shape, size: f64) -> Vec<[f64; 2]> {
    let tolerance = (size.abs() * FLATTEN_TOLERANCE).max(1e-6);
    let mut points: Vec<[f64; 2]> = Vec::new();
    kurbo::flatten(shape.path_elements(tolerance), tolerance, |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => {
            let pt = [p.x, p.y];
            if points.last() != Some(&pt) {
                points.push(pt);
            }
        }
        _ => {}
    });
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if points.len() > 1 && (first[0] - last[0]).hypot(first[1] - last[1]) < 1e-9 {
            points.pop();
        }
    }
    points
}

/// Solid produced by extruding a sketched profile
pub fn extrude_solid(profile: Profile) -> Solid {
    Solid::Extrude {
        shape: profile,
        extrude_options: ExtrudeOptions::default(),
    }
}
