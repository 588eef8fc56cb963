use glam::{Mat4, Vec3, Vec4};

use super::picking::Ray;

/// Arc-ball camera for 3D viewport
#[derive(Debug, Clone)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.6,
            distance: 10.0,
            target: Vec3::ZERO,
            fov: 50.0_f32.to_radians(),
        }
    }
}

impl ArcBallCamera {
    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 1000.0)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a world point to normalized device coordinates
    pub fn project(&self, point: Vec3, aspect: f32) -> Option<[f32; 2]> {
        let p = self.view_projection(aspect) * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        Some([ndc.x, ndc.y])
    }

    /// Ray through a point given in normalized device coordinates
    pub fn screen_ray(&self, ndc: [f32; 2], aspect: f32) -> Ray {
        let vp_inv = self.view_projection(aspect).inverse();

        let near = vp_inv * Vec4::new(ndc[0], ndc[1], -1.0, 1.0);
        let far = vp_inv * Vec4::new(ndc[0], ndc[1], 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Ray::new(self.eye_position(), far - near)
    }
}
