use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::renderer::ray::Ray;

/// Result of projecting a world point onto the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Screen position in pixels, origin top-left, Y down.
    pub pos: Vec2,
    /// Distance in front of the camera along the view axis.
    pub depth: f32,
    /// Pixels per world unit at this depth.
    pub scale: f32,
}

/// Perspective look-at camera for 3D scenes rendered to a 2D viewport.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl Camera3D {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 100.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 50f32.to_radians(),
            near: 0.1,
            far: 10000.0,
            viewport_width,
            viewport_height,
        }
    }

    /// False when either viewport dimension is zero or not finite.
    pub fn has_viewport(&self) -> bool {
        self.viewport_width.is_finite()
            && self.viewport_height.is_finite()
            && self.viewport_width > 0.0
            && self.viewport_height > 0.0
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    pub fn aspect(&self) -> f32 {
        if self.has_viewport() {
            self.viewport_width / self.viewport_height
        } else {
            1.0
        }
    }

    /// Unit vector from the camera toward its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Orthonormal (right, up) pair for the current view direction.
    /// Falls back to +X as "right" when looking straight along `up`.
    fn basis(&self) -> (Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(self.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }

    /// Focal length in pixels for the vertical field of view.
    fn focal_px(&self) -> f32 {
        self.viewport_height / (2.0 * (self.fov_y * 0.5).tan())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: (self.projection_matrix() * self.view_matrix()).to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Project a world point to screen pixels. `None` if it lies behind the
    /// near plane.
    pub fn project(&self, world: Vec3) -> Option<Projection> {
        let rel = world - self.position;
        let depth = rel.dot(self.forward());
        if depth <= self.near {
            return None;
        }
        let (right, up) = self.basis();
        let scale = self.focal_px() / depth;
        Some(Projection {
            pos: Vec2::new(
                self.viewport_width * 0.5 + rel.dot(right) * scale,
                self.viewport_height * 0.5 - rel.dot(up) * scale,
            ),
            depth,
            scale,
        })
    }

    /// World-space ray from the camera through a screen pixel.
    /// `None` when the viewport is degenerate.
    pub fn screen_ray(&self, screen: Vec2) -> Option<Ray> {
        if !self.has_viewport() {
            return None;
        }
        let focal = self.focal_px();
        let vx = (screen.x - self.viewport_width * 0.5) / focal;
        let vy = -(screen.y - self.viewport_height * 0.5) / focal;
        let (right, up) = self.basis();
        let dir = (self.forward() + right * vx + up * vy).try_normalize()?;
        Some(Ray::new(self.position, dir))
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera3D {
        let mut cam = Camera3D::new(800.0, 600.0);
        cam.look_at(Vec3::new(0.0, 50.0, 200.0), Vec3::ZERO);
        cam
    }

    #[test]
    fn target_projects_to_center() {
        let cam = camera();
        let p = cam.project(Vec3::ZERO).unwrap();
        assert!((p.pos.x - 400.0).abs() < 1e-3);
        assert!((p.pos.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let cam = camera();
        assert!(cam.project(Vec3::new(0.0, 60.0, 400.0)).is_none());
    }

    #[test]
    fn closer_points_have_larger_scale() {
        let cam = camera();
        let near = cam.project(Vec3::new(0.0, 0.0, 50.0)).unwrap();
        let far = cam.project(Vec3::new(0.0, 0.0, -50.0)).unwrap();
        assert!(near.scale > far.scale);
    }

    #[test]
    fn center_ray_points_forward() {
        let cam = camera();
        let ray = cam.screen_ray(Vec2::new(400.0, 300.0)).unwrap();
        assert!((ray.dir - cam.forward()).length() < 1e-5);
        assert_eq!(ray.origin, cam.position);
    }

    #[test]
    fn screen_ray_passes_through_projected_point() {
        let cam = camera();
        let world = Vec3::new(30.0, -10.0, 20.0);
        let p = cam.project(world).unwrap();
        let ray = cam.screen_ray(p.pos).unwrap();
        let t = (world - ray.origin).dot(ray.dir);
        let closest = ray.at(t);
        assert!((closest - world).length() < 1e-2, "miss by {}", (closest - world).length());
    }

    #[test]
    fn degenerate_viewport_has_no_ray() {
        let mut cam = camera();
        cam.resize(0.0, 600.0);
        assert!(!cam.has_viewport());
        assert!(cam.screen_ray(Vec2::ZERO).is_none());
    }

    #[test]
    fn projection_matches_matrix_pipeline() {
        let cam = camera();
        let world = Vec3::new(12.0, 8.0, -30.0);
        let clip = cam.projection_matrix() * cam.view_matrix() * world.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let sx = (ndc.x + 1.0) * 0.5 * cam.viewport_width;
        let sy = (1.0 - ndc.y) * 0.5 * cam.viewport_height;
        let p = cam.project(world).unwrap();
        assert!((p.pos.x - sx).abs() < 0.05);
        assert!((p.pos.y - sy).abs() < 0.05);
    }
}
