//! Orbit camera and screen-to-world rays.

use glam::{Mat4, Vec2, Vec3};

use crate::geometry::BoundingBox;
use crate::picking::Ray;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Whether the viewport is large enough to cast rays through.
    pub fn is_usable(&self) -> bool {
        self.width > 1.0 && self.height > 1.0
    }

    /// Pixel position (origin top-left) to normalized device coordinates.
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(2.0 * x / self.width - 1.0, 1.0 - 2.0 * y / self.height)
    }
}

/// Camera orbiting a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Target point the camera is looking at.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Azimuth angle (horizontal rotation), 0 looks down -Z.
    pub azimuth: f32,
    /// Elevation angle (vertical rotation).
    pub elevation: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 1.2, 0.0),
            distance: 6.0,
            azimuth: 20.0_f32.to_radians(),
            elevation: 15.0_f32.to_radians(),
            fov: 45.0,
            near: 0.05,
            far: 200.0,
        }
    }
}

impl Camera {
    /// Get the camera position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Get the projection matrix for the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, viewport: &Viewport) -> Mat4 {
        self.projection_matrix(viewport.aspect()) * self.view_matrix()
    }

    /// Orbit the camera around the target.
    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth += delta_azimuth;
        self.elevation = (self.elevation + delta_elevation)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Zoom the camera (change distance).
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).max(self.near * 2.0);
    }

    /// Aim at the center of `bounds` from far enough away to see all of it,
    /// with a small margin.
    pub fn fit(&mut self, bounds: &BoundingBox) {
        let radius = bounds.size().length() / 2.0;
        let half_fov = (self.fov.to_radians() / 2.0).max(0.01);
        self.target = bounds.center();
        self.distance = (1.1 * radius / half_fov.sin()).max(self.near * 2.0);
    }

    /// World-space ray through the pixel `(x, y)`, origin top-left.
    ///
    /// Returns `None` for a degenerate viewport.
    pub fn ray_from_screen(&self, viewport: &Viewport, x: f32, y: f32) -> Option<Ray> {
        if !viewport.is_usable() {
            return None;
        }
        let ndc = viewport.to_ndc(x, y);
        let inverse = self.view_projection(viewport).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = (far - near).normalize_or_zero();
        (direction != Vec3::ZERO && near.is_finite()).then(|| Ray::new(near, direction))
    }

    /// Pixel position of a world point, or `None` when it is behind the camera.
    pub fn project(&self, viewport: &Viewport, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection(viewport) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * viewport.width / 2.0,
            (1.0 - ndc.y) * viewport.height / 2.0,
        ))
    }
}
