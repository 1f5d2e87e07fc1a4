//! Screen/world sizing and the perspective camera.

use crate::config::CameraConfig;
use glam::{Mat4, Vec3};

/// Window size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    /// False while the window is collapsed to zero width or height.
    #[inline]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Backing-store size in device pixels for a given devicePixelRatio.
    /// The canvas and the render surface both size themselves with this.
    #[inline]
    pub fn backing_size(&self, dpr: f32) -> (u32, u32) {
        (
            ((self.width * dpr).round() as u32).max(1),
            ((self.height * dpr).round() as u32).max(1),
        )
    }
}

/// Visible extent of the scene at the camera's focal plane, in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// World-space size of the plane `camera_distance` in front of a camera with
/// vertical field of view `fov_deg`, stretched to the screen's aspect.
#[inline]
pub fn compute_viewport(screen: Screen, fov_deg: f32, camera_distance: f32) -> Viewport {
    let fov = fov_deg.to_radians();
    let height = 2.0 * (fov / 2.0).tan() * camera_distance;
    let width = height * screen.aspect();
    Viewport { width, height }
}

/// Perspective camera looking down -Z from `position`.
#[derive(Clone, Debug)]
pub struct Camera {
    pub fov_deg: f32,
    pub position: Vec3,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            fov_deg: config.fov_deg,
            position: Vec3::new(0.0, 0.0, config.z),
            aspect: 1.0,
            near: config.near,
            far: config.far,
        }
    }

    pub fn perspective(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Viewport at the origin plane for the given screen.
    pub fn viewport(&self, screen: Screen) -> Viewport {
        compute_viewport(screen, self.fov_deg, self.position.z)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
