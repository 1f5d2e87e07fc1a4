//! Scene graph: one root transform with the media planes as its children,
//! plus the plane geometry they all share.

use crate::media::MediaPlane;
use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Unit plane in XY centered on the origin, subdivided into a grid.
///
/// UVs have their origin at the top-left so image rows map straight onto
/// texture rows.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub vertices: Vec<PlaneVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn plane(width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(1);
        let hs = height_segments.max(1);
        let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                vertices.push(PlaneVertex {
                    position: [u - 0.5, 0.5 - v, 0.0],
                    uv: [u, v],
                });
            }
        }
        let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
        let row = ws + 1;
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix;
                let b = a + row;
                indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
            }
        }
        Self { vertices, indices }
    }
}

pub struct Scene {
    pub root: Transform,
    geometry: Geometry,
    planes: Vec<MediaPlane>,
}

impl Scene {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            root: Transform::default(),
            geometry,
            planes: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Parent a plane under the root; returns its child index.
    pub fn attach(&mut self, plane: MediaPlane) -> usize {
        self.planes.push(plane);
        self.planes.len() - 1
    }

    pub fn planes(&self) -> &[MediaPlane] {
        &self.planes
    }

    pub fn planes_mut(&mut self) -> &mut [MediaPlane] {
        &mut self.planes
    }

    pub fn world_matrix(&self, plane: &MediaPlane) -> Mat4 {
        self.root.matrix() * plane.transform.matrix()
    }
}
