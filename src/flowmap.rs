//! Pointer-driven flow field.
//!
//! `FlowField` owns the easing state and produces the uniforms for one
//! field update per frame. The texture itself lives in the render backend;
//! `FlowGrid` is the same per-texel update done on the CPU.

use crate::config::FlowConfig;
use crate::constants::POINTER_SENTINEL;
use crate::viewport::Screen;
use glam::{Vec2, Vec3, Vec4};

/// Uniform block consumed by the flow update shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlowUniforms {
    pub mouse: [f32; 2],
    pub velocity: [f32; 2],
    pub aspect: f32,
    pub falloff: f32,
    pub alpha: f32,
    pub dissipation: f32,
}

#[derive(Clone, Debug)]
pub struct FlowField {
    pub falloff: f32,
    pub dissipation: f32,
    pub alpha: f32,
    pub aspect: f32,
    pub mouse: Vec2,
    /// Eased velocity actually stamped into the field.
    pub velocity: Vec2,
    ease: f32,
}

impl FlowField {
    pub fn new(config: &FlowConfig) -> Self {
        Self {
            falloff: config.falloff,
            dissipation: config.dissipation,
            alpha: config.alpha,
            aspect: 1.0,
            mouse: Vec2::splat(POINTER_SENTINEL),
            velocity: Vec2::ZERO,
            ease: config.velocity_ease,
        }
    }

    /// The texture itself is sized by the backend; only the aspect lives here.
    pub fn resize(&mut self, screen: Screen) {
        self.aspect = screen.aspect();
    }

    /// Feed this frame's pointer state and return the uniforms for the
    /// field update. Velocity eases toward `target_velocity` by a fixed
    /// per-frame factor, so a stopped pointer fades out instead of cutting.
    pub fn update(&mut self, aspect: f32, pointer: Vec2, target_velocity: Vec2) -> FlowUniforms {
        self.aspect = aspect;
        self.mouse = pointer;
        self.velocity = self.velocity.lerp(target_velocity, self.ease);
        self.uniforms()
    }

    pub fn uniforms(&self) -> FlowUniforms {
        FlowUniforms {
            mouse: self.mouse.to_array(),
            velocity: self.velocity.to_array(),
            aspect: self.aspect,
            falloff: self.falloff,
            alpha: self.alpha,
            dissipation: self.dissipation,
        }
    }
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Weight of a new stamp at `uv`: 1 under the pointer, 0 past `falloff`.
#[inline]
pub fn impulse_weight(uv: Vec2, u: &FlowUniforms) -> f32 {
    let mut cursor = uv - Vec2::from(u.mouse);
    cursor.x *= u.aspect;
    (1.0 - smoothstep(0.0, u.falloff, cursor.length())) * u.alpha
}

/// Flow vector written under the pointer: velocity with Y flipped into
/// texture space, plus a saturating speed term in the third channel.
#[inline]
pub fn stamp(velocity: Vec2) -> Vec3 {
    let speed = velocity.length().min(1.0);
    Vec3::new(velocity.x, -velocity.y, 1.0 - (1.0 - speed).powi(3))
}

/// CPU flow texture, row 0 at the bottom (uv.y = 0).
#[derive(Clone, Debug)]
pub struct FlowGrid {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl FlowGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            texels: vec![Vec4::ZERO; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        self.texels[(y * self.width + x) as usize]
    }

    /// UV at the center of texel `(x, y)`.
    #[inline]
    pub fn texel_uv(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        )
    }

    /// Sample the flow at `uv` (nearest texel, clamped to the edge).
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let x = ((uv.x * self.width as f32) as i64).clamp(0, self.width as i64 - 1) as u32;
        let y = ((uv.y * self.height as f32) as i64).clamp(0, self.height as i64 - 1) as u32;
        self.texel(x, y)
    }

    /// One field update: fade everything, then blend the stamp in around
    /// the pointer.
    pub fn step(&mut self, u: &FlowUniforms) {
        let s = stamp(Vec2::from(u.velocity));
        for y in 0..self.height {
            for x in 0..self.width {
                let uv = self.texel_uv(x, y);
                let w = impulse_weight(uv, u);
                let idx = (y * self.width + x) as usize;
                let faded = self.texels[idx] * u.dissipation;
                let rgb = faded.truncate().lerp(s, w);
                self.texels[idx] = rgb.extend(faded.w);
            }
        }
    }

    /// Largest displacement (`rg` length) anywhere in the field.
    pub fn max_displacement(&self) -> f32 {
        self.texels
            .iter()
            .map(|t| Vec2::new(t.x, t.y).length())
            .fold(0.0, f32::max)
    }
}
