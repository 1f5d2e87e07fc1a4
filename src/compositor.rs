//! Post-processing chain that warps the rendered scene through the flow
//! field.

use crate::backend::{RenderBackend, Target};
use crate::scene::Scene;
use crate::viewport::{Camera, Screen};
use smallvec::SmallVec;

/// Distortion shader, bundled as a string constant.
pub static DISTORT_WGSL: &str = include_str!("../shaders/distort.wgsl");

/// Uniform block shared by every pass shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PassUniforms {
    pub resolution: [f32; 2],
    pub falloff: f32,
    pub time: f32,
}

/// One full-screen stage. `fragment` is WGSL exposing `vs_fullscreen` and
/// `fs_main` against the pass bind group layout (uniforms, input color,
/// flow texture, sampler).
#[derive(Clone, Debug)]
pub struct Pass {
    pub label: &'static str,
    pub fragment: &'static str,
    pub uniforms: PassUniforms,
    pub enabled: bool,
}

impl Pass {
    /// Offsets each pixel's lookup by the flow vector scaled by
    /// `falloff * 0.5`.
    pub fn distortion(falloff: f32) -> Self {
        Self {
            label: "distort",
            fragment: DISTORT_WGSL,
            uniforms: PassUniforms {
                falloff,
                ..PassUniforms::default()
            },
            enabled: true,
        }
    }
}

pub struct Compositor {
    passes: SmallVec<[Pass; 1]>,
    screen: Screen,
}

impl Compositor {
    pub fn new(screen: Screen) -> Self {
        Self {
            passes: SmallVec::new(),
            screen,
        }
    }

    pub fn add_pass(&mut self, mut pass: Pass) -> usize {
        pass.uniforms.resolution = [self.screen.width, self.screen.height];
        self.passes.push(pass);
        self.passes.len() - 1
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn pass_mut(&mut self, index: usize) -> Option<&mut Pass> {
        self.passes.get_mut(index)
    }

    pub fn has_active_passes(&self) -> bool {
        self.passes.iter().any(|p| p.enabled)
    }

    /// Reallocate intermediate buffers for a new screen size.
    pub fn resize<B: RenderBackend>(&mut self, backend: &mut B, screen: Screen) {
        self.screen = screen;
        for pass in &mut self.passes {
            pass.uniforms.resolution = [screen.width, screen.height];
        }
        backend.resize_targets(screen);
    }

    /// Render `scene` into an intermediate buffer, then run each enabled
    /// pass; the last one writes to the screen.
    pub fn render<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        scene: &Scene,
        camera: &Camera,
        time_sec: f32,
    ) {
        let active: SmallVec<[usize; 1]> = self
            .passes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.enabled)
            .map(|(i, _)| i)
            .collect();
        if active.is_empty() {
            backend.render(scene, camera, Target::Screen);
            return;
        }

        backend.render(scene, camera, Target::Buffer(0));
        let mut read = 0;
        for (n, &index) in active.iter().enumerate() {
            let pass = &mut self.passes[index];
            pass.uniforms.time = time_sec;
            let output = if n + 1 == active.len() {
                Target::Screen
            } else {
                Target::Buffer(1 - read)
            };
            backend.draw_pass(index, pass, Target::Buffer(read), output);
            read = 1 - read;
        }
    }
}
