//! The rendering-engine capability the app drives.

use crate::compositor::Pass;
use crate::flowmap::FlowUniforms;
use crate::media::ImageData;
use crate::scene::Scene;
use crate::viewport::{Camera, Screen};

pub mod headless;

/// Where a draw lands: the presented surface or one of two offscreen
/// color buffers used by the pass chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Screen,
    Buffer(usize),
}

pub trait RenderBackend {
    /// Resize the presented surface and the flow texture.
    fn set_size(&mut self, screen: Screen);
    /// Reallocate the offscreen buffers used by the pass chain.
    fn resize_targets(&mut self, screen: Screen);
    fn upload_image(&mut self, plane: usize, image: &ImageData);
    /// Advance the flow texture by one update.
    fn update_flow(&mut self, uniforms: &FlowUniforms);
    fn render(&mut self, scene: &Scene, camera: &Camera, target: Target);
    /// Run pass `index` reading `input` and the current flow texture.
    fn draw_pass(&mut self, index: usize, pass: &Pass, input: Target, output: Target);
    /// Submit and present everything recorded since the last call.
    fn finish_frame(&mut self) -> anyhow::Result<()>;
}
