//! Host-side backend: keeps the flow field on the CPU and records every
//! call instead of drawing.

use super::{RenderBackend, Target};
use crate::compositor::Pass;
use crate::flowmap::{FlowGrid, FlowUniforms};
use crate::media::{ImageData, PlaneUniforms};
use crate::scene::Scene;
use crate::viewport::{Camera, Screen};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    SetSize(Screen),
    ResizeTargets(Screen),
    UploadImage {
        plane: usize,
        width: u32,
        height: u32,
    },
    UpdateFlow(FlowUniforms),
    Render(Target),
    DrawPass {
        index: usize,
        label: &'static str,
        input: Target,
        output: Target,
    },
    FinishFrame,
}

pub struct HeadlessBackend {
    calls: Vec<Call>,
    flow: FlowGrid,
    /// Uniforms of every plane as of the last `render`.
    drawn: Vec<PlaneUniforms>,
    frames: u64,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            flow: FlowGrid::new(1, 1),
            drawn: Vec::new(),
            frames: 0,
        }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn flow(&self) -> &FlowGrid {
        &self.flow
    }

    pub fn drawn(&self) -> &[PlaneUniforms] {
        &self.drawn
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for HeadlessBackend {
    fn set_size(&mut self, screen: Screen) {
        let (w, h) = screen.backing_size(1.0);
        if w != self.flow.width() || h != self.flow.height() {
            self.flow = FlowGrid::new(w, h);
        }
        self.calls.push(Call::SetSize(screen));
    }

    fn resize_targets(&mut self, screen: Screen) {
        self.calls.push(Call::ResizeTargets(screen));
    }

    fn upload_image(&mut self, plane: usize, image: &ImageData) {
        self.calls.push(Call::UploadImage {
            plane,
            width: image.width,
            height: image.height,
        });
    }

    fn update_flow(&mut self, uniforms: &FlowUniforms) {
        self.flow.step(uniforms);
        self.calls.push(Call::UpdateFlow(*uniforms));
    }

    fn render(&mut self, scene: &Scene, _camera: &Camera, target: Target) {
        self.drawn = scene.planes().iter().map(|p| p.uniforms).collect();
        self.calls.push(Call::Render(target));
    }

    fn draw_pass(&mut self, index: usize, pass: &Pass, input: Target, output: Target) {
        self.calls.push(Call::DrawPass {
            index,
            label: pass.label,
            input,
            output,
        });
    }

    fn finish_frame(&mut self) -> anyhow::Result<()> {
        self.frames += 1;
        self.calls.push(Call::FinishFrame);
        Ok(())
    }
}
