use super::helpers;
use crate::compositor::{Pass, PassUniforms};
use wgpu;

struct PassPipeline {
    label: &'static str,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
}

/// Pipelines for the compositor's passes, built the first time each pass is
/// drawn. All passes share one bind group layout: uniforms, input color,
/// flow texture, sampler.
pub(crate) struct PostResources {
    bgl: wgpu::BindGroupLayout,
    layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    pipelines: Vec<Option<PassPipeline>>,
}

impl PostResources {
    pub(crate) fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl"),
            entries: &[
                helpers::uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                helpers::texture_entry(1),
                helpers::texture_entry(2),
                helpers::sampler_entry(3),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        Self {
            bgl,
            layout,
            color_format,
            pipelines: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        sampler: &wgpu::Sampler,
        index: usize,
        pass: &Pass,
        input: &wgpu::TextureView,
        flow: &wgpu::TextureView,
        output: &wgpu::TextureView,
    ) {
        if self.pipelines.len() <= index {
            self.pipelines.resize_with(index + 1, || None);
        }
        let slot = &mut self.pipelines[index];
        if slot.as_ref().is_some_and(|p| p.label != pass.label) {
            *slot = None;
        }
        let p = slot.get_or_insert_with(|| {
            build_pass_pipeline(device, &self.layout, self.color_format, index, pass)
        });
        queue.write_buffer(&p.uniform_buffer, 0, bytemuck::bytes_of(&pass.uniforms));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("post_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: p.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(flow),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        helpers::blit(
            encoder,
            pass.label,
            output,
            wgpu::Color::TRANSPARENT,
            &p.pipeline,
            &bind_group,
        );
    }
}

fn build_pass_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    index: usize,
    pass: &Pass,
) -> PassPipeline {
    log::info!("[gpu] building pass {} ({})", index, pass.label);
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(pass.label),
        source: wgpu::ShaderSource::Wgsl(pass.fragment.into()),
    });
    let pipeline = helpers::make_fullscreen_pipeline(
        device,
        pass.label,
        layout,
        &shader,
        "fs_main",
        color_format,
        Some(wgpu::BlendState::REPLACE),
    );
    let uniform_buffer =
        helpers::uniform_buffer(device, "pass_uniforms", std::mem::size_of::<PassUniforms>());
    PassPipeline {
        label: pass.label,
        pipeline,
        uniform_buffer,
    }
}
