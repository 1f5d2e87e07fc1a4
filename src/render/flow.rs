use super::helpers;
use crate::flowmap::FlowUniforms;
use wgpu;

pub(crate) static FLOW_WGSL: &str = include_str!("../../shaders/flow.wgsl");

const FLOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Ping-pong pair holding the flow field. `current` is the texture written
/// by the last update; the next update reads it and writes the other one.
pub(crate) struct FlowResources {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
    bind_groups: [wgpu::BindGroup; 2],
    current: usize,
}

impl FlowResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flow_shader"),
            source: wgpu::ShaderSource::Wgsl(FLOW_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("flow_bgl"),
            entries: &[
                helpers::uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                helpers::texture_entry(1),
                helpers::sampler_entry(2),
            ],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flow_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_fullscreen_pipeline(
            device,
            "flow_pipeline",
            &pl,
            &shader,
            "fs_flow",
            FLOW_FORMAT,
            None,
        );
        let uniform_buffer =
            helpers::uniform_buffer(device, "flow_uniforms", std::mem::size_of::<FlowUniforms>());
        let (textures, views, bind_groups) =
            Self::create_field(device, &bgl, &uniform_buffer, sampler, width, height);
        Self {
            pipeline,
            bgl,
            uniform_buffer,
            textures,
            views,
            bind_groups,
            current: 0,
        }
    }

    #[allow(clippy::type_complexity)]
    fn create_field(
        device: &wgpu::Device,
        bgl: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> (
        [wgpu::Texture; 2],
        [wgpu::TextureView; 2],
        [wgpu::BindGroup; 2],
    ) {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (tex_a, view_a) =
            helpers::create_color_texture(device, "flow_a", width, height, FLOW_FORMAT, usage);
        let (tex_b, view_b) =
            helpers::create_color_texture(device, "flow_b", width, height, FLOW_FORMAT, usage);
        let bind = |label: &str, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        };
        let bg_a = bind("flow_read_a", &view_a);
        let bg_b = bind("flow_read_b", &view_b);
        ([tex_a, tex_b], [view_a, view_b], [bg_a, bg_b])
    }

    /// Reallocate the field for a new canvas size; the flow starts empty.
    pub(crate) fn resize(
        &mut self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) {
        let (w, h) = (self.textures[0].width(), self.textures[0].height());
        if w == width.max(1) && h == height.max(1) {
            return;
        }
        let (textures, views, bind_groups) = Self::create_field(
            device,
            &self.bgl,
            &self.uniform_buffer,
            sampler,
            width,
            height,
        );
        self.textures = textures;
        self.views = views;
        self.bind_groups = bind_groups;
        self.current = 0;
    }

    pub(crate) fn update(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        uniforms: &FlowUniforms,
    ) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
        let next = 1 - self.current;
        helpers::blit(
            encoder,
            "flow_update",
            &self.views[next],
            wgpu::Color::TRANSPARENT,
            &self.pipeline,
            &self.bind_groups[self.current],
        );
        self.current = next;
    }

    pub(crate) fn view(&self) -> &wgpu::TextureView {
        &self.views[self.current]
    }
}
