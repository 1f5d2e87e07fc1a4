use super::helpers;
use crate::media::{ImageData, PlaneUniforms};
use crate::scene::{Geometry, PlaneVertex};
use wgpu;
use wgpu::util::DeviceExt;

pub(crate) static PLANE_WGSL: &str = include_str!("../../shaders/plane.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PlaneGpuUniforms {
    pub(crate) model_view_proj: [[f32; 4]; 4],
    pub(crate) plane: PlaneUniforms,
}

/// Per-plane uniform buffer and texture binding.
pub(crate) struct PlaneBinding {
    uniform_buffer: wgpu::Buffer,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct GeometryBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Pipeline and shared geometry for every media plane.
pub(crate) struct PlaneResources {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    // Uploaded from the scene on the first draw.
    geometry: Option<GeometryBuffers>,
    bindings: Vec<PlaneBinding>,
}

impl PlaneResources {
    pub(crate) fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plane_shader"),
            source: wgpu::ShaderSource::Wgsl(PLANE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane_bgl"),
            entries: &[
                helpers::uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ),
                helpers::texture_entry(1),
                helpers::sampler_entry(2),
            ],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plane_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("plane_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PlaneVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        Self {
            pipeline,
            bgl,
            geometry: None,
            bindings: Vec::new(),
        }
    }

    pub(crate) fn ensure_geometry(&mut self, device: &wgpu::Device, geometry: &Geometry) {
        if self.geometry.is_some() {
            return;
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane_vertices"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane_indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.geometry = Some(GeometryBuffers {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        });
    }

    /// Make sure `count` planes have bindings; new ones start with a 1x1
    /// transparent texture.
    pub(crate) fn ensure(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sampler: &wgpu::Sampler,
        count: usize,
    ) {
        while self.bindings.len() < count {
            let index = self.bindings.len();
            let uniform_buffer = helpers::uniform_buffer(
                device,
                "plane_uniforms",
                std::mem::size_of::<PlaneGpuUniforms>(),
            );
            let texture = create_image_texture(device, queue, 1, 1, &[0, 0, 0, 0]);
            let bind_group = self.bind(device, sampler, &uniform_buffer, &texture);
            log::debug!("[gpu] created binding for plane {}", index);
            self.bindings.push(PlaneBinding {
                uniform_buffer,
                texture,
                bind_group,
            });
        }
    }

    fn bind(
        &self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        uniform_buffer: &wgpu::Buffer,
        texture: &wgpu::Texture,
    ) -> wgpu::BindGroup {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plane_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sampler: &wgpu::Sampler,
        plane: usize,
        image: &ImageData,
    ) {
        if image.width == 0 || image.height == 0 {
            log::warn!("[gpu] skipping empty image for plane {}", plane);
            return;
        }
        self.ensure(device, queue, sampler, plane + 1);
        let texture = create_image_texture(device, queue, image.width, image.height, &image.rgba);
        let bind_group = self.bind(device, sampler, &self.bindings[plane].uniform_buffer, &texture);
        let binding = &mut self.bindings[plane];
        binding.texture.destroy();
        binding.texture = texture;
        binding.bind_group = bind_group;
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, plane: usize, u: &PlaneGpuUniforms) {
        if let Some(b) = self.bindings.get(plane) {
            queue.write_buffer(&b.uniform_buffer, 0, bytemuck::bytes_of(u));
        }
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, count: usize) {
        let Some(geometry) = &self.geometry else {
            return;
        };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        rpass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for binding in self.bindings.iter().take(count) {
            rpass.set_bind_group(0, &binding.bind_group, &[]);
            rpass.draw_indexed(0..geometry.index_count, 0, 0..1);
        }
    }
}

fn create_image_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("plane_image"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture
}
