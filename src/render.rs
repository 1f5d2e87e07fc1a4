use crate::backend::{RenderBackend, Target};
use crate::compositor::Pass;
use crate::flowmap::FlowUniforms;
use crate::media::ImageData;
use crate::scene::Scene;
use crate::viewport::{Camera, Screen};
use web_sys as web;

mod flow;
mod helpers;
mod plane;
mod post;
mod targets;

use flow::FlowResources;
use plane::{PlaneGpuUniforms, PlaneResources};
use post::PostResources;
use targets::RenderTargets;

struct FrameInFlight {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// WebGPU implementation of the render backend, drawing into a canvas.
///
/// Work for a frame is recorded into one encoder and submitted by
/// `finish_frame`; the swapchain texture is acquired the first time a draw
/// targets the screen.
pub struct GpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    dpr: f32,
    clear_color: wgpu::Color,
    linear_sampler: wgpu::Sampler,
    targets: RenderTargets,
    flow: FlowResources,
    planes: PlaneResources,
    post: PostResources,
    encoder: Option<wgpu::CommandEncoder>,
    frame: Option<FrameInFlight>,
    acquire_error: Option<wgpu::SurfaceError>,
}

impl GpuBackend {
    pub async fn new(
        canvas: web::HtmlCanvasElement,
        clear_color: [f64; 4],
        dpr: f32,
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let targets = RenderTargets::new(&device, width, height, format);
        let flow = FlowResources::new(&device, &linear_sampler, width, height);
        let planes = PlaneResources::new(&device, format);
        let post = PostResources::new(&device, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            dpr,
            clear_color: wgpu::Color {
                r: clear_color[0],
                g: clear_color[1],
                b: clear_color[2],
                a: clear_color[3],
            },
            linear_sampler,
            targets,
            flow,
            planes,
            post,
            encoder: None,
            frame: None,
            acquire_error: None,
        })
    }

    /// Follow a devicePixelRatio change (zoom, moving to another monitor).
    /// Takes effect on the next `set_size`/`resize_targets`.
    pub fn set_dpr(&mut self, dpr: f32) {
        self.dpr = dpr;
    }

    fn backing_size(&self, screen: Screen) -> (u32, u32) {
        screen.backing_size(self.dpr)
    }

    fn take_encoder(&mut self) -> wgpu::CommandEncoder {
        self.encoder.take().unwrap_or_else(|| {
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame_encoder"),
                })
        })
    }

    /// Acquire the swapchain texture for this frame if a draw needs it.
    fn ensure_frame(&mut self) -> bool {
        if self.frame.is_some() {
            return true;
        }
        match self.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.frame = Some(FrameInFlight { texture, view });
                true
            }
            Err(e) => {
                if matches!(e, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                    self.surface.configure(&self.device, &self.config);
                }
                self.acquire_error = Some(e);
                false
            }
        }
    }
}

fn target_view<'a>(
    frame: &'a Option<FrameInFlight>,
    targets: &'a RenderTargets,
    target: Target,
) -> Option<&'a wgpu::TextureView> {
    match target {
        Target::Screen => frame.as_ref().map(|f| &f.view),
        Target::Buffer(i) => targets.view(i),
    }
}

impl RenderBackend for GpuBackend {
    fn set_size(&mut self, screen: Screen) {
        let (width, height) = self.backing_size(screen);
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
        self.flow
            .resize(&self.device, &self.linear_sampler, width, height);
    }

    fn resize_targets(&mut self, screen: Screen) {
        let size = self.backing_size(screen);
        if size != self.targets.size() {
            self.targets.recreate(&self.device, size.0, size.1);
        }
    }

    fn upload_image(&mut self, plane: usize, image: &ImageData) {
        self.planes.upload(
            &self.device,
            &self.queue,
            &self.linear_sampler,
            plane,
            image,
        );
    }

    fn update_flow(&mut self, uniforms: &FlowUniforms) {
        let mut encoder = self.take_encoder();
        self.flow.update(&self.queue, &mut encoder, uniforms);
        self.encoder = Some(encoder);
    }

    fn render(&mut self, scene: &Scene, camera: &Camera, target: Target) {
        if target == Target::Screen && !self.ensure_frame() {
            return;
        }
        let count = scene.planes().len();
        let planes = &mut self.planes;
        planes.ensure_geometry(&self.device, scene.geometry());
        planes.ensure(&self.device, &self.queue, &self.linear_sampler, count);

        let view_proj = camera.view_projection();
        for (i, plane) in scene.planes().iter().enumerate() {
            let u = PlaneGpuUniforms {
                model_view_proj: (view_proj * scene.world_matrix(plane)).to_cols_array_2d(),
                plane: plane.uniforms,
            };
            planes.write_uniforms(&self.queue, i, &u);
        }

        let mut encoder = self.take_encoder();
        if let Some(view) = target_view(&self.frame, &self.targets, target) {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.planes.draw(&mut rpass, count);
        } else {
            log::warn!("[gpu] no view for {:?}", target);
        }
        self.encoder = Some(encoder);
    }

    fn draw_pass(&mut self, index: usize, pass: &Pass, input: Target, output: Target) {
        if input == Target::Screen {
            log::warn!("[gpu] pass {} cannot read from the screen", pass.label);
            return;
        }
        if output == Target::Screen && !self.ensure_frame() {
            return;
        }
        let mut encoder = self.take_encoder();
        let input_view = target_view(&self.frame, &self.targets, input);
        let output_view = target_view(&self.frame, &self.targets, output);
        if let (Some(input_view), Some(output_view)) = (input_view, output_view) {
            self.post.draw(
                &self.device,
                &self.queue,
                &mut encoder,
                &self.linear_sampler,
                index,
                pass,
                input_view,
                self.flow.view(),
                output_view,
            );
        }
        self.encoder = Some(encoder);
    }

    fn finish_frame(&mut self) -> anyhow::Result<()> {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(Some(encoder.finish()));
        }
        if let Some(frame) = self.frame.take() {
            frame.texture.present();
        }
        match self.acquire_error.take() {
            Some(e) => Err(anyhow::anyhow!("surface error: {:?}", e)),
            None => Ok(()),
        }
    }
}
