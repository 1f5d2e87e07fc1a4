use super::helpers;
use wgpu;

/// Offscreen color targets for the pass chain.
///
/// Two full-resolution buffers in the surface format: the scene renders into
/// `Buffer(0)`, and passes ping-pong between the two before the last one
/// writes to the swapchain.
pub(crate) struct RenderTargets {
    format: wgpu::TextureFormat,
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let (tex_a, view_a) = Self::create(device, "color_a", width, height, format);
        let (tex_b, view_b) = Self::create(device, "color_b", width, height, format);
        Self {
            format,
            textures: [tex_a, tex_b],
            views: [view_a, view_b],
        }
    }

    fn create(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        helpers::create_color_texture(
            device,
            label,
            width,
            height,
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    pub(crate) fn view(&self, index: usize) -> Option<&wgpu::TextureView> {
        self.views.get(index)
    }

    pub(crate) fn size(&self) -> (u32, u32) {
        let t = &self.textures[0];
        (t.width(), t.height())
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height, self.format);
    }
}
