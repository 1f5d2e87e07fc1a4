//! Media planes: one image on one mesh, sized from the screen and viewport.

use crate::constants::{
    PLANE_HEIGHT_UNITS, PLANE_REFERENCE_UNIT, PLANE_SPEED, PLANE_TIME_STEP, PLANE_WIDTH_UNITS,
};
use crate::scene::Transform;
use crate::viewport::{Screen, Viewport};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ImageLoadError {
    #[error("failed to load image {url}: {reason}")]
    Network { url: String, reason: String },
    #[error("failed to read pixels of {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Decoded RGBA8 pixels, rows top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug)]
pub enum ImageState {
    Pending,
    Loaded(ImageData),
    /// Pixels handed to the plane; only the size is kept.
    Applied { width: u32, height: u32 },
    Failed(ImageLoadError),
}

/// Handle to an image load in flight.
///
/// The loader keeps one clone and resolves it when the request finishes; the
/// plane keeps another and picks the result up on its next update.
#[derive(Clone, Debug)]
pub struct ImageSlot(Rc<RefCell<ImageState>>);

impl Default for ImageSlot {
    fn default() -> Self {
        Self::pending()
    }
}

impl ImageSlot {
    pub fn pending() -> Self {
        Self(Rc::new(RefCell::new(ImageState::Pending)))
    }

    /// Resolve the load. Only the first completion counts.
    pub fn complete(&self, result: Result<ImageData, ImageLoadError>) {
        let mut state = self.0.borrow_mut();
        if !matches!(*state, ImageState::Pending) {
            log::debug!("[media] ignoring second completion of an image slot");
            return;
        }
        *state = match result {
            Ok(image) => ImageState::Loaded(image),
            Err(e) => ImageState::Failed(e),
        };
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.0.borrow(), ImageState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(*self.0.borrow(), ImageState::Failed(_))
    }

    /// Pixels of a finished load, handed out exactly once.
    pub fn take_loaded(&self) -> Option<ImageData> {
        let mut state = self.0.borrow_mut();
        let (width, height) = match &*state {
            ImageState::Loaded(image) => (image.width, image.height),
            _ => return None,
        };
        match std::mem::replace(&mut *state, ImageState::Applied { width, height }) {
            ImageState::Loaded(image) => Some(image),
            _ => None,
        }
    }
}

/// Source of image loads; the browser implementation fetches and decodes
/// off the tick sequence.
pub trait ImageLoader {
    fn load(&mut self, source: &str) -> ImageSlot;
}

/// Uniform block of the plane shader (without the transform).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneUniforms {
    pub plane_sizes: [f32; 2],
    pub image_sizes: [f32; 2],
    pub viewport_sizes: [f32; 2],
    pub speed: f32,
    pub time: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureState {
    Empty,
    Ready,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaneDesc {
    pub source: String,
    pub index: usize,
    pub total: usize,
}

pub struct MediaPlane {
    pub desc: PlaneDesc,
    pub transform: Transform,
    pub uniforms: PlaneUniforms,
    texture: TextureState,
    image: ImageSlot,
    screen: Screen,
    viewport: Viewport,
}

impl MediaPlane {
    pub fn new(desc: PlaneDesc, image: ImageSlot, screen: Screen, viewport: Viewport) -> Self {
        let mut plane = Self {
            desc,
            transform: Transform::default(),
            uniforms: PlaneUniforms {
                viewport_sizes: [viewport.width, viewport.height],
                ..PlaneUniforms::default()
            },
            texture: TextureState::Empty,
            image,
            screen,
            viewport,
        };
        plane.on_resize(screen, viewport);
        plane
    }

    pub fn texture(&self) -> TextureState {
        self.texture
    }

    pub fn image(&self) -> &ImageSlot {
        &self.image
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> Vec2 {
        self.transform.scale.truncate()
    }

    /// Size the mesh so its height is a fixed share of the viewport and its
    /// width follows a 175:100 ratio in screen terms.
    pub fn on_resize(&mut self, screen: Screen, viewport: Viewport) {
        self.screen = screen;
        self.viewport = viewport;
        self.uniforms.viewport_sizes = [viewport.width, viewport.height];

        let unit = screen.height / PLANE_REFERENCE_UNIT;
        self.transform.scale.y = viewport.height * (PLANE_HEIGHT_UNITS * unit) / screen.height;
        self.transform.scale.x = viewport.width * (PLANE_WIDTH_UNITS * unit) / screen.width;

        self.uniforms.plane_sizes = [self.transform.scale.x, self.transform.scale.y];
    }

    /// Per-frame update. Returns the pixels of an image that finished loading
    /// since the last call so the caller can upload them.
    pub fn update(&mut self, _frame_time_ms: f64) -> Option<ImageData> {
        self.uniforms.speed = PLANE_SPEED;
        self.uniforms.time += PLANE_TIME_STEP;

        let image = self.image.take_loaded()?;
        self.uniforms.image_sizes = [image.width as f32, image.height as f32];
        self.texture = TextureState::Ready;
        log::info!(
            "[media] plane {} textured from {} ({}x{})",
            self.desc.index,
            self.desc.source,
            image.width,
            image.height
        );
        Some(image)
    }
}

/// UV scale that makes an image cover a plane without stretching; the
/// shader centers it with `uv * ratio + (1 - ratio) / 2`.
#[inline]
pub fn cover_ratio(plane: Vec2, image: Vec2) -> Vec2 {
    Vec2::new(
        ((plane.x / plane.y) / (image.x / image.y)).min(1.0),
        ((plane.y / plane.x) / (image.y / image.x)).min(1.0),
    )
}
