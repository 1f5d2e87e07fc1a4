//! The orchestrator: owns camera, scene, flow field, compositor and pointer
//! state, and drives one tick per animation frame.

use crate::backend::{RenderBackend, Target};
use crate::compositor::{Compositor, Pass};
use crate::config::AppConfig;
use crate::constants::{PLANE_HEIGHT_SEGMENTS, PLANE_WIDTH_SEGMENTS};
use crate::flowmap::FlowField;
use crate::input::{PointerQueue, PointerSample, PointerTracker};
use crate::media::{ImageLoader, MediaPlane, PlaneDesc, TextureState};
use crate::scene::{Geometry, Scene};
use crate::viewport::{Camera, Screen, Viewport};

pub struct App<B: RenderBackend> {
    config: AppConfig,
    backend: B,
    camera: Camera,
    scene: Scene,
    flow: FlowField,
    compositor: Option<Compositor>,
    tracker: PointerTracker,
    pointer_queue: PointerQueue,
    screen: Screen,
    viewport: Viewport,
    start_ms: Option<f64>,
    frame: u64,
}

impl<B: RenderBackend> App<B> {
    /// Build the scene for `screen` and start loading every configured
    /// image through `loader`.
    pub fn new(config: AppConfig, backend: B, screen: Screen, loader: &mut dyn ImageLoader) -> Self {
        let screen = if screen.has_area() {
            screen
        } else {
            log::warn!("[app] starting with an empty screen, using 1x1");
            Screen::new(1.0, 1.0)
        };
        let compositor = config.distortion.then(|| {
            let mut c = Compositor::new(screen);
            c.add_pass(Pass::distortion(config.flow.falloff));
            c
        });
        let mut app = Self {
            camera: Camera::new(&config.camera),
            scene: Scene::new(Geometry::plane(PLANE_WIDTH_SEGMENTS, PLANE_HEIGHT_SEGMENTS)),
            flow: FlowField::new(&config.flow),
            compositor,
            tracker: PointerTracker::new(&config.pointer),
            pointer_queue: PointerQueue::new(config.pointer.queue_capacity),
            screen,
            viewport: Viewport::default(),
            start_ms: None,
            frame: 0,
            backend,
            config,
        };
        app.resize(screen);
        app.create_medias(loader);
        log::info!(
            "[app] {} media plane(s), viewport {:.2}x{:.2}, distortion {}",
            app.scene.planes().len(),
            app.viewport.width,
            app.viewport.height,
            if app.compositor.is_some() { "on" } else { "off" }
        );
        app
    }

    fn create_medias(&mut self, loader: &mut dyn ImageLoader) {
        let total = self.config.media.len();
        for (index, entry) in self.config.media.iter().enumerate() {
            let image = loader.load(&entry.source);
            let desc = PlaneDesc {
                source: entry.source.clone(),
                index,
                total,
            };
            self.scene
                .attach(MediaPlane::new(desc, image, self.screen, self.viewport));
        }
    }

    /// Apply a new screen size to every dependent in one go: renderer,
    /// camera, viewport, flow field, compositor buffers, planes.
    ///
    /// A screen without area (minimized window) is ignored and the previous
    /// size kept.
    pub fn resize(&mut self, screen: Screen) {
        if !screen.has_area() {
            log::debug!(
                "[resize] ignoring empty screen {}x{}",
                screen.width,
                screen.height
            );
            return;
        }
        self.screen = screen;
        self.backend.set_size(screen);
        self.camera.perspective(screen.aspect());
        self.viewport = self.camera.viewport(screen);
        self.flow.resize(screen);
        if let Some(compositor) = &mut self.compositor {
            compositor.resize(&mut self.backend, screen);
        }
        for plane in self.scene.planes_mut() {
            plane.on_resize(screen, self.viewport);
        }
        log::debug!(
            "[resize] screen {}x{} viewport {:.3}x{:.3}",
            screen.width,
            screen.height,
            self.viewport.width,
            self.viewport.height
        );
    }

    /// Queue a pointer sample for the next tick.
    pub fn push_pointer(&mut self, sample: PointerSample) {
        self.pointer_queue.push(sample);
    }

    /// One animation frame.
    pub fn tick(&mut self, time_ms: f64) {
        self.frame += 1;
        let start = *self.start_ms.get_or_insert(time_ms);
        let time_sec = ((time_ms - start) / 1000.0) as f32;

        self.tracker
            .begin_frame(&mut self.pointer_queue, self.screen);

        let uniforms = self.flow.update(
            self.screen.aspect(),
            self.tracker.position(),
            self.tracker.velocity(),
        );
        self.backend.update_flow(&uniforms);

        for plane in self.scene.planes_mut() {
            if let Some(image) = plane.update(time_ms) {
                self.backend.upload_image(plane.desc.index, &image);
            }
        }

        match &mut self.compositor {
            Some(compositor) => {
                compositor.render(&mut self.backend, &self.scene, &self.camera, time_sec)
            }
            None => self
                .backend
                .render(&self.scene, &self.camera, Target::Screen),
        }

        if let Err(e) = self.backend.finish_frame() {
            log::error!("render error: {:?}", e);
        }
    }

    /// Swap the post chain; `None` renders the scene directly.
    pub fn set_compositor(&mut self, compositor: Option<Compositor>) {
        self.compositor = compositor;
        if let Some(c) = &mut self.compositor {
            c.resize(&mut self.backend, self.screen);
        }
    }

    pub fn images_loaded(&self) -> usize {
        self.scene
            .planes()
            .iter()
            .filter(|p| p.texture() == TextureState::Ready)
            .count()
    }

    pub fn all_images_loaded(&self) -> bool {
        self.images_loaded() == self.scene.planes().len()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn flow(&self) -> &FlowField {
        &self.flow
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn compositor(&self) -> Option<&Compositor> {
        self.compositor.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
