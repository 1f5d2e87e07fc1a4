//! A full-window gallery of image planes rendered with wgpu, distorted by a
//! pointer-driven flow field.
//!
//! Everything above the web glue is host-compilable so the tick sequence can
//! be driven from tests through [`backend::headless::HeadlessBackend`].

pub mod app;
pub mod backend;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod flowmap;
pub mod input;
pub mod media;
pub mod scene;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod loader;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use render::GpuBackend;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::app::App;
    use crate::config::AppConfig;
    use crate::render::GpuBackend;
    use crate::{dom, events, frame, loader};
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys as web;

    thread_local! {
        static LOOP: RefCell<Option<frame::LoopHandle>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("flow-gallery starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    /// Stop the animation loop after the current frame.
    #[wasm_bindgen]
    pub fn stop() {
        LOOP.with(|l| {
            if let Some(handle) = l.borrow().as_ref() {
                handle.stop();
            }
        });
    }

    async fn init() -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;
        dom::remove_no_js(&document);

        let config = match dom::media_override(&document) {
            Some(list) => AppConfig::default().with_media_list(&list),
            None => AppConfig::default(),
        };

        let screen = dom::window_screen(&window);
        let dpr = window.device_pixel_ratio() as f32;
        let canvas = dom::create_canvas(&document)?;
        dom::sync_canvas_size(&canvas, screen, dpr);

        let backend = GpuBackend::new(canvas.clone(), config.clear_color, dpr).await?;
        let mut images = loader::WebImageLoader;
        let app = Rc::new(RefCell::new(App::new(config, backend, screen, &mut images)));

        events::wire_resize(&window, canvas, app.clone());
        events::wire_pointer(&window, app.clone());

        let handle = frame::LoopHandle::new();
        LOOP.with(|l| *l.borrow_mut() = Some(handle.clone()));
        frame::run_loop(app, handle).await;
        Ok(())
    }
}
