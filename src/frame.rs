use crate::app::App;
use crate::dom;
use crate::render::GpuBackend;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Stop flag for the animation loop, shared with the exported `stop()`.
#[derive(Clone, Default)]
pub struct LoopHandle {
    stopped: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// Resolve on the next `requestAnimationFrame` with its timestamp in ms.
pub async fn next_frame() -> Result<f64, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut request = Ok(0);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        request = window.request_animation_frame(&resolve);
    });
    request?;
    let time = JsFuture::from(promise).await?;
    Ok(time.as_f64().unwrap_or_else(instant::now))
}

/// Tick the app once per animation frame until the handle is stopped.
pub async fn run_loop(app: Rc<RefCell<App<GpuBackend>>>, handle: LoopHandle) {
    let mut loaded = false;
    while !handle.is_stopped() {
        let time_ms = match next_frame().await {
            Ok(t) => t,
            Err(e) => {
                log::error!("animation frame error: {:?}", e);
                break;
            }
        };
        let mut state = app.borrow_mut();
        state.tick(time_ms);
        if !loaded && state.all_images_loaded() {
            loaded = true;
            log::info!("[media] all {} image(s) loaded", state.images_loaded());
            if let Some(document) = dom::window_document() {
                dom::mark_loaded(&document);
            }
        }
    }
    log::info!("[loop] stopped");
}
