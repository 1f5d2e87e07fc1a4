use crate::app::App;
use crate::dom;
use crate::render::GpuBackend;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Resize the canvas and the app together whenever the window changes size.
pub fn wire_resize(
    window: &web::Window,
    canvas: web::HtmlCanvasElement,
    app: Rc<RefCell<App<GpuBackend>>>,
) {
    let closure = Closure::wrap(Box::new(move || {
        let Some(w) = web::window() else {
            return;
        };
        let screen = dom::window_screen(&w);
        let dpr = w.device_pixel_ratio() as f32;
        dom::sync_canvas_size(&canvas, screen, dpr);
        match app.try_borrow_mut() {
            Ok(mut app) => {
                app.backend_mut().set_dpr(dpr);
                app.resize(screen);
            }
            Err(_) => log::warn!("[resize] app busy, skipping resize"),
        }
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}
