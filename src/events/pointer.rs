use crate::app::App;
use crate::input::PointerSample;
use crate::render::GpuBackend;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

type SharedApp = Rc<RefCell<App<GpuBackend>>>;

/// Feed pointer movement into the app's queue. Touch devices (those exposing
/// `ontouchstart`) get `touchstart` and `touchmove`; everything else gets
/// `mousemove`. The choice is made once.
pub fn wire_pointer(window: &web::Window, app: SharedApp) {
    let touch = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    log::info!("[input] listening for {}", if touch { "touch" } else { "mouse" });
    if touch {
        wire_touch(window, "touchstart", app.clone());
        wire_touch(window, "touchmove", app);
    } else {
        wire_mousemove(window, app);
    }
}

fn push(app: &SharedApp, sample: PointerSample) {
    match app.try_borrow_mut() {
        Ok(mut app) => app.push_pointer(sample),
        Err(_) => log::debug!("[input] app busy, dropping sample"),
    }
}

fn wire_mousemove(window: &web::Window, app: SharedApp) {
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let sample = PointerSample::from_coords(
            Some((ev.client_x() as f32, ev.client_y() as f32)),
            (ev.page_x() as f32, ev.page_y() as f32),
            instant::now(),
        );
        push(&app, sample);
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_touch(window: &web::Window, event: &str, app: SharedApp) {
    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        let first_changed = ev.changed_touches().get(0).map(|t| {
            (
                (t.client_x() as f32, t.client_y() as f32),
                (t.page_x() as f32, t.page_y() as f32),
            )
        });
        let Some(sample) = PointerSample::from_changed_touch(first_changed, instant::now()) else {
            return;
        };
        push(&app, sample);
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}
