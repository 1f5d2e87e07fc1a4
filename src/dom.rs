use crate::viewport::Screen;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// CSS size of the window's layout viewport.
pub fn window_screen(window: &web::Window) -> Screen {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    Screen::new(width as f32, height as f32)
}

/// Create the full-window canvas the renderer draws into and append it to
/// `<body>`.
pub fn create_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let style = canvas.style();
    for (name, value) in [
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
        ("display", "block"),
    ] {
        _ = style.set_property(name, value);
    }
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

/// Keep the backing store at CSS size * devicePixelRatio.
pub fn sync_canvas_size(canvas: &web::HtmlCanvasElement, screen: Screen, dpr: f32) {
    let (width, height) = screen.backing_size(dpr);
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", screen.width));
    _ = style.set_property("height", &format!("{}px", screen.height));
}

pub fn remove_no_js(document: &web::Document) {
    if let Some(root) = document.document_element() {
        _ = root.class_list().remove_1("no-js");
    }
}

/// Swap the loading-screen class once every image is in.
pub fn mark_loaded(document: &web::Document) {
    if let Some(root) = document.document_element() {
        let classes = root.class_list();
        _ = classes.remove_1("loading");
        _ = classes.add_1("loaded");
    }
}

/// Comma-separated image list from `<body data-images="...">`, if present.
pub fn media_override(document: &web::Document) -> Option<String> {
    document.body()?.get_attribute("data-images")
}
