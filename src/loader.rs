//! Browser image loading: fetch, decode, read back RGBA pixels.

use crate::media::{ImageData, ImageLoadError, ImageLoader, ImageSlot};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[derive(Default)]
pub struct WebImageLoader;

impl ImageLoader for WebImageLoader {
    fn load(&mut self, source: &str) -> ImageSlot {
        let slot = ImageSlot::pending();
        let resolved = slot.clone();
        let url = source.to_string();
        spawn_local(async move {
            let result = fetch_pixels(&url).await;
            match &result {
                Ok(image) => log::info!("[media] loaded {} ({}x{})", url, image.width, image.height),
                Err(e) => log::warn!("[media] {}", e),
            }
            resolved.complete(result);
        });
        slot
    }
}

async fn fetch_pixels(url: &str) -> Result<ImageData, ImageLoadError> {
    let network = |reason: String| ImageLoadError::Network {
        url: url.to_string(),
        reason,
    };
    let decode = |reason: String| ImageLoadError::Decode {
        url: url.to_string(),
        reason,
    };

    let img = web::HtmlImageElement::new().map_err(|e| network(format!("{:?}", e)))?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| network(format!("{:?}", e)))?;

    let (width, height) = (img.natural_width(), img.natural_height());
    if width == 0 || height == 0 {
        return Err(decode("image has no pixels".into()));
    }
    let document = web::window()
        .and_then(|w| w.document())
        .ok_or_else(|| decode("no document".into()))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| decode(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| decode(format!("{:?}", e)))?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| decode(format!("{:?}", e)))?
        .ok_or_else(|| decode("no 2d context".into()))?
        .dyn_into()
        .map_err(|e| decode(format!("{:?}", e)))?;
    ctx.draw_image_with_html_image_element(&img, 0.0, 0.0)
        .map_err(|e| decode(format!("{:?}", e)))?;
    let pixels = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| decode(format!("{:?}", e)))?;
    Ok(ImageData {
        width,
        height,
        rgba: pixels.data().0,
    })
}
