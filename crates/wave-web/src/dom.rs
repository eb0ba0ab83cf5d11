use wasm_bindgen::JsCast;
use wave_core::constants::MAX_DEVICE_PIXEL_RATIO;
use wave_core::stroke_from_foreground;
use web_sys as web;

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{id} is not a canvas: {:?}", e))
}

/// Device pixel ratio, capped so huge displays do not blow up the backing store.
#[inline]
pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .clamp(1.0, MAX_DEVICE_PIXEL_RATIO)
}

/// Element whose box the canvas fills: its parent, or the canvas itself when
/// detached.
pub fn container_of(canvas: &web::HtmlCanvasElement) -> web::Element {
    canvas
        .parent_element()
        .unwrap_or_else(|| canvas.clone().unchecked_into::<web::Element>())
}

/// CSS-pixel size of an element as laid out by the page.
#[inline]
pub fn css_size(el: &web::Element) -> (f64, f64) {
    let rect = el.get_bounding_client_rect();
    (rect.width().max(0.0), rect.height().max(0.0))
}

/// Viewport size in CSS pixels, `(0, 0)` when unavailable.
pub fn viewport_size() -> (f32, f32) {
    let Some(w) = web::window() else {
        return (0.0, 0.0);
    };
    let vw = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let vh = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (vw as f32, vh as f32)
}

/// Current theme foreground as a stroke color.
pub fn read_stroke_color(canvas: &web::HtmlCanvasElement) -> String {
    let value = web::window()
        .and_then(|w| w.get_computed_style(canvas).ok().flatten())
        .and_then(|s| s.get_property_value("--foreground").ok())
        .unwrap_or_default();
    stroke_from_foreground(&value)
}
