use wasm_bindgen::JsCast;
use wave_core::PathSurface;
use web_sys as web;

fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("getContext: {:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

/// Visible canvas plus an offscreen twin of the same backing size.
///
/// The path is stroked offscreen and copied over in one `drawImage`, so the
/// visible canvas never shows a half-drawn line. Both contexts are scaled by
/// the device pixel ratio so callers work in CSS pixels.
pub struct Canvas2dSurface {
    visible: web::CanvasRenderingContext2d,
    offscreen_canvas: web::HtmlCanvasElement,
    offscreen: web::CanvasRenderingContext2d,
    canvas: web::HtmlCanvasElement,
}

impl Canvas2dSurface {
    pub fn new(canvas: &web::HtmlCanvasElement, document: &web::Document) -> anyhow::Result<Self> {
        let visible = context_2d(canvas)?;
        visible.set_image_smoothing_enabled(false);
        let offscreen_canvas = document
            .create_element("canvas")
            .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let offscreen = context_2d(&offscreen_canvas)?;
        Ok(Self {
            visible,
            offscreen_canvas,
            offscreen,
            canvas: canvas.clone(),
        })
    }

    /// Reallocate both backing stores. Resetting `width` clears the context
    /// state, so the DPR transform is applied again afterwards.
    pub fn resize(&mut self, css_w: f64, css_h: f64, dpr: f64) {
        let w_px = (css_w * dpr).round().max(1.0) as u32;
        let h_px = (css_h * dpr).round().max(1.0) as u32;
        for c in [&self.canvas, &self.offscreen_canvas] {
            c.set_width(w_px);
            c.set_height(h_px);
            let style = c.style();
            _ = style.set_property("width", &format!("{css_w}px"));
            _ = style.set_property("height", &format!("{css_h}px"));
        }
        _ = self.visible.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        _ = self.offscreen.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.visible.set_image_smoothing_enabled(false);
    }
}

impl PathSurface for Canvas2dSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.offscreen.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn begin_path(&mut self) {
        self.offscreen.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.offscreen.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.offscreen.line_to(x as f64, y as f64);
    }

    fn stroke(&mut self, color: &str, line_width: f32) {
        self.offscreen.set_stroke_style_str(color);
        self.offscreen.set_line_width(line_width as f64);
        self.offscreen.stroke();
    }

    fn present(&mut self, width: f32, height: f32) {
        let (w, h) = (width as f64, height as f64);
        self.visible.clear_rect(0.0, 0.0, w, h);
        _ = self
            .visible
            .draw_image_with_html_canvas_element_and_dw_and_dh(&self.offscreen_canvas, 0.0, 0.0, w, h);
    }
}
