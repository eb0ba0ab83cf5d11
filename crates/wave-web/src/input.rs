use web_sys as web;

/// Canvas origin in client coordinates. Refreshed on resize, scroll and
/// pointer enter instead of measuring the layout on every move.
#[derive(Default, Clone, Copy, Debug)]
pub struct RectCache {
    pub left: f32,
    pub top: f32,
}

impl RectCache {
    pub fn refresh(&mut self, canvas: &web::HtmlCanvasElement) {
        let rect = canvas.get_bounding_client_rect();
        self.left = rect.left() as f32;
        self.top = rect.top() as f32;
    }

    /// Client coordinates to canvas-local CSS pixels.
    #[inline]
    pub fn to_local(&self, ev: &web::MouseEvent) -> (f32, f32) {
        (
            ev.client_x() as f32 - self.left,
            ev.client_y() as f32 - self.top,
        )
    }
}

#[inline]
pub fn client_xy(ev: &web::MouseEvent) -> (f32, f32) {
    (ev.client_x() as f32, ev.client_y() as f32)
}
