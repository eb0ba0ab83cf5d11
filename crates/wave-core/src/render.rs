//! Strokes the sample buffer as one path into an offscreen target, then
//! composites it onto the visible surface once per frame.

use crate::constants::FALLBACK_STROKE;
use crate::state::Dimensions;

/// Minimal 2D path API. Implementations draw into an offscreen buffer and
/// only touch the visible surface in `present`.
pub trait PathSurface {
    fn clear(&mut self, width: f32, height: f32);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn stroke(&mut self, color: &str, line_width: f32);
    fn present(&mut self, width: f32, height: f32);
}

/// Turn the `--foreground` custom property value (e.g. `"222 47% 11%"`) into
/// a stroke color.
pub fn stroke_from_foreground(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() {
        FALLBACK_STROKE.to_string()
    } else {
        format!("hsl({v})")
    }
}

#[derive(Clone, Debug)]
pub struct RenderPipeline {
    stroke: String,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self {
            stroke: FALLBACK_STROKE.to_string(),
        }
    }
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn stroke_color(&self) -> &str {
        &self.stroke
    }

    /// Called on theme-change notifications only.
    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.stroke = color.into();
    }

    pub fn draw<S: PathSurface + ?Sized>(
        &self,
        surface: &mut S,
        samples: &[f32],
        stride: f32,
        dims: &Dimensions,
        line_width: f32,
    ) {
        let Some((&first, rest)) = samples.split_first() else {
            return;
        };
        surface.clear(dims.width, dims.height);
        surface.begin_path();
        surface.move_to(0.0, first);
        for (i, &y) in rest.iter().enumerate() {
            surface.line_to((i + 1) as f32 * stride, y);
        }
        surface.line_to(dims.width, dims.center_y);
        surface.stroke(&self.stroke, line_width);
        surface.present(dims.width, dims.height);
    }
}
