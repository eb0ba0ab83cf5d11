//! Small value types shared by the engine, the backends and the front-end.
//!
//! None of these reference platform APIs; the web front-end fills them from
//! DOM measurements and pointer events.

use crate::constants::*;
use crate::error::{Result, WaveError};
use rand::Rng;

/// Drawable area in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub center_y: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        Self {
            width,
            height,
            center_y: height * 0.5,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn ensure_drawable(&self) -> Result<()> {
        if self.is_degenerate() {
            return Err(WaveError::DegenerateSurface {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Number of samples for this width: `ceil(width / stride) + padding`.
    pub fn sample_count(&self, stride: f32) -> usize {
        if self.width <= 0.0 || stride <= 0.0 {
            return 0;
        }
        (self.width / stride).ceil() as usize + SAMPLE_PADDING
    }
}

/// Per-session shape of the pointer-driven waves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveShape {
    pub freq: f32,
    pub speed: f32,
    pub amp: f32,
}

impl Default for WaveShape {
    fn default() -> Self {
        Self {
            freq: DEFAULT_SHAPE_FREQ,
            speed: DEFAULT_SHAPE_SPEED,
            amp: DEFAULT_SHAPE_AMP,
        }
    }
}

impl WaveShape {
    /// Sample a shape from the fixed session ranges.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            freq: SHAPE_FREQ_MIN + rng.gen::<f32>() * SHAPE_FREQ_SPAN,
            speed: SHAPE_SPEED_MIN + rng.gen::<f32>() * SHAPE_SPEED_SPAN,
            amp: SHAPE_AMP_MIN + rng.gen::<f32>() * SHAPE_AMP_SPAN,
        }
    }
}
