//! Compute strategy seam.
//!
//! The engine talks to exactly one backend, chosen once at construction. The
//! in-process implementation lives here; the web front-end provides a second
//! one that forwards the same calls to the compiled module's numeric exports.

use crate::config::WaveProfile;
use crate::constants::{SAMPLE_STRIDE, SOURCE_CAPACITY};
use crate::error::Result;
use crate::field::WaveField;
use crate::sources::WaveSourceRegistry;
use crate::state::{Dimensions, WaveShape};

pub trait ComputeBackend {
    /// Short label for logs.
    fn name(&self) -> &'static str;
    fn configure(&mut self, profile: &WaveProfile);
    fn resize(&mut self, width: f32, height: f32);
    fn set_wave_shape(&mut self, shape: WaveShape);
    fn add_source(&mut self, x: f32, y: f32, t: f64, intensity: f32);
    /// Decay sources at `now`, then recompute and return the sample buffer.
    /// The slice stays valid until the next call on this backend.
    /// `phase` is the unreduced clock value.
    fn compute(&mut self, now: f64, phase: f64) -> &[f32];
    fn sample_count(&self) -> usize;
    fn stride(&self) -> f32;
    fn center_y(&self) -> f32;
    fn source_count(&self) -> usize;
}

/// Flat buffers and lookup tables, no allocation per frame.
#[derive(Clone, Debug)]
pub struct InlineBackend {
    profile: WaveProfile,
    shape: WaveShape,
    registry: WaveSourceRegistry,
    field: WaveField,
}

impl Default for InlineBackend {
    fn default() -> Self {
        Self::new(WaveProfile::normal())
    }
}

impl InlineBackend {
    pub fn new(profile: WaveProfile) -> Self {
        Self::with_capacity(profile, SOURCE_CAPACITY)
    }

    pub fn with_capacity(profile: WaveProfile, capacity: usize) -> Self {
        Self {
            profile,
            shape: WaveShape::default(),
            registry: WaveSourceRegistry::with_capacity(capacity),
            field: WaveField::new(&profile, SAMPLE_STRIDE),
        }
    }

    pub fn registry(&self) -> &WaveSourceRegistry {
        &self.registry
    }

    pub fn field(&self) -> &WaveField {
        &self.field
    }

    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    pub fn dims(&self) -> &Dimensions {
        self.field.dims()
    }
}

impl ComputeBackend for InlineBackend {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn configure(&mut self, profile: &WaveProfile) {
        self.profile = *profile;
        self.field.configure(profile);
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.field.resize(Dimensions::new(width, height));
    }

    fn set_wave_shape(&mut self, shape: WaveShape) {
        self.shape = shape;
    }

    fn add_source(&mut self, x: f32, y: f32, t: f64, intensity: f32) {
        self.registry.add(x, y, t, intensity);
    }

    fn compute(&mut self, now: f64, phase: f64) -> &[f32] {
        self.registry.tick(now, &self.profile);
        self.field
            .compute(self.registry.as_slice(), &self.profile, &self.shape, phase)
    }

    fn sample_count(&self) -> usize {
        self.field.sample_count()
    }

    fn stride(&self) -> f32 {
        self.field.stride()
    }

    fn center_y(&self) -> f32 {
        self.field.dims().center_y
    }

    fn source_count(&self) -> usize {
        self.registry.len()
    }
}

/// Use the loaded backend, or fall back to the in-process one. The failure is
/// logged here and nowhere else, so it is reported once per selection.
pub fn select_backend(
    loaded: Result<Box<dyn ComputeBackend>>,
    profile: WaveProfile,
) -> Box<dyn ComputeBackend> {
    match loaded {
        Ok(backend) => {
            log::info!("[backend] using {}", backend.name());
            backend
        }
        Err(e) => {
            log::warn!("[backend] {e}; falling back to inline");
            Box::new(InlineBackend::new(profile))
        }
    }
}
