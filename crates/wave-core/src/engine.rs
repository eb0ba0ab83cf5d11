use crate::backend::{ComputeBackend, InlineBackend};
use crate::clock::PhaseClock;
use crate::config::WaveProfile;
use crate::pointer::{PointerState, PointerTracker};
use crate::render::{PathSurface, RenderPipeline};
use crate::state::{Dimensions, WaveShape};
use rand::prelude::*;

/// Samples produced by one tick, borrowed from the backend until the next one.
#[derive(Clone, Copy, Debug)]
pub struct FrameSamples<'a> {
    pub samples: &'a [f32],
    pub stride: f32,
    pub dims: Dimensions,
}

/// Owns all mutable simulation state for one mounted view.
///
/// Pointer and resize callbacks mutate it between frames; `frame`/`tick` run
/// once per display refresh. Everything happens on one thread, so there is no
/// locking.
pub struct WaveEngine {
    profile: WaveProfile,
    backend: Box<dyn ComputeBackend>,
    pointer: PointerTracker,
    clock: PhaseClock,
    shape: WaveShape,
    dims: Dimensions,
    render: RenderPipeline,
    rng: StdRng,
    last_increment: f32,
}

impl WaveEngine {
    pub fn new(profile: WaveProfile, mut backend: Box<dyn ComputeBackend>, seed: u64) -> Self {
        let shape = WaveShape::default();
        backend.configure(&profile);
        backend.set_wave_shape(shape);
        Self {
            profile,
            backend,
            pointer: PointerTracker::new(),
            clock: PhaseClock::new(),
            shape,
            dims: Dimensions::default(),
            render: RenderPipeline::new(),
            rng: StdRng::seed_from_u64(seed),
            last_increment: 0.0,
        }
    }

    pub fn with_inline(profile: WaveProfile, seed: u64) -> Self {
        Self::new(profile, Box::new(InlineBackend::new(profile)), seed)
    }

    pub fn profile(&self) -> &WaveProfile {
        &self.profile
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn phase(&self) -> f64 {
        self.clock.phase()
    }

    /// Increment applied by the most recent tick.
    pub fn last_phase_increment(&self) -> f32 {
        self.last_increment
    }

    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    pub fn pointer(&self) -> &PointerState {
        self.pointer.state()
    }

    pub fn source_count(&self) -> usize {
        self.backend.source_count()
    }

    pub fn sample_count(&self) -> usize {
        self.backend.sample_count()
    }

    pub fn stroke_color(&self) -> &str {
        self.render.stroke_color()
    }

    /// Theme changed; re-sampled color for subsequent frames.
    pub fn set_foreground(&mut self, color: impl Into<String>) {
        self.render.set_stroke_color(color);
    }

    pub fn pointer_enter(&mut self, x: f32, y: f32, t: f64) {
        if self.pointer.enter(x, y, t) {
            self.shape = WaveShape::random(&mut self.rng);
            self.backend.set_wave_shape(self.shape);
            log::debug!(
                "[engine] wave shape freq={:.3} speed={:.3} amp={:.3}",
                self.shape.freq,
                self.shape.speed,
                self.shape.amp
            );
        }
    }

    /// Returns `true` when the move spawned a source.
    pub fn pointer_move(&mut self, x: f32, y: f32, t: f64) -> bool {
        if !self.profile.interactive {
            return false;
        }
        match self.pointer.move_to(x, y, t) {
            Some(spawn) => {
                self.backend
                    .add_source(spawn.x, spawn.y, spawn.t, spawn.intensity);
                true
            }
            None => false,
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.leave();
    }

    /// Swap every size-dependent buffer before the next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.dims = Dimensions::new(width, height);
        self.backend.resize(self.dims.width, self.dims.height);
        log::debug!(
            "[resize] {}x{} -> {} samples",
            self.dims.width,
            self.dims.height,
            self.backend.sample_count()
        );
    }

    /// Replace the profile wholesale.
    pub fn reconfigure(&mut self, profile: WaveProfile) {
        self.profile = profile;
        self.backend.configure(&profile);
    }

    fn advance(&mut self) -> Option<f64> {
        if let Err(e) = self.dims.ensure_drawable() {
            log::trace!("[engine] skipping frame: {e}");
            return None;
        }
        self.pointer.decay_velocity(self.profile.velocity_decay_factor);
        self.last_increment = self.clock.advance(self.pointer.velocity(), &self.profile);
        Some(self.clock.phase())
    }

    /// Advance the clock, decay sources and compute this frame's samples.
    /// `None` when the surface has no area.
    pub fn tick(&mut self, now: f64) -> Option<FrameSamples<'_>> {
        let phase = self.advance()?;
        let stride = self.backend.stride();
        let dims = self.dims;
        let samples = self.backend.compute(now, phase);
        Some(FrameSamples {
            samples,
            stride,
            dims,
        })
    }

    /// Tick and draw in one pass. Returns `false` for a skipped frame.
    pub fn frame<S: PathSurface + ?Sized>(&mut self, now: f64, surface: &mut S) -> bool {
        let Some(phase) = self.advance() else {
            return false;
        };
        let stride = self.backend.stride();
        let samples = self.backend.compute(now, phase);
        self.render
            .draw(surface, samples, stride, &self.dims, self.profile.line_width);
        true
    }
}
