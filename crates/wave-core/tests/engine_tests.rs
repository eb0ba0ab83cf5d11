// Host-side integration tests for the engine: pointer to sources to samples.

use std::cell::RefCell;
use std::rc::Rc;
use wave_core::constants::*;
use wave_core::{
    select_backend, ComputeBackend, InlineBackend, PathSurface, WaveEngine, WaveError,
    WaveProfile, WaveShape,
};

/// Inline backend that also records every `add_source` call.
struct Spy {
    inner: InlineBackend,
    added: Rc<RefCell<Vec<(f32, f32, f32)>>>,
}

impl ComputeBackend for Spy {
    fn name(&self) -> &'static str {
        "spy"
    }
    fn configure(&mut self, profile: &WaveProfile) {
        self.inner.configure(profile);
    }
    fn resize(&mut self, width: f32, height: f32) {
        self.inner.resize(width, height);
    }
    fn set_wave_shape(&mut self, shape: WaveShape) {
        self.inner.set_wave_shape(shape);
    }
    fn add_source(&mut self, x: f32, y: f32, t: f64, intensity: f32) {
        self.added.borrow_mut().push((x, y, intensity));
        self.inner.add_source(x, y, t, intensity);
    }
    fn compute(&mut self, now: f64, phase: f64) -> &[f32] {
        self.inner.compute(now, phase)
    }
    fn sample_count(&self) -> usize {
        self.inner.sample_count()
    }
    fn stride(&self) -> f32 {
        self.inner.stride()
    }
    fn center_y(&self) -> f32 {
        self.inner.center_y()
    }
    fn source_count(&self) -> usize {
        self.inner.source_count()
    }
}

#[derive(Default)]
struct CountingSurface {
    calls: usize,
}

impl PathSurface for CountingSurface {
    fn clear(&mut self, _: f32, _: f32) {
        self.calls += 1;
    }
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _: f32, _: f32) {}
    fn line_to(&mut self, _: f32, _: f32) {
        self.calls += 1;
    }
    fn stroke(&mut self, _: &str, _: f32) {}
    fn present(&mut self, _: f32, _: f32) {
        self.calls += 1;
    }
}

fn engine(profile: WaveProfile) -> WaveEngine {
    let mut e = WaveEngine::with_inline(profile, 42);
    e.resize(1000.0, 600.0);
    e
}

/// Check `samples[first..]` against the bare ambient wave at their own x.
fn assert_ambient(
    samples: &[f32],
    first: usize,
    stride: f32,
    profile: &WaveProfile,
    cy: f32,
    phase: f64,
) {
    assert!(first < samples.len());
    for (j, y) in samples.iter().enumerate().skip(first) {
        let x = j as f32 * stride;
        let angle = (x * profile.global_frequency) as f64 + phase;
        let want = cy + angle.sin() as f32 * profile.global_amplitude;
        assert!((y - want).abs() < 1e-3, "j={j}: {y} vs {want}");
    }
}

#[test]
fn enter_then_move_registers_one_source_near_target() {
    let added = Rc::new(RefCell::new(Vec::new()));
    let spy = Spy {
        inner: InlineBackend::new(WaveProfile::normal()),
        added: added.clone(),
    };
    let mut e = WaveEngine::new(WaveProfile::normal(), Box::new(spy), 1);
    e.resize(1000.0, 600.0);

    e.pointer_enter(100.0, 50.0, 0.0);
    assert_eq!(e.source_count(), 0);
    assert!(e.pointer_move(400.0, 50.0, 8.0));
    assert_eq!(e.source_count(), 1);

    let added = added.borrow();
    assert_eq!(added.len(), 1);
    let (x, y, intensity) = added[0];
    assert!((x - 400.0).abs() < 1e-3);
    assert_eq!(y, 50.0);
    assert!(intensity > 0.0);
}

#[test]
fn samples_outside_a_sources_reach_stay_ambient() {
    let p = WaveProfile::normal();
    let mut e = engine(p);
    e.pointer_enter(100.0, 50.0, 0.0);
    e.pointer_move(400.0, 50.0, 8.0);
    let frame = e.tick(8.0).expect("drawable");
    let (stride, cy) = (frame.stride, frame.dims.center_y);
    let far: Vec<f32> = frame.samples.to_vec();
    let phase = e.phase();
    let first_far = ((400.0 + p.horizontal_influence) / stride).ceil() as usize;
    assert_ambient(&far, first_far, stride, &p, cy, phase);
}

#[test]
fn expired_source_leaves_the_pure_ambient_wave() {
    let p = WaveProfile::normal();
    let mut e = engine(p);
    e.pointer_enter(100.0, 300.0, 0.0);
    // 4 px over a full second: almost no speed, so the shortest linger.
    assert!(e.pointer_move(104.0, 300.0, 1000.0));
    assert_eq!(e.source_count(), 1);
    assert!(e.tick(1000.0).is_some());

    let linger = p.linger_duration(0.001) as f64;
    let now = 1000.0 + linger + 5.0;
    let frame = e.tick(now).expect("drawable");
    let (stride, cy) = (frame.stride, frame.dims.center_y);
    let samples = frame.samples.to_vec();
    assert_eq!(e.source_count(), 0);
    assert_ambient(&samples, 0, stride, &p, cy, e.phase());
}

#[test]
fn reduced_motion_phase_crawls_relative_to_normal() {
    let mut normal = engine(WaveProfile::normal());
    let mut reduced = engine(WaveProfile::reduced_motion());
    for e in [&mut normal, &mut reduced] {
        e.pointer_enter(0.0, 300.0, 0.0);
        for i in 1..=120 {
            let t = i as f64 * 16.0;
            e.pointer_move(i as f32 * 8.0, 300.0, t);
            e.tick(t);
        }
        e.tick(121.0 * 16.0);
    }
    assert!(normal.phase() > 0.0);
    assert!(
        reduced.phase() <= normal.phase() * 0.05,
        "reduced {} vs normal {}",
        reduced.phase(),
        normal.phase()
    );
    assert_eq!(reduced.source_count(), 0);
}

#[test]
fn degenerate_size_skips_the_frame() {
    let mut e = WaveEngine::with_inline(WaveProfile::normal(), 3);
    assert!(e.tick(0.0).is_none());
    e.resize(800.0, 0.0);
    assert!(e.tick(16.0).is_none());
    let mut s = CountingSurface::default();
    assert!(!e.frame(32.0, &mut s));
    assert_eq!(s.calls, 0);
    assert_eq!(e.phase(), 0.0);

    e.resize(800.0, 400.0);
    assert!(e.frame(48.0, &mut s));
    assert!(s.calls > 0);
    assert!(e.phase() > 0.0);
}

#[test]
fn tick_after_resize_uses_new_sample_count() {
    let mut e = engine(WaveProfile::normal());
    assert_eq!(e.tick(0.0).map(|f| f.samples.len()), Some(335));
    e.resize(301.0, 200.0);
    let frame = e.tick(16.0).expect("drawable");
    assert_eq!(frame.samples.len(), 102);
    assert_eq!(frame.dims.width, 301.0);
    assert_eq!(e.sample_count(), 102);
}

#[test]
fn wave_shape_is_randomized_once_on_first_enter() {
    let mut e = engine(WaveProfile::normal());
    assert_eq!(e.shape(), WaveShape::default());
    e.pointer_enter(10.0, 10.0, 0.0);
    let shape = e.shape();
    assert!((SHAPE_FREQ_MIN..SHAPE_FREQ_MIN + SHAPE_FREQ_SPAN).contains(&shape.freq));
    assert!((SHAPE_SPEED_MIN..SHAPE_SPEED_MIN + SHAPE_SPEED_SPAN).contains(&shape.speed));
    assert!((SHAPE_AMP_MIN..SHAPE_AMP_MIN + SHAPE_AMP_SPAN).contains(&shape.amp));
    e.pointer_leave();
    e.pointer_enter(20.0, 20.0, 100.0);
    assert_eq!(e.shape(), shape);

    let mut twin = engine(WaveProfile::normal());
    twin.pointer_enter(0.0, 0.0, 0.0);
    assert_eq!(twin.shape(), shape);
}

#[test]
fn leaving_stops_new_sources() {
    let mut e = engine(WaveProfile::normal());
    e.pointer_enter(0.0, 0.0, 0.0);
    assert!(e.pointer_move(50.0, 0.0, 10.0));
    e.pointer_leave();
    assert!(!e.pointer_move(100.0, 0.0, 20.0));
    assert_eq!(e.source_count(), 1);
}

#[test]
fn reconfigure_swaps_profile_wholesale() {
    let mut e = engine(WaveProfile::normal());
    e.pointer_enter(0.0, 0.0, 0.0);
    e.reconfigure(WaveProfile::reduced_motion());
    assert_eq!(*e.profile(), WaveProfile::reduced_motion());
    assert!(!e.pointer_move(200.0, 0.0, 10.0));
    e.tick(16.0);
    assert!(e.last_phase_increment() <= WaveProfile::reduced_motion().max_phase_increment);
}

#[test]
fn failed_module_load_falls_back_to_inline() {
    let p = WaveProfile::normal();
    let backend = select_backend(Err(WaveError::module_load("404")), p);
    assert_eq!(backend.name(), "inline");
    let e = WaveEngine::new(p, backend, 0);
    assert_eq!(e.backend_name(), "inline");
}

#[test]
fn foreground_updates_stroke_color() {
    let mut e = engine(WaveProfile::normal());
    assert_eq!(e.stroke_color(), FALLBACK_STROKE);
    e.set_foreground("hsl(210 40% 98%)");
    assert_eq!(e.stroke_color(), "hsl(210 40% 98%)");
}
