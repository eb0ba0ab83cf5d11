//! Compiled compute module.
//!
//! Built as a `cdylib` for `wasm32-unknown-unknown` and instantiated directly
//! by the web front-end. Every export takes and returns plain numbers; the
//! sample buffer stays in this module's linear memory and `compute` hands
//! back its address so the host can view it without a serialization step.
//!
//! Each instantiation owns one engine. The address returned by `compute`
//! stays valid until the next `resize` or `reset`.

use std::cell::RefCell;
use wave_core::{ComputeBackend, InlineBackend, WaveProfile, WaveShape};

thread_local! {
    static BACKEND: RefCell<InlineBackend> = RefCell::new(InlineBackend::new(WaveProfile::normal()));
}

#[inline]
fn with_backend<R>(f: impl FnOnce(&mut InlineBackend) -> R) -> R {
    BACKEND.with(|b| f(&mut b.borrow_mut()))
}

/// Load the tunables the field needs. Phase-clock settings stay on the host.
#[no_mangle]
pub extern "C" fn configure(
    global_frequency: f32,
    global_amplitude: f32,
    horizontal_influence: f32,
    amplitude_dampening: f32,
    linger_velocity_threshold: f32,
    min_linger: f32,
    max_linger: f32,
) {
    let profile = WaveProfile {
        global_frequency,
        global_amplitude,
        horizontal_influence,
        amplitude_dampening,
        linger_velocity_threshold,
        min_linger,
        max_linger,
        ..WaveProfile::normal()
    };
    with_backend(|b| b.configure(&profile));
}

#[no_mangle]
pub extern "C" fn resize(width: f32, height: f32) {
    with_backend(|b| b.resize(width, height));
}

#[no_mangle]
pub extern "C" fn set_wave_shape(freq: f32, speed: f32, amp: f32) {
    with_backend(|b| b.set_wave_shape(WaveShape { freq, speed, amp }));
}

#[no_mangle]
pub extern "C" fn add_source(x: f32, y: f32, t: f64, intensity: f32) {
    with_backend(|b| b.add_source(x, y, t, intensity));
}

/// Recompute and return the address of `get_sample_count()` f32 samples.
#[no_mangle]
pub extern "C" fn compute(now: f64, phase: f64) -> *const f32 {
    with_backend(|b| b.compute(now, phase).as_ptr())
}

#[no_mangle]
pub extern "C" fn get_sample_count() -> u32 {
    with_backend(|b| b.sample_count() as u32)
}

#[no_mangle]
pub extern "C" fn get_stride() -> f32 {
    with_backend(|b| b.stride())
}

#[no_mangle]
pub extern "C" fn get_center_y() -> f32 {
    with_backend(|b| b.center_y())
}

#[no_mangle]
pub extern "C" fn get_source_count() -> u32 {
    with_backend(|b| b.source_count() as u32)
}

/// Drop all sources and buffers, back to the freshly instantiated state.
#[no_mangle]
pub extern "C" fn reset() {
    with_backend(|b| *b = InlineBackend::new(WaveProfile::normal()));
}
