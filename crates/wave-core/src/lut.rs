//! Precomputed tables for the per-frame hot path.

use crate::constants::SINE_LUT_SIZE;
use std::f32::consts::{FRAC_PI_2, TAU};

const SIN_MASK: i64 = SINE_LUT_SIZE as i64 - 1;
const SIN_SCALE: f32 = SINE_LUT_SIZE as f32 / TAU;

/// Linearly interpolated sine table covering one period.
#[derive(Clone, Debug)]
pub struct SineTable {
    // One extra entry so `idx + 1` never wraps.
    table: Box<[f32]>,
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SineTable {
    pub fn new() -> Self {
        let table = (0..=SINE_LUT_SIZE)
            .map(|i| (i as f32 / SINE_LUT_SIZE as f32 * TAU).sin())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { table }
    }

    #[inline(always)]
    pub fn sin(&self, x: f32) -> f32 {
        let pos = x * SIN_SCALE;
        let base = pos.floor();
        let frac = pos - base;
        let idx = (base as i64 & SIN_MASK) as usize;
        let a = self.table[idx];
        let b = self.table[idx + 1];
        a + (b - a) * frac
    }

    #[inline(always)]
    pub fn cos(&self, x: f32) -> f32 {
        self.sin(x + FRAC_PI_2)
    }
}

/// Cubic Hermite ease `t²(3 - 2t)` on a normalized closeness `t`, zero for
/// `t <= 0`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        t * t * (3.0 - 2.0 * t)
    }
}

/// Smoothstep falloff sampled once per pixel of horizontal distance.
///
/// `lookup(d)` is 1 at `d = 0`, strictly decreasing on `[0, radius)` and
/// exactly 0 from `radius` on.
#[derive(Clone, Debug, Default)]
pub struct FalloffStamp {
    table: Box<[f32]>,
    radius: f32,
}

impl FalloffStamp {
    pub fn new(radius: f32) -> Self {
        if radius <= 0.0 {
            return Self::default();
        }
        // Nodes at whole distances inside the radius; the final segment ends
        // at `radius` itself, which need not be whole.
        let len = radius.floor() as usize + 1;
        let inv = 1.0 / radius;
        let table = (0..len)
            .map(|i| smoothstep(1.0 - i as f32 * inv))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { table, radius }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline(always)]
    pub fn lookup(&self, dist: f32) -> f32 {
        let d = dist.abs();
        if d >= self.radius {
            return 0.0;
        }
        let base = d.floor();
        let idx = base as usize;
        let frac = d - base;
        match (self.table.get(idx), self.table.get(idx + 1)) {
            (Some(&a), Some(&b)) => a + (b - a) * frac,
            (Some(&a), None) => a * (1.0 - frac / (self.radius - base)),
            _ => 0.0,
        }
    }
}
