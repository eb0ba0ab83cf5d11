//! The numeric core: superposes the ambient sinusoid with every live source's
//! localized, noise-modulated contribution, one value per sample.

use crate::config::WaveProfile;
use crate::constants::LATTICE_SPACING;
use crate::lut::{FalloffStamp, SineTable};
use crate::noise::LatticeNoise;
use crate::sources::WaveSource;
use crate::state::{Dimensions, WaveShape};
use std::f64::consts::TAU;

/// Per-size scratch and output buffers. Always replaced as a unit so no
/// reader ever sees a mix of old and new lengths.
#[derive(Clone, Debug, Default)]
struct FieldBuffers {
    dims: Dimensions,
    disp: Vec<f32>,
    fall: Vec<f32>,
    y: Vec<f32>,
}

impl FieldBuffers {
    fn new(dims: Dimensions, stride: f32) -> Self {
        let n = dims.sample_count(stride);
        Self {
            dims,
            disp: vec![0.0; n],
            fall: vec![0.0; n],
            y: vec![dims.center_y; n],
        }
    }
}

/// Vertical headroom of a source: largest at the center line, zero at the
/// top and bottom edges.
#[inline]
pub fn vertical_factor(source_y: f32, dims: &Dimensions, dampening: f32) -> f32 {
    if dims.height <= 0.0 {
        return 0.0;
    }
    let dist_y = (source_y - dims.center_y).abs();
    (1.0 - dist_y * 2.0 / dims.height) * dims.center_y * dampening
}

#[derive(Clone, Debug)]
pub struct WaveField {
    stride: f32,
    sine: SineTable,
    stamp: FalloffStamp,
    noise: LatticeNoise,
    buffers: FieldBuffers,
}

impl WaveField {
    pub fn new(profile: &WaveProfile, stride: f32) -> Self {
        Self {
            stride,
            sine: SineTable::new(),
            stamp: FalloffStamp::new(profile.horizontal_influence),
            noise: LatticeNoise::new(),
            buffers: FieldBuffers::default(),
        }
    }

    pub fn configure(&mut self, profile: &WaveProfile) {
        if self.stamp.radius() != profile.horizontal_influence {
            self.stamp = FalloffStamp::new(profile.horizontal_influence);
        }
    }

    pub fn resize(&mut self, dims: Dimensions) {
        self.buffers = FieldBuffers::new(dims, self.stride);
    }

    #[inline]
    pub fn stride(&self) -> f32 {
        self.stride
    }

    #[inline]
    pub fn dims(&self) -> &Dimensions {
        &self.buffers.dims
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.buffers.y.len()
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.buffers.y
    }

    /// Strongest `falloff * strength` seen at each sample in the last compute.
    #[inline]
    pub fn max_falloff(&self) -> &[f32] {
        &self.buffers.fall
    }

    /// Summed source displacement at each sample in the last compute.
    #[inline]
    pub fn displacement(&self) -> &[f32] {
        &self.buffers.disp
    }

    #[inline]
    pub fn noise(&self) -> &LatticeNoise {
        &self.noise
    }

    pub fn compute(
        &mut self,
        sources: &[WaveSource],
        profile: &WaveProfile,
        shape: &WaveShape,
        phase: f64,
    ) -> &[f32] {
        let stride = self.stride;
        let buf = &mut self.buffers;
        let n = buf.y.len();
        if n == 0 {
            return &buf.y;
        }
        buf.disp.fill(0.0);
        buf.fall.fill(0.0);

        let inf = self.stamp.radius();
        // Whole lattice cells stay in `base_cell`; only the remainder and the
        // 2π-reduced angle reach f32 math.
        let shape_phase = phase * shape.speed as f64;
        let spacing = LATTICE_SPACING as f64;
        let cells = (shape_phase / spacing).floor();
        let local = (shape_phase - cells * spacing) as f32;
        let base_cell = cells as i64;
        let shape_angle = shape_phase.rem_euclid(TAU) as f32;
        for s in sources {
            if s.strength <= 0.0 {
                continue;
            }
            let vf = vertical_factor(s.y, &buf.dims, profile.amplitude_dampening);
            let lo = ((s.x - inf) / stride).ceil().max(0.0) as usize;
            let hi = ((s.x + inf) / stride).floor();
            if hi < 0.0 {
                continue;
            }
            let hi = (hi as usize).min(n - 1);
            for j in lo..=hi {
                let x = j as f32 * stride;
                let fo = self.stamp.lookup(x - s.x) * s.strength;
                if fo <= 0.0 {
                    continue;
                }
                let xf = x * shape.freq;
                let ia = self.noise.sample_from(base_cell, xf + local, &self.sine);
                buf.disp[j] += self.sine.sin(xf + shape_angle) * vf * fo * shape.amp * ia;
                if fo > buf.fall[j] {
                    buf.fall[j] = fo;
                }
            }
        }

        let cy = buf.dims.center_y;
        let angle = phase.rem_euclid(TAU) as f32;
        for j in 0..n {
            let x = j as f32 * stride;
            let ambient = self.sine.sin(x * profile.global_frequency + angle)
                * profile.global_amplitude;
            buf.y[j] = cy + ambient * (1.0 - buf.fall[j]) + buf.disp[j];
        }

        if !sources.is_empty() {
            let far = (n - 1) as f32 * stride * shape.freq + local;
            self.noise.prune_outside(
                base_cell + LatticeNoise::cell_of(local),
                base_cell + LatticeNoise::cell_of(far),
            );
        }
        &buf.y
    }
}
