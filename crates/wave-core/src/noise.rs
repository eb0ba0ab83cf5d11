//! Lattice value noise used to break up the per-source sinusoid.

use crate::constants::*;
use crate::lut::SineTable;
use fnv::FnvHashMap;

/// Deterministic amplitude in `[NOISE_MIN, NOISE_MIN + NOISE_SPAN)` for a
/// lattice index.
pub fn lattice_value(n: i64) -> f32 {
    let f = n as f64;
    let h = (f * 12.9898 + f).sin().abs() * 43758.5453;
    NOISE_MIN + (h - h.floor()) as f32 * NOISE_SPAN
}

/// Memoized lattice amplitudes keyed by lattice index.
#[derive(Clone, Debug, Default)]
pub struct LatticeNoise {
    cache: FnvHashMap<i64, f32>,
}

impl LatticeNoise {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    pub fn amplitude(&mut self, n: i64) -> f32 {
        *self.cache.entry(n).or_insert_with(|| lattice_value(n))
    }

    /// Interpolated amplitude at `wave_phase`. The two lattice nodes bracketing
    /// the phase are blended with a cosine-smoothed fraction.
    #[inline]
    pub fn sample(&mut self, wave_phase: f32, trig: &SineTable) -> f32 {
        self.sample_from(0, wave_phase, trig)
    }

    /// Like [`sample`](Self::sample) for the phase `base_cell * LATTICE_SPACING
    /// + local`, so a large phase keeps exact cell indices.
    #[inline]
    pub fn sample_from(&mut self, base_cell: i64, local: f32, trig: &SineTable) -> f32 {
        let pos = local / LATTICE_SPACING;
        let cell = pos.floor();
        let frac = pos - cell;
        let n = base_cell + cell as i64;
        let a1 = self.amplitude(n);
        let a2 = self.amplitude(n + 1);
        let sf = (1.0 - trig.cos(frac * std::f32::consts::PI)) * 0.5;
        a1 + (a2 - a1) * sf
    }

    /// Lattice cell containing `wave_phase`.
    #[inline]
    pub fn cell_of(wave_phase: f32) -> i64 {
        (wave_phase / LATTICE_SPACING).floor() as i64
    }

    /// Drop cached cells far outside `[lo, hi]` once the cache is large.
    pub fn prune_outside(&mut self, lo: i64, hi: i64) {
        if self.cache.len() <= NOISE_CACHE_SOFT_LIMIT {
            return;
        }
        let (lo, hi) = (lo.min(hi) - NOISE_KEEP_CELLS, lo.max(hi) + NOISE_KEEP_CELLS);
        let before = self.cache.len();
        self.cache.retain(|&k, _| k >= lo && k <= hi);
        log::debug!(
            "[noise] pruned {} lattice cells, {} kept",
            before - self.cache.len(),
            self.cache.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_values_stay_in_range_and_repeat() {
        for n in -500..500 {
            let v = lattice_value(n);
            assert!((NOISE_MIN..NOISE_MIN + NOISE_SPAN).contains(&v), "n={n} v={v}");
            assert_eq!(v, lattice_value(n));
        }
    }

    #[test]
    fn sample_hits_node_values_on_lattice_points() {
        let trig = SineTable::new();
        let mut noise = LatticeNoise::new();
        let at_node = noise.sample(3.0 * LATTICE_SPACING + 1e-4, &trig);
        assert!((at_node - lattice_value(3)).abs() < 1e-3);
    }

    #[test]
    fn sample_from_offsets_by_whole_cells() {
        let trig = SineTable::new();
        let mut noise = LatticeNoise::new();
        let far = 1_000_000_007i64;
        for local in [0.1f32, 1.7, 2.9, 4.4] {
            let shifted = noise.sample_from(far, local, &trig);
            let k = LatticeNoise::cell_of(local);
            let frac = local / LATTICE_SPACING - k as f32;
            let (a1, a2) = (lattice_value(far + k), lattice_value(far + k + 1));
            let sf = (1.0 - (frac * std::f32::consts::PI).cos()) * 0.5;
            assert!((shifted - (a1 + (a2 - a1) * sf)).abs() < 1e-3, "local={local}");
        }
    }

    #[test]
    fn prune_keeps_window_and_bounds_cache() {
        let mut noise = LatticeNoise::new();
        for n in 0..(NOISE_CACHE_SOFT_LIMIT as i64 + 100) {
            noise.amplitude(n);
        }
        noise.prune_outside(1000, 1010);
        assert!(noise.cached_len() <= (10 + 2 * NOISE_KEEP_CELLS + 1) as usize);
        assert!(noise.cache.contains_key(&1005));
    }
}
