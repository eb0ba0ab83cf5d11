//! Bounded set of decaying wave sources spawned by pointer movement.

use crate::config::WaveProfile;
use crate::constants::SOURCE_CAPACITY;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSource {
    pub x: f32,
    pub y: f32,
    pub created_at: f64,
    /// Smoothed pointer speed when the source was spawned.
    pub initial_intensity: f32,
    /// Current weight in [0, 1]; only ever decreases.
    pub strength: f32,
}

/// Fixed-capacity registry. When full, `add` overwrites the oldest source:
/// recent motion wins over old motion.
#[derive(Clone, Debug)]
pub struct WaveSourceRegistry {
    sources: SmallVec<[WaveSource; SOURCE_CAPACITY]>,
    capacity: usize,
}

impl Default for WaveSourceRegistry {
    fn default() -> Self {
        Self::with_capacity(SOURCE_CAPACITY)
    }
}

impl WaveSourceRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sources: SmallVec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn as_slice(&self) -> &[WaveSource] {
        &self.sources
    }

    pub fn add(&mut self, x: f32, y: f32, t: f64, intensity: f32) {
        let source = WaveSource {
            x,
            y,
            created_at: t,
            initial_intensity: intensity,
            strength: 1.0,
        };
        if self.sources.len() < self.capacity {
            self.sources.push(source);
            return;
        }
        // Order is scrambled by swap-removal, so find the oldest by timestamp.
        let mut oldest = 0;
        for (i, s) in self.sources.iter().enumerate().skip(1) {
            if s.created_at < self.sources[oldest].created_at {
                oldest = i;
            }
        }
        self.sources[oldest] = source;
    }

    /// Decay every source and drop the expired ones.
    pub fn tick(&mut self, now: f64, profile: &WaveProfile) {
        let mut i = 0;
        while i < self.sources.len() {
            let s = &mut self.sources[i];
            let linger = profile.linger_duration(s.initial_intensity) as f64;
            let age = (now - s.created_at).max(0.0);
            if linger <= 0.0 || age >= linger {
                self.sources.swap_remove(i);
                continue;
            }
            let inv = (1.0 - age / linger) as f32;
            s.strength = (inv * inv).min(s.strength).clamp(0.0, 1.0);
            i += 1;
        }
    }
}
