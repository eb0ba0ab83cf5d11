//! Named tuning profiles.
//!
//! Exactly two profiles exist. The accessibility preference that picks one
//! is owned outside this crate; the engine only receives the selected record
//! and swaps it in wholesale.

/// Immutable set of tunables for the wave field and phase clock.
///
/// Lengths are CSS pixels, times are milliseconds, velocities are px/ms.
/// Values are trusted as given.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveProfile {
    pub global_frequency: f32,
    pub global_amplitude: f32,
    /// Half-width of a source's footprint along x.
    pub horizontal_influence: f32,
    pub amplitude_dampening: f32,
    pub line_width: f32,
    /// Pointer speed at which a source lingers for `max_linger`.
    pub linger_velocity_threshold: f32,
    pub min_linger: f32,
    pub max_linger: f32,
    /// Pointer speed at which the phase advances by `max_phase_increment`.
    pub velocity_threshold: f32,
    pub base_phase_increment: f32,
    pub max_phase_increment: f32,
    pub velocity_decay_factor: f32,
    /// Whether pointer movement spawns sources and feeds the velocity.
    pub interactive: bool,
}

impl WaveProfile {
    pub const fn normal() -> Self {
        Self {
            global_frequency: 0.02,
            global_amplitude: 5.0,
            horizontal_influence: 420.0,
            amplitude_dampening: 0.069,
            line_width: 1.5,
            linger_velocity_threshold: 1.0,
            min_linger: 600.0,
            max_linger: 2200.0,
            velocity_threshold: 2.0,
            base_phase_increment: 0.02,
            max_phase_increment: 0.08,
            velocity_decay_factor: 0.95,
            interactive: true,
        }
    }

    /// Nearly static field: the phase barely moves and the pointer is ignored.
    pub const fn reduced_motion() -> Self {
        Self {
            global_frequency: 0.02,
            global_amplitude: 3.0,
            horizontal_influence: 420.0,
            amplitude_dampening: 0.03,
            line_width: 1.5,
            linger_velocity_threshold: 1.0,
            min_linger: 600.0,
            max_linger: 1200.0,
            velocity_threshold: 2.0,
            base_phase_increment: 0.0005,
            max_phase_increment: 0.0008,
            velocity_decay_factor: 0.9,
            interactive: false,
        }
    }

    /// Time-to-live of a source created at the given pointer speed.
    #[inline]
    pub fn linger_duration(&self, intensity: f32) -> f32 {
        let ratio = if self.linger_velocity_threshold > 0.0 {
            (intensity / self.linger_velocity_threshold).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.min_linger + (self.max_linger - self.min_linger) * ratio
    }
}

impl Default for WaveProfile {
    fn default() -> Self {
        Self::normal()
    }
}

/// Profile selector handed in by the preference collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

impl MotionPreference {
    pub fn from_reduced(reduced: bool) -> Self {
        if reduced {
            Self::Reduced
        } else {
            Self::Full
        }
    }

    pub fn profile(self) -> WaveProfile {
        match self {
            Self::Full => WaveProfile::normal(),
            Self::Reduced => WaveProfile::reduced_motion(),
        }
    }
}
