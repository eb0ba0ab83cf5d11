use crate::config::WaveProfile;

/// Monotonic phase whose rate follows the smoothed pointer speed.
///
/// Accumulated in `f64` so per-frame increments are not lost after days of
/// running. Consumers reduce it before doing `f32` trigonometry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseClock {
    phase: f64,
}

impl PhaseClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock resumed at an earlier `phase`.
    pub fn starting_at(phase: f64) -> Self {
        Self { phase }
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Advance by the increment for `velocity` and return that increment.
    pub fn advance(&mut self, velocity: f32, profile: &WaveProfile) -> f32 {
        let inc = phase_increment(velocity, profile);
        self.phase += inc as f64;
        inc
    }
}

/// `base + (max - base) * clamp(velocity / threshold, 0, 1)`
#[inline]
pub fn phase_increment(velocity: f32, profile: &WaveProfile) -> f32 {
    let ratio = if profile.velocity_threshold > 0.0 {
        (velocity / profile.velocity_threshold).clamp(0.0, 1.0)
    } else {
        0.0
    };
    profile.base_phase_increment
        + (profile.max_phase_increment - profile.base_phase_increment) * ratio
}
