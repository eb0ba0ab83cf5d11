use crate::constants::{POINTER_DEBOUNCE_SQ, VELOCITY_EMA_WEIGHT};
use glam::Vec2;

/// Last observed pointer sample plus the smoothed speed derived from it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub last: Vec2,
    pub last_timestamp: f64,
    /// Exponential moving average of pointer speed in px/ms.
    pub smoothed_velocity: f32,
    pub active: bool,
}

/// A qualifying move: where a new wave source should be spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceSpawn {
    pub x: f32,
    pub y: f32,
    pub t: f64,
    pub intensity: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    state: PointerState,
    activated_once: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &PointerState {
        &self.state
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.state.smoothed_velocity
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Pointer entered the viewport. Re-anchors position and zeroes velocity so
    /// stale coordinates cannot produce a speed spike. Returns `true` on the
    /// first activation of this tracker's lifetime.
    pub fn enter(&mut self, x: f32, y: f32, t: f64) -> bool {
        let first = !self.activated_once;
        self.activated_once = true;
        self.state.active = true;
        self.state.last = Vec2::new(x, y);
        self.state.last_timestamp = t;
        self.state.smoothed_velocity = 0.0;
        first
    }

    /// Feed a raw pointer sample. Returns a spawn request for qualifying moves.
    pub fn move_to(&mut self, x: f32, y: f32, t: f64) -> Option<SourceSpawn> {
        if !self.state.active {
            return None;
        }
        let pos = Vec2::new(x, y);
        let dist_sq = pos.distance_squared(self.state.last);
        if dist_sq < POINTER_DEBOUNCE_SQ {
            return None;
        }
        let dt = t - self.state.last_timestamp;
        if dt > 0.0 {
            let inst = dist_sq.sqrt() / dt as f32;
            self.state.smoothed_velocity = VELOCITY_EMA_WEIGHT * inst
                + (1.0 - VELOCITY_EMA_WEIGHT) * self.state.smoothed_velocity;
        }
        self.state.last = pos;
        self.state.last_timestamp = t;
        Some(SourceSpawn {
            x,
            y,
            t,
            intensity: self.state.smoothed_velocity,
        })
    }

    /// Pointer left the viewport. Existing sources keep decaying on their own.
    pub fn leave(&mut self) {
        self.state.active = false;
    }

    /// Per-frame settling of the smoothed speed.
    #[inline]
    pub fn decay_velocity(&mut self, factor: f32) {
        self.state.smoothed_velocity *= factor;
    }
}

/// Document-level leave events fire when crossing child elements too; only
/// coordinates at or past the viewport edge count as really leaving.
#[inline]
pub fn is_outside_viewport(client_x: f32, client_y: f32, view_w: f32, view_h: f32) -> bool {
    client_x <= 0.0 || client_y <= 0.0 || client_x >= view_w || client_y >= view_h
}
