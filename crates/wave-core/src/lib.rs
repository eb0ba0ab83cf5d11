pub mod backend;
pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod field;
pub mod lut;
pub mod noise;
pub mod pointer;
pub mod render;
pub mod sources;
pub mod state;

pub use backend::{select_backend, ComputeBackend, InlineBackend};
pub use clock::{phase_increment, PhaseClock};
pub use config::{MotionPreference, WaveProfile};
pub use engine::{FrameSamples, WaveEngine};
pub use error::{Result, WaveError};
pub use field::WaveField;
pub use pointer::{is_outside_viewport, PointerState, PointerTracker, SourceSpawn};
pub use render::{stroke_from_foreground, PathSurface, RenderPipeline};
pub use sources::{WaveSource, WaveSourceRegistry};
pub use state::{Dimensions, WaveShape};
