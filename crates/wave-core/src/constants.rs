// Fixed tuning constants shared by the in-process backend, the compiled
// module and the web front-end. Profile-dependent values live in `config.rs`.

// Sampling
pub const SAMPLE_STRIDE: f32 = 3.0; // px between consecutive samples
pub const SAMPLE_PADDING: usize = 1; // extra sample so the line reaches the right edge

// Source registry
pub const SOURCE_CAPACITY: usize = 25;

// Pointer tracking
pub const POINTER_DEBOUNCE_SQ: f32 = 9.0; // px², moves closer than 3 px are ignored
pub const VELOCITY_EMA_WEIGHT: f32 = 0.2; // new = w*inst + (1-w)*old

// Lookup tables
pub const SINE_LUT_SIZE: usize = 4096;
pub const LATTICE_SPACING: f32 = std::f32::consts::PI;
pub const NOISE_MIN: f32 = 0.4;
pub const NOISE_SPAN: f32 = 0.6;
// Lattice cache is pruned once it grows past this many entries, keeping only
// cells within `NOISE_KEEP_CELLS` of the live phase window.
pub const NOISE_CACHE_SOFT_LIMIT: usize = 4096;
pub const NOISE_KEEP_CELLS: i64 = 64;

// Per-session wave shape ranges: [min, min + span)
pub const SHAPE_FREQ_MIN: f32 = 0.02;
pub const SHAPE_FREQ_SPAN: f32 = 0.05;
pub const SHAPE_SPEED_MIN: f32 = 0.5;
pub const SHAPE_SPEED_SPAN: f32 = 0.4;
pub const SHAPE_AMP_MIN: f32 = 0.1;
pub const SHAPE_AMP_SPAN: f32 = 0.2;

// Shape used before the first pointer activation randomizes it
pub const DEFAULT_SHAPE_FREQ: f32 = 0.04;
pub const DEFAULT_SHAPE_SPEED: f32 = 0.7;
pub const DEFAULT_SHAPE_AMP: f32 = 0.2;

// Surface
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;
pub const FALLBACK_STROKE: &str = "hsl(0 0% 0%)";
