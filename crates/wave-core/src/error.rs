/// Result alias carrying [`WaveError`].
pub type Result<T> = std::result::Result<T, WaveError>;

/// Errors surfaced while selecting or driving a compute backend.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    /// The compiled module could not be fetched or instantiated.
    #[error("compute module failed to load: {0}")]
    ModuleLoad(String),
    /// The module instantiated but lacks a required export.
    #[error("compute module is missing export `{0}`")]
    MissingExport(&'static str),
    /// An export returned something other than the expected number.
    #[error("compute module export `{export}` returned an invalid value")]
    BadReturn { export: &'static str },
    /// Width or height is zero; the frame is skipped.
    #[error("surface has degenerate size {width}x{height}")]
    DegenerateSurface { width: f32, height: f32 },
}

impl WaveError {
    pub fn module_load<T: Into<String>>(msg: T) -> Self {
        Self::ModuleLoad(msg.into())
    }
}
