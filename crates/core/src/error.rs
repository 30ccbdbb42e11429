/// Result alias that carries the custom [`PulseVizError`] type.
pub type Result<T> = std::result::Result<T, PulseVizError>;

/// Common error type for the core crate.
///
/// All three conditions are recoverable by design: the renderer facade skips
/// malformed frames, clamps invalid configuration values and treats failed
/// color resolution as "no album color". The variants exist so the inner
/// layers can report the condition with `?` and tests can assert on it.
#[derive(Debug, thiserror::Error)]
pub enum PulseVizError {
    /// The FFT frame is shorter than the configured unit count requires.
    #[error("frame of {actual} bytes is too short for {units} units ({required} bytes required)")]
    MalformedFrame {
        units: usize,
        required: usize,
        actual: usize,
    },
    /// A configuration value is outside its usable range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Album art color ingestion could not produce a usable color.
    #[error("color resolution failed: {0}")]
    ColorResolution(&'static str),
}

impl PulseVizError {
    /// Creates an [`PulseVizError::InvalidConfiguration`] from any message.
    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
