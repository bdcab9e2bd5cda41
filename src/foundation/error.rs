/// Crate-wide result alias.
pub type FlipbookResult<T> = Result<T, FlipbookError>;

/// Error type shared by every export operation.
///
/// Contract violations (`InvalidFrame`, `DimensionMismatch`, `EmptySequence`) are raised before
/// any artifact is created; codec and IO failures remove the partial artifact before surfacing.
#[derive(thiserror::Error, Debug)]
pub enum FlipbookError {
    /// A frame buffer is malformed: zero area or byte length not matching its dimensions.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Frames in one assembly do not share identical dimensions.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// An animation was requested from zero frames (before or after decimation).
    #[error("empty sequence: {0}")]
    EmptySequence(String),

    /// An `ExportConfig` value is out of range, or the config does not match the operation.
    #[error("config error: {0}")]
    Config(String),

    /// A codec failed while producing the artifact.
    #[error("encode error: {0}")]
    Encode(String),

    /// Filesystem failure on the destination path.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Context-wrapped errors from collaborators.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipbookError {
    /// Build an [`FlipbookError::InvalidFrame`].
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    /// Build an [`FlipbookError::DimensionMismatch`].
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Build an [`FlipbookError::EmptySequence`].
    pub fn empty_sequence(msg: impl Into<String>) -> Self {
        Self::EmptySequence(msg.into())
    }

    /// Build an [`FlipbookError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`FlipbookError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
