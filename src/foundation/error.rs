/// Convenience result type used across Clipstack.
pub type ClipstackResult<T> = Result<T, ClipstackError>;

/// Top-level error taxonomy used by the compositing core.
#[derive(thiserror::Error, Debug)]
pub enum ClipstackError {
    /// Invalid caller-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while evaluating or compositing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Off-target surface allocation failed; compositing cannot proceed.
    #[error("surface error: {0}")]
    Surface(String),

    /// A media source failed to produce a frame.
    #[error("media error: {0}")]
    Media(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClipstackError {
    /// Build a [`ClipstackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ClipstackError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`ClipstackError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`ClipstackError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
