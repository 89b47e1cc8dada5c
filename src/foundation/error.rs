/// Convenience result type used across tilewall.
pub type TilewallResult<T> = Result<T, TilewallError>;

/// Top-level error taxonomy used by library APIs.
///
/// `Decode` and `InvalidStep` are recoverable inside the library: the compositor treats a failed
/// tile as absent and the animation drivers skip a malformed step. They still surface through this
/// type so callers that decode or validate directly can react to them.
#[derive(thiserror::Error, Debug)]
pub enum TilewallError {
    /// Invalid user-provided configuration or session edits.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image source could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// An animation step carries non-numeric progress data.
    #[error("invalid animation step: {0}")]
    InvalidStep(String),

    /// Frame encoding or output writing failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TilewallError {
    /// Build a [`TilewallError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TilewallError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TilewallError::InvalidStep`] value.
    pub fn invalid_step(msg: impl Into<String>) -> Self {
        Self::InvalidStep(msg.into())
    }

    /// Build a [`TilewallError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TilewallError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
