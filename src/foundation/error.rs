/// Convenience result type used across starlit.
pub type StarlitResult<T> = Result<T, StarlitError>;

/// Top-level error taxonomy.
///
/// Every variant is locally recoverable: callers degrade (empty population, no renderer,
/// halted draw loop) and log, they never retry.
#[derive(thiserror::Error, Debug)]
pub enum StarlitError {
    /// Invalid configuration or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Zero, negative, or non-finite viewport geometry.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Drawing surface is missing, lost, or cannot be sized.
    #[error("surface error: {0}")]
    Surface(String),

    /// A draw call failed inside a frame.
    #[error("draw error: {0}")]
    Draw(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StarlitError {
    /// Build a [`StarlitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StarlitError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`StarlitError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`StarlitError::Draw`] value.
    pub fn draw(msg: impl Into<String>) -> Self {
        Self::Draw(msg.into())
    }

    /// Build a [`StarlitError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
