/// Convenience result type used across gophers.
pub type GophersResult<T> = Result<T, GophersError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GophersError {
    /// Invalid user-provided configuration or values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Bitmap assets that could not be read, decoded or rasterized.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while drawing onto a surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors from the cooperative scheduler (stalled run queue, dead worker).
    #[error("schedule error: {0}")]
    Schedule(String),

    /// Errors while writing frames to a sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// The other side of a rendezvous or frame gate has shut down.
    #[error("channel closed: {0}")]
    Closed(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GophersError {
    /// Build a [`GophersError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GophersError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`GophersError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GophersError::Schedule`] value.
    pub fn schedule(msg: impl Into<String>) -> Self {
        Self::Schedule(msg.into())
    }

    /// Build a [`GophersError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`GophersError::Closed`] value.
    pub fn closed(msg: impl Into<String>) -> Self {
        Self::Closed(msg.into())
    }

    /// Whether this error only reports that a peer has shut down.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
