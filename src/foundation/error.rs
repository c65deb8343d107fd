/// Convenience result type used across promoreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A scene window with an empty, reversed or out-of-range `[start, end)` span.
    #[error("invalid window for scene '{scene}': [{start}, {end})")]
    InvalidWindow {
        /// Scene the window belongs to.
        scene: String,
        /// Window start as a fraction of total duration.
        start: f64,
        /// Window end as a fraction of total duration.
        end: f64,
    },

    /// A capture session is already recording or finalizing.
    #[error("a capture session is already recording")]
    AlreadyRecording,

    /// No container/codec combination is supported by the recorder.
    #[error("no supported encoder/container is available")]
    NoEncoderAvailable,

    /// Errors raised by a raster surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors raised by a recorder backend.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
