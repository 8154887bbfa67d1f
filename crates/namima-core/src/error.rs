use thiserror::Error;

/// Failures the engine can surface. All of them are locally recoverable:
/// the engine stays in its last good state and the caller may retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The output device or audio context could not be started. Retry only
    /// on a fresh user gesture.
    #[error("audio output unavailable: {0}")]
    AudioUnavailable(String),
    /// A single node or voice could not be created; the trigger is dropped.
    #[error("audio node unavailable: {0}")]
    NodeUnavailable(String),
    #[error("invalid field bounds {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
