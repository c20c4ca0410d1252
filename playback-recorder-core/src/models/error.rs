use thiserror::Error;

/// Audio-hardware access could not be granted or released.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("audio hardware unavailable")]
    Unavailable,

    #[error("session category conflict: {0}")]
    CategoryConflict(String),

    #[error("activation failed: {0}")]
    ActivationFailed(String),

    #[error("deactivation failed: {0}")]
    DeactivationFailed(String),
}

/// A single window could not be converted to the target format.
///
/// Recovered locally by the capture engine: the window's microphone data is
/// dropped and capture continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("converted {produced} frames into a {capacity}-frame buffer")]
    CapacityExceeded { produced: usize, capacity: usize },

    #[error("conversion failed: {0}")]
    Failed(String),
}

/// Errors reported by an audio graph while wiring or starting it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("graph has no player connected")]
    NotConfigured,

    #[error("tap already installed on mix point")]
    TapAlreadyInstalled,

    #[error("unsupported graph format: {0}")]
    UnsupportedFormat(String),

    #[error("graph failed to start: {0}")]
    StartFailed(String),
}

/// Errors decoding a stored audio asset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("failed to open asset: {0}")]
    Open(String),

    #[error("failed to decode asset: {0}")]
    Decode(String),

    #[error("unsupported asset format: {0}")]
    UnsupportedFormat(String),
}

/// Errors surfaced by `start_recording` / `stop_recording`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    GraphStart(#[from] GraphError),

    #[error("configuration failed: {0}")]
    Configuration(String),
}
