use crate::models::config::{SessionCategory, SessionOptions};
use crate::models::error::SessionError;

/// Platform grant of audio-hardware access.
///
/// Implemented by host backends (`ProcessAudioSession`) and wrapped by
/// `AudioSessionGate`, which owns the pairing rules.
pub trait AudioSessionBackend: Send + Sync {
    /// Request a category and its routing options.
    fn set_category(
        &self,
        category: SessionCategory,
        options: SessionOptions,
    ) -> Result<(), SessionError>;

    /// Activate or release the session. On release, `notify_others` tells
    /// other audio clients they may resume.
    fn set_active(&self, active: bool, notify_others: bool) -> Result<(), SessionError>;
}
