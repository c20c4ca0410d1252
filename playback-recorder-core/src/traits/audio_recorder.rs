use std::sync::Arc;

use crate::models::error::RecorderError;
use crate::models::format::StreamDescription;

/// Callback receiving one converted chunk of target-format bytes.
///
/// Fires synchronously on the real-time audio thread: no blocking I/O, no
/// unbounded allocation, and never call back into `stop_recording`.
pub type MicrophoneDataCallback = Arc<dyn Fn(Vec<u8>) + Send + Sync + 'static>;

/// Callback receiving one power sample in decibels (-100 for silence).
///
/// Fires on a non-real-time delivery thread.
pub type PowerDataCallback = Arc<dyn Fn(f32) + Send + Sync + 'static>;

/// Anything that produces microphone-shaped data and reports its power.
///
/// Consumers depend on this trait only, so a replaying recorder and a live
/// microphone recorder are interchangeable.
pub trait AudioRecorder: Send {
    /// Replace the microphone-data slot. Takes effect from the next window.
    fn set_on_microphone_data(&self, callback: Option<MicrophoneDataCallback>);

    /// Replace the power slot. Takes effect from the next delivered sample.
    fn set_on_power_data(&self, callback: Option<PowerDataCallback>);

    /// Whether the recorder is between a successful start and its stop.
    fn is_recording(&self) -> bool;

    /// Structural description of the delivered microphone data.
    fn format(&self) -> StreamDescription;

    /// Start streaming. No-op when already recording or nothing can be played.
    fn start_recording(&mut self) -> Result<(), RecorderError>;

    /// Stop streaming. Returns only once no further callback can fire.
    fn stop_recording(&mut self) -> Result<(), RecorderError>;
}
