use crate::models::error::ConversionError;
use crate::models::format::AudioFormat;
use crate::models::window::{CaptureWindow, ConvertedChunk};

/// Converts a raw window into the target format.
///
/// One window in produces one chunk out: implementations keep no state
/// across calls and must not carry partial frames over.
pub trait SampleConverter: Send + Sync {
    /// Convert `window` into `target`, writing at most `frame_capacity` frames.
    fn convert(
        &self,
        window: &CaptureWindow,
        target: &AudioFormat,
        frame_capacity: usize,
    ) -> Result<ConvertedChunk, ConversionError>;
}
