//! # playback-recorder-core
//!
//! Platform-agnostic core of a recorder that replays a stored audio asset as
//! if it were a live microphone feed.
//!
//! Each fixed-size window pulled from the audio graph is measured (RMS power
//! in decibels, delivered off the real-time thread) and converted to
//! 16 kHz / mono / 16-bit interleaved PCM (delivered on the real-time
//! thread). Host backends implement `AudioGraph`, `AudioSessionBackend` and
//! `AudioFileReader` and plug into the generic `PlayingAudioRecorder`.
//!
//! ## Architecture
//!
//! ```text
//! playback-recorder-core (this crate)
//! ├── traits/       ← AudioRecorder, AudioGraph, AudioSessionBackend, SampleConverter, PowerMeter, AudioFileReader
//! ├── models/       ← AudioFormat, CaptureWindow, ConvertedChunk, states, configuration, errors
//! ├── processing/   ← LinearSampleConverter, RmsPowerMeter, PowerDispatcher
//! ├── session/      ← AudioSessionGate, SessionLease
//! ├── engine/       ← CaptureEngine (tap wiring + state machine)
//! └── recorder/     ← PlayingAudioRecorder
//! ```

pub mod engine;
pub mod models;
pub mod processing;
pub mod recorder;
pub mod session;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root for convenience.
pub use engine::capture::CaptureEngine;
pub use models::config::{RecorderConfiguration, SessionCategory, SessionOptions};
pub use models::diagnostics::CaptureDiagnostics;
pub use models::error::{AssetError, ConversionError, GraphError, RecorderError, SessionError};
pub use models::format::{AudioFormat, SampleFormat, StreamDescription, DEFAULT_WINDOW_DURATION_SECS};
pub use models::state::{RecorderState, SessionState};
pub use models::window::{CaptureWindow, ConvertedChunk, DecodedAsset, WindowSamples};
pub use processing::converter::LinearSampleConverter;
pub use processing::power::{level_to_db, RmsPowerMeter, SILENCE_FLOOR_DB};
pub use recorder::playing::PlayingAudioRecorder;
pub use session::gate::{AudioSessionGate, SessionLease};
pub use traits::audio_graph::{AudioGraph, TapCallback};
pub use traits::audio_recorder::{AudioRecorder, MicrophoneDataCallback, PowerDataCallback};
pub use traits::audio_session::AudioSessionBackend;
pub use traits::file_reader::AudioFileReader;
pub use traits::power_meter::PowerMeter;
pub use traits::sample_converter::SampleConverter;
