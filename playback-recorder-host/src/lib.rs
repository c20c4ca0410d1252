//! # playback-recorder-host
//!
//! Portable host backend for `playback-recorder-core`.
//!
//! - `WavFileReader` decodes the stored asset with `hound`.
//! - `ThreadedPlaybackGraph` renders it on an `asset-playback` thread and
//!   feeds the capture tap.
//! - `ProcessAudioSession` arbitrates audio-hardware access in-process.
//!
//! `open_recorder` wires all three into a ready-to-use `PlayingAudioRecorder`.

pub mod playback_graph;
pub mod process_session;
pub mod wav_reader;

use std::path::Path;

use playback_recorder_core::models::config::RecorderConfiguration;
use playback_recorder_core::models::error::RecorderError;
use playback_recorder_core::recorder::playing::PlayingAudioRecorder;
use playback_recorder_core::traits::file_reader::AudioFileReader;

pub use playback_graph::ThreadedPlaybackGraph;
pub use process_session::ProcessAudioSession;
pub use wav_reader::WavFileReader;

/// Recorder replaying a WAV file through the host backend.
pub type HostRecorder = PlayingAudioRecorder<ThreadedPlaybackGraph, ProcessAudioSession>;

/// Build a recorder replaying the WAV file at `path` as microphone input.
///
/// An asset that cannot be read is logged and yields a recorder whose
/// `start_recording` does nothing. Configuration errors are returned.
pub fn open_recorder(
    path: impl AsRef<Path>,
    config: RecorderConfiguration,
) -> Result<HostRecorder, RecorderError> {
    open_recorder_with_session(path, config, ProcessAudioSession::shared())
}

/// Like [`open_recorder`], joining the given session instead of the
/// process-wide one.
pub fn open_recorder_with_session(
    path: impl AsRef<Path>,
    config: RecorderConfiguration,
    session: ProcessAudioSession,
) -> Result<HostRecorder, RecorderError> {
    let path = path.as_ref();
    let asset = match WavFileReader.read(path) {
        Ok(asset) => Some(asset),
        Err(e) => {
            log::warn!("cannot load playback asset {}: {}", path.display(), e);
            None
        }
    };
    let graph = ThreadedPlaybackGraph::new(config.realtime_pacing);
    PlayingAudioRecorder::new(asset, graph, session, config)
}
