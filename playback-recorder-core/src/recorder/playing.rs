use std::sync::Arc;

use crate::engine::capture::CaptureEngine;
use crate::models::config::RecorderConfiguration;
use crate::models::diagnostics::CaptureDiagnostics;
use crate::models::error::RecorderError;
use crate::models::format::{AudioFormat, StreamDescription};
use crate::models::state::RecorderState;
use crate::models::window::DecodedAsset;
use crate::session::gate::AudioSessionGate;
use crate::traits::audio_graph::AudioGraph;
use crate::traits::audio_recorder::{AudioRecorder, MicrophoneDataCallback, PowerDataCallback};
use crate::traits::audio_session::AudioSessionBackend;
use crate::traits::power_meter::PowerMeter;
use crate::traits::sample_converter::SampleConverter;

/// Recorder that replays a pre-recorded asset as if it were a live
/// microphone feed.
///
/// Without a decodable asset the recorder is inert: `start_recording`
/// succeeds without doing anything.
pub struct PlayingAudioRecorder<G: AudioGraph, B: AudioSessionBackend> {
    asset: Option<Arc<DecodedAsset>>,
    target: AudioFormat,
    engine: CaptureEngine<G, B>,
}

impl<G: AudioGraph, B: AudioSessionBackend> PlayingAudioRecorder<G, B> {
    /// Build a recorder and probe the audio session once.
    ///
    /// A failing probe is logged, not returned: the same error resurfaces
    /// from `start_recording`.
    pub fn new(
        asset: Option<DecodedAsset>,
        graph: G,
        session: B,
        config: RecorderConfiguration,
    ) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::Configuration)?;

        let gate = Arc::new(AudioSessionGate::new(
            session,
            config.session_category,
            config.session_options,
        ));
        if let Err(e) = gate.probe() {
            log::warn!("audio session probe failed: {}", e);
        }

        if asset.is_none() {
            log::info!("no playable asset; recorder will not start");
        }

        Ok(Self {
            asset: asset.map(Arc::new),
            target: config.target_format,
            engine: CaptureEngine::new(graph, gate, &config),
        })
    }

    /// Replace the sample converter. Applies from the next start.
    pub fn with_converter(mut self, converter: Arc<dyn SampleConverter>) -> Self {
        self.engine.set_converter(converter);
        self
    }

    /// Replace the power meter. Applies from the next start.
    pub fn with_power_meter(mut self, meter: Arc<dyn PowerMeter>) -> Self {
        self.engine.set_power_meter(meter);
        self
    }

    pub fn state(&self) -> RecorderState {
        self.engine.state()
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.engine.diagnostics()
    }

    pub fn session_gate(&self) -> &Arc<AudioSessionGate<B>> {
        self.engine.gate()
    }
}

impl<G: AudioGraph, B: AudioSessionBackend> AudioRecorder for PlayingAudioRecorder<G, B> {
    fn set_on_microphone_data(&self, callback: Option<MicrophoneDataCallback>) {
        *self.engine.microphone_slot().write() = callback;
    }

    fn set_on_power_data(&self, callback: Option<PowerDataCallback>) {
        *self.engine.power_slot().write() = callback;
    }

    fn is_recording(&self) -> bool {
        self.engine.state().is_active()
    }

    fn format(&self) -> StreamDescription {
        self.target.stream_description()
    }

    fn start_recording(&mut self) -> Result<(), RecorderError> {
        let Some(asset) = self.asset.as_ref() else {
            return Ok(());
        };
        self.engine.start(Arc::clone(asset))
    }

    fn stop_recording(&mut self) -> Result<(), RecorderError> {
        self.engine.stop();
        Ok(())
    }
}
