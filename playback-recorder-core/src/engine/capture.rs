use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::config::RecorderConfiguration;
use crate::models::diagnostics::{CaptureDiagnostics, DiagnosticCounters};
use crate::models::error::{GraphError, RecorderError};
use crate::models::format::AudioFormat;
use crate::models::state::RecorderState;
use crate::models::window::{CaptureWindow, DecodedAsset};
use crate::processing::converter::LinearSampleConverter;
use crate::processing::dispatch::{PowerDispatcher, PowerSender, PowerSlot};
use crate::processing::power::{self, RmsPowerMeter};
use crate::session::gate::{AudioSessionGate, SessionLease};
use crate::traits::audio_graph::{AudioGraph, TapCallback};
use crate::traits::audio_recorder::MicrophoneDataCallback;
use crate::traits::audio_session::AudioSessionBackend;
use crate::traits::power_meter::PowerMeter;
use crate::traits::sample_converter::SampleConverter;

/// Shared, replaceable microphone-data callback slot.
pub type MicrophoneSlot = Arc<RwLock<Option<MicrophoneDataCallback>>>;

/// Drives the audio graph for one capture window at a time.
///
/// ```text
/// [asset player] → [mix point: native rate, mono] ──tap──┬→ PowerMeter → dB → PowerDispatcher → on_power_data
///                                                        └→ SampleConverter → ConvertedChunk → on_microphone_data
/// ```
///
/// The session lease, power delivery thread and tap exist only while the
/// engine is `Active`; every exit path tears all three down.
pub struct CaptureEngine<G: AudioGraph, B: AudioSessionBackend> {
    graph: G,
    gate: Arc<AudioSessionGate<B>>,
    converter: Arc<dyn SampleConverter>,
    meter: Arc<dyn PowerMeter>,
    target: AudioFormat,
    window_duration_secs: f64,
    frame_capacity: usize,
    microphone_slot: MicrophoneSlot,
    power_slot: PowerSlot,
    counters: Arc<DiagnosticCounters>,
    state: RecorderState,
    lease: Option<SessionLease<B>>,
    dispatcher: Option<PowerDispatcher>,
}

impl<G: AudioGraph, B: AudioSessionBackend> CaptureEngine<G, B> {
    pub fn new(graph: G, gate: Arc<AudioSessionGate<B>>, config: &RecorderConfiguration) -> Self {
        Self {
            graph,
            gate,
            converter: Arc::new(LinearSampleConverter),
            meter: Arc::new(RmsPowerMeter),
            target: config.target_format,
            window_duration_secs: config.window_duration_secs,
            frame_capacity: config.frame_capacity(),
            microphone_slot: Arc::new(RwLock::new(None)),
            power_slot: Arc::new(RwLock::new(None)),
            counters: Arc::new(DiagnosticCounters::default()),
            state: RecorderState::Idle,
            lease: None,
            dispatcher: None,
        }
    }

    /// Replace the converter. Applies from the next `start`.
    pub fn set_converter(&mut self, converter: Arc<dyn SampleConverter>) {
        self.converter = converter;
    }

    /// Replace the power meter. Applies from the next `start`.
    pub fn set_power_meter(&mut self, meter: Arc<dyn PowerMeter>) {
        self.meter = meter;
    }

    pub fn microphone_slot(&self) -> &MicrophoneSlot {
        &self.microphone_slot
    }

    pub fn power_slot(&self) -> &PowerSlot {
        &self.power_slot
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn gate(&self) -> &Arc<AudioSessionGate<B>> {
        &self.gate
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.counters.snapshot()
    }

    /// Frames per converted chunk.
    pub fn frame_capacity(&self) -> usize {
        self.frame_capacity
    }

    /// Idle → Active. A no-op when already active.
    ///
    /// Session denial leaves the engine idle with nothing wired. A graph that
    /// fails to start is torn down completely before the error is returned.
    pub fn start(&mut self, asset: Arc<DecodedAsset>) -> Result<(), RecorderError> {
        if self.state.is_active() {
            return Ok(());
        }

        let lease = SessionLease::acquire(&self.gate)?;
        let dispatcher = PowerDispatcher::spawn(Arc::clone(&self.power_slot)).map_err(|e| {
            GraphError::StartFailed(format!("failed to spawn power delivery thread: {}", e))
        })?;

        let mix_format = asset.format.to_mono();
        let buffer_size = mix_format.frames_for(self.window_duration_secs);
        let tap = self.build_tap(dispatcher.sender());

        self.lease = Some(lease);
        self.dispatcher = Some(dispatcher);
        let session_id = self.counters.begin_session();

        let wired = self
            .graph
            .connect_player(asset, mix_format)
            .and_then(|_| self.graph.install_tap(buffer_size, tap))
            .and_then(|_| self.graph.start());
        if let Err(e) = wired {
            log::error!("capture graph failed to start: {}", e);
            self.teardown();
            return Err(e.into());
        }

        self.graph.play();
        self.state = RecorderState::Active;
        log::info!(
            "capture started: session={} mix={} Hz window={} frames",
            session_id,
            mix_format.sample_rate,
            buffer_size
        );
        Ok(())
    }

    /// Active → Idle. A no-op when idle. Returns once no callback can fire.
    pub fn stop(&mut self) {
        if self.state.is_idle() {
            return;
        }
        self.teardown();
        let diagnostics = self.counters.snapshot();
        log::info!(
            "capture stopped: windows={} chunks={} dropped={}",
            diagnostics.windows_captured,
            diagnostics.chunks_delivered,
            diagnostics.conversion_failures
        );
    }

    fn teardown(&mut self) {
        self.graph.stop();
        self.graph.remove_tap();
        self.graph.reset();
        if let Some(mut dispatcher) = self.dispatcher.take() {
            dispatcher.shutdown();
        }
        // Dropping the lease deactivates the session, swallowing failures.
        self.lease.take();
        self.state = RecorderState::Idle;
    }

    fn build_tap(&self, power_tx: PowerSender) -> TapCallback {
        let converter = Arc::clone(&self.converter);
        let meter = Arc::clone(&self.meter);
        let microphone_slot = Arc::clone(&self.microphone_slot);
        let counters = Arc::clone(&self.counters);
        let target = self.target;
        let frame_capacity = self.frame_capacity();

        Box::new(move |window: CaptureWindow| {
            DiagnosticCounters::bump(&counters.windows_captured, 1);

            let db = power::window_power(meter.as_ref(), &window);
            if power_tx.post(db) {
                DiagnosticCounters::bump(&counters.power_samples, 1);
            }

            let chunk = match converter.convert(&window, &target, frame_capacity) {
                Ok(chunk) => chunk,
                Err(e) => {
                    let previous = DiagnosticCounters::bump(&counters.conversion_failures, 1);
                    if previous == 0 {
                        log::warn!("dropping window of {} frames: {}", window.frame_count(), e);
                    } else {
                        log::debug!("dropping window of {} frames: {}", window.frame_count(), e);
                    }
                    return;
                }
            };
            drop(window);

            DiagnosticCounters::bump(&counters.chunks_delivered, 1);
            DiagnosticCounters::bump(&counters.bytes_delivered, chunk.len() as u64);
            let callback = microphone_slot.read().clone();
            if let Some(callback) = callback {
                callback(chunk.into_bytes());
            }
        })
    }
}

impl<G: AudioGraph, B: AudioSessionBackend> Drop for CaptureEngine<G, B> {
    fn drop(&mut self) {
        self.stop();
    }
}
