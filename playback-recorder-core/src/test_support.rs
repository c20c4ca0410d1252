//! Scripted collaborators shared by the unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::{SessionCategory, SessionOptions};
use crate::models::error::{ConversionError, GraphError, SessionError};
use crate::models::format::{AudioFormat, SampleFormat};
use crate::models::window::{CaptureWindow, ConvertedChunk, DecodedAsset, WindowSamples};
use crate::processing::converter::LinearSampleConverter;
use crate::traits::audio_graph::{AudioGraph, TapCallback};
use crate::traits::audio_session::AudioSessionBackend;
use crate::traits::sample_converter::SampleConverter;

/// Session backend that records every call. Clones share the same log.
#[derive(Clone, Default)]
pub(crate) struct ScriptedSession {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub deny_activation: Arc<Mutex<Option<SessionError>>>,
    pub fail_deactivation: Arc<Mutex<bool>>,
}

impl ScriptedSession {
    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == call).count()
    }
}

impl AudioSessionBackend for ScriptedSession {
    fn set_category(
        &self,
        category: SessionCategory,
        options: SessionOptions,
    ) -> Result<(), SessionError> {
        self.calls
            .lock()
            .push(format!("category:{:?}:{}", category, options.mix_with_others));
        Ok(())
    }

    fn set_active(&self, active: bool, notify_others: bool) -> Result<(), SessionError> {
        if active {
            if let Some(err) = self.deny_activation.lock().clone() {
                self.calls.lock().push("activate-denied".into());
                return Err(err);
            }
            self.calls.lock().push("activate".into());
            Ok(())
        } else {
            assert!(notify_others);
            self.calls.lock().push("deactivate".into());
            if *self.fail_deactivation.lock() {
                return Err(SessionError::DeactivationFailed("busy".into()));
            }
            Ok(())
        }
    }
}

#[derive(Default)]
pub(crate) struct GraphLog {
    pub calls: Vec<String>,
    pub mix_format: Option<AudioFormat>,
    pub buffer_size: Option<usize>,
    pub running: bool,
    pub fail_start: Option<GraphError>,
}

/// Graph whose tap is driven by the test instead of a render thread.
#[derive(Clone, Default)]
pub(crate) struct ScriptedGraph {
    pub log: Arc<Mutex<GraphLog>>,
    tap: Arc<Mutex<Option<TapCallback>>>,
}

impl ScriptedGraph {
    pub fn count(&self, call: &str) -> usize {
        self.log.lock().calls.iter().filter(|c| c.as_str() == call).count()
    }

    pub fn has_tap(&self) -> bool {
        self.tap.lock().is_some()
    }

    /// Invoke the tap as the render thread would. Returns false when no tap
    /// is installed or the graph is not running.
    pub fn fire(&self, window: CaptureWindow) -> bool {
        if !self.log.lock().running {
            return false;
        }
        match self.tap.lock().as_mut() {
            Some(tap) => {
                tap(window);
                true
            }
            None => false,
        }
    }
}

impl AudioGraph for ScriptedGraph {
    fn connect_player(
        &mut self,
        _asset: Arc<DecodedAsset>,
        mix_format: AudioFormat,
    ) -> Result<(), GraphError> {
        let mut log = self.log.lock();
        log.calls.push("connect".into());
        log.mix_format = Some(mix_format);
        Ok(())
    }

    fn install_tap(&mut self, buffer_size: usize, tap: TapCallback) -> Result<(), GraphError> {
        let mut slot = self.tap.lock();
        if slot.is_some() {
            return Err(GraphError::TapAlreadyInstalled);
        }
        *slot = Some(tap);
        let mut log = self.log.lock();
        log.calls.push("install_tap".into());
        log.buffer_size = Some(buffer_size);
        Ok(())
    }

    fn start(&mut self) -> Result<(), GraphError> {
        let mut log = self.log.lock();
        log.calls.push("start".into());
        if let Some(err) = log.fail_start.clone() {
            return Err(err);
        }
        log.running = true;
        Ok(())
    }

    fn play(&mut self) {
        self.log.lock().calls.push("play".into());
    }

    fn stop(&mut self) {
        let mut log = self.log.lock();
        log.calls.push("stop".into());
        log.running = false;
    }

    fn remove_tap(&mut self) {
        self.tap.lock().take();
        self.log.lock().calls.push("remove_tap".into());
    }

    fn reset(&mut self) {
        self.log.lock().calls.push("reset".into());
    }
}

/// Delegates to the linear converter but fails on the listed call indices.
pub(crate) struct FlakyConverter {
    pub fail_on: Vec<usize>,
    calls: Mutex<usize>,
}

impl FlakyConverter {
    pub fn new(fail_on: Vec<usize>) -> Self {
        Self {
            fail_on,
            calls: Mutex::new(0),
        }
    }
}

impl SampleConverter for FlakyConverter {
    fn convert(
        &self,
        window: &CaptureWindow,
        target: &AudioFormat,
        frame_capacity: usize,
    ) -> Result<ConvertedChunk, ConversionError> {
        let index = {
            let mut calls = self.calls.lock();
            let index = *calls;
            *calls += 1;
            index
        };
        if self.fail_on.contains(&index) {
            return Err(ConversionError::Failed(format!("injected failure {}", index)));
        }
        LinearSampleConverter.convert(window, target, frame_capacity)
    }
}

/// Half a second of mono 16 kHz int16 audio: a 0.25 full-scale square wave.
pub(crate) fn half_second_asset() -> DecodedAsset {
    let samples = (0..8000)
        .map(|i| if (i / 40) % 2 == 0 { 8192 } else { -8192 })
        .collect();
    DecodedAsset {
        format: AudioFormat::new(16_000.0, 1, SampleFormat::Int16),
        samples: WindowSamples::Int16(samples),
    }
}

/// Split an asset into tap-sized mono windows the way a render thread would.
pub(crate) fn windows_of(asset: &DecodedAsset, frames_per_window: usize) -> Vec<CaptureWindow> {
    assert_eq!(asset.format.channels, 1);
    let total = asset.samples.len();
    (0..total)
        .step_by(frames_per_window)
        .map(|start| {
            let end = (start + frames_per_window).min(total);
            CaptureWindow::new(asset.format, asset.samples.slice(start, end))
        })
        .collect()
}
