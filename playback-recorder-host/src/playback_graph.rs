//! Software audio graph: a player thread that renders the decoded asset into
//! a mono mix point and hands fixed-size windows to the installed tap.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;

use playback_recorder_core::models::error::GraphError;
use playback_recorder_core::models::format::AudioFormat;
use playback_recorder_core::models::window::{CaptureWindow, DecodedAsset, WindowSamples};
use playback_recorder_core::traits::audio_graph::{AudioGraph, TapCallback};

/// How long the render thread sleeps when there is nothing to render.
const IDLE_POLL: Duration = Duration::from_millis(10);

#[derive(Default)]
struct PlayerState {
    asset: Option<Arc<DecodedAsset>>,
    mix_format: Option<AudioFormat>,
    /// Next frame to render, in asset frames.
    position: usize,
    playing: bool,
}

impl PlayerState {
    /// Render up to `frames` frames at the mix point, advancing the play
    /// head. The final window of an asset may be short; once the asset is
    /// exhausted playback stops and nothing more is rendered.
    fn next_window(&mut self, frames: usize) -> Option<CaptureWindow> {
        if !self.playing {
            return None;
        }
        let (asset, mix_format) = match (&self.asset, self.mix_format) {
            (Some(asset), Some(mix_format)) => (Arc::clone(asset), mix_format),
            _ => return None,
        };

        let total = asset.frame_count();
        if self.position >= total {
            self.playing = false;
            log::debug!("asset playback finished after {} frames", total);
            return None;
        }

        let start = self.position;
        let end = (start + frames).min(total);
        self.position = end;

        let channels = asset.format.channels.max(1) as usize;
        let samples = downmix(&asset.samples, channels, start, end);
        Some(CaptureWindow::new(mix_format, samples))
    }
}

/// Average frames `[start, end)` of `samples` down to one channel, keeping the
/// sample representation.
fn downmix(samples: &WindowSamples, channels: usize, start: usize, end: usize) -> WindowSamples {
    if channels == 1 {
        return samples.slice(start, end);
    }
    match samples {
        WindowSamples::Int16(s) => WindowSamples::Int16(
            s[start * channels..end * channels]
                .chunks_exact(channels)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&v| v as i32).sum();
                    (sum / channels as i32) as i16
                })
                .collect(),
        ),
        WindowSamples::Float32(s) => WindowSamples::Float32(
            s[start * channels..end * channels]
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect(),
        ),
    }
}

struct InstalledTap {
    buffer_size: usize,
    callback: TapCallback,
}

/// `AudioGraph` backed by a dedicated `asset-playback` render thread.
///
/// With pacing enabled each window is delivered after its own duration has
/// elapsed, like a hardware input. Without pacing windows are delivered as
/// fast as the tap consumes them.
pub struct ThreadedPlaybackGraph {
    pacing: bool,
    player: Arc<Mutex<PlayerState>>,
    tap: Arc<Mutex<Option<InstalledTap>>>,
    shutdown_tx: Option<Sender<()>>,
    render_handle: Option<thread::JoinHandle<()>>,
}

impl ThreadedPlaybackGraph {
    pub fn new(pacing: bool) -> Self {
        Self {
            pacing,
            player: Arc::new(Mutex::new(PlayerState::default())),
            tap: Arc::new(Mutex::new(None)),
            shutdown_tx: None,
            render_handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.render_handle.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.player.lock().playing
    }
}

impl Default for ThreadedPlaybackGraph {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AudioGraph for ThreadedPlaybackGraph {
    fn connect_player(
        &mut self,
        asset: Arc<DecodedAsset>,
        mix_format: AudioFormat,
    ) -> Result<(), GraphError> {
        if mix_format != asset.format.to_mono() {
            return Err(GraphError::UnsupportedFormat(format!(
                "mix point must be mono {:?} at {} Hz, got {} ch {:?} at {} Hz",
                asset.format.sample_format,
                asset.format.sample_rate,
                mix_format.channels,
                mix_format.sample_format,
                mix_format.sample_rate
            )));
        }
        let mut player = self.player.lock();
        player.asset = Some(asset);
        player.mix_format = Some(mix_format);
        player.position = 0;
        player.playing = false;
        Ok(())
    }

    fn install_tap(&mut self, buffer_size: usize, tap: TapCallback) -> Result<(), GraphError> {
        if buffer_size == 0 {
            return Err(GraphError::StartFailed("tap buffer size must be non-zero".into()));
        }
        let mut slot = self.tap.lock();
        if slot.is_some() {
            return Err(GraphError::TapAlreadyInstalled);
        }
        *slot = Some(InstalledTap {
            buffer_size,
            callback: tap,
        });
        Ok(())
    }

    fn start(&mut self) -> Result<(), GraphError> {
        if self.render_handle.is_some() {
            return Ok(());
        }
        if self.player.lock().asset.is_none() {
            return Err(GraphError::NotConfigured);
        }

        let (shutdown_tx, shutdown_rx) = bounded(1);
        let player = Arc::clone(&self.player);
        let tap = Arc::clone(&self.tap);
        let pacing = self.pacing;
        let handle = thread::Builder::new()
            .name("asset-playback".into())
            .spawn(move || render_loop(player, tap, shutdown_rx, pacing))
            .map_err(|e| GraphError::StartFailed(format!("failed to spawn render thread: {}", e)))?;

        self.shutdown_tx = Some(shutdown_tx);
        self.render_handle = Some(handle);
        log::debug!("playback graph started (pacing={})", self.pacing);
        Ok(())
    }

    fn play(&mut self) {
        let mut player = self.player.lock();
        player.position = 0;
        player.playing = true;
    }

    fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
        if let Some(handle) = self.render_handle.take() {
            if handle.join().is_err() {
                log::error!("asset playback thread panicked");
            }
        }
        self.player.lock().playing = false;
    }

    fn remove_tap(&mut self) {
        self.tap.lock().take();
    }

    fn reset(&mut self) {
        let mut player = self.player.lock();
        player.asset = None;
        player.mix_format = None;
        player.position = 0;
        player.playing = false;
    }
}

impl Drop for ThreadedPlaybackGraph {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Waits up to `timeout` for a shutdown request. Disconnection counts as one.
fn shutdown_requested(rx: &Receiver<()>, timeout: Duration) -> bool {
    if timeout.is_zero() {
        return !matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }
    !matches!(rx.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
}

fn render_loop(
    player: Arc<Mutex<PlayerState>>,
    tap: Arc<Mutex<Option<InstalledTap>>>,
    shutdown: Receiver<()>,
    pacing: bool,
) {
    loop {
        let buffer_size = tap.lock().as_ref().map(|installed| installed.buffer_size);
        let window = buffer_size.and_then(|frames| player.lock().next_window(frames));

        let Some(window) = window else {
            if shutdown_requested(&shutdown, IDLE_POLL) {
                break;
            }
            continue;
        };

        let wait = if pacing {
            Duration::from_secs_f64(window.frame_count() as f64 / window.format.sample_rate)
        } else {
            Duration::ZERO
        };
        if shutdown_requested(&shutdown, wait) {
            break;
        }

        if let Some(installed) = tap.lock().as_mut() {
            (installed.callback)(window);
        }
    }
}
