use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::{SessionCategory, SessionOptions};
use crate::models::error::SessionError;
use crate::models::state::SessionState;
use crate::traits::audio_session::AudioSessionBackend;

/// Owns activation of exclusive audio-hardware access.
///
/// `activate` is idempotent, `deactivate` is best-effort and never fails.
pub struct AudioSessionGate<B: AudioSessionBackend> {
    backend: B,
    category: SessionCategory,
    options: SessionOptions,
    state: Mutex<SessionState>,
}

impl<B: AudioSessionBackend> AudioSessionGate<B> {
    pub fn new(backend: B, category: SessionCategory, options: SessionOptions) -> Self {
        Self {
            backend,
            category,
            options,
            state: Mutex::new(SessionState::Inactive),
        }
    }

    /// Activate then immediately deactivate, surfacing configuration errors
    /// without leaving the session active.
    pub fn probe(&self) -> Result<(), SessionError> {
        let result = self.activate();
        self.deactivate();
        result
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn activate(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if state.is_active() {
            return Ok(());
        }
        self.backend.set_category(self.category, self.options)?;
        self.backend.set_active(true, false)?;
        *state = SessionState::Active;
        log::debug!("audio session activated ({:?})", self.category);
        Ok(())
    }

    /// Release access and notify other clients. Failures are logged only.
    pub fn deactivate(&self) {
        let mut state = self.state.lock();
        // Attempted even when this gate believes it is inactive, so a failed
        // start never leaves the platform session held.
        if let Err(e) = self.backend.set_active(false, true) {
            log::warn!("audio session deactivation failed: {}", e);
        } else if state.is_active() {
            log::debug!("audio session deactivated");
        }
        *state = SessionState::Inactive;
    }
}

/// Held while capture is active; deactivates the gate when dropped.
pub struct SessionLease<B: AudioSessionBackend> {
    gate: Arc<AudioSessionGate<B>>,
}

impl<B: AudioSessionBackend> SessionLease<B> {
    pub fn acquire(gate: &Arc<AudioSessionGate<B>>) -> Result<Self, SessionError> {
        gate.activate()?;
        Ok(Self {
            gate: Arc::clone(gate),
        })
    }
}

impl<B: AudioSessionBackend> Drop for SessionLease<B> {
    fn drop(&mut self) {
        self.gate.deactivate();
    }
}
