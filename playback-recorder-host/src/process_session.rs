//! In-process audio session.
//!
//! Desktop hosts have no platform arbiter for audio-hardware access, so the
//! session is modelled in-process: one record per process (or per isolated
//! instance) holding the negotiated category and the set of active clients.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use playback_recorder_core::models::config::{SessionCategory, SessionOptions};
use playback_recorder_core::models::error::SessionError;
use playback_recorder_core::traits::audio_session::AudioSessionBackend;

#[derive(Debug)]
struct SessionRecord {
    hardware_available: bool,
    category: Option<(SessionCategory, SessionOptions)>,
    active_clients: usize,
}

impl SessionRecord {
    fn new() -> Self {
        Self {
            hardware_available: true,
            category: None,
            active_clients: 0,
        }
    }
}

static SHARED: OnceLock<Arc<Mutex<SessionRecord>>> = OnceLock::new();

/// Client handle onto an audio session.
///
/// Each handle counts as one client; activating the same handle twice counts
/// once, and releasing a handle that is not active is a no-op.
pub struct ProcessAudioSession {
    record: Arc<Mutex<SessionRecord>>,
    client_active: AtomicBool,
}

impl ProcessAudioSession {
    /// A new client of the process-wide session.
    pub fn shared() -> Self {
        let record = SHARED.get_or_init(|| Arc::new(Mutex::new(SessionRecord::new())));
        Self {
            record: Arc::clone(record),
            client_active: AtomicBool::new(false),
        }
    }

    /// A client of a fresh, private session.
    pub fn isolated() -> Self {
        Self {
            record: Arc::new(Mutex::new(SessionRecord::new())),
            client_active: AtomicBool::new(false),
        }
    }

    /// Another client of the same session as `self`.
    pub fn new_client(&self) -> Self {
        Self {
            record: Arc::clone(&self.record),
            client_active: AtomicBool::new(false),
        }
    }

    /// Simulate the audio hardware going away or coming back.
    pub fn set_hardware_available(&self, available: bool) {
        self.record.lock().hardware_available = available;
    }

    pub fn active_clients(&self) -> usize {
        self.record.lock().active_clients
    }

    pub fn is_client_active(&self) -> bool {
        self.client_active.load(Ordering::SeqCst)
    }
}

impl AudioSessionBackend for ProcessAudioSession {
    fn set_category(
        &self,
        category: SessionCategory,
        options: SessionOptions,
    ) -> Result<(), SessionError> {
        let mut record = self.record.lock();
        if !record.hardware_available {
            return Err(SessionError::Unavailable);
        }
        // Another client holds the session; only mixable, identical
        // categories may coexist.
        let others_active = record.active_clients > usize::from(self.is_client_active());
        if let Some((current, current_options)) = record.category {
            let compatible = current == category
                && current_options.mix_with_others
                && options.mix_with_others;
            if others_active && !compatible {
                return Err(SessionError::CategoryConflict(format!(
                    "{:?} is active; requested {:?}",
                    current, category
                )));
            }
        }
        record.category = Some((category, options));
        Ok(())
    }

    fn set_active(&self, active: bool, notify_others: bool) -> Result<(), SessionError> {
        let mut record = self.record.lock();
        if active {
            if !record.hardware_available {
                return Err(SessionError::Unavailable);
            }
            if record.category.is_none() {
                return Err(SessionError::ActivationFailed("no category set".into()));
            }
            if !self.client_active.swap(true, Ordering::SeqCst) {
                record.active_clients += 1;
            }
            return Ok(());
        }

        if self.client_active.swap(false, Ordering::SeqCst) {
            record.active_clients = record.active_clients.saturating_sub(1);
            if notify_others && record.active_clients > 0 {
                log::debug!(
                    "session released; {} other client(s) may resume",
                    record.active_clients
                );
            }
        }
        Ok(())
    }
}

impl Drop for ProcessAudioSession {
    fn drop(&mut self) {
        if self.client_active.load(Ordering::SeqCst) {
            let _ = self.set_active(false, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclusive() -> SessionOptions {
        SessionOptions {
            mix_with_others: false,
            ..SessionOptions::default()
        }
    }

    #[test]
    fn activation_requires_category() {
        let session = ProcessAudioSession::isolated();
        assert!(matches!(
            session.set_active(true, false),
            Err(SessionError::ActivationFailed(_))
        ));
    }

    #[test]
    fn client_counts_once() {
        let session = ProcessAudioSession::isolated();
        session
            .set_category(SessionCategory::PlayAndRecord, SessionOptions::default())
            .unwrap();
        session.set_active(true, false).unwrap();
        session.set_active(true, false).unwrap();

        assert_eq!(session.active_clients(), 1);
        session.set_active(false, true).unwrap();
        session.set_active(false, true).unwrap();
        assert_eq!(session.active_clients(), 0);
    }

    #[test]
    fn stray_release_does_not_evict_other_client() {
        let first = ProcessAudioSession::isolated();
        let second = first.new_client();
        first
            .set_category(SessionCategory::PlayAndRecord, SessionOptions::default())
            .unwrap();
        first.set_active(true, false).unwrap();

        second.set_active(false, true).unwrap();

        assert_eq!(first.active_clients(), 1);
    }

    #[test]
    fn mixable_clients_share() {
        let first = ProcessAudioSession::isolated();
        let second = first.new_client();
        for client in [&first, &second] {
            client
                .set_category(SessionCategory::PlayAndRecord, SessionOptions::default())
                .unwrap();
            client.set_active(true, false).unwrap();
        }
        assert_eq!(first.active_clients(), 2);
    }

    #[test]
    fn exclusive_holder_blocks_other_category() {
        let first = ProcessAudioSession::isolated();
        let second = first.new_client();
        first
            .set_category(SessionCategory::Playback, exclusive())
            .unwrap();
        first.set_active(true, false).unwrap();

        let result = second.set_category(SessionCategory::PlayAndRecord, SessionOptions::default());

        assert!(matches!(result, Err(SessionError::CategoryConflict(_))));
    }

    #[test]
    fn unavailable_hardware_is_reported() {
        let session = ProcessAudioSession::isolated();
        session.set_hardware_available(false);
        assert_eq!(
            session.set_category(SessionCategory::PlayAndRecord, SessionOptions::default()),
            Err(SessionError::Unavailable)
        );
    }

    #[test]
    fn dropping_active_client_releases_it() {
        let first = ProcessAudioSession::isolated();
        {
            let second = first.new_client();
            second
                .set_category(SessionCategory::PlayAndRecord, SessionOptions::default())
                .unwrap();
            second.set_active(true, false).unwrap();
            assert_eq!(first.active_clients(), 1);
        }
        assert_eq!(first.active_clients(), 0);
    }
}
