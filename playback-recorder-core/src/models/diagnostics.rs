use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Snapshot of counters for the current or most recent capture session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureDiagnostics {
    pub session_id: Option<String>,
    pub started_at: Option<String>,
    pub windows_captured: u64,
    pub chunks_delivered: u64,
    pub bytes_delivered: u64,
    pub conversion_failures: u64,
    pub power_samples: u64,
}

/// Live counters updated from the tap. Atomics only, no locks on the
/// real-time path.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCounters {
    identity: Mutex<(Option<String>, Option<String>)>,
    pub(crate) windows_captured: AtomicU64,
    pub(crate) chunks_delivered: AtomicU64,
    pub(crate) bytes_delivered: AtomicU64,
    pub(crate) conversion_failures: AtomicU64,
    pub(crate) power_samples: AtomicU64,
}

impl DiagnosticCounters {
    /// Reset counters and stamp a fresh session id and start time.
    pub(crate) fn begin_session(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        *self.identity.lock() = (Some(id.clone()), Some(chrono::Utc::now().to_rfc3339()));
        for counter in [
            &self.windows_captured,
            &self.chunks_delivered,
            &self.bytes_delivered,
            &self.conversion_failures,
            &self.power_samples,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        id
    }

    pub(crate) fn bump(counter: &AtomicU64, by: u64) -> u64 {
        counter.fetch_add(by, Ordering::Relaxed)
    }

    pub(crate) fn snapshot(&self) -> CaptureDiagnostics {
        let (session_id, started_at) = self.identity.lock().clone();
        CaptureDiagnostics {
            session_id,
            started_at,
            windows_captured: self.windows_captured.load(Ordering::Relaxed),
            chunks_delivered: self.chunks_delivered.load(Ordering::Relaxed),
            bytes_delivered: self.bytes_delivered.load(Ordering::Relaxed),
            conversion_failures: self.conversion_failures.load(Ordering::Relaxed),
            power_samples: self.power_samples.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_session_resets_counters() {
        let counters = DiagnosticCounters::default();
        DiagnosticCounters::bump(&counters.windows_captured, 3);
        DiagnosticCounters::bump(&counters.conversion_failures, 1);

        let id = counters.begin_session();
        let snapshot = counters.snapshot();

        assert_eq!(snapshot.session_id.as_deref(), Some(id.as_str()));
        assert!(snapshot.started_at.is_some());
        assert_eq!(snapshot.windows_captured, 0);
        assert_eq!(snapshot.conversion_failures, 0);
    }

    #[test]
    fn fresh_counters_have_no_session() {
        let snapshot = DiagnosticCounters::default().snapshot();
        assert_eq!(snapshot, CaptureDiagnostics::default());
    }
}
