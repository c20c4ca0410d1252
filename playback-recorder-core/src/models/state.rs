/// Recorder state machine.
///
/// ```text
/// idle ──start_recording──▶ active
///  ▲                          │
///  └──stop_recording / drop───┘
/// ```
///
/// Re-entrant calls in the current state are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Active,
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Activation state of the audio session, tracked apart from the recorder so
/// teardown can always attempt deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Inactive,
    Active,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}
