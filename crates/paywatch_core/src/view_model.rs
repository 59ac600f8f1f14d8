use crate::{AnalysisPanel, LogEntry, SessionId, SessionState};

pub const START_LABEL: &str = "Start Analysis";
pub const RUNNING_LABEL: &str = "Running...";
pub const RETRY_LABEL: &str = "Retry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub enabled: bool,
    pub label: &'static str,
}

impl ControlView {
    pub fn start() -> Self {
        Self {
            enabled: true,
            label: START_LABEL,
        }
    }

    pub fn running() -> Self {
        Self {
            enabled: false,
            label: RUNNING_LABEL,
        }
    }

    pub fn retry() -> Self {
        Self {
            enabled: true,
            label: RETRY_LABEL,
        }
    }
}

impl Default for ControlView {
    fn default() -> Self {
        Self::start()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session_id: SessionId,
    pub session: SessionState,
    pub status_text: String,
    pub start_control: ControlView,
    pub log_generation: u64,
    pub log: Vec<LogEntry>,
    pub dropped_count: usize,
    /// `Some` once the analysis section is revealed.
    pub analysis: Option<AnalysisPanel>,
}
