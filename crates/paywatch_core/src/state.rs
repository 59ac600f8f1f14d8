use crate::view_model::{AppViewModel, ControlView};
use crate::{AnalysisOutcome, AnalysisPanel, LogRenderer, SignalRecord};

pub type SessionId = u64;

/// Number of signals requested from the stream endpoint unless configured otherwise.
pub const DEFAULT_SIGNAL_COUNT: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Connecting,
    Streaming,
    Done,
    Analyzing,
    Complete,
    Error,
}

impl SessionState {
    /// True while the session owns a live stream channel.
    pub fn channel_open(self) -> bool {
        matches!(self, SessionState::Connecting | SessionState::Streaming)
    }

    pub fn awaiting_analysis(self) -> bool {
        matches!(self, SessionState::Done | SessionState::Analyzing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    session_id: SessionId,
    session: SessionState,
    signal_count: u32,
    log: LogRenderer,
    dropped: usize,
    outcome: Option<AnalysisOutcome>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session_id: 0,
            session: SessionState::Idle,
            signal_count: DEFAULT_SIGNAL_COUNT,
            log: LogRenderer::default(),
            dropped: 0,
            outcome: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal_count(signal_count: u32) -> Self {
        Self {
            signal_count,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session_id: self.session_id,
            session: self.session,
            status_text: self.status_text(),
            start_control: self.start_control(),
            log_generation: self.log.generation(),
            log: self.log.entries().to_vec(),
            dropped_count: self.dropped,
            analysis: self.outcome.as_ref().map(AnalysisPanel::from),
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn signal_count(&self) -> u32 {
        self.signal_count
    }

    pub fn log(&self) -> &LogRenderer {
        &self.log
    }

    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn is_current(&self, session: SessionId) -> bool {
        self.session_id != 0 && session == self.session_id
    }

    /// Begins a fresh session and returns the id of the one it replaces, if
    /// that one still held an open channel.
    pub(crate) fn begin_session(&mut self) -> Option<SessionId> {
        let superseded = self.session.channel_open().then_some(self.session_id);
        self.session_id += 1;
        self.session = SessionState::Connecting;
        self.log.reset();
        self.dropped = 0;
        self.outcome = None;
        self.dirty = true;
        superseded
    }

    pub(crate) fn mark_streaming(&mut self) {
        if self.session == SessionState::Connecting {
            self.session = SessionState::Streaming;
            self.dirty = true;
        }
    }

    pub(crate) fn record_signal(&mut self, record: &SignalRecord) {
        self.log.append(record);
        self.dirty = true;
    }

    pub(crate) fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    pub(crate) fn finish_stream(&mut self) {
        self.session = SessionState::Done;
        self.dirty = true;
    }

    pub(crate) fn fail_stream(&mut self) {
        self.session = SessionState::Error;
        self.dirty = true;
    }

    pub(crate) fn start_analysis(&mut self) {
        self.session = SessionState::Analyzing;
        self.dirty = true;
    }

    pub(crate) fn complete(&mut self, outcome: AnalysisOutcome) {
        self.session = SessionState::Complete;
        self.outcome = Some(outcome);
        self.dirty = true;
    }

    fn status_text(&self) -> String {
        match self.session {
            SessionState::Idle => "Ready".to_string(),
            SessionState::Connecting => "Connecting...".to_string(),
            SessionState::Streaming => format!("Streaming... ({} signals)", self.log.count()),
            SessionState::Done => format!("Stream finished ({} signals)", self.log.count()),
            SessionState::Analyzing => "Analyzing with AI...".to_string(),
            SessionState::Complete => self
                .outcome
                .as_ref()
                .map_or("Complete", AnalysisOutcome::status_text)
                .to_string(),
            SessionState::Error => "Connection error".to_string(),
        }
    }

    fn start_control(&self) -> ControlView {
        match self.session {
            SessionState::Idle | SessionState::Complete => ControlView::start(),
            SessionState::Error => ControlView::retry(),
            SessionState::Connecting
            | SessionState::Streaming
            | SessionState::Done
            | SessionState::Analyzing => ControlView::running(),
        }
    }
}
