use std::fmt;

pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Data of one `message` event received on the channel of `session`.
    StreamMessage { session: SessionId, data: String },
    StreamFailed {
        session: SessionId,
        error: StreamError,
    },
    AnalysisStarted { session: SessionId },
    AnalysisCompleted {
        session: SessionId,
        outcome: AnalysisOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Formatted markup of a successful analysis.
    Rendered(String),
    /// Error reported by the analysis endpoint itself.
    Rejected(String),
    /// Transport or decoding failure.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct StreamError {
    pub kind: StreamFailureKind,
    pub message: String,
}

impl StreamError {
    pub(crate) fn new(kind: StreamFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Protocol,
    /// The server closed the stream without further events.
    EndedEarly,
}

impl fmt::Display for StreamFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamFailureKind::InvalidUrl => write!(f, "invalid url"),
            StreamFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            StreamFailureKind::Timeout => write!(f, "timeout"),
            StreamFailureKind::Network => write!(f, "network error"),
            StreamFailureKind::Protocol => write!(f, "malformed event stream"),
            StreamFailureKind::EndedEarly => write!(f, "stream ended"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid analysis url: {0}")]
    InvalidUrl(String),
    #[error("analysis request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("analysis response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
