use crate::{AnalysisOutcome, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User activated the start (or retry) control.
    StartClicked,
    /// One pushed event payload from the stream channel of `session`.
    StreamMessage { session: SessionId, data: String },
    /// The stream channel of `session` failed or was cut before completion.
    StreamFailed { session: SessionId, reason: String },
    /// The analysis request for `session` has been dispatched.
    AnalysisStarted { session: SessionId },
    /// The analysis request for `session` resolved.
    AnalysisFinished {
        session: SessionId,
        outcome: AnalysisOutcome,
    },
    /// The IO engine shut down; nothing will arrive for the live session.
    EngineStopped,
    /// Wakes the loop without changing state.
    Tick,
}
