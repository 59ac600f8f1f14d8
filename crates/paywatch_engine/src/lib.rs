//! Paywatch engine: stream channel, analysis client and effect execution.
mod analysis;
mod engine;
mod format;
mod persist;
mod render;
mod stream;
mod types;

pub use analysis::{resolve_outcome, AnalysisClient, AnalysisReply, ReqwestAnalysisClient};
pub use engine::{ChannelSlot, EngineHandle, EngineSettings};
pub use format::{expand_escapes, extract_display_text, ResultFormatter};
pub use persist::{ensure_parent_dir, write_atomically, PersistError};
pub use render::{MarkdownRenderer, PulldownRenderer};
pub use stream::{ChannelEventSink, EventSink, ReqwestSignalChannel, SignalChannel};
pub use types::{
    AnalysisError, AnalysisOutcome, EngineEvent, SessionId, StreamError, StreamFailureKind,
};
