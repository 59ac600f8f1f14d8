//! Paywatch core: pure session state machine, log rendering and view-model helpers.
mod analysis;
mod effect;
mod log_view;
mod msg;
mod present;
mod signal;
mod state;
mod update;
mod view_model;

pub use analysis::{escape_html, AnalysisOutcome, AnalysisPanel};
pub use effect::Effect;
pub use log_view::{format_amount, LogEntry, LogRenderer, StatusClass};
pub use msg::Msg;
pub use present::{DisplaySurface, Presenter};
pub use signal::{decode_signal, DecodeError, SignalRecord, SignalStatus, STREAM_SENTINEL};
pub use state::{AppState, SessionId, SessionState, DEFAULT_SIGNAL_COUNT};
pub use update::update;
pub use view_model::{AppViewModel, ControlView, RETRY_LABEL, RUNNING_LABEL, START_LABEL};
