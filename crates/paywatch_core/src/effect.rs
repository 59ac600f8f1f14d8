use crate::SessionId;

/// IO the state machine asks the runtime to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Release the channel of `session`. Closing an already closed channel is a no-op.
    CloseStream { session: SessionId },
    OpenStream { session: SessionId, signal_count: u32 },
    RequestAnalysis { session: SessionId },
}
