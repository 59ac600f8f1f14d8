use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use paywatch_logging::{set_log_session, watch_debug, watch_error, watch_info, watch_warn};
use tokio_util::sync::CancellationToken;

use crate::analysis::{resolve_outcome, AnalysisClient, ReqwestAnalysisClient};
use crate::stream::{ChannelEventSink, ReqwestSignalChannel, SignalChannel};
use crate::{EngineEvent, ResultFormatter, SessionId, StreamFailureKind};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub analysis_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            analysis_timeout: Duration::from_secs(60),
        }
    }
}

/// Owner of the one live stream channel.
#[derive(Debug, Default)]
pub struct ChannelSlot {
    current: Option<(SessionId, CancellationToken)>,
}

impl ChannelSlot {
    /// Closes whatever is open, then registers a channel for `session`.
    pub fn open(&mut self, session: SessionId) -> CancellationToken {
        self.close();
        let token = CancellationToken::new();
        self.current = Some((session, token.clone()));
        token
    }

    /// Closes the channel if it belongs to `session`. Idempotent.
    pub fn close_session(&mut self, session: SessionId) {
        if self.open_session() == Some(session) {
            self.close();
        }
    }

    /// Closes the open channel, if any. Idempotent.
    pub fn close(&mut self) {
        if let Some((session, token)) = self.current.take() {
            watch_debug!("Closing channel of session {}", session);
            token.cancel();
        }
    }

    pub fn open_session(&self) -> Option<SessionId> {
        self.current.as_ref().map(|(session, _)| *session)
    }
}

enum EngineCommand {
    OpenStream {
        session: SessionId,
        signal_count: u32,
    },
    CloseStream {
        session: SessionId,
    },
    RequestAnalysis {
        session: SessionId,
    },
}

#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Self {
        let channel = Arc::new(ReqwestSignalChannel::new(
            settings.base_url.clone(),
            settings.connect_timeout,
        ));
        let analysis = Arc::new(ReqwestAnalysisClient::new(
            settings.base_url,
            settings.analysis_timeout,
        ));
        Self::with_parts(channel, analysis, Arc::new(ResultFormatter::default()))
    }

    pub fn with_parts(
        channel: Arc<dyn SignalChannel>,
        analysis: Arc<dyn AnalysisClient>,
        formatter: Arc<ResultFormatter>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    watch_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut slot = ChannelSlot::default();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::OpenStream {
                        session,
                        signal_count,
                    } => {
                        set_log_session(session);
                        let cancel = slot.open(session);
                        watch_info!("Opening channel for {} signals", signal_count);
                        let channel = channel.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_stream(channel.as_ref(), session, signal_count, cancel, event_tx)
                                .await;
                        });
                    }
                    EngineCommand::CloseStream { session } => {
                        slot.close_session(session);
                    }
                    EngineCommand::RequestAnalysis { session } => {
                        set_log_session(session);
                        watch_info!("Requesting analysis");
                        let analysis = analysis.clone();
                        let formatter = formatter.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let _ = event_tx.send(EngineEvent::AnalysisStarted { session });
                            let reply = analysis.analyze().await;
                            let outcome = resolve_outcome(reply, &*formatter);
                            let _ = event_tx.send(EngineEvent::AnalysisCompleted { session, outcome });
                        });
                    }
                }
            }
            slot.close();
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn open_stream(&self, session: SessionId, signal_count: u32) {
        let _ = self.cmd_tx.send(EngineCommand::OpenStream {
            session,
            signal_count,
        });
    }

    pub fn close_stream(&self, session: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::CloseStream { session });
    }

    pub fn request_analysis(&self, session: SessionId) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::RequestAnalysis { session });
    }

    /// `Disconnected` means the engine thread is gone and no event will follow.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        match self.event_rx.lock() {
            Ok(event_rx) => event_rx.recv_timeout(timeout),
            Err(_) => Err(RecvTimeoutError::Disconnected),
        }
    }
}

async fn run_stream(
    channel: &dyn SignalChannel,
    session: SessionId,
    signal_count: u32,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelEventSink::new(event_tx.clone());
    match channel.stream(session, signal_count, &sink, cancel).await {
        Ok(()) => {}
        Err(error) => {
            if error.kind == StreamFailureKind::EndedEarly {
                watch_debug!("Channel of session {} ended: {}", session, error);
            } else {
                watch_warn!("Channel of session {} failed: {}", session, error);
            }
            let _ = event_tx.send(EngineEvent::StreamFailed { session, error });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelSlot;

    #[test]
    fn opening_cancels_previous_channel() {
        let mut slot = ChannelSlot::default();
        let first = slot.open(1);
        let second = slot.open(2);

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(slot.open_session(), Some(2));
    }

    #[test]
    fn close_is_idempotent() {
        let mut slot = ChannelSlot::default();
        let token = slot.open(1);
        slot.close();
        slot.close();
        slot.close_session(1);

        assert!(token.is_cancelled());
        assert_eq!(slot.open_session(), None);
    }

    #[test]
    fn closing_a_stale_session_keeps_the_current_one() {
        let mut slot = ChannelSlot::default();
        slot.open(1);
        let current = slot.open(2);
        slot.close_session(1);

        assert!(!current.is_cancelled());
        assert_eq!(slot.open_session(), Some(2));
    }
}
