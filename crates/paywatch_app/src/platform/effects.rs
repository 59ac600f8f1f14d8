use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use paywatch_core::{AnalysisOutcome, Effect, Msg};
use paywatch_engine::{EngineEvent, EngineHandle, EngineSettings};
use paywatch_logging::{watch_debug, watch_error, watch_info};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self {
            engine: EngineHandle::new(settings),
        };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    /// Executes effects strictly in the order `update` produced them.
    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CloseStream { session } => {
                    watch_debug!("CloseStream session={}", session);
                    self.engine.close_stream(session);
                }
                Effect::OpenStream {
                    session,
                    signal_count,
                } => {
                    watch_info!("OpenStream session={} count={}", session, signal_count);
                    self.engine.open_stream(session, signal_count);
                }
                Effect::RequestAnalysis { session } => {
                    watch_info!("RequestAnalysis session={}", session);
                    self.engine.request_analysis(session);
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            forward_events(|timeout| engine.recv_timeout(timeout), &msg_tx);
        });
    }
}

/// Pumps engine events into the message loop until either side goes away.
fn forward_events(
    mut recv: impl FnMut(Duration) -> Result<EngineEvent, RecvTimeoutError>,
    msg_tx: &mpsc::Sender<Msg>,
) {
    loop {
        match recv(Duration::from_millis(100)) {
            Ok(event) => {
                if msg_tx.send(map_event(event)).is_err() {
                    return;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                watch_error!("Engine event channel closed");
                let _ = msg_tx.send(Msg::EngineStopped);
                return;
            }
        }
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StreamMessage { session, data } => Msg::StreamMessage { session, data },
        EngineEvent::StreamFailed { session, error } => Msg::StreamFailed {
            session,
            reason: error.to_string(),
        },
        EngineEvent::AnalysisStarted { session } => Msg::AnalysisStarted { session },
        EngineEvent::AnalysisCompleted { session, outcome } => Msg::AnalysisFinished {
            session,
            outcome: map_outcome(outcome),
        },
    }
}

fn map_outcome(outcome: paywatch_engine::AnalysisOutcome) -> AnalysisOutcome {
    match outcome {
        paywatch_engine::AnalysisOutcome::Rendered(markup) => AnalysisOutcome::Rendered(markup),
        paywatch_engine::AnalysisOutcome::Rejected(message) => AnalysisOutcome::Rejected(message),
        paywatch_engine::AnalysisOutcome::Failed(description) => {
            AnalysisOutcome::Failed(description)
        }
    }
}
