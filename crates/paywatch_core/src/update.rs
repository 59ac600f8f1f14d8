use paywatch_logging::{watch_debug, watch_info, watch_warn};

use crate::{decode_signal, AnalysisOutcome, AppState, Effect, Msg, SessionId, SessionState, STREAM_SENTINEL};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked => {
            let superseded = state.begin_session();
            let session = state.session_id();
            watch_info!(
                "Starting session {} for {} signals",
                session,
                state.signal_count()
            );
            let mut effects = Vec::with_capacity(2);
            // The old channel must be released before the new one is opened.
            if let Some(old) = superseded {
                effects.push(Effect::CloseStream { session: old });
            }
            effects.push(Effect::OpenStream {
                session,
                signal_count: state.signal_count(),
            });
            effects
        }
        Msg::StreamMessage { session, data } => {
            if !accepts_stream_input(&state, session) {
                watch_debug!("Ignoring stream message for stale session {}", session);
                return (state, Vec::new());
            }
            state.mark_streaming();
            if data == STREAM_SENTINEL {
                state.finish_stream();
                watch_info!("Stream completed after {} signals", state.log().count());
                vec![
                    Effect::CloseStream { session },
                    Effect::RequestAnalysis { session },
                ]
            } else {
                match decode_signal(&data) {
                    Ok(record) => state.record_signal(&record),
                    Err(err) => {
                        watch_warn!("Dropping stream message: {}", err);
                        state.record_dropped();
                    }
                }
                Vec::new()
            }
        }
        Msg::StreamFailed { session, reason } => {
            if !accepts_stream_input(&state, session) {
                watch_debug!("Ignoring channel error for session {}: {}", session, reason);
                return (state, Vec::new());
            }
            watch_warn!("Stream channel failed: {}", reason);
            state.fail_stream();
            vec![Effect::CloseStream { session }]
        }
        Msg::AnalysisStarted { session } => {
            if state.is_current(session) && state.session() == SessionState::Done {
                state.start_analysis();
            }
            Vec::new()
        }
        Msg::AnalysisFinished { session, outcome } => {
            if state.is_current(session) && state.session().awaiting_analysis() {
                watch_info!("Analysis finished: {}", outcome.status_text());
                state.complete(outcome);
            } else {
                watch_debug!("Ignoring analysis outcome for session {}", session);
            }
            Vec::new()
        }
        Msg::EngineStopped => {
            let session = state.session();
            watch_warn!("Engine stopped while session was {:?}", session);
            if session.channel_open() {
                state.fail_stream();
            } else if session.awaiting_analysis() {
                state.complete(AnalysisOutcome::Failed("analysis engine stopped".to_string()));
            }
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn accepts_stream_input(state: &AppState, session: SessionId) -> bool {
    state.is_current(session) && state.session().channel_open()
}
