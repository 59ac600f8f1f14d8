use paywatch_core::{
    update, AnalysisOutcome, AppState, Effect, Msg, SessionState, START_LABEL,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    paywatch_logging::initialize_for_tests();
}

/// Runs a session up to the point where analysis has been requested.
fn finished_stream() -> AppState {
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::StreamMessage {
            session: 1,
            data: r#"{"status":"SUCCESS","currency":"GBP","amount":5,"latency_ms":10}"#.into(),
        },
    );
    let (state, effects) = update(
        state,
        Msg::StreamMessage {
            session: 1,
            data: "[DONE]".into(),
        },
    );
    assert!(effects.contains(&Effect::RequestAnalysis { session: 1 }));
    state
}

fn finish(state: AppState, outcome: AnalysisOutcome) -> AppState {
    let (state, _) = update(state, Msg::AnalysisStarted { session: 1 });
    assert_eq!(state.session(), SessionState::Analyzing);
    assert_eq!(state.view().status_text, "Analyzing with AI...");
    let (state, effects) = update(state, Msg::AnalysisFinished { session: 1, outcome });
    assert!(effects.is_empty());
    state
}

#[test]
fn rendered_result_completes_session() {
    init_logging();
    let state = finish(
        finished_stream(),
        AnalysisOutcome::Rendered("<p>all good</p>".into()),
    );
    let view = state.view();

    assert_eq!(view.session, SessionState::Complete);
    assert_eq!(view.status_text, "Complete");
    let panel = view.analysis.expect("analysis revealed");
    assert_eq!(panel.markup, "<p>all good</p>");
    assert!(!panel.is_error);
    assert!(view.start_control.enabled);
    assert_eq!(view.start_control.label, START_LABEL);
    // The stream log is kept next to the analysis.
    assert_eq!(view.log.len(), 1);
}

#[test]
fn server_error_is_escaped_and_restores_start() {
    init_logging();
    let state = finish(
        finished_stream(),
        AnalysisOutcome::Rejected("<script>x</script>".into()),
    );
    let view = state.view();

    let panel = view.analysis.expect("analysis revealed");
    assert!(panel.is_error);
    assert!(panel.markup.contains("&lt;script&gt;x&lt;/script&gt;"));
    assert!(!panel.markup.contains("<script>"));
    assert_eq!(view.status_text, "Complete");
    assert!(view.start_control.enabled);
    assert_eq!(view.start_control.label, START_LABEL);
}

#[test]
fn transport_failure_reports_error_and_restores_start() {
    init_logging();
    let state = finish(
        finished_stream(),
        AnalysisOutcome::Failed("expected value at line 1 column 1".into()),
    );
    let view = state.view();

    assert_eq!(view.session, SessionState::Complete);
    assert_eq!(view.status_text, "Error");
    assert!(view
        .analysis
        .expect("analysis revealed")
        .markup
        .starts_with(r#"<p class="error">Failed: "#));
    assert!(view.start_control.enabled);
    assert_eq!(view.start_control.label, START_LABEL);
}

#[test]
fn outcome_may_arrive_before_started_notice() {
    init_logging();
    let (state, _) = update(
        finished_stream(),
        Msg::AnalysisFinished {
            session: 1,
            outcome: AnalysisOutcome::Rendered("ok".into()),
        },
    );
    assert_eq!(state.session(), SessionState::Complete);

    // A late started notice must not reopen the analysis phase.
    let (state, _) = update(state, Msg::AnalysisStarted { session: 1 });
    assert_eq!(state.session(), SessionState::Complete);
}

#[test]
fn outcome_for_superseded_session_is_ignored() {
    init_logging();
    let (state, _) = update(finished_stream(), Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::AnalysisFinished {
            session: 1,
            outcome: AnalysisOutcome::Rendered("stale".into()),
        },
    );

    let view = state.view();
    assert_eq!(view.session, SessionState::Connecting);
    assert!(view.analysis.is_none());
}

#[test]
fn second_outcome_for_same_session_is_ignored() {
    init_logging();
    let state = finish(finished_stream(), AnalysisOutcome::Rendered("first".into()));
    let (state, _) = update(
        state,
        Msg::AnalysisFinished {
            session: 1,
            outcome: AnalysisOutcome::Failed("second".into()),
        },
    );
    assert_eq!(state.view().analysis.unwrap().markup, "first");
}

#[test]
fn new_start_clears_previous_analysis() {
    init_logging();
    let state = finish(finished_stream(), AnalysisOutcome::Rendered("done".into()));
    let (state, effects) = update(state, Msg::StartClicked);

    assert_eq!(
        effects,
        vec![Effect::OpenStream {
            session: 2,
            signal_count: paywatch_core::DEFAULT_SIGNAL_COUNT
        }]
    );
    let view = state.view();
    assert!(view.analysis.is_none());
    assert!(view.log.is_empty());
    assert!(!view.start_control.enabled);
}

#[test]
fn engine_stop_during_analysis_fails_the_session() {
    init_logging();
    let (state, _) = update(finished_stream(), Msg::AnalysisStarted { session: 1 });

    let (state, effects) = update(state, Msg::EngineStopped);
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.session, SessionState::Complete);
    assert_eq!(view.status_text, "Error");
    assert_eq!(view.start_control.label, START_LABEL);
    let panel = view.analysis.expect("analysis panel shown");
    assert!(panel.is_error);
    assert!(panel.markup.contains("Failed: analysis engine stopped"));
}
