use paywatch_core::{
    update, AnalysisOutcome, AppState, DisplaySurface, LogEntry, Msg, Presenter, RUNNING_LABEL,
    START_LABEL,
};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Control(bool, String),
    ClearLog,
    Append(usize, String),
    ScrollLog,
    Status(String),
    HideAnalysis,
    Result(String),
    Reveal,
    ScrollAnalysis,
}

#[derive(Default)]
struct RecordingSurface {
    calls: Vec<Call>,
}

impl RecordingSurface {
    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_start_control(&mut self, enabled: bool, label: &str) {
        self.calls.push(Call::Control(enabled, label.to_string()));
    }
    fn clear_log(&mut self) {
        self.calls.push(Call::ClearLog);
    }
    fn append_log(&mut self, entry: &LogEntry) {
        self.calls
            .push(Call::Append(entry.position, entry.amount.clone()));
    }
    fn scroll_log_to_end(&mut self) {
        self.calls.push(Call::ScrollLog);
    }
    fn set_status(&mut self, text: &str) {
        self.calls.push(Call::Status(text.to_string()));
    }
    fn hide_analysis(&mut self) {
        self.calls.push(Call::HideAnalysis);
    }
    fn set_analysis_result(&mut self, markup: &str) {
        self.calls.push(Call::Result(markup.to_string()));
    }
    fn reveal_analysis(&mut self) {
        self.calls.push(Call::Reveal);
    }
    fn scroll_to_analysis(&mut self) {
        self.calls.push(Call::ScrollAnalysis);
    }
}

fn signal(amount: f64) -> Msg {
    Msg::StreamMessage {
        session: 1,
        data: format!(r#"{{"status":"SUCCESS","currency":"USD","amount":{amount},"latency_ms":5}}"#),
    }
}

#[test]
fn initial_present_sets_control_and_status_only() {
    let mut presenter = Presenter::new();
    let mut surface = RecordingSurface::default();

    presenter.present(&AppState::new().view(), &mut surface);

    assert_eq!(
        surface.take(),
        vec![
            Call::Control(true, START_LABEL.into()),
            Call::Status("Ready".into()),
        ]
    );

    // Nothing changed, nothing pushed.
    presenter.present(&AppState::new().view(), &mut surface);
    assert!(surface.take().is_empty());
}

#[test]
fn appends_only_new_entries_and_scrolls() {
    let mut presenter = Presenter::new();
    let mut surface = RecordingSurface::default();
    let state = AppState::new();
    presenter.present(&state.view(), &mut surface);
    surface.take();

    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(state, signal(1.0));
    presenter.present(&state.view(), &mut surface);
    assert_eq!(
        surface.take(),
        vec![
            Call::Control(false, RUNNING_LABEL.into()),
            Call::ClearLog,
            Call::Append(1, "1.00".into()),
            Call::ScrollLog,
            Call::Status("Streaming... (1 signals)".into()),
        ]
    );

    let (state, _) = update(state, signal(2.5));
    let (state, _) = update(state, signal(3.0));
    presenter.present(&state.view(), &mut surface);
    assert_eq!(
        surface.take(),
        vec![
            Call::Append(2, "2.50".into()),
            Call::Append(3, "3.00".into()),
            Call::ScrollLog,
            Call::Status("Streaming... (3 signals)".into()),
        ]
    );
}

#[test]
fn analysis_is_revealed_once_and_hidden_on_restart() {
    let mut presenter = Presenter::new();
    let mut surface = RecordingSurface::default();

    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let (state, _) = update(state, signal(1.0));
    let (state, _) = update(
        state,
        Msg::StreamMessage {
            session: 1,
            data: "[DONE]".into(),
        },
    );
    let (state, _) = update(
        state,
        Msg::AnalysisFinished {
            session: 1,
            outcome: AnalysisOutcome::Rendered("<p>ok</p>".into()),
        },
    );
    presenter.present(&state.view(), &mut surface);
    let calls = surface.take();
    let tail = &calls[calls.len() - 3..];
    assert_eq!(
        tail,
        &[
            Call::Result("<p>ok</p>".into()),
            Call::Reveal,
            Call::ScrollAnalysis
        ]
    );
    assert!(calls.contains(&Call::Control(true, START_LABEL.into())));
    assert!(calls.contains(&Call::Status("Complete".into())));

    presenter.present(&state.view(), &mut surface);
    assert!(surface.take().is_empty());

    let (state, _) = update(state, Msg::StartClicked);
    presenter.present(&state.view(), &mut surface);
    assert_eq!(
        surface.take(),
        vec![
            Call::Control(false, RUNNING_LABEL.into()),
            Call::ClearLog,
            Call::Result(String::new()),
            Call::HideAnalysis,
            Call::Status("Connecting...".into()),
        ]
    );
}
