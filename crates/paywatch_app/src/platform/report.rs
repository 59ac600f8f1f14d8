use std::path::Path;

use chrono::Utc;
use paywatch_core::{escape_html, AppViewModel, DisplaySurface, LogEntry, Presenter};
use paywatch_engine::{write_atomically, PersistError};

/// Display surface that accumulates a standalone HTML page.
#[derive(Debug, Default)]
pub struct HtmlReport {
    control: String,
    log_items: Vec<String>,
    status: String,
    analysis_markup: String,
    analysis_visible: bool,
}

impl HtmlReport {
    pub fn from_view(view: &AppViewModel) -> Self {
        let mut report = Self::default();
        Presenter::new().present(view, &mut report);
        report
    }

    pub fn render_document(&self, generated_at: &str) -> String {
        let analysis_class = if self.analysis_visible { "" } else { " hidden" };
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Payment signal analysis</title>
<style>
.hidden{{display:none}}
.status-success{{color:#2ea043}}
.status-fail{{color:#f85149}}
.error{{color:#f85149}}
.log-item span{{margin-right:1em}}
</style>
</head>
<body>
<p class="generated">Generated {generated}</p>
<button id="startBtn" disabled>{control}</button>
<div id="status">{status}</div>
<div id="stream-output">
{log}
</div>
<section id="analysis-section" class="analysis{analysis_class}">
<div id="analysis-result">
{analysis}
</div>
</section>
</body>
</html>
"#,
            generated = escape_html(generated_at),
            control = escape_html(&self.control),
            status = escape_html(&self.status),
            log = self.log_items.join("\n"),
            analysis = self.analysis_markup,
        )
    }
}

impl DisplaySurface for HtmlReport {
    fn set_start_control(&mut self, _enabled: bool, label: &str) {
        self.control = label.to_string();
    }

    fn clear_log(&mut self) {
        self.log_items.clear();
    }

    fn append_log(&mut self, entry: &LogEntry) {
        self.log_items.push(format!(
            r#"<div class="log-item"><span class="{}">{}</span><span>{}</span><span>{}</span><span>{}ms</span></div>"#,
            entry.class.css_class(),
            escape_html(&entry.status),
            escape_html(&entry.currency),
            escape_html(&entry.amount),
            escape_html(&entry.latency_ms),
        ));
    }

    fn scroll_log_to_end(&mut self) {}

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn hide_analysis(&mut self) {
        self.analysis_visible = false;
    }

    fn set_analysis_result(&mut self, markup: &str) {
        self.analysis_markup = markup.to_string();
    }

    fn reveal_analysis(&mut self) {
        self.analysis_visible = true;
    }

    fn scroll_to_analysis(&mut self) {}
}

pub fn write_report(view: &AppViewModel, path: &Path) -> Result<(), PersistError> {
    let document = HtmlReport::from_view(view).render_document(&Utc::now().to_rfc3339());
    write_atomically(path, &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paywatch_core::{update, AnalysisOutcome, AppState, Msg};
    use tempfile::TempDir;

    fn completed_view() -> AppViewModel {
        let (state, _) = update(AppState::new(), Msg::StartClicked);
        let (state, _) = update(
            state,
            Msg::StreamMessage {
                session: 1,
                data: r#"{"status":"DECLINED","currency":"<b>","amount":"1e3","latency_ms":12}"#
                    .into(),
            },
        );
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
                outcome: AnalysisOutcome::Rejected("<script>x</script>".into()),
            },
        );
        state.view()
    }

    #[test]
    fn report_escapes_log_fields_and_shows_analysis() {
        let html = HtmlReport::from_view(&completed_view()).render_document("now");

        assert!(html.contains(r#"<span class="status-fail">DECLINED</span>"#));
        assert!(html.contains("<span>&lt;b&gt;</span>"));
        assert!(html.contains("<span>1e3</span>"));
        assert!(html.contains(r#"<section id="analysis-section" class="analysis">"#));
        assert!(html.contains("Error: &lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"<div id="status">Complete</div>"#));
    }

    #[test]
    fn idle_report_hides_analysis() {
        let html = HtmlReport::from_view(&AppState::new().view()).render_document("now");
        assert!(html.contains(r#"class="analysis hidden""#));
        assert!(html.contains(r#"<div id="status">Ready</div>"#));
    }

    #[test]
    fn write_report_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports").join("last.html");
        write_report(&completed_view(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
