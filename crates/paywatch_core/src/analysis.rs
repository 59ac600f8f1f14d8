/// How the analysis request for a session resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Server returned a result; holds markup already produced by the result formatter.
    Rendered(String),
    /// Server reported an application error.
    Rejected(String),
    /// The request failed or its body could not be decoded.
    Failed(String),
}

impl AnalysisOutcome {
    /// Markup for the analysis result region. Error text is always escaped.
    pub fn to_markup(&self) -> String {
        match self {
            AnalysisOutcome::Rendered(markup) => markup.clone(),
            AnalysisOutcome::Rejected(message) => {
                format!(r#"<p class="error">Error: {}</p>"#, escape_html(message))
            }
            AnalysisOutcome::Failed(description) => {
                format!(r#"<p class="error">Failed: {}</p>"#, escape_html(description))
            }
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            AnalysisOutcome::Rendered(_) | AnalysisOutcome::Rejected(_) => "Complete",
            AnalysisOutcome::Failed(_) => "Error",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, AnalysisOutcome::Rendered(_))
    }
}

/// Contents of the analysis section once it is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPanel {
    pub markup: String,
    pub is_error: bool,
}

impl From<&AnalysisOutcome> for AnalysisPanel {
    fn from(outcome: &AnalysisOutcome) -> Self {
        Self {
            markup: outcome.to_markup(),
            is_error: outcome.is_error(),
        }
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
