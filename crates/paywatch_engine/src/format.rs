use serde_json::Value;

use crate::{MarkdownRenderer, PulldownRenderer};

/// Fields probed, in order, for the display text of a structured result.
const TEXT_FIELDS: [&str; 4] = ["content", "text", "output", "message"];

/// Normalizes an analysis payload into display markup.
#[derive(Debug, Default, Clone)]
pub struct ResultFormatter<R = PulldownRenderer> {
    renderer: R,
}

impl<R: MarkdownRenderer> ResultFormatter<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn format(&self, text: &str) -> String {
        let content = extract_display_text(text);
        self.renderer.to_html(&expand_escapes(&content))
    }
}

/// Picks the human-readable part of `text` when it is a JSON document.
///
/// Objects yield the first non-empty string among [`TEXT_FIELDS`], otherwise
/// their compact serialization. Anything that does not parse (or parses to
/// `null`) is returned unchanged.
pub fn extract_display_text(text: &str) -> String {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(Value::Null) | Err(_) => return text.to_string(),
        Ok(value) => value,
    };

    if let Value::Object(fields) = &parsed {
        let found = TEXT_FIELDS
            .iter()
            .filter_map(|name| fields.get(*name))
            .find_map(|value| value.as_str().filter(|s| !s.is_empty()));
        if let Some(found) = found {
            return found.to_string();
        }
    }
    parsed.to_string()
}

/// Replaces literal `\n` with a line break and literal `\t` with two spaces.
pub fn expand_escapes(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "  ")
}
