use pulldown_cmark::{html, Event, Options, Parser};

/// Turns markdown text into markup that is safe to display as-is.
pub trait MarkdownRenderer: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PulldownRenderer;

impl MarkdownRenderer for PulldownRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TABLES);
        opts.insert(Options::ENABLE_TASKLISTS);

        // Raw HTML from the analysis text is shown, never interpreted.
        let parser = Parser::new_ext(markdown, opts).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}
