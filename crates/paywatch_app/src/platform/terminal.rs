use std::io::Write;

use paywatch_core::{DisplaySurface, LogEntry, StatusClass};
use paywatch_logging::watch_warn;

/// Line-oriented display surface for a terminal.
pub struct TerminalSurface<W: Write> {
    out: W,
    pending_result: String,
    write_failed: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending_result: String::new(),
            write_failed: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn notice(&mut self, text: &str) {
        self.line(&format!("  {text}"));
    }

    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            if !self.write_failed {
                watch_warn!("Terminal output failed: {}", err);
                self.write_failed = true;
            }
        }
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

/// Analysis markup read back as markdown, which a terminal shows well enough.
pub fn markup_to_text(markup: &str) -> String {
    html2md::parse_html(markup).trim().to_string()
}

pub fn format_log_line(entry: &LogEntry) -> String {
    let icon = match entry.class {
        StatusClass::Success => "[OK]",
        StatusClass::Failure => "[X] ",
    };
    format!(
        "{icon} {:<4} {:>10} | {}ms",
        entry.currency, entry.amount, entry.latency_ms
    )
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn set_start_control(&mut self, enabled: bool, label: &str) {
        if enabled {
            self.line(&format!("[{label}] press Enter to run, q to quit"));
        } else {
            self.line(&format!("[{label}]"));
        }
    }

    fn clear_log(&mut self) {
        self.line(&"-".repeat(40));
    }

    fn append_log(&mut self, entry: &LogEntry) {
        self.line(&format_log_line(entry));
    }

    fn scroll_log_to_end(&mut self) {
        self.flush();
    }

    fn set_status(&mut self, text: &str) {
        self.line(&format!("status: {text}"));
    }

    fn hide_analysis(&mut self) {
        self.pending_result.clear();
    }

    fn set_analysis_result(&mut self, markup: &str) {
        self.pending_result = markup.to_string();
    }

    fn reveal_analysis(&mut self) {
        let body = markup_to_text(&std::mem::take(&mut self.pending_result));
        self.line("===== Analysis =====");
        self.line(&body);
        self.line("====================");
    }

    fn scroll_to_analysis(&mut self) {
        self.flush();
    }
}
