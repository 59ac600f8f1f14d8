use crate::{AppViewModel, ControlView, LogEntry};

/// Named ports of the display. Implementations own all widget specifics.
pub trait DisplaySurface {
    fn set_start_control(&mut self, enabled: bool, label: &str);
    fn clear_log(&mut self);
    fn append_log(&mut self, entry: &LogEntry);
    fn scroll_log_to_end(&mut self);
    fn set_status(&mut self, text: &str);
    fn hide_analysis(&mut self);
    fn set_analysis_result(&mut self, markup: &str);
    fn reveal_analysis(&mut self);
    fn scroll_to_analysis(&mut self);
}

/// Pushes the difference between successive view models into a surface.
#[derive(Debug, Default)]
pub struct Presenter {
    log_generation: Option<u64>,
    entries_shown: usize,
    status: Option<String>,
    control: Option<ControlView>,
    analysis_shown: bool,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present(&mut self, view: &AppViewModel, surface: &mut dyn DisplaySurface) {
        if self.control.as_ref() != Some(&view.start_control) {
            surface.set_start_control(view.start_control.enabled, view.start_control.label);
            self.control = Some(view.start_control.clone());
        }

        if self.log_generation != Some(view.log_generation) {
            if self.log_generation.is_some() {
                surface.clear_log();
            }
            self.log_generation = Some(view.log_generation);
            self.entries_shown = 0;
        }

        if self.analysis_shown && view.analysis.is_none() {
            surface.set_analysis_result("");
            surface.hide_analysis();
            self.analysis_shown = false;
        }

        if view.log.len() > self.entries_shown {
            for entry in &view.log[self.entries_shown..] {
                surface.append_log(entry);
            }
            self.entries_shown = view.log.len();
            surface.scroll_log_to_end();
        }

        if self.status.as_deref() != Some(view.status_text.as_str()) {
            surface.set_status(&view.status_text);
            self.status = Some(view.status_text.clone());
        }

        if let Some(panel) = view.analysis.as_ref().filter(|_| !self.analysis_shown) {
            surface.set_analysis_result(&panel.markup);
            surface.reveal_analysis();
            surface.scroll_to_analysis();
            self.analysis_shown = true;
        }
    }
}
