#![deny(missing_docs)]
//! Session-tagged logging for the paywatch workspace.
//!
//! Every `watch_*` macro forwards to the `log` facade and prefixes the
//! message with the stream session that the current thread is working on,
//! so interleaved output from a superseded session stays attributable.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Session the current thread is logging on behalf of. Zero means none.
    static LOG_SESSION: Cell<u64> = const { Cell::new(0) };
}

/// Tags subsequent log lines on this thread with `session`.
///
/// Pass `0` to clear the tag.
pub fn set_log_session(session: u64) {
    LOG_SESSION.with(|v| v.set(session));
}

/// Session tag for the current thread, or 0 when none is set.
pub fn current_log_session() -> u64 {
    LOG_SESSION.with(|v| v.get())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __watch_log {
    ($level:ident, $($arg:tt)*) => {{
        let session = $crate::current_log_session();
        if session == 0 {
            $crate::log::$level!($($arg)*);
        } else {
            $crate::log::$level!("[session {}] {}", session, format_args!($($arg)*));
        }
    }};
}

/// Logs a trace-level message tagged with the current session.
#[macro_export]
macro_rules! watch_trace {
    ($($arg:tt)*) => { $crate::__watch_log!(trace, $($arg)*) };
}

/// Logs a debug-level message tagged with the current session.
#[macro_export]
macro_rules! watch_debug {
    ($($arg:tt)*) => { $crate::__watch_log!(debug, $($arg)*) };
}

/// Logs an info-level message tagged with the current session.
#[macro_export]
macro_rules! watch_info {
    ($($arg:tt)*) => { $crate::__watch_log!(info, $($arg)*) };
}

/// Logs a warn-level message tagged with the current session.
#[macro_export]
macro_rules! watch_warn {
    ($($arg:tt)*) => { $crate::__watch_log!(warn, $($arg)*) };
}

/// Logs an error-level message tagged with the current session.
#[macro_export]
macro_rules! watch_error {
    ($($arg:tt)*) => { $crate::__watch_log!(error, $($arg)*) };
}

/// Initializes a terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{current_log_session, set_log_session};

    #[test]
    fn session_tag_is_per_thread() {
        set_log_session(7);
        assert_eq!(current_log_session(), 7);

        let other = std::thread::spawn(current_log_session).join().unwrap();
        assert_eq!(other, 0);

        set_log_session(0);
        assert_eq!(current_log_session(), 0);
    }

    #[test]
    fn macros_accept_format_arguments() {
        super::initialize_for_tests();
        set_log_session(3);
        watch_info!("signal {} of {}", 1, 2);
        watch_debug!("plain message");
        set_log_session(0);
        watch_warn!("untagged {}", "warning");
    }
}
