use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::bail;
use paywatch_core::{update, AppState, Msg, Presenter, SessionId, SessionState};
use paywatch_logging::{set_log_session, watch_error, watch_info};

use super::config::{self, Cli};
use super::effects::EffectRunner;
use super::logging;
use super::report;
use super::terminal::TerminalSurface;

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = config::load(&cli)?;
    logging::initialize(config.log_destination, cli.log_level());
    watch_info!(
        "paywatch starting against {} ({} signals per session)",
        config.base_url,
        config.signal_count
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(config.engine_settings(), msg_tx.clone());
    let quit = Arc::new(AtomicBool::new(false));
    spawn_input_reader(msg_tx.clone(), quit.clone(), !cli.once);

    let mut state = AppState::with_signal_count(config.signal_count);
    let mut presenter = Presenter::new();
    let mut surface = TerminalSurface::new(io::stdout());
    presenter.present(&state.view(), &mut surface);

    if cli.once {
        let _ = msg_tx.send(Msg::StartClicked);
    }

    let mut reported: SessionId = 0;
    while let Ok(msg) = msg_rx.recv() {
        if quit.load(Ordering::Relaxed) {
            break;
        }
        if msg == Msg::StartClicked && !state.view().start_control.enabled {
            surface.notice("A session is already running.");
            continue;
        }

        let engine_stopped = msg == Msg::EngineStopped;
        let (next, effects) = update(state, msg);
        state = next;
        set_log_session(state.session_id());
        runner.enqueue(effects);

        let dirty = state.consume_dirty();
        let view = state.view();
        if dirty {
            presenter.present(&view, &mut surface);
        }
        if engine_stopped {
            surface.notice("The network engine stopped; exiting.");
            bail!("engine worker stopped");
        }
        if !dirty {
            continue;
        }

        if view.session == SessionState::Complete && reported != view.session_id {
            reported = view.session_id;
            if let Some(path) = &config.report_path {
                match report::write_report(&view, path) {
                    Ok(()) => surface.notice(&format!("Report written to {}", path.display())),
                    Err(err) => watch_error!("Failed to write report {:?}: {}", path, err),
                }
            }
        }

        if cli.once {
            match view.session {
                SessionState::Complete => break,
                SessionState::Error => {
                    bail!("session {} lost its stream connection", view.session_id)
                }
                _ => {}
            }
        }
    }

    watch_info!("paywatch exiting");
    Ok(())
}

/// Enter presses the start control; `q` quits. End of input quits too unless
/// the run is unattended.
fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>, quit_on_eof: bool) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().eq_ignore_ascii_case("q") {
                quit.store(true, Ordering::Relaxed);
                let _ = msg_tx.send(Msg::Tick);
                return;
            }
            if msg_tx.send(Msg::StartClicked).is_err() {
                return;
            }
        }
        if quit_on_eof {
            quit.store(true, Ordering::Relaxed);
            let _ = msg_tx.send(Msg::Tick);
        }
    });
}
