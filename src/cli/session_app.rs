//! Interactive session runner
//!
//! Reads single-word commands from stdin and drives the controller until
//! `q`, end of input, or Ctrl-C.

use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::domain::config::AppConfig;

use super::app::{build_controller, DesktopController, EXIT_SUCCESS};
use super::input::SessionCommand;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Run the interactive recorder/player
pub async fn run_session(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let controller = build_controller(&config);

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    presenter.info(&format!(
        "Recordings go to {}",
        config.recordings_dir_or_default().display()
    ));
    presenter.controls();
    presenter.session_status(&controller.state(), None);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = controller.subscribe();
    updates.borrow_and_update();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        presenter.error(&format!("Failed to read input: {}", e));
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(SessionCommand::Help) => presenter.controls(),
                    Ok(command) => {
                        dispatch(&controller, command, &presenter).await;
                        // Changes made here are reported below, not by the watcher
                        updates.borrow_and_update();
                        presenter.session_status(&controller.state(), controller.last_error().as_ref());
                    }
                    Err(e) => presenter.warn(&e.to_string()),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *updates.borrow_and_update();
                if !state.is_playing {
                    presenter.success("Playback finished");
                }
                presenter.session_status(&state, None);
            }
            _ = shutdown.wait() => {
                debug!("interrupted");
                break;
            }
        }
    }

    controller.shutdown().await;
    if let Some(asset) = controller.asset() {
        presenter.info(&format!("Last recording: {}", asset));
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Run one command; failures surface through the session's last error
async fn dispatch(controller: &DesktopController, command: SessionCommand, presenter: &Presenter) {
    let state = controller.state();
    let outcome = match command {
        SessionCommand::Record if state.is_recording => {
            let outcome = controller.stop_recording().await;
            if outcome.is_ok() {
                if let Some(asset) = controller.asset() {
                    presenter.success(&format!("Saved {}", asset));
                }
            }
            outcome
        }
        SessionCommand::Record => controller.start_recording().await,
        SessionCommand::Play if state.is_playing => controller.stop_playback().await,
        SessionCommand::Play => controller.play_recording().await,
        SessionCommand::Share => {
            let outcome = controller.share_recording().await;
            if outcome.is_ok() {
                presenter.success("Shared");
            }
            outcome
        }
        SessionCommand::Help | SessionCommand::Quit => Ok(()),
    };

    if let Err(e) = outcome {
        debug!(?command, kind = %e.kind(), "command failed");
    }
}
