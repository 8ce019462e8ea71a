use anyhow::{Context, Result};
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::broadcast::error::RecvError,
};

use crate::{format::format_elapsed, log_error, log_warn, AppState};

use super::{
    input::{parse_action, UserAction, HELP},
    screen::Screen,
};

const ENABLE_LOGS: bool = true;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Runs the interactive screen until the user quits or input closes.
pub async fn run_screen(app: &AppState) -> Result<()> {
    let mut events = app.events.subscribe();

    let mut status = match app.history.load().await {
        Ok(_) => None,
        Err(err) => {
            log_error!("Failed to load session history: {err:#}");
            Some(format!("Could not load history: {err:#}"))
        }
    };

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    redraw(app, &mut stdout, status.as_deref()).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                match parse_action(&line) {
                    Some(UserAction::Quit) => break,
                    Some(action) => status = dispatch(app, action).await,
                    None => {
                        status = Some(format!("Unknown command {:?}. Type h for help.", line.trim()));
                    }
                }
            }
            event = events.recv() => match event {
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
        }

        redraw(app, &mut stdout, status.as_deref()).await?;
    }

    if app.timer.is_running().await {
        log_warn!("Exiting with the stopwatch running; the current session was not recorded");
    }
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

/// Applies one user action. Returns the status line to show, if any.
pub async fn dispatch(app: &AppState, action: UserAction) -> Option<String> {
    match action {
        UserAction::Toggle => {
            app.timer.toggle().await;
            None
        }
        UserAction::Reset => {
            app.timer.reset().await;
            None
        }
        UserAction::Stop => match app.timer.stop().await {
            Ok(Some(duration)) => Some(format!("Saved session {}", format_elapsed(duration))),
            Ok(None) => None,
            Err(err) => {
                log_error!("Failed to save session: {err:#}");
                Some(format!("Failed to save session: {err:#}"))
            }
        },
        UserAction::Delete(number) => match app.delete_history_row(number).await {
            Ok(Some(duration)) => Some(format!("Deleted session {}", format_elapsed(duration))),
            Ok(None) => Some(format!("No session in row {number}")),
            Err(err) => {
                log_error!("Failed to delete session: {err:#}");
                Some(format!("Failed to delete session: {err:#}"))
            }
        },
        UserAction::Help => Some(HELP.to_string()),
        UserAction::Quit => None,
    }
}

async fn redraw(app: &AppState, stdout: &mut io::Stdout, status: Option<&str>) -> Result<()> {
    let snapshot = app.timer.get_snapshot().await;
    let entries = app.history.entries().await;
    let screen = Screen::build(&snapshot, &entries, app.settings.history(), status);

    stdout.write_all(CLEAR_SCREEN.as_bytes()).await?;
    stdout.write_all(screen.render().as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
