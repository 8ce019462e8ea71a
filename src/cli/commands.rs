//! Command implementations.

use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, bail, Result};
use serde::Serialize;

use crate::{
    format::format_elapsed,
    settings::HistorySettings,
    view::{history_rows, run_screen, HistoryRow},
    AppState,
};

use super::{Cli, Commands};

const DATA_DIR_NAME: &str = "stopwatch";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryReport {
    sessions: Vec<HistoryRow>,
    total_secs: u64,
    total: String,
}

/// Execute the parsed CLI command.
pub async fn execute(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let app = AppState::open(&data_dir, Duration::from_millis(cli.tick_ms))?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_screen(&app).await,
        Commands::History { json } => {
            print!("{}", history_report(&app, json).await?);
            Ok(())
        }
        Commands::Delete { row } => {
            println!("{}", delete_session(&app, row).await?);
            Ok(())
        }
        Commands::Settings { newest_first } => {
            println!("{}", settings_report(&app, newest_first)?);
            Ok(())
        }
    }
}

/// Uses `explicit` when given, otherwise `<platform data dir>/stopwatch`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|dir| dir.join(DATA_DIR_NAME))
            .ok_or_else(|| anyhow!("could not determine a data directory; pass --data-dir")),
    }
}

async fn history_report(app: &AppState, json: bool) -> Result<String> {
    let entries = app.history.load().await?;
    let rows = history_rows(&entries, app.settings.history());
    let total_secs = entries.iter().fold(0u64, |acc, d| acc.saturating_add(*d));

    if json {
        let report = HistoryReport {
            sessions: rows,
            total_secs,
            total: format_elapsed(total_secs),
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&report)?));
    }

    if rows.is_empty() {
        return Ok("No sessions recorded.\n".to_string());
    }

    let mut out = String::new();
    for row in &rows {
        out.push_str(&format!("{:>4}. {}\n", row.number, row.display));
    }
    let noun = if rows.len() == 1 { "session" } else { "sessions" };
    out.push_str(&format!(
        "{} {noun}, {} total\n",
        rows.len(),
        format_elapsed(total_secs)
    ));
    Ok(out)
}

async fn delete_session(app: &AppState, row: usize) -> Result<String> {
    app.history.load().await?;

    match app.delete_history_row(row).await? {
        Some(duration) => Ok(format!("Deleted session {}", format_elapsed(duration))),
        None => bail!("no session in row {row}"),
    }
}

fn settings_report(app: &AppState, newest_first: Option<bool>) -> Result<String> {
    if let Some(newest_first) = newest_first {
        app.settings
            .update_history(HistorySettings { newest_first })?;
    }

    let current = app.settings.history();
    Ok(format!("newest_first = {}", current.newest_first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = AppState::open(dir.path(), Duration::from_secs(1)).unwrap();
        (app, dir)
    }

    #[test]
    fn test_unreadable_settings_file_opens_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(crate::SETTINGS_FILE), [0xff, 0xfe, 0x7b]).unwrap();

        let app = AppState::open(dir.path(), Duration::from_secs(1)).unwrap();

        assert_eq!(app.settings.history(), HistorySettings::default());
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/custom"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/custom"));
    }

    #[tokio::test]
    async fn test_history_report_empty() {
        let (app, _dir) = app();

        assert_eq!(
            history_report(&app, false).await.unwrap(),
            "No sessions recorded.\n"
        );
    }

    #[tokio::test]
    async fn test_history_report_lists_rows_and_total() {
        let (app, _dir) = app();
        app.history.record(5).await.unwrap();
        app.history.record(3656).await.unwrap();

        let report = history_report(&app, false).await.unwrap();

        assert_eq!(
            report,
            "   1. 00:00:05\n   2. 01:00:56\n2 sessions, 01:01:01 total\n"
        );
    }

    #[tokio::test]
    async fn test_history_report_json() {
        let (app, _dir) = app();
        app.history.record(61).await.unwrap();

        let report = history_report(&app, true).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(json["totalSecs"], 61);
        assert_eq!(json["total"], "00:01:01");
        assert_eq!(json["sessions"][0]["number"], 1);
        assert_eq!(json["sessions"][0]["display"], "00:01:01");
    }

    #[tokio::test]
    async fn test_delete_session_reads_storage() {
        let dir = tempfile::tempdir().unwrap();
        {
            let app = AppState::open(dir.path(), Duration::from_secs(1)).unwrap();
            app.history.record(7).await.unwrap();
            app.history.record(9).await.unwrap();
        }

        let app = AppState::open(dir.path(), Duration::from_secs(1)).unwrap();
        let message = delete_session(&app, 2).await.unwrap();

        assert_eq!(message, "Deleted session 00:00:09");
        assert_eq!(app.history.load().await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_delete_session_rejects_missing_row() {
        let (app, _dir) = app();

        let err = delete_session(&app, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "no session in row 1");
    }

    #[tokio::test]
    async fn test_settings_report_updates() {
        let (app, _dir) = app();

        assert_eq!(settings_report(&app, None).unwrap(), "newest_first = false");
        assert_eq!(
            settings_report(&app, Some(true)).unwrap(),
            "newest_first = true"
        );
        assert!(app.settings.history().newest_first);
    }
}
