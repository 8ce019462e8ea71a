//! Render model for the single stopwatch screen.

use serde::Serialize;

use crate::{format::format_elapsed, settings::HistorySettings, timer::TimerSnapshot};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    /// 1-based position in display order.
    pub number: usize,
    pub duration_secs: u64,
    pub display: String,
}

/// Orders `entries` for display and numbers the rows from 1.
pub fn history_rows(entries: &[u64], settings: HistorySettings) -> Vec<HistoryRow> {
    let mut ordered: Vec<u64> = entries.to_vec();
    if settings.newest_first {
        ordered.reverse();
    }

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, duration_secs)| HistoryRow {
            number: index + 1,
            duration_secs,
            display: format_elapsed(duration_secs),
        })
        .collect()
}

pub fn row_value(rows: &[HistoryRow], number: usize) -> Option<u64> {
    rows.iter()
        .find(|row| row.number == number)
        .map(|row| row.duration_secs)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub time: String,
    pub toggle_label: &'static str,
    pub rows: Vec<HistoryRow>,
    pub status: Option<String>,
}

impl Screen {
    pub fn build(
        snapshot: &TimerSnapshot,
        entries: &[u64],
        settings: HistorySettings,
        status: Option<&str>,
    ) -> Self {
        Self {
            time: snapshot.display.clone(),
            toggle_label: if snapshot.state.is_running() { "Pause" } else { "Start" },
            rows: history_rows(entries, settings),
            status: status.map(str::to_string),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "\n        {}\n\n  [ {} ]  [ Reset ]  [ Stop ]\n\n  History\n",
            self.time, self.toggle_label
        );

        if self.rows.is_empty() {
            out.push_str("    (no sessions yet)\n");
        }
        for row in &self.rows {
            out.push_str(&format!(
                "  {:>3}.  {}    [delete: d {}]\n",
                row.number, row.display, row.number
            ));
        }

        out.push('\n');
        if let Some(status) = &self.status {
            out.push_str(&format!("  {status}\n"));
        }
        out.push_str("  t start/pause | r reset | s stop | d N delete | q quit\n> ");

        out
    }
}
