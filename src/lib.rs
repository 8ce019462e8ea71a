pub mod cli;
pub mod events;
pub mod format;
pub mod history;
pub mod prefs;
pub mod settings;
pub mod timer;
pub mod utils;
pub mod view;

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;

use events::EventBus;
use history::{HistoryList, HistoryStore};
use prefs::Preferences;
use settings::SettingsStore;
use timer::TimerController;
use view::{history_rows, row_value};

pub const PREFERENCES_FILE: &str = "preferences.sqlite3";
pub const SETTINGS_FILE: &str = "settings.json";

/// Everything the screen and the CLI commands operate on, opened once per process.
pub struct AppState {
    pub events: EventBus,
    pub history: HistoryList,
    pub timer: TimerController,
    pub settings: SettingsStore,
}

impl AppState {
    pub fn open(data_dir: &Path, tick_interval: Duration) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let prefs = Preferences::open(data_dir.join(PREFERENCES_FILE))?;
        let events = EventBus::new();
        let history = HistoryList::new(HistoryStore::new(prefs), events.clone());
        let timer = TimerController::new(history.clone(), events.clone(), tick_interval);
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;

        Ok(Self {
            events,
            history,
            timer,
            settings,
        })
    }

    /// Deletes the session shown at `number` in display order. The first entry
    /// with the same duration is the one removed.
    pub async fn delete_history_row(&self, number: usize) -> Result<Option<u64>> {
        let entries = self.history.entries().await;
        let rows = history_rows(&entries, self.settings.history());
        let Some(duration) = row_value(&rows, number) else {
            return Ok(None);
        };

        self.history.delete_value(duration).await?;
        Ok(Some(duration))
    }
}

pub fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    utils::logging::init(cli.verbose);

    log::info!("Stopwatch starting up...");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    runtime.block_on(cli::execute(cli))
}
