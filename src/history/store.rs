use anyhow::{Context, Result};

use crate::{
    log_info,
    prefs::{PrefError, Preferences},
};

use super::codec::{join_history, parse_field, parse_history};

const ENABLE_LOGS: bool = true;

pub const HISTORY_NAMESPACE: &str = "timer_history";
pub const HISTORY_KEY: &str = "history";

/// Reads and writes completed session durations under a single preference key.
#[derive(Clone)]
pub struct HistoryStore {
    prefs: Preferences,
}

impl HistoryStore {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    /// Loads the stored history, migrating the legacy string-set form on first read.
    pub async fn load(&self) -> Result<Vec<u64>> {
        match self.prefs.get_string(HISTORY_NAMESPACE, HISTORY_KEY).await {
            Ok(Some(raw)) => Ok(parse_history(&raw)),
            Ok(None) => Ok(Vec::new()),
            Err(err) if is_type_mismatch(&err) => self.migrate_legacy().await,
            Err(err) => Err(err.context("failed to read session history")),
        }
    }

    /// Overwrites the stored history with `entries`.
    pub async fn save_all(&self, entries: &[u64]) -> Result<()> {
        self.prefs
            .put_string(HISTORY_NAMESPACE, HISTORY_KEY, join_history(entries))
            .await
            .context("failed to save session history")
    }

    /// Read-modify-write of a single entry against storage, independent of any
    /// in-memory list. Returns the list that was written.
    pub async fn append_and_save(&self, duration_secs: u64) -> Result<Vec<u64>> {
        let mut entries = self.load().await?;
        entries.push(duration_secs);
        self.save_all(&entries).await?;
        Ok(entries)
    }

    async fn migrate_legacy(&self) -> Result<Vec<u64>> {
        let legacy = self
            .prefs
            .get_string_set(HISTORY_NAMESPACE, HISTORY_KEY)
            .await
            .context("failed to read legacy session history")?
            .unwrap_or_default();

        let entries: Vec<u64> = legacy.iter().filter_map(|v| parse_field(v)).collect();

        // Writing the string form replaces the set row in place.
        self.save_all(&entries).await?;

        log_info!(
            "Migrated legacy session history ({} of {} entries kept)",
            entries.len(),
            legacy.len()
        );

        Ok(entries)
    }
}

fn is_type_mismatch(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PrefError>(),
        Some(PrefError::TypeMismatch { .. })
    )
}
