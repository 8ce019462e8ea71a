use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistorySettings {
    /// Show the most recent session at the top of the list.
    pub newest_first: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            newest_first: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    history: HistorySettings,
}

fn load_settings(path: &Path) -> Result<UserSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse settings from {}", path.display()))
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            load_settings(&path).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings at {}: {err:#}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn history(&self) -> HistorySettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .history
    }

    pub fn update_history(&self, settings: HistorySettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.history = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
