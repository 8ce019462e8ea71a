use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::events::{AppEvent, EventBus};

use super::HistoryStore;

/// In-memory session history. This list is authoritative; every mutation is
/// followed by a full save of the list.
#[derive(Clone)]
pub struct HistoryList {
    entries: Arc<Mutex<Vec<u64>>>,
    store: HistoryStore,
    events: EventBus,
}

impl HistoryList {
    pub fn new(store: HistoryStore, events: EventBus) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            store,
            events,
        }
    }

    /// Replaces the in-memory list with what storage holds.
    pub async fn load(&self) -> Result<Vec<u64>> {
        let loaded = self.store.load().await?;
        let snapshot = {
            let mut guard = self.entries.lock().await;
            *guard = loaded;
            guard.clone()
        };
        self.events.emit(AppEvent::HistoryChanged(snapshot.clone()));
        Ok(snapshot)
    }

    pub async fn entries(&self) -> Vec<u64> {
        self.entries.lock().await.clone()
    }

    /// Appends a completed session and persists the whole list.
    pub async fn record(&self, duration_secs: u64) -> Result<()> {
        let mut guard = self.entries.lock().await;
        guard.push(duration_secs);
        let snapshot = guard.clone();
        self.events.emit(AppEvent::HistoryChanged(snapshot.clone()));
        self.store.save_all(&snapshot).await
    }

    /// Removes the first entry equal to `duration_secs`. With duplicates this is
    /// not necessarily the row the caller looked at.
    pub async fn delete_value(&self, duration_secs: u64) -> Result<bool> {
        let mut guard = self.entries.lock().await;
        let Some(position) = guard.iter().position(|&entry| entry == duration_secs) else {
            return Ok(false);
        };
        guard.remove(position);
        let snapshot = guard.clone();
        self.events.emit(AppEvent::HistoryChanged(snapshot.clone()));
        self.store.save_all(&snapshot).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::Preferences;

    fn history() -> (HistoryList, HistoryStore, EventBus) {
        let store = HistoryStore::new(Preferences::open_in_memory().unwrap());
        let events = EventBus::new();
        (HistoryList::new(store.clone(), events.clone()), store, events)
    }

    #[tokio::test]
    async fn test_load_replaces_entries() {
        let (list, store, _) = history();
        store.save_all(&[4, 8]).await.unwrap();

        assert_eq!(list.load().await.unwrap(), vec![4, 8]);
        assert_eq!(list.entries().await, vec![4, 8]);

        store.save_all(&[1]).await.unwrap();
        list.load().await.unwrap();
        assert_eq!(list.entries().await, vec![1]);
    }

    #[tokio::test]
    async fn test_record_persists_full_list() {
        let (list, store, _) = history();

        list.record(5).await.unwrap();
        list.record(12).await.unwrap();

        assert_eq!(list.entries().await, vec![5, 12]);
        assert_eq!(store.load().await.unwrap(), vec![5, 12]);
    }

    #[tokio::test]
    async fn test_record_overwrites_diverged_storage() {
        let (list, store, _) = history();
        list.record(5).await.unwrap();
        store.save_all(&[99, 98]).await.unwrap();

        list.record(6).await.unwrap();

        assert_eq!(store.load().await.unwrap(), vec![5, 6]);
    }

    #[tokio::test]
    async fn test_delete_removes_first_duplicate_only() {
        let (list, store, _) = history();
        store.save_all(&[30, 10, 30, 20]).await.unwrap();
        list.load().await.unwrap();

        assert!(list.delete_value(30).await.unwrap());

        assert_eq!(list.entries().await, vec![10, 30, 20]);
        assert_eq!(store.load().await.unwrap(), vec![10, 30, 20]);
    }

    #[tokio::test]
    async fn test_delete_missing_value_writes_nothing() {
        let (list, store, _) = history();
        list.record(1).await.unwrap();

        assert!(!list.delete_value(2).await.unwrap());
        assert_eq!(store.load().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_mutations_emit_history_changed() {
        let (list, _, events) = history();
        let mut rx = events.subscribe();

        list.record(3).await.unwrap();
        list.delete_value(3).await.unwrap();

        for expected in [vec![3], vec![]] {
            match rx.recv().await.unwrap() {
                AppEvent::HistoryChanged(entries) => assert_eq!(entries, expected),
                other => panic!("unexpected event {other:?}"),
            }
        }
    }
}
