use std::collections::BTreeSet;

use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::prefs::{PrefError, PrefKind, PrefValue, Preferences};

impl Preferences {
    pub async fn get(&self, namespace: &str, key: &str) -> Result<Option<PrefValue>> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        self.execute(move |conn| {
            let row = conn
                .query_row(
                    "SELECT kind, value FROM preferences WHERE namespace = ?1 AND key = ?2",
                    params![namespace, key],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;

            match row {
                Some((kind, raw)) => Ok(Some(PrefValue::decode(PrefKind::parse(&kind)?, raw)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Reads a string value. Fails with [`PrefError::TypeMismatch`] if the key holds a set.
    pub async fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        match self.get(namespace, key).await? {
            None => Ok(None),
            Some(PrefValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(PrefError::TypeMismatch {
                namespace: namespace.to_string(),
                key: key.to_string(),
                expected: PrefKind::String,
                found: other.kind(),
            }
            .into()),
        }
    }

    /// Reads a string set. Fails with [`PrefError::TypeMismatch`] if the key holds a string.
    pub async fn get_string_set(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<BTreeSet<String>>> {
        match self.get(namespace, key).await? {
            None => Ok(None),
            Some(PrefValue::StringSet(values)) => Ok(Some(values)),
            Some(other) => Err(PrefError::TypeMismatch {
                namespace: namespace.to_string(),
                key: key.to_string(),
                expected: PrefKind::StringSet,
                found: other.kind(),
            }
            .into()),
        }
    }

    /// Writes `value`, replacing whatever the key held before regardless of its kind.
    pub async fn put(&self, namespace: &str, key: &str, value: PrefValue) -> Result<()> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO preferences (namespace, key, kind, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(namespace, key) DO UPDATE SET
                     kind = excluded.kind,
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![
                    namespace,
                    key,
                    value.kind().as_str(),
                    value.encode()?,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn put_string(&self, namespace: &str, key: &str, value: String) -> Result<()> {
        self.put(namespace, key, PrefValue::String(value)).await
    }

    pub async fn put_string_set(
        &self,
        namespace: &str,
        key: &str,
        values: BTreeSet<String>,
    ) -> Result<()> {
        self.put(namespace, key, PrefValue::StringSet(values)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let prefs = Preferences::open_in_memory().unwrap();

        assert_eq!(prefs.get("ns", "missing").await.unwrap(), None);
        assert_eq!(prefs.get_string("ns", "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_string_overwrites() {
        let prefs = Preferences::open_in_memory().unwrap();

        prefs.put_string("ns", "k", "first".into()).await.unwrap();
        prefs.put_string("ns", "k", "second".into()).await.unwrap();

        assert_eq!(
            prefs.get_string("ns", "k").await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let prefs = Preferences::open_in_memory().unwrap();

        prefs.put_string("a", "k", "one".into()).await.unwrap();
        prefs.put_string("b", "k", "two".into()).await.unwrap();

        assert_eq!(prefs.get_string("a", "k").await.unwrap(), Some("one".into()));
        assert_eq!(prefs.get_string("b", "k").await.unwrap(), Some("two".into()));
    }

    #[tokio::test]
    async fn test_reading_set_as_string_is_type_mismatch() {
        let prefs = Preferences::open_in_memory().unwrap();
        prefs
            .put_string_set("ns", "k", BTreeSet::from(["1".to_string()]))
            .await
            .unwrap();

        let err = prefs.get_string("ns", "k").await.unwrap_err();
        match err.downcast_ref::<PrefError>() {
            Some(PrefError::TypeMismatch { expected, found, .. }) => {
                assert_eq!(*expected, PrefKind::String);
                assert_eq!(*found, PrefKind::StringSet);
            }
            None => panic!("expected a type mismatch, got {err:#}"),
        }
    }

    #[tokio::test]
    async fn test_put_replaces_kind() {
        let prefs = Preferences::open_in_memory().unwrap();
        prefs
            .put_string_set("ns", "k", BTreeSet::from(["1".to_string()]))
            .await
            .unwrap();

        prefs.put_string("ns", "k", "1".into()).await.unwrap();

        assert_eq!(
            prefs.get("ns", "k").await.unwrap(),
            Some(PrefValue::String("1".into()))
        );
        assert!(prefs.get_string_set("ns", "k").await.is_err());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.sqlite3");

        {
            let prefs = Preferences::open(path.clone()).unwrap();
            prefs.put_string("ns", "k", "kept".into()).await.unwrap();
        }

        let prefs = Preferences::open(path).unwrap();
        assert_eq!(prefs.get_string("ns", "k").await.unwrap(), Some("kept".into()));
    }
}
