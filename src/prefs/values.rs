use std::{collections::BTreeSet, fmt};

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKind {
    String,
    StringSet,
}

impl PrefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefKind::String => "string",
            PrefKind::StringSet => "string_set",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "string" => Ok(PrefKind::String),
            "string_set" => Ok(PrefKind::StringSet),
            other => Err(anyhow!("unknown preference kind {other}")),
        }
    }
}

impl fmt::Display for PrefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored preference. String sets are unordered; iteration follows string order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    String(String),
    StringSet(BTreeSet<String>),
}

impl PrefValue {
    pub fn kind(&self) -> PrefKind {
        match self {
            PrefValue::String(_) => PrefKind::String,
            PrefValue::StringSet(_) => PrefKind::StringSet,
        }
    }

    /// Column text for the `value` field. Sets are stored as a JSON array.
    pub fn encode(&self) -> Result<String> {
        match self {
            PrefValue::String(value) => Ok(value.clone()),
            PrefValue::StringSet(values) => {
                serde_json::to_string(values).context("failed to encode string set")
            }
        }
    }

    pub fn decode(kind: PrefKind, raw: String) -> Result<Self> {
        match kind {
            PrefKind::String => Ok(PrefValue::String(raw)),
            PrefKind::StringSet => serde_json::from_str::<BTreeSet<String>>(&raw)
                .map(PrefValue::StringSet)
                .context("failed to decode string set"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrefError {
    #[error("preference {namespace}/{key} holds a {found} value, expected {expected}")]
    TypeMismatch {
        namespace: String,
        key: String,
        expected: PrefKind,
        found: PrefKind,
    },
}
