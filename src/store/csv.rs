//! CSV-file backend for the three entity stores.
//!
//! Loads never fail: a missing, empty, or undecodable file is an empty
//! table, and individual rows that will not deserialize are skipped with a
//! warning. Writes rewrite the whole table through a temp file and rename,
//! so a reader observes either the prior state or the new one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::Config;
use crate::error::StoreError;
use crate::store::{ActionRecord, ActionStore, GoalRecord, GoalStore, VisitRow, VisitStore};

/// File-backed stores for visits, goals, and action plans.
#[derive(Debug, Clone)]
pub struct CsvStores {
    visits_path: PathBuf,
    goals_path: PathBuf,
    actions_path: PathBuf,
}

impl CsvStores {
    pub fn new(visits_path: PathBuf, goals_path: PathBuf, actions_path: PathBuf) -> Self {
        Self {
            visits_path,
            goals_path,
            actions_path,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.visits_path.clone(),
            config.goals_path.clone(),
            config.actions_path.clone(),
        )
    }
}

#[async_trait]
impl VisitStore for CsvStores {
    async fn load_visits(&self) -> Result<Vec<VisitRow>, StoreError> {
        Ok(load_table(&self.visits_path))
    }
}

#[async_trait]
impl GoalStore for CsvStores {
    async fn load_goals(&self) -> Result<Vec<GoalRecord>, StoreError> {
        Ok(load_table(&self.goals_path))
    }

    async fn save_goals(&self, goals: &[GoalRecord]) -> Result<(), StoreError> {
        save_table(&self.goals_path, goals)
    }
}

#[async_trait]
impl ActionStore for CsvStores {
    async fn load_actions(&self) -> Result<Vec<ActionRecord>, StoreError> {
        Ok(load_table(&self.actions_path))
    }

    async fn save_actions(&self, actions: &[ActionRecord]) -> Result<(), StoreError> {
        save_table(&self.actions_path, actions)
    }
}

/// Read every parseable row of a CSV file; degrade everything else.
fn load_table<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let raw = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("failed to read store {:?}, treating as empty: {}", path, e);
            return Vec::new();
        }
    };

    // Historical exports were not always UTF-8; decode lossily rather than
    // abort the whole load over one accented byte.
    let text = String::from_utf8_lossy(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("skipping malformed row in {:?}: {}", path, e),
        }
    }
    rows
}

/// Rewrite a whole table atomically (temp file, then rename over).
fn save_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes = writer.into_inner().map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other(e.to_string()),
    })?;

    let tmp = path.with_extension("csv.tmp");
    std::fs::write(&tmp, bytes).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
