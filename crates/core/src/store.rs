//! The day-key → bucket mapping and its persistence contract.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::LoadError;
use crate::model::{DayKey, Task, TaskStats};

/// Name of the blob holding the whole mapping.
pub const STORAGE_KEY: &str = "weekdo.tasks";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskMap {
    days: BTreeMap<DayKey, Vec<Task>>,
}

impl TaskMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bucket for `key`, or an empty slice. Never creates the entry.
    pub fn get(&self, key: &DayKey) -> &[Task] {
        self.days.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A new mapping with `key` replaced by `bucket`; `self` is left untouched.
    pub fn set(&self, key: DayKey, bucket: Vec<Task>) -> Self {
        let mut days = self.days.clone();
        days.insert(key, bucket);
        Self { days }
    }

    pub fn contains_key(&self, key: &DayKey) -> bool {
        self.days.contains_key(key)
    }

    pub fn stats(&self, key: &DayKey) -> TaskStats {
        TaskStats::from_bucket(self.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Read the persisted mapping, reporting why it could not be read.
pub fn try_load(database: &Database) -> Result<TaskMap, LoadError> {
    let raw = database
        .read_blob(STORAGE_KEY)?
        .ok_or_else(|| LoadError::Missing(STORAGE_KEY.to_string()))?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Malformed {
        key: STORAGE_KEY.to_string(),
        source,
    })
}

/// Read the persisted mapping. A missing or malformed blob yields an empty mapping;
/// a failing database read is returned as an error.
pub fn load(database: &Database) -> Result<TaskMap> {
    match try_load(database) {
        Ok(map) => {
            tracing::debug!(days = map.days.len(), "loaded task map");
            Ok(map)
        }
        Err(LoadError::Missing(key)) => {
            tracing::debug!(key = key.as_str(), "no stored tasks yet");
            Ok(TaskMap::new())
        }
        Err(err @ LoadError::Malformed { .. }) => {
            tracing::warn!(error = %err, "discarding malformed task map");
            Ok(TaskMap::new())
        }
        Err(LoadError::Storage(err)) => Err(err),
    }
}

/// Serialize and write the whole mapping, replacing the stored blob.
pub fn save(database: &Database, map: &TaskMap) -> Result<()> {
    let raw = serde_json::to_string(map).context("Failed to serialize task map")?;
    database.write_blob(STORAGE_KEY, &raw)?;
    tracing::trace!(bytes = raw.len(), "saved task map");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::ops;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_database() -> (Database, TempDir) {
        let (db, _config, dir) = temp_database_with_config();
        (db, dir)
    }

    fn temp_database_with_config() -> (Database, AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        (Database::initialize(&config).expect("init db"), config, dir)
    }

    fn key(day: u32) -> DayKey {
        DayKey::new(NaiveDate::from_ymd_opt(2026, 10, day).unwrap())
    }

    #[test]
    fn get_missing_key_is_empty_and_does_not_insert() {
        let map = TaskMap::new();
        assert!(map.get(&key(12)).is_empty());
        assert!(!map.contains_key(&key(12)));
        assert!(map.is_empty());
    }

    #[test]
    fn set_returns_new_mapping_and_keeps_other_days() {
        let now = Utc::now();
        let monday = ops::add(&[], "Monday task", now);
        let base = TaskMap::new().set(key(12), monday.clone());

        let next = base.set(key(13), ops::add(&[], "Tuesday task", now));

        assert_eq!(base.get(&key(13)).len(), 0);
        assert_eq!(next.get(&key(12)), monday.as_slice());
        assert_eq!(next.get(&key(13))[0].text, "Tuesday task");
    }

    #[test]
    fn emptied_bucket_is_kept() {
        let map = TaskMap::new().set(key(12), Vec::new());
        assert!(map.contains_key(&key(12)));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2026-10-12":[]}"#);
    }

    #[test]
    fn round_trip_preserves_ids_timestamps_and_order() {
        let (db, _dir) = temp_database();
        let now = Utc::now();
        let bucket = ops::add(&ops::add(&ops::add(&[], "c", now), "b", now), "a", now);
        let id = bucket[1].id.clone();
        let map = TaskMap::new()
            .set(key(12), ops::toggle(&bucket, &id))
            .set(key(14), ops::add(&[], "other day", now));

        save(&db, &map).expect("save");
        let loaded = load(&db).expect("load");

        assert_eq!(loaded, map);
    }

    #[test]
    fn load_without_blob_yields_empty_mapping() {
        let (db, _dir) = temp_database();
        assert!(matches!(try_load(&db), Err(LoadError::Missing(_))));
        assert!(load(&db).expect("load").is_empty());
    }

    #[test]
    fn load_with_corrupt_blob_yields_empty_mapping() {
        let (db, _dir) = temp_database();
        db.write_blob(STORAGE_KEY, "{not json").expect("write");
        assert!(matches!(try_load(&db), Err(LoadError::Malformed { .. })));
        assert!(load(&db).expect("load").is_empty());

        db.write_blob(STORAGE_KEY, r#"{"yesterday":[]}"#)
            .expect("write");
        assert!(load(&db).expect("load").is_empty());
    }

    #[test]
    fn storage_failure_is_not_mistaken_for_an_empty_store() {
        let (db, config, _dir) = temp_database_with_config();
        save(&db, &TaskMap::new().set(key(12), Vec::new())).expect("save");
        rusqlite::Connection::open(config.db_path())
            .and_then(|conn| conn.execute_batch("DROP TABLE kv_store;"))
            .expect("drop table");

        assert!(matches!(try_load(&db), Err(LoadError::Storage(_))));
        assert!(load(&db).is_err());
    }

    #[test]
    fn reads_blob_written_in_wire_format() {
        let (db, _dir) = temp_database();
        db.write_blob(
            STORAGE_KEY,
            r#"{"2026-10-12":[{"id":"t1","text":"Buy milk","done":true,"createdAt":1791797400000}]}"#,
        )
        .expect("write");

        let map = load(&db).expect("load");
        let bucket = map.get(&key(12));
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].id, "t1");
        assert!(bucket[0].done);
        assert_eq!(bucket[0].created_at.timestamp_millis(), 1_791_797_400_000);
    }
}
