use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::config::AppConfig;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Local key-value store of named text blobs backed by SQLite.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        let conn = Connection::open(config.db_path()).with_context(|| {
            format!("Failed to open database at {}", config.db_path().display())
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to configure SQLite WAL mode")?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("Failed to configure SQLite busy timeout")?;

        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    pub fn read_blob(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = :key",
                named_params! { ":key": key },
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("Failed to read blob '{}'", key))
    }

    /// Replace the blob stored under `key` wholesale.
    pub fn write_blob(&self, key: &str, value: &str) -> Result<()> {
        let updated = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (:key, :value, :updated)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                named_params! {
                    ":key": key,
                    ":value": value,
                    ":updated": updated,
                },
            )
            .with_context(|| format!("Failed to write blob '{}'", key))?;
        Ok(())
    }

    /// Run `update` holding the database write lock. Other connections cannot write
    /// between its reads and writes. Changes are rolled back when `update` fails.
    pub fn with_write_lock<T>(&self, update: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .context("Failed to lock the database for writing")?;
        let value = update(self)?;
        tx.commit().context("Failed to commit database update")?;
        Ok(value)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
             );",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        (config, dir)
    }

    #[test]
    fn missing_blob_reads_as_none() {
        let (config, _dir) = temp_config();
        let db = Database::initialize(&config).expect("init db");
        assert!(db.read_blob("absent").expect("read").is_none());
    }

    #[test]
    fn write_replaces_previous_value() {
        let (config, _dir) = temp_config();
        let db = Database::initialize(&config).expect("init db");

        db.write_blob("k", "first").expect("write");
        db.write_blob("k", "second").expect("overwrite");

        assert_eq!(db.read_blob("k").expect("read").as_deref(), Some("second"));
    }

    #[test]
    fn failed_locked_update_is_rolled_back() {
        let (config, _dir) = temp_config();
        let db = Database::initialize(&config).expect("init db");
        db.write_blob("k", "kept").expect("write");

        let result: Result<()> = db.with_write_lock(|db| {
            db.write_blob("k", "discarded")?;
            anyhow::bail!("abort")
        });

        assert!(result.is_err());
        assert_eq!(db.read_blob("k").expect("read").as_deref(), Some("kept"));
    }

    #[test]
    fn locked_update_commits() {
        let (config, _dir) = temp_config();
        let db = Database::initialize(&config).expect("init db");

        let previous = db
            .with_write_lock(|db| {
                let previous = db.read_blob("k")?;
                db.write_blob("k", "committed")?;
                Ok(previous)
            })
            .expect("update");

        assert!(previous.is_none());
        assert_eq!(
            db.read_blob("k").expect("read").as_deref(),
            Some("committed")
        );
    }

    #[test]
    fn blobs_survive_reopen() {
        let (config, _dir) = temp_config();
        {
            let db = Database::initialize(&config).expect("init db");
            db.write_blob("k", "persisted").expect("write");
        }
        let db = Database::initialize(&config).expect("reopen db");
        assert_eq!(
            db.read_blob("k").expect("read").as_deref(),
            Some("persisted")
        );
    }
}
