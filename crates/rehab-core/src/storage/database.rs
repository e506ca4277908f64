//! SQLite-backed key-value store.
//!
//! A single `kv` table holds every persisted mapping (completions,
//! assessments, notification settings, daily notes).

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::KeyValueStore;
use crate::error::StorageError;

/// SQLite database for the key-value store.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at `path`.
    ///
    /// Creates the schema if it doesn't exist.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn("migrate", "kv")?.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn conn(
        &self,
        op: &'static str,
        key: &str,
    ) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::backend(op, key, "connection mutex poisoned"))
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize, StorageError> {
        let conn = self.conn("count", "*")?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn("get", key)?;
        let mut stmt = conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(|e| StorageError::backend("get", key, e))?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::backend("get", key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn("set", key)?
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| StorageError::backend("set", key, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn("remove", key)?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| StorageError::backend("remove", key, e))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.conn("clear", "*")?
            .execute("DELETE FROM kv", [])
            .map_err(|e| StorageError::backend("clear", "*", e))?;
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<String, StorageError>,
    ) -> Result<(), StorageError> {
        let mut conn = self.conn("update", key)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| StorageError::backend("update", key, e))?;
        let current: Option<String> = tx
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| StorageError::backend("update", key, e))?;
        // Dropping `tx` on error rolls back.
        let next = f(current.as_deref())?;
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, next],
        )
        .map_err(|e| StorageError::backend("update", key, e))?;
        tx.commit()
            .map_err(|e| StorageError::backend("update", key, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", "hello").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "hello");
        db.set("test", "again").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn remove_and_clear() {
        let db = Database::open_memory().unwrap();
        db.set("a", "1").unwrap();
        db.set("b", "2").unwrap();
        db.remove("a").unwrap();
        assert!(db.get("a").unwrap().is_none());
        assert_eq!(db.len().unwrap(), 1);
        db.clear().unwrap();
        assert_eq!(db.len().unwrap(), 0);
    }

    #[test]
    fn update_reads_and_writes_in_one_transaction() {
        let db = Database::open_memory().unwrap();
        db.set("n", "1").unwrap();
        db.update("n", &mut |cur| {
            assert_eq!(cur, Some("1"));
            Ok("2".into())
        })
        .unwrap();
        assert_eq!(db.get("n").unwrap().as_deref(), Some("2"));

        let failed = db.update("n", &mut |_| Err(StorageError::Locked));
        assert!(failed.is_err());
        assert_eq!(db.get("n").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rehab.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("completedExercises", "{}").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("completedExercises").unwrap().as_deref(), Some("{}"));
    }
}
