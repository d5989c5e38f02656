//! Research session persistence.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SESSIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// A completed research session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    /// The original user query.
    pub query: String,
    /// The planner's research objective.
    pub objective: String,
    /// The final Markdown report.
    pub report: String,
    pub created_at_ms: i64,
}

/// Session record storage keyed by session id.
#[derive(Debug, Clone)]
pub struct SessionStore {
    db: Arc<Database>,
}

impl SessionStore {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SESSIONS_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store a session record.
    pub fn put(&self, record: &SessionRecord) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(record, bincode::config::standard())?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS_TABLE)?;
            table.insert(record.id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a session by id.
    pub fn get(&self, id: &str) -> Result<Option<SessionRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS_TABLE)?;

        match table.get(id)? {
            Some(data) => {
                let (record, _): (SessionRecord, usize) =
                    bincode::serde::decode_from_slice(data.value(), bincode::config::standard())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// The `n` most recent sessions, newest first.
    pub fn recent(&self, n: usize) -> Result<Vec<SessionRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS_TABLE)?;

        let mut records = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            let (record, _): (SessionRecord, usize) =
                bincode::serde::decode_from_slice(value.value(), bincode::config::standard())?;
            records.push(record);
        }
        records.sort_by_key(|r| std::cmp::Reverse(r.created_at_ms));
        records.truncate(n);
        Ok(records)
    }

    /// Delete a session by id. Returns false when absent.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(SESSIONS_TABLE)?;
            table.remove(id)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    /// Number of stored sessions.
    pub fn len(&self) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS_TABLE)?;
        Ok(table.len()? as usize)
    }

    /// Remove all sessions.
    pub fn clear(&self) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS_TABLE)?;
            table.retain(|_, _| false)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store() -> (SessionStore, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        (SessionStore::new(db).unwrap(), temp_dir)
    }

    fn record(id: &str, created_at_ms: i64) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            query: "What is Rust?".to_string(),
            objective: "Explain the Rust language".to_string(),
            report: "# Report\n\nRust is a systems language.".to_string(),
            created_at_ms,
        }
    }

    #[test]
    fn put_and_get() {
        let (store, _dir) = test_store();
        let r = record("session-1", 100);
        store.put(&r).unwrap();
        assert_eq!(store.get("session-1").unwrap().unwrap(), r);
    }

    #[test]
    fn recent_sorted_newest_first() {
        let (store, _dir) = test_store();
        store.put(&record("session-1", 100)).unwrap();
        store.put(&record("session-2", 300)).unwrap();
        store.put(&record("session-3", 200)).unwrap();

        let top_two = store.recent(2).unwrap();
        let ids: Vec<&str> = top_two.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["session-2", "session-3"]);
    }

    #[test]
    fn delete_existing_and_missing() {
        let (store, _dir) = test_store();
        store.put(&record("session-1", 100)).unwrap();
        assert!(store.delete("session-1").unwrap());
        assert!(!store.delete("session-1").unwrap());
    }

    #[test]
    fn len_and_clear() {
        let (store, _dir) = test_store();
        store.put(&record("session-1", 100)).unwrap();
        store.put(&record("session-2", 200)).unwrap();
        assert_eq!(store.len().unwrap(), 2);

        store.clear().unwrap();
        assert_eq!(store.len().unwrap(), 0);
    }
}
