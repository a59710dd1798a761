use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::info;

use crate::api::JobRecord;

/// SQLite-backed snapshot of the last successful jobs fetch.
///
/// Holds exactly one row: the full serialized record list plus the fetch
/// time. Served (marked stale) when the hosted backend is unreachable so
/// the dashboard still has data to aggregate. All operations are
/// synchronous (rusqlite is blocking); async callers should use
/// `tokio::task::spawn_blocking`.
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open or create the snapshot database at the given path.
    pub fn new(db_path: &Path) -> Result<Self, String> {
        let conn = Connection::open(db_path)
            .map_err(|e| format!("Failed to open snapshot database at {:?}: {}", db_path, e))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS jobs_snapshot (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                records_json TEXT NOT NULL,
                fetched_at TEXT NOT NULL
            );",
        )
        .map_err(|e| format!("Failed to create snapshot table: {}", e))?;

        Ok(Self { conn })
    }

    /// Replace the snapshot with the given records, stamped now.
    pub fn save(&self, records: &[JobRecord]) -> Result<(), String> {
        let json = serde_json::to_string(records)
            .map_err(|e| format!("Failed to serialize jobs for snapshot: {}", e))?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO jobs_snapshot (id, records_json, fetched_at)
                 VALUES (1, ?1, ?2)",
                params![json, Utc::now().to_rfc3339()],
            )
            .map_err(|e| format!("Failed to store snapshot: {}", e))?;
        info!("Saved jobs snapshot ({} records)", records.len());
        Ok(())
    }

    /// The last saved record list and its fetch time, if any.
    pub fn load(&self) -> Result<Option<(Vec<JobRecord>, DateTime<Utc>)>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT records_json, fetched_at FROM jobs_snapshot WHERE id = 1")
            .map_err(|e| format!("Failed to prepare snapshot query: {}", e))?;

        let result = stmt.query_row([], |row| {
            let json: String = row.get(0)?;
            let fetched_at: String = row.get(1)?;
            Ok((json, fetched_at))
        });

        match result {
            Ok((json, fetched_at)) => {
                let records: Vec<JobRecord> = serde_json::from_str(&json)
                    .map_err(|e| format!("Failed to deserialize snapshot: {}", e))?;
                let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
                    .map_err(|e| format!("Invalid snapshot timestamp: {}", e))?
                    .with_timezone(&Utc);
                Ok(Some((records, fetched_at)))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(format!("Snapshot lookup failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> JobRecord {
        JobRecord {
            id,
            job_title: Some(format!("Role {}", id)),
            company_name: None,
            location: None,
            job_type: None,
            experience: None,
            role: None,
            salary: None,
            required_skills: None,
        }
    }

    #[test]
    fn test_empty_store_loads_none() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = SnapshotStore::new(&dir.path().join("snap.db")).expect("Failed to open store");
        assert!(store.load().expect("Load failed").is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = SnapshotStore::new(&dir.path().join("snap.db")).expect("Failed to open store");

        store.save(&[record(2), record(1)]).expect("Save failed");
        let (records, fetched_at) = store.load().expect("Load failed").expect("Snapshot missing");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 2, "snapshot preserves fetch order");
        assert!(fetched_at <= Utc::now());
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = SnapshotStore::new(&dir.path().join("snap.db")).expect("Failed to open store");

        store.save(&[record(1)]).expect("Save failed");
        store.save(&[record(3), record(2), record(1)]).expect("Save failed");
        let (records, _) = store.load().expect("Load failed").expect("Snapshot missing");
        assert_eq!(records.len(), 3);
    }
}
