//! SQLite-backed effectif store
//!
//! Records live in one table whose primary key is (unit, school year). An
//! upsert is a single `INSERT ... ON CONFLICT DO UPDATE ... RETURNING`
//! statement: SQLite runs it under the database write lock, so two writers
//! racing on the same key serialize and the later one updates the row the
//! earlier one inserted. Writers on other connections wait up to the busy
//! timeout for that lock before the store reports `Unavailable`.

use super::EffectifStore;
use crate::core::error::StoreError;
use crate::core::models::{AnnualEffectifRecord, EffectifTree, SchoolYear, UnitRef};
use crate::debug;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Version written to `PRAGMA user_version` after the schema is created.
pub const SQLITE_SCHEMA_VERSION: i64 = 1;

/// Busy timeout applied when none is configured.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS annual_effectifs (
      unit TEXT NOT NULL,
      school_year TEXT NOT NULL,
      first_year INTEGER NOT NULL,
      tree TEXT NOT NULL,
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL,
      PRIMARY KEY (unit, school_year)
    ) WITHOUT ROWID;
    CREATE INDEX IF NOT EXISTS idx_annual_effectifs_history
      ON annual_effectifs(unit, first_year DESC);
";

const UPSERT: &str = "
    INSERT INTO annual_effectifs (unit, school_year, first_year, tree, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?5)
    ON CONFLICT (unit, school_year) DO UPDATE SET
      tree = excluded.tree,
      updated_at = CASE
        WHEN annual_effectifs.tree = excluded.tree THEN annual_effectifs.updated_at
        ELSE excluded.updated_at
      END
    RETURNING unit, school_year, tree, created_at, updated_at
";

const SELECT_ONE: &str = "
    SELECT unit, school_year, tree, created_at, updated_at
    FROM annual_effectifs
    WHERE unit = ?1 AND school_year = ?2
";

const SELECT_HISTORY: &str = "
    SELECT unit, school_year, tree, created_at, updated_at
    FROM annual_effectifs
    WHERE unit = ?1
    ORDER BY first_year DESC
";

/// Columns as read from SQLite, before decoding
struct RawRecord {
    unit: String,
    school_year: String,
    tree: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            unit: row.get(0)?,
            school_year: row.get(1)?,
            tree: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn decode(self) -> Result<AnnualEffectifRecord, StoreError> {
        let unit = UnitRef::new(&self.unit)
            .map_err(|e| StoreError::Corrupt(format!("unit column: {e}")))?;
        let year = self
            .school_year
            .parse::<SchoolYear>()
            .map_err(|e| StoreError::Corrupt(format!("school_year column: {e}")))?;
        let tree: EffectifTree = serde_json::from_str(&self.tree).map_err(|e| {
            StoreError::Corrupt(format!("tree of {}/{}: {e}", self.unit, self.school_year))
        })?;

        Ok(AnnualEffectifRecord {
            unit,
            year,
            tree,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Effectif store persisted in a SQLite database
pub struct SqliteEffectifStore {
    conn: Mutex<Connection>,
}

impl SqliteEffectifStore {
    /// Open (and create if needed) the database at `path`
    ///
    /// The parent directory is created when missing. The database runs in
    /// WAL mode so readers do not block the writer.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!("{}: {e}", parent.display()))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        debug!(
            "Opened effectif database {} (journal_mode={journal_mode})",
            path.display()
        );

        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if SQLite cannot allocate it.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version == 0 {
            conn.execute_batch(&format!("PRAGMA user_version={SQLITE_SCHEMA_VERSION};"))?;
        } else if version != SQLITE_SCHEMA_VERSION {
            return Err(StoreError::Unavailable(format!(
                "unsupported schema version {version} (expected {SQLITE_SCHEMA_VERSION})"
            )));
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl EffectifStore for SqliteEffectifStore {
    fn upsert(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
        tree: &EffectifTree,
    ) -> Result<AnnualEffectifRecord, StoreError> {
        let document = serde_json::to_string(tree)
            .map_err(|e| StoreError::Corrupt(format!("cannot encode tree: {e}")))?;
        let now = Utc::now();

        let conn = self.lock()?;
        let raw = conn
            .query_row(
                UPSERT,
                params![
                    unit.as_str(),
                    year.to_string(),
                    i64::from(year.start()),
                    document,
                    now
                ],
                RawRecord::from_row,
            )
            .map_err(|e| match StoreError::from(e) {
                StoreError::Conflict { reason, .. } => StoreError::Conflict {
                    unit: unit.to_string(),
                    year: year.to_string(),
                    reason,
                },
                other => other,
            })?;
        drop(conn);

        debug!("Upserted effectifs {unit}/{year}");
        raw.decode()
    }

    fn get(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
    ) -> Result<Option<AnnualEffectifRecord>, StoreError> {
        let conn = self.lock()?;
        let raw = conn
            .query_row(
                SELECT_ONE,
                params![unit.as_str(), year.to_string()],
                RawRecord::from_row,
            )
            .optional()?;
        drop(conn);

        raw.map(RawRecord::decode).transpose()
    }

    fn list_history(&self, unit: &UnitRef) -> Result<Vec<AnnualEffectifRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(SELECT_HISTORY)?;
        let rows = stmt
            .query_map(params![unit.as_str()], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        drop(conn);

        rows.into_iter().map(RawRecord::decode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::GenderCount;

    fn unit(id: &str) -> UnitRef {
        UnitRef::new(id).unwrap()
    }

    fn year(y: &str) -> SchoolYear {
        y.parse().unwrap()
    }

    #[test]
    fn test_upsert_then_get() {
        let store = SqliteEffectifStore::open_in_memory().unwrap();
        let mut tree = EffectifTree::default();
        tree.secondary.special_education = GenderCount::new(4, 6);

        let saved = store.upsert(&unit("u1"), year("2024-2025"), &tree).unwrap();
        assert_eq!(saved.tree, tree);
        assert_eq!(saved.year.to_string(), "2024-2025");

        let loaded = store.get(&unit("u1"), year("2024-2025")).unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert!(store.get(&unit("u1"), year("2023-2024")).unwrap().is_none());
    }

    #[test]
    fn test_second_upsert_updates_in_place() {
        let store = SqliteEffectifStore::open_in_memory().unwrap();
        let first_tree = EffectifTree::default();
        let mut second_tree = first_tree;
        second_tree.secondary.mainstream.first_humanities = GenderCount::new(9, 9);

        let first = store
            .upsert(&unit("u1"), year("2024-2025"), &first_tree)
            .unwrap();
        let second = store
            .upsert(&unit("u1"), year("2024-2025"), &second_tree)
            .unwrap();

        assert_eq!(second.tree, second_tree);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(store.list_history(&unit("u1")).unwrap().len(), 1);
    }

    #[test]
    fn test_identical_upsert_keeps_updated_at() {
        let store = SqliteEffectifStore::open_in_memory().unwrap();
        let tree = EffectifTree::default();
        let first = store.upsert(&unit("u1"), year("2024-2025"), &tree).unwrap();
        let second = store.upsert(&unit("u1"), year("2024-2025"), &tree).unwrap();
        assert_eq!(first.updated_at, second.updated_at);
    }

    #[test]
    fn test_history_newest_first() {
        let store = SqliteEffectifStore::open_in_memory().unwrap();
        let tree = EffectifTree::default();
        for y in ["2022-2023", "2024-2025", "2023-2024"] {
            store.upsert(&unit("u1"), year(y), &tree).unwrap();
        }
        store.upsert(&unit("u2"), year("2025-2026"), &tree).unwrap();

        let years: Vec<String> = store
            .list_history(&unit("u1"))
            .unwrap()
            .iter()
            .map(|r| r.year.to_string())
            .collect();
        assert_eq!(years, vec!["2024-2025", "2023-2024", "2022-2023"]);
    }

    #[test]
    fn test_corrupt_tree_is_reported() {
        let store = SqliteEffectifStore::open_in_memory().unwrap();
        store
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO annual_effectifs VALUES ('u1', '2024-2025', 2024, '{}', ?1, ?1)",
                params![Utc::now()],
            )
            .unwrap();

        let err = store.get(&unit("u1"), year("2024-2025")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn test_duplicate_plain_insert_hits_unique_key() {
        let store = SqliteEffectifStore::open_in_memory().unwrap();
        store
            .upsert(&unit("u1"), year("2024-2025"), &EffectifTree::default())
            .unwrap();

        let err = store
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO annual_effectifs VALUES ('u1', '2024-2025', 2024, '{}', ?1, ?1)",
                params![Utc::now()],
            )
            .unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Conflict { .. }));
    }
}
