use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};

/// One captured backup as recorded in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub number: i64,
    /// Unix seconds.
    pub created: i64,
    pub message: Option<String>,
    pub parent: Option<i64>,
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    // AUTOINCREMENT keeps numbers from ever being reused, even if rows vanish
    conn.execute(
        "CREATE TABLE IF NOT EXISTS backups (
            number INTEGER PRIMARY KEY AUTOINCREMENT,
            created INTEGER NOT NULL,
            message TEXT,
            parent INTEGER,
            FOREIGN KEY(parent) REFERENCES backups(number)
        )",
        [],
    )?;

    Ok(())
}

/// Catalog handle. Open once per command, reuse across all operations.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_schema(&conn)?;
        Ok(Catalog { conn })
    }

    /// Append a record and return its number.
    ///
    /// The parent must already be in the catalog; a missing parent is
    /// rejected before any number is consumed.
    pub fn insert(&mut self, created: i64, message: Option<&str>, parent: Option<i64>) -> Result<i64> {
        let tx = self.conn.transaction()?;

        if let Some(parent) = parent {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM backups WHERE number = ?1)",
                params![parent],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(Error::NotFound(parent));
            }
        }

        tx.execute(
            "INSERT INTO backups (created, message, parent) VALUES (?1, ?2, ?3)",
            params![created, message, parent],
        )?;
        let number = tx.last_insert_rowid();
        tx.commit()?;

        Ok(number)
    }

    /// Get a specific snapshot by number
    pub fn get(&self, number: i64) -> Result<Option<Snapshot>> {
        let snapshot = self
            .conn
            .query_row(
                "SELECT number, created, message, parent FROM backups WHERE number = ?1",
                params![number],
                snapshot_from_row,
            )
            .optional()?;

        Ok(snapshot)
    }

    /// All snapshots, ascending by number
    pub fn all(&self) -> Result<Vec<Snapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT number, created, message, parent
             FROM backups
             ORDER BY number ASC",
        )?;

        let snapshots = stmt
            .query_map([], snapshot_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(snapshots)
    }

    /// The snapshot with the highest number
    pub fn latest(&self) -> Result<Option<Snapshot>> {
        let snapshot = self
            .conn
            .query_row(
                "SELECT number, created, message, parent
                 FROM backups
                 ORDER BY number DESC
                 LIMIT 1",
                [],
                snapshot_from_row,
            )
            .optional()?;

        Ok(snapshot)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM backups", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn snapshot_from_row(row: &rusqlite::Row) -> rusqlite::Result<Snapshot> {
    Ok(Snapshot {
        number: row.get(0)?,
        created: row.get(1)?,
        message: row.get(2)?,
        parent: row.get(3)?,
    })
}
