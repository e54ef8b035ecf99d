// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use ticketry_core::TicketryError;
use tracing::debug;

/// The single SQLite connection shared by every query module.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs
    /// and runs pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, TicketryError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(TicketryError::persistence)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(TicketryError::persistence)?;

        let journal_mode = if wal_mode { "WAL" } else { "DELETE" };
        let applied = conn
            .call(move |conn| {
                let mode: String = conn.query_row(
                    &format!("PRAGMA journal_mode = {journal_mode}"),
                    [],
                    |row| row.get(0),
                )?;
                conn.execute_batch(
                    "PRAGMA synchronous = NORMAL;
                     PRAGMA foreign_keys = ON;
                     PRAGMA busy_timeout = 5000;",
                )?;
                Ok(mode)
            })
            .await
            .map_err(map_tr_err)?;
        debug!(path, journal_mode = %applied, "database opened");

        conn.call(crate::migrations::run_migrations)
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                other => TicketryError::persistence(other.to_string()),
            })?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), TicketryError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Converts a tokio-rusqlite error into a persistence failure.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> TicketryError {
    TicketryError::Persistence {
        source: Box::new(e),
    }
}
