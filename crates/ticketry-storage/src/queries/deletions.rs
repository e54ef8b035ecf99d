// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable queue of delayed channel removals.

use std::str::FromStr;

use rusqlite::params;
use ticketry_core::{DeletionStatus, ScheduledDeletion, TicketryError};

use crate::database::Database;

/// Inserts the deletion, or re-arms an existing one as pending with a fresh
/// due time and no recorded attempts.
pub async fn schedule_deletion(
    db: &Database,
    deletion: &ScheduledDeletion,
) -> Result<(), TicketryError> {
    let d = deletion.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO scheduled_deletions (channel_id, guild_id, ticket_number, due_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (channel_id) DO UPDATE SET
                     due_at = excluded.due_at,
                     status = 'pending',
                     attempts = 0,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
                params![d.channel_id, d.guild_id, d.ticket_number, d.due_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn pending_deletions(db: &Database) -> Result<Vec<ScheduledDeletion>, TicketryError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT channel_id, guild_id, ticket_number, due_at, status, attempts
                 FROM scheduled_deletions
                 WHERE status = 'pending'
                 ORDER BY due_at ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                let status: String = row.get(4)?;
                Ok(ScheduledDeletion {
                    channel_id: row.get(0)?,
                    guild_id: row.get(1)?,
                    ticket_number: row.get(2)?,
                    due_at: row.get(3)?,
                    status: DeletionStatus::from_str(&status).unwrap_or(DeletionStatus::Pending),
                    attempts: row.get(5)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn complete_deletion(db: &Database, channel_id: &str) -> Result<(), TicketryError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE scheduled_deletions SET status = 'completed',
                 updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
                 WHERE channel_id = ?1",
                params![channel_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Increments attempts. Once `max_attempts` is reached the deletion is
/// marked failed, otherwise it stays pending for the next startup.
pub async fn fail_deletion(
    db: &Database,
    channel_id: &str,
    max_attempts: i64,
) -> Result<(), TicketryError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE scheduled_deletions SET
                     attempts = attempts + 1,
                     status = CASE WHEN attempts + 1 >= ?2 THEN 'failed' ELSE 'pending' END,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
                 WHERE channel_id = ?1",
                params![channel_id, max_attempts],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn open() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("d.db").to_str().unwrap(), true)
            .await
            .unwrap();
        (dir, db)
    }

    fn deletion(channel: &str, due_at: &str) -> ScheduledDeletion {
        ScheduledDeletion {
            channel_id: channel.into(),
            guild_id: "g1".into(),
            ticket_number: 1,
            due_at: due_at.into(),
            status: DeletionStatus::Pending,
            attempts: 0,
        }
    }

    #[tokio::test]
    async fn pending_are_ordered_by_due_time() {
        let (_dir, db) = open().await;
        schedule_deletion(&db, &deletion("late", "2026-01-01T00:10:00Z")).await.unwrap();
        schedule_deletion(&db, &deletion("early", "2026-01-01T00:01:00Z")).await.unwrap();

        let pending = pending_deletions(&db).await.unwrap();
        let order: Vec<_> = pending.iter().map(|d| d.channel_id.as_str()).collect();
        assert_eq!(order, ["early", "late"]);
    }

    #[tokio::test]
    async fn completed_deletions_leave_the_queue() {
        let (_dir, db) = open().await;
        schedule_deletion(&db, &deletion("c1", "2026-01-01T00:00:00Z")).await.unwrap();
        complete_deletion(&db, "c1").await.unwrap();
        assert!(pending_deletions(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failures_give_up_after_max_attempts() {
        let (_dir, db) = open().await;
        schedule_deletion(&db, &deletion("c1", "2026-01-01T00:00:00Z")).await.unwrap();

        fail_deletion(&db, "c1", 2).await.unwrap();
        let pending = pending_deletions(&db).await.unwrap();
        assert_eq!(pending[0].attempts, 1);

        fail_deletion(&db, "c1", 2).await.unwrap();
        assert!(pending_deletions(&db).await.unwrap().is_empty());

        schedule_deletion(&db, &deletion("c1", "2026-01-02T00:00:00Z")).await.unwrap();
        let rearmed = pending_deletions(&db).await.unwrap();
        assert_eq!(rearmed[0].attempts, 0);
        assert_eq!(rearmed[0].due_at, "2026-01-02T00:00:00Z");
    }
}
