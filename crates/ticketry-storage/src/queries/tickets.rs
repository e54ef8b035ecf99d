// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket reads and upserts.

use rusqlite::{OptionalExtension, Row, params};
use ticketry_core::{Ticket, TicketryError};

use crate::database::Database;

fn ticket_from_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        guild_id: row.get(0)?,
        channel_id: row.get(1)?,
        number: row.get(2)?,
        creator_id: row.get(3)?,
        creator_name: row.get(4)?,
        claimed_by: row.get(5)?,
        closed_by: row.get(6)?,
        deleted: row.get(7)?,
        control_message_id: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Upserts keyed on (guild, channel).
///
/// A stored control message id is kept when the incoming record has none,
/// so a transition saved from an older copy cannot erase it.
pub async fn save_ticket(db: &Database, ticket: &Ticket) -> Result<(), TicketryError> {
    let t = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tickets (guild_id, channel_id, number, creator_id, creator_name,
                                      claimed_by, closed_by, deleted, control_message_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT (guild_id, channel_id) DO UPDATE SET
                     claimed_by = excluded.claimed_by,
                     closed_by = excluded.closed_by,
                     deleted = excluded.deleted,
                     control_message_id = COALESCE(excluded.control_message_id,
                                                   tickets.control_message_id),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
                params![
                    t.guild_id,
                    t.channel_id,
                    t.number,
                    t.creator_id,
                    t.creator_name,
                    t.claimed_by,
                    t.closed_by,
                    t.deleted,
                    t.control_message_id,
                    t.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Active (not deleted) ticket backed by the channel.
pub async fn get_ticket(
    db: &Database,
    guild_id: &str,
    channel_id: &str,
) -> Result<Option<Ticket>, TicketryError> {
    let guild_id = guild_id.to_string();
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT guild_id, channel_id, number, creator_id, creator_name, claimed_by,
                        closed_by, deleted, control_message_id, created_at
                 FROM tickets
                 WHERE guild_id = ?1 AND channel_id = ?2 AND deleted = 0",
                params![guild_id, channel_id],
                ticket_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Highest number ever issued in the guild, deleted tickets included.
pub async fn latest_ticket_number(
    db: &Database,
    guild_id: &str,
) -> Result<Option<i64>, TicketryError> {
    let guild_id = guild_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT MAX(number) FROM tickets WHERE guild_id = ?1",
                params![guild_id],
                |row| row.get::<_, Option<i64>>(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn set_control_message(
    db: &Database,
    guild_id: &str,
    channel_id: &str,
    message_id: &str,
) -> Result<(), TicketryError> {
    let (guild_id, channel_id, message_id) =
        (guild_id.to_string(), channel_id.to_string(), message_id.to_string());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE tickets SET control_message_id = ?3,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
                 WHERE guild_id = ?1 AND channel_id = ?2",
                params![guild_id, channel_id, message_id],
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
        let db = Database::open(dir.path().join("t.db").to_str().unwrap(), true)
            .await
            .unwrap();
        (dir, db)
    }

    fn ticket(number: i64, channel: &str) -> Ticket {
        Ticket {
            number,
            guild_id: "g1".into(),
            channel_id: channel.into(),
            creator_id: "u1".into(),
            creator_name: "alice".into(),
            claimed_by: None,
            closed_by: None,
            deleted: false,
            created_at: "2026-02-01T10:00:00Z".into(),
            control_message_id: None,
        }
    }

    #[tokio::test]
    async fn round_trip_keeps_creator_and_number() {
        let (_dir, db) = open().await;
        save_ticket(&db, &ticket(1, "c1")).await.unwrap();
        let stored = get_ticket(&db, "g1", "c1").await.unwrap().unwrap();
        assert_eq!(stored, ticket(1, "c1"));
    }

    #[tokio::test]
    async fn deleted_tickets_are_hidden_but_keep_their_number() {
        let (_dir, db) = open().await;
        save_ticket(&db, &ticket(1, "c1")).await.unwrap();
        let mut deleted = ticket(2, "c2");
        deleted.deleted = true;
        save_ticket(&db, &deleted).await.unwrap();

        assert!(get_ticket(&db, "g1", "c2").await.unwrap().is_none());
        assert_eq!(latest_ticket_number(&db, "g1").await.unwrap(), Some(2));
        assert_eq!(latest_ticket_number(&db, "other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn upsert_does_not_erase_control_message() {
        let (_dir, db) = open().await;
        let t = ticket(1, "c1");
        save_ticket(&db, &t).await.unwrap();
        set_control_message(&db, "g1", "c1", "m1").await.unwrap();

        let mut stale = t.clone();
        stale.claimed_by = Some("staff".into());
        save_ticket(&db, &stale).await.unwrap();

        let stored = get_ticket(&db, "g1", "c1").await.unwrap().unwrap();
        assert_eq!(stored.control_message_id.as_deref(), Some("m1"));
        assert_eq!(stored.claimed_by.as_deref(), Some("staff"));
    }

    #[tokio::test]
    async fn duplicate_number_in_guild_is_rejected() {
        let (_dir, db) = open().await;
        save_ticket(&db, &ticket(1, "c1")).await.unwrap();
        let err = save_ticket(&db, &ticket(1, "c2")).await.unwrap_err();
        assert!(matches!(err, TicketryError::Persistence { .. }));
    }
}
