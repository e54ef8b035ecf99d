// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guild configuration reads and upserts.

use rusqlite::{OptionalExtension, params};
use ticketry_core::{GuildConfig, TicketryError};

use crate::database::Database;

pub async fn get_guild(db: &Database, guild_id: &str) -> Result<Option<GuildConfig>, TicketryError> {
    let guild_id = guild_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, ticketing_enabled, ticket_channel_id, staff_role_id, intake_message_id,
                        open_category_id, claimed_category_id, closed_category_id
                 FROM guilds WHERE id = ?1",
                params![guild_id],
                |row| {
                    Ok(GuildConfig {
                        id: row.get(0)?,
                        ticketing_enabled: row.get(1)?,
                        ticket_channel_id: row.get(2)?,
                        staff_role_id: row.get(3)?,
                        intake_message_id: row.get(4)?,
                        open_category_id: row.get(5)?,
                        claimed_category_id: row.get(6)?,
                        closed_category_id: row.get(7)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Inserts the guild or replaces every settings column of the existing row.
pub async fn save_guild(db: &Database, guild: &GuildConfig) -> Result<(), TicketryError> {
    let guild = guild.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO guilds (id, ticketing_enabled, ticket_channel_id, staff_role_id,
                                     intake_message_id, open_category_id, claimed_category_id,
                                     closed_category_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT (id) DO UPDATE SET
                     ticketing_enabled = excluded.ticketing_enabled,
                     ticket_channel_id = excluded.ticket_channel_id,
                     staff_role_id = excluded.staff_role_id,
                     intake_message_id = excluded.intake_message_id,
                     open_category_id = excluded.open_category_id,
                     claimed_category_id = excluded.claimed_category_id,
                     closed_category_id = excluded.closed_category_id,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
                params![
                    guild.id,
                    guild.ticketing_enabled,
                    guild.ticket_channel_id,
                    guild.staff_role_id,
                    guild.intake_message_id,
                    guild.open_category_id,
                    guild.claimed_category_id,
                    guild.closed_category_id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
