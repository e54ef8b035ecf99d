// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for guild configuration, tickets and scheduled deletions.

use async_trait::async_trait;

use crate::error::TicketryError;
use crate::ticket::{GuildConfig, ScheduledDeletion, Ticket};
use crate::traits::adapter::PluginAdapter;

/// Per-community settings, one record per guild.
#[async_trait]
pub trait GuildStore: Send + Sync {
    async fn get_guild(&self, guild_id: &str) -> Result<Option<GuildConfig>, TicketryError>;

    /// Inserts or replaces the record keyed by `guild.id`.
    async fn save_guild(&self, guild: &GuildConfig) -> Result<(), TicketryError>;
}

/// Ticket records keyed by (guild, channel).
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Inserts or replaces the record keyed by (guild, channel).
    async fn save_ticket(&self, ticket: &Ticket) -> Result<(), TicketryError>;

    /// Active ticket for a channel. Deleted tickets are never returned.
    async fn get_ticket(
        &self,
        guild_id: &str,
        channel_id: &str,
    ) -> Result<Option<Ticket>, TicketryError>;

    /// Highest sequence number ever issued in the guild, deleted tickets included.
    async fn latest_ticket_number(&self, guild_id: &str) -> Result<Option<i64>, TicketryError>;

    /// Records the pinned control message without touching other fields.
    async fn set_control_message(
        &self,
        guild_id: &str,
        channel_id: &str,
        message_id: &str,
    ) -> Result<(), TicketryError>;
}

/// Durable queue of delayed channel removals.
#[async_trait]
pub trait DeletionStore: Send + Sync {
    /// Inserts or re-arms the deletion keyed by channel.
    async fn schedule_deletion(&self, deletion: &ScheduledDeletion) -> Result<(), TicketryError>;

    /// All deletions still waiting to run, earliest due first.
    async fn pending_deletions(&self) -> Result<Vec<ScheduledDeletion>, TicketryError>;

    async fn complete_deletion(&self, channel_id: &str) -> Result<(), TicketryError>;

    /// Records a failed attempt. After `max_attempts` the deletion is marked
    /// failed and no longer pending.
    async fn fail_deletion(&self, channel_id: &str, max_attempts: i64)
    -> Result<(), TicketryError>;
}

/// Storage backend holding every persisted record.
#[async_trait]
pub trait StorageAdapter: PluginAdapter + GuildStore + TicketStore + DeletionStore {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), TicketryError>;

    /// Closes the storage backend, flushing pending writes and releasing connections.
    async fn close(&self) -> Result<(), TicketryError>;
}
