// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage for tests that run on a paused clock.
//!
//! Mirrors the SQLite adapter's semantics: deleted tickets are hidden from
//! lookups but still count towards the next number, and saving a ticket never
//! clears a recorded control message. Any store call can be told to fail
//! once with a persistence error.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use ticketry_core::{
    AdapterType, DeletionStatus, DeletionStore, GuildConfig, GuildStore, HealthStatus,
    PluginAdapter, ScheduledDeletion, StorageAdapter, Ticket, TicketStore, TicketryError,
};

#[derive(Default)]
pub struct MemoryStorage {
    guilds: Mutex<HashMap<String, GuildConfig>>,
    tickets: Mutex<HashMap<(String, String), Ticket>>,
    deletions: Mutex<HashMap<String, ScheduledDeletion>>,
    failures: Mutex<HashSet<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every ticket ever saved, deleted ones included, ordered by number.
    pub async fn all_tickets(&self) -> Vec<Ticket> {
        let mut tickets: Vec<_> = self.tickets.lock().await.values().cloned().collect();
        tickets.sort_by_key(|t| (t.guild_id.clone(), t.number));
        tickets
    }

    pub async fn deletion(&self, channel_id: &str) -> Option<ScheduledDeletion> {
        self.deletions.lock().await.get(channel_id).cloned()
    }

    /// Makes the next call to `operation` (a store method name such as
    /// `save_ticket`) fail with a persistence error.
    pub async fn fail_next(&self, operation: &str) {
        self.failures.lock().await.insert(operation.to_string());
    }

    async fn enter(&self, operation: &str) -> Result<(), TicketryError> {
        if self.failures.lock().await.remove(operation) {
            return Err(TicketryError::persistence(format!(
                "injected failure for {operation}"
            )));
        }
        Ok(())
    }
}

fn key(guild_id: &str, channel_id: &str) -> (String, String) {
    (guild_id.to_string(), channel_id.to_string())
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TicketryError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TicketryError> {
        Ok(())
    }
}

#[async_trait]
impl GuildStore for MemoryStorage {
    async fn get_guild(&self, guild_id: &str) -> Result<Option<GuildConfig>, TicketryError> {
        self.enter("get_guild").await?;
        Ok(self.guilds.lock().await.get(guild_id).cloned())
    }

    async fn save_guild(&self, guild: &GuildConfig) -> Result<(), TicketryError> {
        self.enter("save_guild").await?;
        self.guilds
            .lock()
            .await
            .insert(guild.id.clone(), guild.clone());
        Ok(())
    }
}

#[async_trait]
impl TicketStore for MemoryStorage {
    async fn save_ticket(&self, ticket: &Ticket) -> Result<(), TicketryError> {
        self.enter("save_ticket").await?;
        let mut tickets = self.tickets.lock().await;
        let k = key(&ticket.guild_id, &ticket.channel_id);
        let mut next = ticket.clone();
        if let Some(existing) = tickets.get(&k) {
            next.number = existing.number;
            next.creator_id = existing.creator_id.clone();
            next.created_at = existing.created_at.clone();
            if next.control_message_id.is_none() {
                next.control_message_id = existing.control_message_id.clone();
            }
        }
        tickets.insert(k, next);
        Ok(())
    }

    async fn get_ticket(
        &self,
        guild_id: &str,
        channel_id: &str,
    ) -> Result<Option<Ticket>, TicketryError> {
        self.enter("get_ticket").await?;
        Ok(self
            .tickets
            .lock()
            .await
            .get(&key(guild_id, channel_id))
            .filter(|t| !t.deleted)
            .cloned())
    }

    async fn latest_ticket_number(&self, guild_id: &str) -> Result<Option<i64>, TicketryError> {
        self.enter("latest_ticket_number").await?;
        Ok(self
            .tickets
            .lock()
            .await
            .values()
            .filter(|t| t.guild_id == guild_id)
            .map(|t| t.number)
            .max())
    }

    async fn set_control_message(
        &self,
        guild_id: &str,
        channel_id: &str,
        message_id: &str,
    ) -> Result<(), TicketryError> {
        self.enter("set_control_message").await?;
        if let Some(ticket) = self.tickets.lock().await.get_mut(&key(guild_id, channel_id)) {
            ticket.control_message_id = Some(message_id.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl DeletionStore for MemoryStorage {
    async fn schedule_deletion(&self, deletion: &ScheduledDeletion) -> Result<(), TicketryError> {
        self.enter("schedule_deletion").await?;
        let mut row = deletion.clone();
        row.status = DeletionStatus::Pending;
        row.attempts = 0;
        self.deletions
            .lock()
            .await
            .insert(row.channel_id.clone(), row);
        Ok(())
    }

    async fn pending_deletions(&self) -> Result<Vec<ScheduledDeletion>, TicketryError> {
        self.enter("pending_deletions").await?;
        let mut pending: Vec<_> = self
            .deletions
            .lock()
            .await
            .values()
            .filter(|d| d.status == DeletionStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.due_at.cmp(&b.due_at));
        Ok(pending)
    }

    async fn complete_deletion(&self, channel_id: &str) -> Result<(), TicketryError> {
        self.enter("complete_deletion").await?;
        if let Some(row) = self.deletions.lock().await.get_mut(channel_id) {
            row.status = DeletionStatus::Completed;
        }
        Ok(())
    }

    async fn fail_deletion(&self, channel_id: &str, max_attempts: i64) -> Result<(), TicketryError> {
        self.enter("fail_deletion").await?;
        if let Some(row) = self.deletions.lock().await.get_mut(channel_id) {
            row.attempts += 1;
            if row.attempts >= max_attempts {
                row.status = DeletionStatus::Failed;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), TicketryError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TicketryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let storage = MemoryStorage::new();
        let guild = GuildConfig::new("g1");
        storage.fail_next("save_guild").await;

        let err = storage.save_guild(&guild).await.unwrap_err();
        assert!(matches!(err, TicketryError::Persistence { .. }));
        assert!(storage.get_guild("g1").await.unwrap().is_none());

        storage.save_guild(&guild).await.unwrap();
        assert_eq!(storage.get_guild("g1").await.unwrap(), Some(guild));
    }
}
