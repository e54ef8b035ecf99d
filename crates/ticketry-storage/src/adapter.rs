// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use ticketry_config::model::StorageConfig;
use ticketry_core::{
    AdapterType, DeletionStore, GuildConfig, GuildStore, HealthStatus, PluginAdapter,
    ScheduledDeletion, StorageAdapter, Ticket, TicketStore, TicketryError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened by
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, TicketryError> {
        self.db
            .get()
            .ok_or_else(|| TicketryError::persistence("storage not initialized -- call initialize() first"))
    }
}

/// Runs a query and records its count and latency.
async fn timed<T>(
    store: &'static str,
    query: &'static str,
    fut: impl Future<Output = Result<T, TicketryError>>,
) -> Result<T, TicketryError> {
    let started = Instant::now();
    let result = fut.await;
    ticketry_prometheus::record_store_query(store, query, started.elapsed());
    result
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TicketryError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TicketryError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl GuildStore for SqliteStorage {
    async fn get_guild(&self, guild_id: &str) -> Result<Option<GuildConfig>, TicketryError> {
        timed("guilds", "get", queries::guilds::get_guild(self.db()?, guild_id)).await
    }

    async fn save_guild(&self, guild: &GuildConfig) -> Result<(), TicketryError> {
        timed("guilds", "save", queries::guilds::save_guild(self.db()?, guild)).await
    }
}

#[async_trait]
impl TicketStore for SqliteStorage {
    async fn save_ticket(&self, ticket: &Ticket) -> Result<(), TicketryError> {
        timed("tickets", "save", queries::tickets::save_ticket(self.db()?, ticket)).await
    }

    async fn get_ticket(
        &self,
        guild_id: &str,
        channel_id: &str,
    ) -> Result<Option<Ticket>, TicketryError> {
        timed(
            "tickets",
            "get",
            queries::tickets::get_ticket(self.db()?, guild_id, channel_id),
        )
        .await
    }

    async fn latest_ticket_number(&self, guild_id: &str) -> Result<Option<i64>, TicketryError> {
        timed(
            "tickets",
            "latest_number",
            queries::tickets::latest_ticket_number(self.db()?, guild_id),
        )
        .await
    }

    async fn set_control_message(
        &self,
        guild_id: &str,
        channel_id: &str,
        message_id: &str,
    ) -> Result<(), TicketryError> {
        timed(
            "tickets",
            "set_control_message",
            queries::tickets::set_control_message(self.db()?, guild_id, channel_id, message_id),
        )
        .await
    }
}

#[async_trait]
impl DeletionStore for SqliteStorage {
    async fn schedule_deletion(&self, deletion: &ScheduledDeletion) -> Result<(), TicketryError> {
        timed(
            "scheduled_deletions",
            "schedule",
            queries::deletions::schedule_deletion(self.db()?, deletion),
        )
        .await
    }

    async fn pending_deletions(&self) -> Result<Vec<ScheduledDeletion>, TicketryError> {
        timed(
            "scheduled_deletions",
            "pending",
            queries::deletions::pending_deletions(self.db()?),
        )
        .await
    }

    async fn complete_deletion(&self, channel_id: &str) -> Result<(), TicketryError> {
        timed(
            "scheduled_deletions",
            "complete",
            queries::deletions::complete_deletion(self.db()?, channel_id),
        )
        .await
    }

    async fn fail_deletion(&self, channel_id: &str, max_attempts: i64) -> Result<(), TicketryError> {
        timed(
            "scheduled_deletions",
            "fail",
            queries::deletions::fail_deletion(self.db()?, channel_id, max_attempts),
        )
        .await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), TicketryError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| TicketryError::persistence("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TicketryError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
