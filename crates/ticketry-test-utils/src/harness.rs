// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end lifecycle testing.
//!
//! `TestHarness` wires a [`TicketEngine`] to a [`MockPlatform`] and either
//! in-memory storage or a temp SQLite database, with one guild whose intake
//! channel and staff role are known up front.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ticketry_config::model::StorageConfig;
use ticketry_core::{Actor, Reply, StorageAdapter, Ticket, TicketryError};
use ticketry_lifecycle::{EffectRunner, Invocation, LifecycleSettings, TicketEngine};
use ticketry_storage::SqliteStorage;

use crate::memory_storage::MemoryStorage;
use crate::mock_platform::MockPlatform;

pub const GUILD_ID: &str = "guild-1";
pub const INTAKE_CHANNEL_ID: &str = "intake-1";
pub const STAFF_ROLE_ID: &str = "role-staff";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    sqlite: bool,
    settings: LifecycleSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            sqlite: false,
            settings: LifecycleSettings::default(),
        }
    }

    /// Use a temp SQLite database instead of in-memory storage.
    ///
    /// SQLite work runs on its own thread, which lets a paused tokio clock
    /// auto-advance past pending timers. Avoid it in `start_paused` tests.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.settings.delete_delay = delay;
        self
    }

    pub fn with_max_deletion_attempts(mut self, attempts: i64) -> Self {
        self.settings.max_deletion_attempts = attempts;
        self
    }

    pub async fn build(self) -> Result<TestHarness, TicketryError> {
        let platform = Arc::new(MockPlatform::new());

        let (storage, memory, temp_dir) = if self.sqlite {
            let temp_dir = tempfile::TempDir::new().map_err(TicketryError::persistence)?;
            let storage = SqliteStorage::new(StorageConfig {
                database_path: temp_dir.path().join("test.db").to_string_lossy().to_string(),
                wal_mode: true,
            });
            storage.initialize().await?;
            let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
            (storage, None, Some(temp_dir))
        } else {
            let memory = Arc::new(MemoryStorage::new());
            let storage: Arc<dyn StorageAdapter> = memory.clone();
            (storage, Some(memory), None)
        };

        let effects = EffectRunner::new(CancellationToken::new());
        let engine = TicketEngine::new(
            platform.clone(),
            storage.clone(),
            effects,
            self.settings,
        );

        platform.add_text_channel(INTAKE_CHANNEL_ID, "tickets").await;

        Ok(TestHarness {
            platform,
            storage,
            memory,
            engine,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment around one guild.
pub struct TestHarness {
    pub platform: Arc<MockPlatform>,
    pub storage: Arc<dyn StorageAdapter>,
    /// The same store as `storage` when the harness is in-memory, for
    /// injecting store failures.
    pub memory: Option<Arc<MemoryStorage>>,
    pub engine: TicketEngine,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with in-memory storage and ticketing enabled.
    pub async fn enabled() -> Result<Self, TicketryError> {
        let harness = Self::builder().build().await?;
        harness.enable_ticketing().await?;
        Ok(harness)
    }

    pub fn member(&self, user_id: &str, name: &str) -> Actor {
        Actor {
            user_id: user_id.to_string(),
            display_name: name.to_string(),
            is_administrator: false,
        }
    }

    pub fn admin(&self) -> Actor {
        Actor {
            user_id: "admin-1".to_string(),
            display_name: "admin".to_string(),
            is_administrator: true,
        }
    }

    /// A member holding the staff role.
    pub async fn staff(&self, user_id: &str, name: &str) -> Actor {
        self.platform.grant_role(GUILD_ID, user_id, STAFF_ROLE_ID).await;
        self.member(user_id, name)
    }

    pub fn invocation(&self, actor: &Actor, channel_id: &str) -> Invocation {
        Invocation {
            actor: actor.clone(),
            guild_id: GUILD_ID.to_string(),
            channel_id: channel_id.to_string(),
        }
    }

    /// Enables ticketing in the intake channel with the staff role.
    pub async fn enable_ticketing(&self) -> Result<Reply, TicketryError> {
        let inv = self.invocation(&self.admin(), INTAKE_CHANNEL_ID);
        self.engine
            .enable_ticketing(&inv, INTAKE_CHANNEL_ID, STAFF_ROLE_ID)
            .await
    }

    /// Opens a ticket as `actor`, waits for its control message, and returns
    /// the stored record.
    pub async fn open_ticket(&self, actor: &Actor) -> Result<Ticket, TicketryError> {
        let before = self.platform.created_channels().await.len();
        self.engine
            .create(&self.invocation(actor, INTAKE_CHANNEL_ID))
            .await?;
        self.settle().await;

        let created = self.platform.created_channels().await;
        for channel_id in created.iter().skip(before) {
            if let Some(ticket) = self.storage.get_ticket(GUILD_ID, channel_id).await? {
                return Ok(ticket);
            }
        }
        Err(TicketryError::Internal("ticket channel was not recorded".into()))
    }

    pub async fn ticket(&self, channel_id: &str) -> Result<Option<Ticket>, TicketryError> {
        self.storage.get_ticket(GUILD_ID, channel_id).await
    }

    /// Waits for every detached effect spawned so far.
    pub async fn settle(&self) {
        self.engine.effects().wait_idle().await;
    }
}
