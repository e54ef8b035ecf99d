// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Finds or recreates the category folder for each ticket stage.

use std::sync::Arc;

use tracing::{debug, info, warn};

use ticketry_core::{
    ChannelKind, ChannelSpec, Overwrite, Platform, StorageAdapter, TicketState, TicketryError,
};

use crate::settings::LifecycleSettings;

/// Keeps a guild's per-stage category ids pointing at categories that exist.
#[derive(Clone)]
pub struct CategoryResolver {
    platform: Arc<dyn Platform>,
    storage: Arc<dyn StorageAdapter>,
    settings: Arc<LifecycleSettings>,
}

impl CategoryResolver {
    pub fn new(
        platform: Arc<dyn Platform>,
        storage: Arc<dyn StorageAdapter>,
        settings: Arc<LifecycleSettings>,
    ) -> Self {
        Self {
            platform,
            storage,
            settings,
        }
    }

    /// Returns the id of the category for `stage`, creating it when the
    /// guild has none on record or the recorded one was removed.
    ///
    /// The guild record is re-read here and only its category id for `stage`
    /// changes. Callers must hold the `guild:` lock so the read, the remote
    /// create and the write back are not interleaved with another writer.
    /// Remote failures other than a missing category are propagated.
    pub async fn resolve(
        &self,
        guild_id: &str,
        stage: TicketState,
        overwrites: Vec<Overwrite>,
    ) -> Result<String, TicketryError> {
        let mut guild = self.storage.get_guild(guild_id).await?.ok_or_else(|| {
            TicketryError::TicketingNotConfigured {
                guild_id: guild_id.to_string(),
            }
        })?;

        if let Some(stored) = guild.category_id(stage).map(str::to_string) {
            match self.platform.channel(&stored).await {
                Ok(remote) => {
                    if remote.id != stored {
                        guild.set_category_id(stage, remote.id.clone());
                        self.storage.save_guild(&guild).await?;
                    }
                    debug!(%guild_id, %stage, category_id = %remote.id, "category resolved");
                    return Ok(remote.id);
                }
                Err(e) if e.is_not_found() => {
                    warn!(
                        %guild_id,
                        %stage,
                        category_id = %stored,
                        "stored category is gone, recreating"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let name = self.settings.category_name(stage).to_string();
        let created = self
            .platform
            .create_channel(
                guild_id,
                ChannelSpec {
                    name,
                    kind: ChannelKind::Category,
                    topic: None,
                    parent_id: None,
                    overwrites,
                },
            )
            .await?;
        info!(%guild_id, %stage, category_id = %created.id, "created ticket category");
        guild.set_category_id(stage, created.id.clone());
        self.storage.save_guild(&guild).await?;
        Ok(created.id)
    }
}
