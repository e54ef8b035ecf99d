// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enabling and disabling ticketing for a guild.

use tracing::{info, warn};

use ticketry_core::{ChannelKind, Denial, GuildConfig, Reply, TicketryError};

use crate::controls::intake_message;
use crate::engine::{Invocation, TicketEngine};

impl TicketEngine {
    /// Turns ticketing on, posting the intake message in `channel_id` unless
    /// one is already there.
    pub async fn enable_ticketing(
        &self,
        inv: &Invocation,
        channel_id: &str,
        role_id: &str,
    ) -> Result<Reply, TicketryError> {
        self.observe("setup_enable", inv, async {
            require_administrator(inv)?;
            let channel = self.platform.channel(channel_id).await?;
            if channel.kind != ChannelKind::Text {
                return Err(TicketryError::InvalidInput(
                    "You must provide a text channel for ticketing.".to_string(),
                ));
            }

            let _guard = self.locks.lock(format!("guild:{}", inv.guild_id)).await;
            let mut guild = self.load_or_new(&inv.guild_id).await?;
            if guild.ticket_channel_id.as_deref() != Some(channel_id) {
                guild.intake_message_id = None;
            }
            guild.ticketing_enabled = true;
            guild.ticket_channel_id = Some(channel_id.to_string());
            guild.staff_role_id = Some(role_id.to_string());

            if let Some(message_id) = guild.intake_message_id.clone() {
                match self.platform.message(channel_id, &message_id).await {
                    Ok(_) => {}
                    Err(e) if e.is_not_found() => {
                        warn!(%message_id, "intake message is gone, posting a new one");
                        guild.intake_message_id = None;
                    }
                    Err(e) => return Err(e),
                }
            }
            if guild.intake_message_id.is_none() {
                let message_id = self.platform.send_message(channel_id, intake_message()).await?;
                guild.intake_message_id = Some(message_id);
            }

            self.storage.save_guild(&guild).await?;
            info!(guild_id = %guild.id, %channel_id, %role_id, "ticketing enabled");
            Ok(Reply::ephemeral(format!(
                "Ticketing has been enabled in channel <#{channel_id}>"
            )))
        })
        .await
    }

    pub async fn disable_ticketing(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        self.observe("setup_disable", inv, async {
            require_administrator(inv)?;
            let _guard = self.locks.lock(format!("guild:{}", inv.guild_id)).await;
            let mut guild = self.load_or_new(&inv.guild_id).await?;
            guild.ticketing_enabled = false;
            self.storage.save_guild(&guild).await?;
            info!(guild_id = %guild.id, "ticketing disabled");
            Ok(Reply::ephemeral("Ticketing has been disabled"))
        })
        .await
    }

    async fn load_or_new(&self, guild_id: &str) -> Result<GuildConfig, TicketryError> {
        Ok(self
            .storage
            .get_guild(guild_id)
            .await?
            .unwrap_or_else(|| GuildConfig::new(guild_id)))
    }
}

fn require_administrator(inv: &Invocation) -> Result<(), TicketryError> {
    if inv.actor.is_administrator {
        Ok(())
    } else {
        Err(TicketryError::PermissionDenied(Denial::NotAdministrator))
    }
}
