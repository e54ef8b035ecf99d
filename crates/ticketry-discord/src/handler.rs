// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway event handler.

use serenity::all::{Context, EventHandler, Guild, Interaction, Ready, UnavailableGuild};
use serenity::async_trait;
use tracing::{debug, error, info};

use crate::convert::inbound_event;
use crate::dispatcher::Dispatcher;

pub struct TicketryHandler {
    dispatcher: Dispatcher,
    register_commands: bool,
}

impl TicketryHandler {
    pub fn new(dispatcher: Dispatcher, register_commands: bool) -> Self {
        Self {
            dispatcher,
            register_commands,
        }
    }
}

#[async_trait]
impl EventHandler for TicketryHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        ticketry_prometheus::record_discord_event("ready");
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "connected to Discord"
        );
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        ticketry_prometheus::record_discord_event("guild_create");
        // Reconnects replay guilds already in the cache.
        if is_new != Some(false) {
            ticketry_prometheus::increment_guilds();
        }
        if !self.register_commands {
            return;
        }
        let definitions = self.dispatcher.registry().definitions();
        match guild.id.set_commands(&ctx.http, definitions).await {
            Ok(commands) => {
                debug!(guild_id = %guild.id, count = commands.len(), "registered slash commands");
            }
            Err(e) => error!(guild_id = %guild.id, error = %e, "failed to register slash commands"),
        }
    }

    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        ticketry_prometheus::record_discord_event("guild_delete");
        if !incomplete.unavailable {
            info!(guild_id = %incomplete.id, "removed from guild");
            ticketry_prometheus::decrement_guilds();
        }
    }

    async fn interaction_create(&self, _ctx: Context, interaction: Interaction) {
        ticketry_prometheus::record_discord_event("interaction_create");
        let event = inbound_event(&interaction);
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move { dispatcher.dispatch(event).await });
    }
}
