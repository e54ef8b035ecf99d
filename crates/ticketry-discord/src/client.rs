// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`Platform`] over the Discord REST API via serenity.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{ChannelId, ChannelType, GuildId, InteractionId, MessageId, UserId};
use serenity::builder::{CreateChannel, EditChannel};
use serenity::http::{Http, HttpError};
use tracing::debug;

use ticketry_core::{
    AdapterType, ChannelEdit, ChannelKind, ChannelSpec, HealthStatus, InteractionHandle,
    OutboundMessage, Platform, PluginAdapter, RemoteChannel, RemoteMessage, Reply, TicketryError,
};

use crate::render::{self, snowflake};

const UNKNOWN_CHANNEL: isize = 10003;
const UNKNOWN_MEMBER: isize = 10007;
const UNKNOWN_MESSAGE: isize = 10008;

/// Whether a failed request means the resource no longer exists.
pub fn is_unknown_resource(status: u16, code: isize) -> bool {
    status == 404 || matches!(code, UNKNOWN_CHANNEL | UNKNOWN_MEMBER | UNKNOWN_MESSAGE)
}

fn is_missing(err: &HttpError) -> bool {
    match err {
        HttpError::UnsuccessfulRequest(response) => {
            is_unknown_resource(response.status_code.as_u16(), response.error.code)
        }
        _ => false,
    }
}

/// Maps a serenity failure to `NotFound` or `Upstream`.
fn classify(operation: &str, resource: &str, id: &str, err: serenity::Error) -> TicketryError {
    if let serenity::Error::Http(http) = &err {
        if is_missing(http) {
            return TicketryError::not_found(resource, id);
        }
    }
    TicketryError::upstream(operation, err)
}

fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::Category => ChannelKind::Category,
        _ => ChannelKind::Other,
    }
}

fn channel_id(raw: &str) -> Result<ChannelId, TicketryError> {
    Ok(ChannelId::new(snowflake(raw)?))
}

fn message_id(raw: &str) -> Result<MessageId, TicketryError> {
    Ok(MessageId::new(snowflake(raw)?))
}

/// Discord REST client used by the lifecycle engine.
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PluginAdapter for SerenityPlatform {
    fn name(&self) -> &str {
        "discord"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Platform
    }

    async fn health_check(&self) -> Result<HealthStatus, TicketryError> {
        match self.http.get_current_user().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("Discord API unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), TicketryError> {
        debug!("Discord platform client shutting down");
        Ok(())
    }
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn channel(&self, id: &str) -> Result<RemoteChannel, TicketryError> {
        let channel = self
            .http
            .get_channel(channel_id(id)?)
            .await
            .map_err(|e| classify("get_channel", "channel", id, e))?;
        Ok(match channel.guild() {
            Some(guild_channel) => RemoteChannel {
                id: guild_channel.id.to_string(),
                name: guild_channel.name,
                kind: channel_kind(guild_channel.kind),
                parent_id: guild_channel.parent_id.map(|p| p.to_string()),
                topic: guild_channel.topic,
            },
            None => RemoteChannel {
                id: id.to_string(),
                name: String::new(),
                kind: ChannelKind::Other,
                parent_id: None,
                topic: None,
            },
        })
    }

    async fn create_channel(
        &self,
        guild_id: &str,
        spec: ChannelSpec,
    ) -> Result<RemoteChannel, TicketryError> {
        let kind = match spec.kind {
            ChannelKind::Category => ChannelType::Category,
            _ => ChannelType::Text,
        };
        let overwrites = spec
            .overwrites
            .iter()
            .map(render::permission_overwrite)
            .collect::<Result<Vec<_>, _>>()?;
        let mut builder = CreateChannel::new(spec.name.as_str())
            .kind(kind)
            .permissions(overwrites);
        if let Some(topic) = &spec.topic {
            builder = builder.topic(topic.as_str());
        }
        if let Some(parent) = &spec.parent_id {
            builder = builder.category(channel_id(parent)?);
        }

        let created = GuildId::new(snowflake(guild_id)?)
            .create_channel(&self.http, builder)
            .await
            .map_err(|e| classify("create_channel", "guild", guild_id, e))?;
        Ok(RemoteChannel {
            id: created.id.to_string(),
            name: created.name,
            kind: channel_kind(created.kind),
            parent_id: created.parent_id.map(|p| p.to_string()),
            topic: created.topic,
        })
    }

    async fn edit_channel(&self, id: &str, edit: ChannelEdit) -> Result<(), TicketryError> {
        let mut builder = EditChannel::new();
        if let Some(name) = edit.name {
            builder = builder.name(name);
        }
        if let Some(parent) = edit.parent_id {
            builder = builder.category(channel_id(&parent)?);
        }
        if let Some(topic) = edit.topic {
            builder = builder.topic(topic);
        }
        channel_id(id)?
            .edit(&self.http, builder)
            .await
            .map_err(|e| classify("edit_channel", "channel", id, e))?;
        Ok(())
    }

    async fn delete_channel(&self, id: &str) -> Result<(), TicketryError> {
        channel_id(id)?
            .delete(&self.http)
            .await
            .map_err(|e| classify("delete_channel", "channel", id, e))?;
        Ok(())
    }

    async fn member_roles(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<Vec<String>, TicketryError> {
        let member = GuildId::new(snowflake(guild_id)?)
            .member(&self.http, UserId::new(snowflake(user_id)?))
            .await
            .map_err(|e| classify("get_member", "member", user_id, e))?;
        Ok(member.roles.iter().map(|r| r.to_string()).collect())
    }

    async fn send_message(
        &self,
        id: &str,
        message: OutboundMessage,
    ) -> Result<String, TicketryError> {
        let sent = channel_id(id)?
            .send_message(&self.http, render::create_message(message))
            .await
            .map_err(|e| classify("send_message", "channel", id, e))?;
        Ok(sent.id.to_string())
    }

    async fn message(&self, id: &str, message: &str) -> Result<RemoteMessage, TicketryError> {
        let fetched = channel_id(id)?
            .message(&self.http, message_id(message)?)
            .await
            .map_err(|e| classify("get_message", "message", message, e))?;
        Ok(RemoteMessage {
            id: fetched.id.to_string(),
            channel_id: fetched.channel_id.to_string(),
            content: fetched.content,
            buttons: Vec::new(),
        })
    }

    async fn edit_message(
        &self,
        id: &str,
        message: &str,
        content: OutboundMessage,
    ) -> Result<(), TicketryError> {
        channel_id(id)?
            .edit_message(&self.http, message_id(message)?, render::edit_message(content))
            .await
            .map_err(|e| classify("edit_message", "message", message, e))?;
        Ok(())
    }

    async fn pin_message(&self, id: &str, message: &str) -> Result<(), TicketryError> {
        channel_id(id)?
            .pin(&self.http, message_id(message)?)
            .await
            .map_err(|e| classify("pin_message", "message", message, e))
    }

    async fn respond(
        &self,
        interaction: &InteractionHandle,
        reply: Reply,
    ) -> Result<(), TicketryError> {
        let response = render::interaction_response(reply);
        self.http
            .create_interaction_response(
                InteractionId::new(snowflake(&interaction.id)?),
                &interaction.token,
                &response,
                Vec::new(),
            )
            .await
            .map_err(|e| classify("create_interaction_response", "interaction", &interaction.id, e))
    }
}
