// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote calls the lifecycle engine makes against the chat platform.

use async_trait::async_trait;

use crate::error::TicketryError;
use crate::message::{
    ChannelEdit, ChannelSpec, InteractionHandle, OutboundMessage, RemoteChannel, RemoteMessage,
    Reply,
};
use crate::traits::adapter::PluginAdapter;

/// Chat platform REST surface.
///
/// Implementations report a missing channel or message as
/// [`TicketryError::NotFound`] and every other failure as
/// [`TicketryError::Upstream`].
#[async_trait]
pub trait Platform: PluginAdapter {
    async fn channel(&self, channel_id: &str) -> Result<RemoteChannel, TicketryError>;

    async fn create_channel(
        &self,
        guild_id: &str,
        spec: ChannelSpec,
    ) -> Result<RemoteChannel, TicketryError>;

    async fn edit_channel(&self, channel_id: &str, edit: ChannelEdit) -> Result<(), TicketryError>;

    async fn delete_channel(&self, channel_id: &str) -> Result<(), TicketryError>;

    /// Role ids held by a guild member.
    async fn member_roles(&self, guild_id: &str, user_id: &str)
    -> Result<Vec<String>, TicketryError>;

    /// Posts a message and returns its id.
    async fn send_message(
        &self,
        channel_id: &str,
        message: OutboundMessage,
    ) -> Result<String, TicketryError>;

    async fn message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<RemoteMessage, TicketryError>;

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        message: OutboundMessage,
    ) -> Result<(), TicketryError>;

    async fn pin_message(&self, channel_id: &str, message_id: &str) -> Result<(), TicketryError>;

    /// Answers an interaction.
    async fn respond(
        &self,
        interaction: &InteractionHandle,
        reply: Reply,
    ) -> Result<(), TicketryError>;
}
