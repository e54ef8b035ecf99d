// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversions from the neutral message shapes to serenity builders.

use serenity::all::{
    ButtonStyle as DiscordButtonStyle, PermissionOverwrite, PermissionOverwriteType, Permissions,
    ReactionType, RoleId, UserId,
};
use serenity::builder::{
    CreateActionRow, CreateButton, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditMessage,
};

use ticketry_core::{Button, ButtonStyle, Embed, OutboundMessage, Overwrite, Reply, TicketryError};

/// Parses a Discord id. Zero is rejected because serenity ids are non-zero.
pub fn snowflake(raw: &str) -> Result<u64, TicketryError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| TicketryError::Internal(format!("invalid Discord id: {raw:?}")))
}

fn style(style: ButtonStyle) -> DiscordButtonStyle {
    match style {
        ButtonStyle::Primary => DiscordButtonStyle::Primary,
        ButtonStyle::Secondary => DiscordButtonStyle::Secondary,
        ButtonStyle::Success => DiscordButtonStyle::Success,
        ButtonStyle::Danger => DiscordButtonStyle::Danger,
    }
}

fn button(button: &Button) -> CreateButton {
    let created = CreateButton::new(&button.custom_id)
        .label(&button.label)
        .style(style(button.style))
        .disabled(button.disabled);
    match &button.emoji {
        Some(emoji) => created.emoji(ReactionType::Unicode(emoji.clone())),
        None => created,
    }
}

/// A single action row, or none when there are no buttons.
pub fn action_rows(buttons: &[Button]) -> Vec<CreateActionRow> {
    if buttons.is_empty() {
        return Vec::new();
    }
    vec![CreateActionRow::Buttons(buttons.iter().map(button).collect())]
}

pub fn embed(embed: &Embed) -> CreateEmbed {
    embed.fields.iter().fold(
        CreateEmbed::new()
            .title(&embed.title)
            .description(&embed.description)
            .colour(embed.colour),
        |created, field| created.field(&field.name, &field.value, field.inline),
    )
}

pub fn interaction_response(reply: Reply) -> CreateInteractionResponse {
    let mut message = CreateInteractionResponseMessage::new()
        .ephemeral(reply.is_ephemeral())
        .embeds(reply.embeds.iter().map(embed).collect())
        .components(action_rows(&reply.buttons));
    if let Some(content) = reply.content {
        message = message.content(content);
    }
    CreateInteractionResponse::Message(message)
}

pub fn create_message(message: OutboundMessage) -> CreateMessage {
    CreateMessage::new()
        .components(action_rows(&message.buttons))
        .content(message.content)
}

pub fn edit_message(message: OutboundMessage) -> EditMessage {
    EditMessage::new()
        .components(action_rows(&message.buttons))
        .content(message.content)
}

pub fn permission_overwrite(overwrite: &Overwrite) -> Result<PermissionOverwrite, TicketryError> {
    let access = Permissions::VIEW_CHANNEL
        | Permissions::SEND_MESSAGES
        | Permissions::READ_MESSAGE_HISTORY;
    Ok(match overwrite {
        // @everyone shares the guild's id.
        Overwrite::DenyEveryone { guild_id } => PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(RoleId::new(snowflake(guild_id)?)),
        },
        Overwrite::AllowRole { role_id } => PermissionOverwrite {
            allow: access,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(RoleId::new(snowflake(role_id)?)),
        },
        Overwrite::AllowMember { user_id } => PermissionOverwrite {
            allow: access,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(UserId::new(snowflake(user_id)?)),
        },
    })
}
