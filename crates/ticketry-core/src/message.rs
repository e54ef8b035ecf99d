// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-neutral shapes for replies, messages and channels.

/// Identifies an interaction so it can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionHandle {
    pub id: String,
    pub token: String,
}

/// The user who triggered an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub display_name: String,
    pub is_administrator: bool,
}

impl Actor {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}

/// Whether a reply is visible only to the invoking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Ephemeral,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    pub emoji: Option<String>,
    pub style: ButtonStyle,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            colour: 0,
            fields: Vec::new(),
        }
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = colour;
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }
}

/// Response to an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub visibility: Visibility,
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    /// Rendered as a single action row.
    pub buttons: Vec<Button>,
}

impl Reply {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Ephemeral,
            content: Some(content.into()),
            embeds: Vec::new(),
            buttons: Vec::new(),
        }
    }

    pub fn public(content: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Public,
            ..Self::ephemeral(content)
        }
    }

    pub fn ephemeral_embed(embed: Embed) -> Self {
        Self {
            visibility: Visibility::Ephemeral,
            content: None,
            embeds: vec![embed],
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn is_ephemeral(&self) -> bool {
        self.visibility == Visibility::Ephemeral
    }
}

/// A channel message with an optional row of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: String,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Category,
    Other,
}

/// Permission overwrite applied to a ticket channel or category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overwrite {
    /// Hides the channel from `@everyone`, whose role id equals the guild id.
    DenyEveryone { guild_id: String },
    /// Grants text access to a role.
    AllowRole { role_id: String },
    /// Grants text access to one member.
    AllowMember { user_id: String },
}

/// Visibility shared by every ticket channel and category: hidden from
/// everyone except the staff role and the ticket creator.
pub fn private_overwrites(guild_id: &str, staff_role_id: &str, member_id: &str) -> Vec<Overwrite> {
    vec![
        Overwrite::DenyEveryone {
            guild_id: guild_id.to_string(),
        },
        Overwrite::AllowRole {
            role_id: staff_role_id.to_string(),
        },
        Overwrite::AllowMember {
            user_id: member_id.to_string(),
        },
    ]
}

/// A channel to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub name: String,
    pub kind: ChannelKind,
    pub topic: Option<String>,
    pub parent_id: Option<String>,
    pub overwrites: Vec<Overwrite>,
}

/// Fields to change on an existing channel. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelEdit {
    pub name: Option<String>,
    pub parent_id: Option<String>,
    pub topic: Option<String>,
}

/// A channel as the platform reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteChannel {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    pub parent_id: Option<String>,
    pub topic: Option<String>,
}

/// A message as the platform reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMessage {
    pub id: String,
    pub channel_id: String,
    pub content: String,
    pub buttons: Vec<Button>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_overwrites_hide_from_everyone() {
        let overwrites = private_overwrites("g1", "r1", "u1");
        assert_eq!(overwrites.len(), 3);
        assert_eq!(
            overwrites[0],
            Overwrite::DenyEveryone {
                guild_id: "g1".into()
            }
        );
    }

    #[test]
    fn reply_constructors_set_visibility() {
        assert!(Reply::ephemeral("x").is_ephemeral());
        assert!(!Reply::public("x").is_ephemeral());
        let reply = Reply::ephemeral_embed(Embed::new("t", "d").colour(0x00ff00).field("a", "b"));
        assert!(reply.content.is_none());
        assert_eq!(reply.embeds[0].fields.len(), 1);
        assert_eq!(reply.embeds[0].colour, 0x00ff00);
    }
}
