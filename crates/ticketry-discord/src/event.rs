// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-neutral inbound interactions.

use ticketry_core::{Actor, InteractionHandle, TicketryError};
use ticketry_lifecycle::Invocation;

/// An interaction received from the gateway.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A slash command.
    Command(CommandInvocation),
    /// A button press.
    Component(ComponentInvocation),
    /// Any other interaction kind. Answered with the generic error reply
    /// when it carries a handle.
    Unknown {
        kind: String,
        handle: Option<InteractionHandle>,
    },
}

impl InboundEvent {
    /// Metric label for the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Component(_) => "component",
            Self::Unknown { .. } => "unknown",
        }
    }

    pub fn handle(&self) -> Option<&InteractionHandle> {
        match self {
            Self::Command(cmd) => Some(&cmd.handle),
            Self::Component(component) => Some(&component.handle),
            Self::Unknown { handle, .. } => handle.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    SubCommand(Vec<CommandOption>),
    Channel(String),
    Role(String),
    User(String),
    String(String),
    Integer(i64),
    Boolean(bool),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

/// Looks up a required option by name.
pub fn required_option<'a>(
    options: &'a [CommandOption],
    name: &str,
) -> Result<&'a OptionValue, TicketryError> {
    options
        .iter()
        .find(|o| o.name == name)
        .map(|o| &o.value)
        .ok_or_else(|| TicketryError::InvalidInput(format!("Missing required option `{name}`.")))
}

#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub handle: InteractionHandle,
    pub actor: Actor,
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub name: String,
    pub options: Vec<CommandOption>,
}

impl CommandInvocation {
    /// The sub-command named by the first option, with its own options.
    pub fn sub_command(&self) -> Option<(&str, &[CommandOption])> {
        match self.options.first() {
            Some(CommandOption {
                name,
                value: OptionValue::SubCommand(options),
            }) => Some((name.as_str(), options.as_slice())),
            _ => None,
        }
    }

    pub fn invocation(&self) -> Result<Invocation, TicketryError> {
        invocation(&self.actor, self.guild_id.as_deref(), &self.channel_id)
    }
}

#[derive(Debug, Clone)]
pub struct ComponentInvocation {
    pub handle: InteractionHandle,
    pub actor: Actor,
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub custom_id: String,
}

impl ComponentInvocation {
    pub fn invocation(&self) -> Result<Invocation, TicketryError> {
        invocation(&self.actor, self.guild_id.as_deref(), &self.channel_id)
    }
}

fn invocation(
    actor: &Actor,
    guild_id: Option<&str>,
    channel_id: &str,
) -> Result<Invocation, TicketryError> {
    let guild_id = guild_id.ok_or_else(|| {
        TicketryError::InvalidInput("This can only be used inside a server.".to_string())
    })?;
    Ok(Invocation {
        actor: actor.clone(),
        guild_id: guild_id.to_string(),
        channel_id: channel_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(options: Vec<CommandOption>, guild: Option<&str>) -> CommandInvocation {
        CommandInvocation {
            handle: InteractionHandle {
                id: "1".into(),
                token: "t".into(),
            },
            actor: Actor {
                user_id: "u".into(),
                display_name: "user".into(),
                is_administrator: false,
            },
            guild_id: guild.map(str::to_string),
            channel_id: "c".into(),
            name: "ticket".into(),
            options,
        }
    }

    #[test]
    fn first_option_names_the_sub_command() {
        let cmd = command(
            vec![CommandOption {
                name: "claim".into(),
                value: OptionValue::SubCommand(vec![]),
            }],
            Some("g"),
        );
        assert_eq!(cmd.sub_command().map(|(name, _)| name), Some("claim"));
        assert!(command(vec![], Some("g")).sub_command().is_none());
    }

    #[test]
    fn direct_messages_have_no_invocation() {
        let err = command(vec![], None).invocation().unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn missing_option_is_invalid_input() {
        let options = vec![CommandOption {
            name: "role".into(),
            value: OptionValue::Role("r".into()),
        }];
        assert_eq!(
            required_option(&options, "role").unwrap(),
            &OptionValue::Role("r".into())
        );
        assert!(matches!(
            required_option(&options, "channel"),
            Err(TicketryError::InvalidInput(_))
        ));
    }
}
