// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! serenity interactions to [`InboundEvent`]s.

use serenity::all::{
    CommandDataOption, CommandDataOptionValue, CommandInteraction, ComponentInteraction,
    Interaction, Member, User,
};

use ticketry_core::{Actor, InteractionHandle};

use crate::event::{
    CommandInvocation, CommandOption, ComponentInvocation, InboundEvent, OptionValue,
};

pub fn inbound_event(interaction: &Interaction) -> InboundEvent {
    match interaction {
        Interaction::Command(cmd) => InboundEvent::Command(command(cmd)),
        Interaction::Component(component) => InboundEvent::Component(self::component(component)),
        Interaction::Autocomplete(cmd) => InboundEvent::Unknown {
            kind: "autocomplete".to_string(),
            handle: Some(handle(cmd.id.get(), &cmd.token)),
        },
        Interaction::Modal(modal) => InboundEvent::Unknown {
            kind: "modal".to_string(),
            handle: Some(handle(modal.id.get(), &modal.token)),
        },
        Interaction::Ping(_) => InboundEvent::Unknown {
            kind: "ping".to_string(),
            handle: None,
        },
        _ => InboundEvent::Unknown {
            kind: "other".to_string(),
            handle: None,
        },
    }
}

fn handle(id: u64, token: &str) -> InteractionHandle {
    InteractionHandle {
        id: id.to_string(),
        token: token.to_string(),
    }
}

fn actor(user: &User, member: Option<&Member>) -> Actor {
    Actor {
        user_id: user.id.to_string(),
        display_name: user.name.clone(),
        is_administrator: member
            .and_then(|m| m.permissions)
            .is_some_and(|p| p.administrator()),
    }
}

fn command(cmd: &CommandInteraction) -> CommandInvocation {
    CommandInvocation {
        handle: handle(cmd.id.get(), &cmd.token),
        actor: actor(&cmd.user, cmd.member.as_deref()),
        guild_id: cmd.guild_id.map(|g| g.to_string()),
        channel_id: cmd.channel_id.to_string(),
        name: cmd.data.name.clone(),
        options: cmd.data.options.iter().map(option).collect(),
    }
}

fn option(option: &CommandDataOption) -> CommandOption {
    let value = match &option.value {
        CommandDataOptionValue::SubCommand(options)
        | CommandDataOptionValue::SubCommandGroup(options) => {
            OptionValue::SubCommand(options.iter().map(self::option).collect())
        }
        CommandDataOptionValue::Channel(id) => OptionValue::Channel(id.to_string()),
        CommandDataOptionValue::Role(id) => OptionValue::Role(id.to_string()),
        CommandDataOptionValue::User(id) => OptionValue::User(id.to_string()),
        CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
        CommandDataOptionValue::Integer(i) => OptionValue::Integer(*i),
        CommandDataOptionValue::Boolean(b) => OptionValue::Boolean(*b),
        _ => OptionValue::Other,
    };
    CommandOption {
        name: option.name.clone(),
        value,
    }
}

fn component(component: &ComponentInteraction) -> ComponentInvocation {
    ComponentInvocation {
        handle: handle(component.id.get(), &component.token),
        actor: actor(&component.user, component.member.as_ref()),
        guild_id: component.guild_id.map(|g| g.to_string()),
        channel_id: component.channel_id.to_string(),
        custom_id: component.data.custom_id.clone(),
    }
}
