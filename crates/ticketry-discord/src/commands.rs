// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `/setup` and `/ticket` slash commands.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{CommandOptionType, Permissions};
use serenity::builder::{CreateCommand, CreateCommandOption};

use ticketry_core::{Reply, TicketryError};

use crate::actions::TicketAction;
use crate::context::AppContext;
use crate::event::{CommandInvocation, CommandOption, OptionValue, required_option};
use crate::registry::{SlashProcessor, SubCommandController};

pub const SETUP_COMMAND: &str = "setup";
pub const TICKET_COMMAND: &str = "ticket";

struct EnableTicketing;

#[async_trait]
impl SlashProcessor for EnableTicketing {
    fn name(&self) -> &str {
        "ticketing_enable"
    }

    async fn process(
        &self,
        ctx: &AppContext,
        cmd: &CommandInvocation,
        options: &[CommandOption],
    ) -> Result<Reply, TicketryError> {
        let inv = cmd.invocation()?;
        let OptionValue::Channel(channel_id) = required_option(options, "channel")? else {
            return Err(TicketryError::InvalidInput(
                "You must provide a text channel for ticketing.".to_string(),
            ));
        };
        let OptionValue::Role(role_id) = required_option(options, "role")? else {
            return Err(TicketryError::InvalidInput(
                "You must provide a role for ticket staff.".to_string(),
            ));
        };
        ctx.engine.enable_ticketing(&inv, channel_id, role_id).await
    }
}

struct DisableTicketing;

#[async_trait]
impl SlashProcessor for DisableTicketing {
    fn name(&self) -> &str {
        "ticketing_disable"
    }

    async fn process(
        &self,
        ctx: &AppContext,
        cmd: &CommandInvocation,
        _options: &[CommandOption],
    ) -> Result<Reply, TicketryError> {
        ctx.engine.disable_ticketing(&cmd.invocation()?).await
    }
}

/// `/ticket <name>` mapped onto a lifecycle operation on the current channel.
struct TicketSubCommand {
    name: &'static str,
    action: TicketAction,
}

#[async_trait]
impl SlashProcessor for TicketSubCommand {
    fn name(&self) -> &str {
        self.name
    }

    async fn process(
        &self,
        ctx: &AppContext,
        cmd: &CommandInvocation,
        _options: &[CommandOption],
    ) -> Result<Reply, TicketryError> {
        self.action.run(&ctx.engine, &cmd.invocation()?).await
    }
}

pub fn setup_command() -> Result<SubCommandController, TicketryError> {
    let definition = CreateCommand::new(SETUP_COMMAND)
        .description("Configure the ticket system")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "ticketing_enable",
                "Enable ticketing in a channel",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "Channel where members open tickets",
                )
                .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::Role,
                    "role",
                    "Role allowed to manage tickets",
                )
                .required(true),
            ),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "ticketing_disable",
            "Disable ticketing",
        ));

    let processors: Vec<Arc<dyn SlashProcessor>> =
        vec![Arc::new(EnableTicketing), Arc::new(DisableTicketing)];
    SubCommandController::new(SETUP_COMMAND, definition, processors)
}

pub fn ticket_command() -> Result<SubCommandController, TicketryError> {
    let subs = [
        ("claim", "Claim this ticket", TicketAction::Claim),
        ("close", "Close this ticket", TicketAction::Close),
        ("delete", "Delete this ticket", TicketAction::RequestDelete),
        ("reopen", "Reopen this ticket", TicketAction::Reopen),
    ];

    let mut definition = CreateCommand::new(TICKET_COMMAND)
        .description("Manage the ticket in this channel");
    let mut processors: Vec<Arc<dyn SlashProcessor>> = Vec::with_capacity(subs.len());
    for (name, description, action) in subs {
        definition = definition.add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            name,
            description,
        ));
        processors.push(Arc::new(TicketSubCommand { name, action }));
    }

    SubCommandController::new(TICKET_COMMAND, definition, processors)
}
