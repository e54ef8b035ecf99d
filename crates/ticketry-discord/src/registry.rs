// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lookup tables from command names and button ids to their handlers.
//!
//! Tables are built once and reject duplicate keys at construction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::CreateCommand;

use ticketry_core::{Reply, TicketryError};

use crate::context::AppContext;
use crate::event::{CommandInvocation, CommandOption, ComponentInvocation};

/// Handles one sub-command of a slash command.
#[async_trait]
pub trait SlashProcessor: Send + Sync {
    fn name(&self) -> &str;

    async fn process(
        &self,
        ctx: &AppContext,
        cmd: &CommandInvocation,
        options: &[CommandOption],
    ) -> Result<Reply, TicketryError>;
}

/// Owns a top-level slash command.
#[async_trait]
pub trait CommandController: Send + Sync {
    fn name(&self) -> &str;

    /// Registration payload sent to Discord.
    fn definition(&self) -> CreateCommand;

    async fn handle(
        &self,
        ctx: &AppContext,
        cmd: &CommandInvocation,
    ) -> Result<Reply, TicketryError>;
}

/// Handles presses of one button, keyed by custom id.
#[async_trait]
pub trait ButtonProcessor: Send + Sync {
    fn custom_id(&self) -> &str;

    async fn process(
        &self,
        ctx: &AppContext,
        component: &ComponentInvocation,
    ) -> Result<Reply, TicketryError>;
}

/// A command whose first option selects one of its sub-command processors.
pub struct SubCommandController {
    name: String,
    definition: CreateCommand,
    processors: HashMap<String, Arc<dyn SlashProcessor>>,
}

impl SubCommandController {
    pub fn new(
        name: impl Into<String>,
        definition: CreateCommand,
        processors: Vec<Arc<dyn SlashProcessor>>,
    ) -> Result<Self, TicketryError> {
        let name = name.into();
        let processors = index(processors, |p| p.name().to_string(), &format!("{name} sub-command"))?;
        Ok(Self {
            name,
            definition,
            processors,
        })
    }
}

#[async_trait]
impl CommandController for SubCommandController {
    fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> CreateCommand {
        self.definition.clone()
    }

    async fn handle(
        &self,
        ctx: &AppContext,
        cmd: &CommandInvocation,
    ) -> Result<Reply, TicketryError> {
        let (sub, options) = cmd.sub_command().ok_or_else(|| TicketryError::NoHandler {
            kind: "sub-command".to_string(),
            name: format!("{} <none>", self.name),
        })?;
        let processor = self
            .processors
            .get(sub)
            .ok_or_else(|| TicketryError::NoHandler {
                kind: "sub-command".to_string(),
                name: format!("{} {sub}", self.name),
            })?;
        processor.process(ctx, cmd, options).await
    }
}

pub struct HandlerRegistry {
    commands: HashMap<String, Arc<dyn CommandController>>,
    buttons: HashMap<String, Arc<dyn ButtonProcessor>>,
}

impl HandlerRegistry {
    pub fn new(
        commands: Vec<Arc<dyn CommandController>>,
        buttons: Vec<Arc<dyn ButtonProcessor>>,
    ) -> Result<Self, TicketryError> {
        Ok(Self {
            commands: index(commands, |c| c.name().to_string(), "command")?,
            buttons: index(buttons, |b| b.custom_id().to_string(), "button")?,
        })
    }

    pub fn command(&self, name: &str) -> Result<&Arc<dyn CommandController>, TicketryError> {
        self.commands
            .get(name)
            .ok_or_else(|| TicketryError::NoHandler {
                kind: "command".to_string(),
                name: name.to_string(),
            })
    }

    pub fn button(&self, custom_id: &str) -> Result<&Arc<dyn ButtonProcessor>, TicketryError> {
        self.buttons
            .get(custom_id)
            .ok_or_else(|| TicketryError::NoHandler {
                kind: "button".to_string(),
                name: custom_id.to_string(),
            })
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn has_button(&self, custom_id: &str) -> bool {
        self.buttons.contains_key(custom_id)
    }

    /// Definitions of every registered command, sorted by name.
    pub fn definitions(&self) -> Vec<CreateCommand> {
        let mut names: Vec<_> = self.commands.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| self.commands[name].definition())
            .collect()
    }
}

fn index<T: ?Sized>(
    handlers: Vec<Arc<T>>,
    key: impl Fn(&T) -> String,
    kind: &str,
) -> Result<HashMap<String, Arc<T>>, TicketryError> {
    let mut table = HashMap::with_capacity(handlers.len());
    for handler in handlers {
        let name = key(handler.as_ref());
        if table.insert(name.clone(), handler).is_some() {
            return Err(TicketryError::DuplicateHandler {
                kind: kind.to_string(),
                name,
            });
        }
    }
    Ok(table)
}
