// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord surface of the Ticketry support bot.
//!
//! Converts serenity interactions into [`InboundEvent`]s, routes them through
//! a validated [`HandlerRegistry`] to the lifecycle engine, and implements
//! the engine's [`Platform`](ticketry_core::Platform) over the Discord REST API.

pub mod actions;
pub mod buttons;
pub mod client;
pub mod commands;
pub mod context;
pub mod convert;
pub mod dispatcher;
pub mod event;
pub mod handler;
pub mod registry;
pub mod render;

use std::sync::Arc;

pub use client::SerenityPlatform;
pub use context::AppContext;
pub use dispatcher::Dispatcher;
pub use event::{CommandInvocation, CommandOption, ComponentInvocation, InboundEvent, OptionValue};
pub use handler::TicketryHandler;
pub use registry::{ButtonProcessor, CommandController, HandlerRegistry, SlashProcessor};

use ticketry_core::TicketryError;

/// The `/setup` and `/ticket` commands plus every ticket button.
pub fn default_registry() -> Result<HandlerRegistry, TicketryError> {
    let commands: Vec<Arc<dyn CommandController>> = vec![
        Arc::new(commands::setup_command()?),
        Arc::new(commands::ticket_command()?),
    ];
    HandlerRegistry::new(commands, buttons::ticket_buttons())
}
