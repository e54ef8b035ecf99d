// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lifecycle for the Ticketry support bot.
//!
//! [`TicketEngine`] owns the create / claim / close / reopen / delete
//! transitions and guild setup. It talks to the chat platform and to storage
//! only through the traits in `ticketry-core`, so tests drive it with
//! in-memory doubles.

pub mod category;
pub mod controls;
pub mod deletion;
pub mod effects;
pub mod engine;
pub mod locks;
pub mod settings;
pub mod setup;
pub mod topic;

pub use category::CategoryResolver;
pub use controls::{ButtonId, control_message, control_panel, intake_message};
pub use deletion::DeletionScheduler;
pub use effects::{EffectRunner, panic_message};
pub use engine::{Invocation, TicketEngine};
pub use locks::KeyedLocks;
pub use settings::LifecycleSettings;
pub use topic::channel_topic;
