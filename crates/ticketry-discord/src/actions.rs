// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use ticketry_core::{Reply, TicketryError};
use ticketry_lifecycle::{Invocation, TicketEngine};

/// A lifecycle operation reachable from a sub-command or a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    Create,
    Claim,
    Close,
    Reopen,
    RequestDelete,
    ConfirmDelete,
}

impl TicketAction {
    pub async fn run(self, engine: &TicketEngine, inv: &Invocation) -> Result<Reply, TicketryError> {
        match self {
            Self::Create => engine.create(inv).await,
            Self::Claim => engine.claim(inv).await,
            Self::Close => engine.close(inv).await,
            Self::Reopen => engine.reopen(inv).await,
            Self::RequestDelete => engine.request_delete(inv).await,
            Self::ConfirmDelete => engine.confirm_delete(inv).await,
        }
    }
}
