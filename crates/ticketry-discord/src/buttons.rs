// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;

use ticketry_core::{Reply, TicketryError};
use ticketry_lifecycle::ButtonId;

use crate::actions::TicketAction;
use crate::context::AppContext;
use crate::event::ComponentInvocation;
use crate::registry::ButtonProcessor;

struct TicketButton {
    custom_id: String,
    action: TicketAction,
}

#[async_trait]
impl ButtonProcessor for TicketButton {
    fn custom_id(&self) -> &str {
        &self.custom_id
    }

    async fn process(
        &self,
        ctx: &AppContext,
        component: &ComponentInvocation,
    ) -> Result<Reply, TicketryError> {
        self.action.run(&ctx.engine, &component.invocation()?).await
    }
}

/// One processor per button the bot renders.
pub fn ticket_buttons() -> Vec<Arc<dyn ButtonProcessor>> {
    ButtonId::ALL
        .into_iter()
        .map(|id| {
            let action = match id {
                ButtonId::OpenTicket => TicketAction::Create,
                ButtonId::ClaimTicket => TicketAction::Claim,
                ButtonId::CloseTicket => TicketAction::Close,
                ButtonId::ReopenTicket => TicketAction::Reopen,
                ButtonId::DeleteTicket => TicketAction::RequestDelete,
                ButtonId::DeleteConfirmation => TicketAction::ConfirmDelete,
            };
            Arc::new(TicketButton {
                custom_id: id.to_string(),
                action,
            }) as Arc<dyn ButtonProcessor>
        })
        .collect()
}
