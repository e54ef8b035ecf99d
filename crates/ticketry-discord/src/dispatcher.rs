// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes inbound interactions to their handlers and answers them.
//!
//! Every failure, including a missing handler or a panic, is answered with
//! an ephemeral reply so the user never sees "interaction failed".

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::{Instrument, error, info, info_span, warn};

use ticketry_core::{Reply, TicketryError};
use ticketry_lifecycle::panic_message;

use crate::context::AppContext;
use crate::event::InboundEvent;
use crate::registry::HandlerRegistry;

#[derive(Clone)]
pub struct Dispatcher {
    ctx: AppContext,
    registry: Arc<HandlerRegistry>,
}

impl Dispatcher {
    pub fn new(ctx: AppContext, registry: HandlerRegistry) -> Self {
        Self {
            ctx,
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Handles one interaction to completion and sends its reply.
    pub async fn dispatch(&self, event: InboundEvent) {
        let started = Instant::now();
        let kind = event.kind();
        let name = self.metric_name(&event);
        let span = info_span!("interaction", kind, name = %name);

        async {
            let result = match AssertUnwindSafe(self.route(&event)).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Err(TicketryError::Panic(panic_message(payload.as_ref()))),
            };

            let reply = match result {
                Ok(reply) => reply,
                Err(e) => {
                    if e.is_rejection() {
                        info!(reason = %e, "interaction rejected");
                    } else {
                        error!(error = %e, "interaction failed");
                    }
                    Reply::ephemeral(e.user_message())
                }
            };

            match event.handle() {
                Some(handle) => {
                    if let Err(e) = self.ctx.platform.respond(handle, reply).await {
                        error!(error = %e, "failed to answer interaction");
                    }
                }
                None => warn!("interaction has no handle, reply dropped"),
            }
        }
        .instrument(span)
        .await;

        ticketry_prometheus::record_interaction(kind, &name, started.elapsed());
    }

    async fn route(&self, event: &InboundEvent) -> Result<Reply, TicketryError> {
        match event {
            InboundEvent::Command(cmd) => {
                self.registry
                    .command(&cmd.name)?
                    .handle(&self.ctx, cmd)
                    .await
            }
            InboundEvent::Component(component) => {
                self.registry
                    .button(&component.custom_id)?
                    .process(&self.ctx, component)
                    .await
            }
            InboundEvent::Unknown { kind, .. } => Err(TicketryError::NoHandler {
                kind: "interaction".to_string(),
                name: kind.clone(),
            }),
        }
    }

    // Only registered names become label values.
    fn metric_name(&self, event: &InboundEvent) -> String {
        match event {
            InboundEvent::Command(cmd) if self.registry.has_command(&cmd.name) => {
                match cmd.sub_command() {
                    Some((sub, _)) => format!("{} {sub}", cmd.name),
                    None => cmd.name.clone(),
                }
            }
            InboundEvent::Component(c) if self.registry.has_button(&c.custom_id) => {
                c.custom_id.clone()
            }
            _ => "unknown".to_string(),
        }
    }
}
