// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delayed removal of deleted ticket channels.
//!
//! Each removal is written to storage before it is armed so a restart can
//! pick it up again with whatever delay remains.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tracing::{info, warn};

use ticketry_core::types::{format_timestamp, parse_timestamp};
use ticketry_core::{
    DeletionStatus, Platform, ScheduledDeletion, StorageAdapter, Ticket, TicketryError,
};

use crate::effects::EffectRunner;
use crate::settings::LifecycleSettings;

const EFFECT_NAME: &str = "delete_channel";
const RETRY_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DeletionScheduler {
    platform: Arc<dyn Platform>,
    storage: Arc<dyn StorageAdapter>,
    effects: EffectRunner,
    settings: Arc<LifecycleSettings>,
}

impl DeletionScheduler {
    pub fn new(
        platform: Arc<dyn Platform>,
        storage: Arc<dyn StorageAdapter>,
        effects: EffectRunner,
        settings: Arc<LifecycleSettings>,
    ) -> Self {
        Self {
            platform,
            storage,
            effects,
            settings,
        }
    }

    /// Persists a removal of the ticket's channel due after the configured
    /// delay and arms it.
    pub async fn schedule(&self, ticket: &Ticket) -> Result<(), TicketryError> {
        let delay = self.settings.delete_delay;
        let delta = TimeDelta::from_std(delay)
            .map_err(|e| TicketryError::Internal(format!("delete delay out of range: {e}")))?;
        let deletion = ScheduledDeletion {
            channel_id: ticket.channel_id.clone(),
            guild_id: ticket.guild_id.clone(),
            ticket_number: ticket.number,
            due_at: format_timestamp(Utc::now() + delta),
            status: DeletionStatus::Pending,
            attempts: 0,
        };
        self.storage.schedule_deletion(&deletion).await?;
        self.arm(deletion.channel_id, delay, 0);
        Ok(())
    }

    /// Re-arms every pending removal. Overdue ones run immediately.
    pub async fn recover(&self) -> Result<usize, TicketryError> {
        let pending = self.storage.pending_deletions().await?;
        let now = Utc::now();
        for deletion in &pending {
            let remaining = match parse_timestamp(&deletion.due_at) {
                Some(due) => (due - now).to_std().unwrap_or(Duration::ZERO),
                None => {
                    warn!(
                        channel_id = %deletion.channel_id,
                        due_at = %deletion.due_at,
                        "unreadable due time, deleting now"
                    );
                    Duration::ZERO
                }
            };
            self.arm(deletion.channel_id.clone(), remaining, deletion.attempts);
        }
        if !pending.is_empty() {
            info!(count = pending.len(), "re-armed pending channel deletions");
        }
        Ok(pending.len())
    }

    fn arm(&self, channel_id: String, delay: Duration, attempts_made: i64) {
        let platform = self.platform.clone();
        let storage = self.storage.clone();
        let max_attempts = self.settings.max_deletion_attempts;
        let cancel = self.effects.cancellation();
        self.effects.spawn_after(EFFECT_NAME, delay, async move {
            let mut attempt = attempts_made;
            loop {
                match platform.delete_channel(&channel_id).await {
                    Ok(()) => {
                        info!(%channel_id, "ticket channel deleted");
                        break;
                    }
                    Err(e) if e.is_not_found() => {
                        info!(%channel_id, "ticket channel already gone");
                        break;
                    }
                    Err(e) => {
                        attempt += 1;
                        storage.fail_deletion(&channel_id, max_attempts).await?;
                        if attempt >= max_attempts {
                            return Err(e);
                        }
                        warn!(%channel_id, attempt, error = %e, "channel deletion failed, retrying");
                        tokio::select! {
                            _ = cancel.cancelled() => {
                                info!(%channel_id, "shutting down, deletion stays pending");
                                return Ok(());
                            }
                            _ = tokio::time::sleep(RETRY_BACKOFF * attempt as u32) => {}
                        }
                    }
                }
            }
            storage.complete_deletion(&channel_id).await
        });
    }
}
