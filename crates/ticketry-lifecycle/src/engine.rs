// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lifecycle engine.
//!
//! Every operation validates the actor and the ticket's state, moves the
//! ticket channel between category folders, persists the record and returns
//! the reply for the invoking user. Control-button renders and topic refreshes
//! run afterwards on the [`EffectRunner`].

use std::future::Future;
use std::sync::Arc;

use tracing::{Instrument, Span, debug, error, info, info_span};

use ticketry_core::message::private_overwrites;
use ticketry_core::types::now_timestamp;
use ticketry_core::{
    Actor, ChannelEdit, ChannelKind, ChannelSpec, Denial, GuildConfig, Overwrite, Platform, Reply,
    StorageAdapter, Ticket, TicketState, TicketryError, TopicStatus,
};

use crate::category::CategoryResolver;
use crate::controls::{control_message, delete_prompt_reply, ticket_created_reply};
use crate::deletion::DeletionScheduler;
use crate::effects::EffectRunner;
use crate::locks::KeyedLocks;
use crate::settings::LifecycleSettings;
use crate::topic::channel_topic;

/// Who invoked an operation, and where.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub actor: Actor,
    pub guild_id: String,
    /// Channel the command or button was used in.
    pub channel_id: String,
}

#[derive(Clone)]
pub struct TicketEngine {
    pub(crate) platform: Arc<dyn Platform>,
    pub(crate) storage: Arc<dyn StorageAdapter>,
    categories: CategoryResolver,
    deletions: DeletionScheduler,
    effects: EffectRunner,
    pub(crate) locks: KeyedLocks,
    settings: Arc<LifecycleSettings>,
}

impl TicketEngine {
    pub fn new(
        platform: Arc<dyn Platform>,
        storage: Arc<dyn StorageAdapter>,
        effects: EffectRunner,
        settings: LifecycleSettings,
    ) -> Self {
        let settings = Arc::new(settings);
        Self {
            categories: CategoryResolver::new(platform.clone(), storage.clone(), settings.clone()),
            deletions: DeletionScheduler::new(
                platform.clone(),
                storage.clone(),
                effects.clone(),
                settings.clone(),
            ),
            platform,
            storage,
            effects,
            locks: KeyedLocks::new(),
            settings,
        }
    }

    pub fn effects(&self) -> &EffectRunner {
        &self.effects
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    /// Opens a new ticket for the actor.
    pub async fn create(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        self.observe("create", inv, self.create_ticket(inv)).await
    }

    pub async fn claim(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        self.observe("claim", inv, self.claim_ticket(inv)).await
    }

    pub async fn close(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        self.observe("close", inv, self.close_ticket(inv)).await
    }

    pub async fn reopen(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        self.observe("reopen", inv, self.reopen_ticket(inv)).await
    }

    /// Asks the actor to confirm deletion. The ticket is left untouched.
    pub async fn request_delete(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        self.observe("delete_request", inv, self.request_delete_ticket(inv))
            .await
    }

    pub async fn confirm_delete(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        self.observe("delete_confirm", inv, self.confirm_delete_ticket(inv))
            .await
    }

    /// Re-arms channel removals persisted before a restart.
    pub async fn recover_deletions(&self) -> Result<usize, TicketryError> {
        self.deletions.recover().await
    }

    /// Runs one operation inside a span and records its outcome.
    pub(crate) async fn observe<F>(
        &self,
        operation: &'static str,
        inv: &Invocation,
        op: F,
    ) -> Result<Reply, TicketryError>
    where
        F: Future<Output = Result<Reply, TicketryError>>,
    {
        let span = info_span!(
            "ticket_operation",
            operation,
            guild_id = %inv.guild_id,
            channel_id = %inv.channel_id,
            user_id = %inv.actor.user_id,
            number = tracing::field::Empty,
        );
        let result = op.instrument(span.clone()).await;
        let outcome = span.in_scope(|| match &result {
            Ok(_) => {
                info!("ticket operation completed");
                "ok"
            }
            Err(e) if e.is_rejection() => {
                info!(reason = %e, "ticket operation rejected");
                "rejected"
            }
            Err(e) => {
                error!(error = %e, "ticket operation failed");
                "error"
            }
        });
        ticketry_prometheus::record_transition(operation, outcome);
        result
    }

    async fn create_ticket(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        let _guard = self.locks.lock(format!("guild:{}", inv.guild_id)).await;
        let guild = self.configured_guild(&inv.guild_id).await?;
        let role_id = staff_role(&guild)?;

        let number = self
            .storage
            .latest_ticket_number(&inv.guild_id)
            .await?
            .unwrap_or(0)
            + 1;
        Span::current().record("number", number);

        let overwrites = private_overwrites(&guild.id, &role_id, &inv.actor.user_id);
        let category_id = self
            .categories
            .resolve(&inv.guild_id, TicketState::Open, overwrites.clone())
            .await?;

        let mut ticket = Ticket {
            number,
            guild_id: inv.guild_id.clone(),
            channel_id: String::new(),
            creator_id: inv.actor.user_id.clone(),
            creator_name: inv.actor.display_name.clone(),
            claimed_by: None,
            closed_by: None,
            deleted: false,
            created_at: now_timestamp(),
            control_message_id: None,
        };
        let channel = self
            .platform
            .create_channel(
                &inv.guild_id,
                ChannelSpec {
                    name: ticket.channel_name(),
                    kind: ChannelKind::Text,
                    topic: Some(channel_topic(&ticket, TopicStatus::Created)),
                    parent_id: Some(category_id),
                    overwrites,
                },
            )
            .await?;
        ticket.channel_id = channel.id;
        self.storage.save_ticket(&ticket).await?;

        self.spawn_control_message(&ticket);
        Ok(ticket_created_reply(
            &inv.actor,
            &ticket,
            self.settings.category_name(TicketState::Open),
        ))
    }

    async fn claim_ticket(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        let _guard = self.channel_lock(inv).await;
        let guild = self.configured_guild(&inv.guild_id).await?;
        let mut ticket = self.active_ticket(inv).await?;
        let role_id = self.require_staff(&guild, &inv.actor).await?;

        if ticket.state() == TicketState::Closed {
            return Err(TicketryError::InvalidTransition {
                state: TicketState::Closed,
                operation: "claim",
            });
        }
        if let Some(claimant) = &ticket.claimed_by {
            return Err(if *claimant == inv.actor.user_id {
                TicketryError::AlreadyInState(TicketState::Claimed)
            } else {
                TicketryError::PermissionDenied(Denial::ClaimedByOther {
                    claimant_id: claimant.clone(),
                })
            });
        }

        let overwrites = private_overwrites(&guild.id, &role_id, &ticket.creator_id);
        let category_id = self
            .stage_category(&inv.guild_id, TicketState::Claimed, overwrites)
            .await?;
        ticket.claimed_by = Some(inv.actor.user_id.clone());
        self.move_channel(&ticket, category_id, TopicStatus::Claimed)
            .await?;
        self.storage.save_ticket(&ticket).await?;

        self.spawn_render_controls(&ticket);
        Ok(Reply::public(format!(
            "{}, you have claimed this ticket.",
            inv.actor.mention()
        )))
    }

    async fn close_ticket(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        let _guard = self.channel_lock(inv).await;
        let guild = self.configured_guild(&inv.guild_id).await?;
        let mut ticket = self.active_ticket(inv).await?;
        let role_id = self.require_staff(&guild, &inv.actor).await?;

        if ticket.closed_by.is_some()
            || self.in_category(&guild, &inv.channel_id, TicketState::Closed).await?
        {
            return Err(TicketryError::AlreadyInState(TicketState::Closed));
        }

        let overwrites = private_overwrites(&guild.id, &role_id, &ticket.creator_id);
        let category_id = self
            .stage_category(&inv.guild_id, TicketState::Closed, overwrites)
            .await?;
        ticket.closed_by = Some(inv.actor.user_id.clone());
        self.move_channel(&ticket, category_id, TopicStatus::Closed)
            .await?;
        self.storage.save_ticket(&ticket).await?;

        self.spawn_render_controls(&ticket);
        Ok(Reply::public(format!(
            "{}, congratulations on closing this ticket.",
            inv.actor.mention()
        )))
    }

    async fn reopen_ticket(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        let _guard = self.channel_lock(inv).await;
        let guild = self.configured_guild(&inv.guild_id).await?;
        let mut ticket = self.active_ticket(inv).await?;
        let role_id = staff_role(&guild)?;

        if ticket.creator_id != inv.actor.user_id {
            return Err(TicketryError::PermissionDenied(Denial::NotCreator));
        }
        if self.in_category(&guild, &inv.channel_id, TicketState::Open).await? {
            return Err(TicketryError::AlreadyInState(TicketState::Open));
        }

        let overwrites = private_overwrites(&guild.id, &role_id, &ticket.creator_id);
        let category_id = self
            .stage_category(&inv.guild_id, TicketState::Open, overwrites)
            .await?;
        ticket.claimed_by = None;
        ticket.closed_by = None;
        self.move_channel(&ticket, category_id, TopicStatus::Reopened)
            .await?;
        self.storage.save_ticket(&ticket).await?;

        self.spawn_render_controls(&ticket);
        Ok(Reply::public(format!(
            "{}, you have reopened this ticket.",
            inv.actor.mention()
        )))
    }

    async fn request_delete_ticket(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        let guild = self.configured_guild(&inv.guild_id).await?;
        self.active_ticket(inv).await?;
        self.require_staff(&guild, &inv.actor).await?;
        Ok(delete_prompt_reply())
    }

    async fn confirm_delete_ticket(&self, inv: &Invocation) -> Result<Reply, TicketryError> {
        let _guard = self.channel_lock(inv).await;
        let guild = self.configured_guild(&inv.guild_id).await?;
        let mut ticket = self.active_ticket(inv).await?;
        self.require_staff(&guild, &inv.actor).await?;

        ticket.deleted = true;
        self.storage.save_ticket(&ticket).await?;
        self.deletions.schedule(&ticket).await?;

        let platform = self.platform.clone();
        let channel_id = ticket.channel_id.clone();
        let topic = channel_topic(&ticket, TopicStatus::Deleted);
        self.effects.spawn("refresh_topic", async move {
            platform
                .edit_channel(
                    &channel_id,
                    ChannelEdit {
                        topic: Some(topic),
                        ..Default::default()
                    },
                )
                .await
        });

        Ok(Reply::public(format!(
            "{}, this ticket has been deleted. This channel will be deleted in {} seconds.",
            inv.actor.mention(),
            self.settings.delete_delay.as_secs()
        )))
    }

    async fn channel_lock(&self, inv: &Invocation) -> tokio::sync::OwnedMutexGuard<()> {
        self.locks.lock(format!("channel:{}", inv.channel_id)).await
    }

    /// Resolves a stage category while holding the guild lock. Transitions
    /// take it after their channel lock; nothing takes them the other way round.
    async fn stage_category(
        &self,
        guild_id: &str,
        stage: TicketState,
        overwrites: Vec<Overwrite>,
    ) -> Result<String, TicketryError> {
        let _guard = self.locks.lock(format!("guild:{guild_id}")).await;
        self.categories.resolve(guild_id, stage, overwrites).await
    }

    async fn configured_guild(&self, guild_id: &str) -> Result<GuildConfig, TicketryError> {
        match self.storage.get_guild(guild_id).await? {
            Some(guild) if guild.is_configured() => Ok(guild),
            _ => Err(TicketryError::TicketingNotConfigured {
                guild_id: guild_id.to_string(),
            }),
        }
    }

    async fn active_ticket(&self, inv: &Invocation) -> Result<Ticket, TicketryError> {
        let ticket = self
            .storage
            .get_ticket(&inv.guild_id, &inv.channel_id)
            .await?
            .ok_or_else(|| TicketryError::NotATicket {
                channel_id: inv.channel_id.clone(),
            })?;
        Span::current().record("number", ticket.number);
        Ok(ticket)
    }

    /// Fails unless the actor holds the guild's staff role; returns the role id.
    async fn require_staff(
        &self,
        guild: &GuildConfig,
        actor: &Actor,
    ) -> Result<String, TicketryError> {
        let role_id = staff_role(guild)?;
        let roles = self.platform.member_roles(&guild.id, &actor.user_id).await?;
        if roles.iter().any(|r| *r == role_id) {
            Ok(role_id)
        } else {
            Err(TicketryError::PermissionDenied(Denial::MissingStaffRole {
                role_id,
            }))
        }
    }

    /// Whether the channel currently sits in the category recorded for `stage`.
    async fn in_category(
        &self,
        guild: &GuildConfig,
        channel_id: &str,
        stage: TicketState,
    ) -> Result<bool, TicketryError> {
        let Some(category_id) = guild.category_id(stage) else {
            return Ok(false);
        };
        let channel = self.platform.channel(channel_id).await?;
        Ok(channel.parent_id.as_deref() == Some(category_id))
    }

    async fn move_channel(
        &self,
        ticket: &Ticket,
        category_id: String,
        status: TopicStatus,
    ) -> Result<(), TicketryError> {
        self.platform
            .edit_channel(
                &ticket.channel_id,
                ChannelEdit {
                    name: Some(ticket.channel_name()),
                    parent_id: Some(category_id),
                    topic: Some(channel_topic(ticket, status)),
                },
            )
            .await?;
        debug!(number = ticket.number, %status, "ticket channel moved");
        Ok(())
    }

    /// Re-renders the pinned control buttons from the ticket's stored state.
    fn spawn_render_controls(&self, ticket: &Ticket) {
        let platform = self.platform.clone();
        let storage = self.storage.clone();
        let locks = self.locks.clone();
        let (guild_id, channel_id) = (ticket.guild_id.clone(), ticket.channel_id.clone());
        self.effects.spawn("render_controls", async move {
            // Renders queue behind transitions on the same channel and always
            // read the latest record, so an earlier render cannot land last.
            let _guard = locks.lock(format!("channel:{channel_id}")).await;
            let Some(ticket) = storage.get_ticket(&guild_id, &channel_id).await? else {
                debug!(%channel_id, "ticket deleted before its controls were rendered");
                return Ok(());
            };
            let Some(message_id) = ticket.control_message_id.as_deref() else {
                // post_controls has not run yet; it posts the current state.
                debug!(%channel_id, "ticket has no control message to update");
                return Ok(());
            };
            platform
                .edit_message(&channel_id, message_id, control_message(ticket.state()))
                .await
        });
    }

    /// Posts and pins the control message of a new ticket and records its id.
    fn spawn_control_message(&self, ticket: &Ticket) {
        let platform = self.platform.clone();
        let storage = self.storage.clone();
        let locks = self.locks.clone();
        let (guild_id, channel_id) = (ticket.guild_id.clone(), ticket.channel_id.clone());
        self.effects.spawn("post_controls", async move {
            let _guard = locks.lock(format!("channel:{channel_id}")).await;
            let Some(ticket) = storage.get_ticket(&guild_id, &channel_id).await? else {
                return Ok(());
            };
            let message_id = platform
                .send_message(&channel_id, control_message(ticket.state()))
                .await?;
            storage
                .set_control_message(&guild_id, &channel_id, &message_id)
                .await?;
            platform.pin_message(&channel_id, &message_id).await
        });
    }
}

pub(crate) fn staff_role(guild: &GuildConfig) -> Result<String, TicketryError> {
    guild
        .staff_role_id
        .clone()
        .ok_or_else(|| TicketryError::TicketingNotConfigured {
            guild_id: guild.id.clone(),
        })
}
