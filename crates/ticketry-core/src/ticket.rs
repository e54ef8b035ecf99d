// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted records: community configuration, tickets and scheduled deletions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a ticket, derived from its claimant and closer.
///
/// Each state also names the category folder its channel lives in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketState {
    Open,
    Claimed,
    Closed,
}

/// Status word written into a ticket channel's topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum TopicStatus {
    Created,
    Claimed,
    Closed,
    Reopened,
    Deleted,
}

/// Per-community ticketing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    pub id: String,
    pub ticketing_enabled: bool,
    /// Channel holding the pinned intake message.
    pub ticket_channel_id: Option<String>,
    pub staff_role_id: Option<String>,
    pub intake_message_id: Option<String>,
    pub open_category_id: Option<String>,
    pub claimed_category_id: Option<String>,
    pub closed_category_id: Option<String>,
}

impl GuildConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Ticketing is usable only when enabled with a staff role on record.
    pub fn is_configured(&self) -> bool {
        self.ticketing_enabled
            && self.staff_role_id.as_deref().is_some_and(|r| !r.is_empty())
            && self.ticket_channel_id.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn category_id(&self, stage: TicketState) -> Option<&str> {
        match stage {
            TicketState::Open => self.open_category_id.as_deref(),
            TicketState::Claimed => self.claimed_category_id.as_deref(),
            TicketState::Closed => self.closed_category_id.as_deref(),
        }
    }

    pub fn set_category_id(&mut self, stage: TicketState, id: impl Into<String>) {
        let id = Some(id.into());
        match stage {
            TicketState::Open => self.open_category_id = id,
            TicketState::Claimed => self.claimed_category_id = id,
            TicketState::Closed => self.closed_category_id = id,
        }
    }
}

/// A support ticket and the channel that backs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub number: i64,
    pub guild_id: String,
    pub channel_id: String,
    pub creator_id: String,
    pub creator_name: String,
    pub claimed_by: Option<String>,
    pub closed_by: Option<String>,
    pub deleted: bool,
    pub created_at: String,
    /// Pinned message carrying the control buttons.
    pub control_message_id: Option<String>,
}

impl Ticket {
    pub fn state(&self) -> TicketState {
        if self.closed_by.is_some() {
            TicketState::Closed
        } else if self.claimed_by.is_some() {
            TicketState::Claimed
        } else {
            TicketState::Open
        }
    }

    /// Channel name, `"<number>-<creatorName>"`.
    pub fn channel_name(&self) -> String {
        channel_name(self.number, &self.creator_name)
    }
}

pub fn channel_name(number: i64, creator_name: &str) -> String {
    format!("{number}-{creator_name}")
}

/// Progress of a delayed channel removal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum DeletionStatus {
    Pending,
    Completed,
    Failed,
}

/// A ticket channel waiting to be removed once `due_at` passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDeletion {
    pub channel_id: String,
    pub guild_id: String,
    pub ticket_number: i64,
    pub due_at: String,
    pub status: DeletionStatus,
    pub attempts: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        Ticket {
            number: 3,
            guild_id: "g".into(),
            channel_id: "c".into(),
            creator_id: "u".into(),
            creator_name: "alice".into(),
            claimed_by: None,
            closed_by: None,
            deleted: false,
            created_at: "2026-01-01T00:00:00Z".into(),
            control_message_id: None,
        }
    }

    #[test]
    fn state_follows_claimant_and_closer() {
        let mut t = ticket();
        assert_eq!(t.state(), TicketState::Open);
        t.claimed_by = Some("s".into());
        assert_eq!(t.state(), TicketState::Claimed);
        t.closed_by = Some("s".into());
        assert_eq!(t.state(), TicketState::Closed);
        t.claimed_by = None;
        assert_eq!(t.state(), TicketState::Closed);
    }

    #[test]
    fn channel_name_joins_number_and_creator() {
        assert_eq!(ticket().channel_name(), "3-alice");
    }

    #[test]
    fn guild_requires_role_and_channel() {
        let mut g = GuildConfig::new("g");
        g.ticketing_enabled = true;
        assert!(!g.is_configured());
        g.staff_role_id = Some("r".into());
        g.ticket_channel_id = Some("c".into());
        assert!(g.is_configured());
        g.ticketing_enabled = false;
        assert!(!g.is_configured());
    }

    #[test]
    fn category_ids_are_keyed_by_stage() {
        let mut g = GuildConfig::new("g");
        g.set_category_id(TicketState::Claimed, "cat-2");
        assert_eq!(g.category_id(TicketState::Claimed), Some("cat-2"));
        assert_eq!(g.category_id(TicketState::Open), None);
    }

    #[test]
    fn states_display_lowercase() {
        assert_eq!(TicketState::Closed.to_string(), "closed");
        assert_eq!(TopicStatus::Reopened.to_string(), "Reopened");
        assert_eq!(DeletionStatus::Pending.to_string(), "pending");
    }
}
