// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket channel topic line.

use ticketry_core::{Ticket, TopicStatus};

/// Builds the topic from scratch so it never drifts from the stored record:
/// `Ticket #<n> | Status: <word>[ | Closed By: <@id>][ | Claimed By: <@id>] | Created By: <@id>`.
pub fn channel_topic(ticket: &Ticket, status: TopicStatus) -> String {
    let mut topic = format!("Ticket #{} | Status: {status}", ticket.number);
    if let Some(closer) = &ticket.closed_by {
        topic.push_str(&format!(" | Closed By: <@{closer}>"));
    }
    if let Some(claimant) = &ticket.claimed_by {
        topic.push_str(&format!(" | Claimed By: <@{claimant}>"));
    }
    topic.push_str(&format!(" | Created By: <@{}>", ticket.creator_id));
    topic
}
