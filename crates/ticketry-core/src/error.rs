// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ticketry support bot.

use thiserror::Error;

use crate::ticket::TicketState;

/// Reply shown for every fault that is not an expected rejection.
pub const GENERIC_ERROR_REPLY: &str =
    "There was an error processing your request, please try again later.";

/// Why an actor was refused an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    /// The actor does not hold the community's staff role.
    #[error("actor lacks staff role {role_id}")]
    MissingStaffRole { role_id: String },

    /// Only the ticket creator may perform this operation.
    #[error("actor is not the ticket creator")]
    NotCreator,

    /// Another user already claimed the ticket.
    #[error("ticket already claimed by {claimant_id}")]
    ClaimedByOther { claimant_id: String },

    /// The command needs the administrator permission.
    #[error("actor is not an administrator")]
    NotAdministrator,
}

/// The primary error type used across all Ticketry crates.
#[derive(Debug, Error)]
pub enum TicketryError {
    /// The actor is not allowed to perform the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(Denial),

    /// The ticket is already in the state the operation would move it to.
    #[error("ticket is already {0}")]
    AlreadyInState(TicketState),

    /// The operation is not valid from the ticket's current state.
    #[error("cannot {operation} a {state} ticket")]
    InvalidTransition {
        state: TicketState,
        operation: &'static str,
    },

    /// The channel the command was issued in holds no active ticket.
    #[error("channel {channel_id} is not a ticket channel")]
    NotATicket { channel_id: String },

    /// Ticketing is not enabled for the community.
    #[error("ticketing is not configured for guild {guild_id}")]
    TicketingNotConfigured { guild_id: String },

    /// User supplied input that cannot be acted on.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A remote resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// A call to the chat platform failed.
    #[error("upstream call {operation} failed: {source}")]
    Upstream {
        operation: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No handler is registered for an inbound interaction.
    #[error("no {kind} handler registered for {name}")]
    NoHandler { kind: String, name: String },

    /// Two handlers were registered under the same key.
    #[error("duplicate {kind} handler registered for {name}")]
    DuplicateHandler { kind: String, name: String },

    /// A handler panicked while processing an interaction.
    #[error("handler panicked: {0}")]
    Panic(String),

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TicketryError {
    /// Wraps a platform failure with the name of the call that failed.
    pub fn upstream(
        operation: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Upstream {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Wraps a storage failure.
    pub fn persistence(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Persistence {
            source: source.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Returns `true` for expected rejections that are answered with a
    /// specific message and logged at info level.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_)
                | Self::AlreadyInState(_)
                | Self::InvalidTransition { .. }
                | Self::NotATicket { .. }
                | Self::TicketingNotConfigured { .. }
                | Self::InvalidInput(_)
        )
    }

    /// Returns `true` when a remote resource is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Text shown to the invoking user.
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied(Denial::MissingStaffRole { role_id }) => {
                format!("You do not have the ticket role to manage tickets. [<@&{role_id}>]")
            }
            Self::PermissionDenied(Denial::NotCreator) => {
                "Only the ticket creator can reopen the ticket.".to_string()
            }
            Self::PermissionDenied(Denial::ClaimedByOther { claimant_id }) => {
                format!("This ticket is already claimed by <@{claimant_id}>.")
            }
            Self::PermissionDenied(Denial::NotAdministrator) => {
                "You must be an administrator to use this command".to_string()
            }
            Self::AlreadyInState(TicketState::Claimed) => {
                "You have already claimed this ticket.".to_string()
            }
            Self::AlreadyInState(TicketState::Closed) => "This ticket is already closed.".to_string(),
            Self::AlreadyInState(TicketState::Open) => "This ticket is already open.".to_string(),
            Self::InvalidTransition { state, operation } => {
                format!("This ticket is {state}, you cannot {operation} it. Reopen it first.")
            }
            Self::NotATicket { .. } => "This channel is not a ticket channel.".to_string(),
            Self::TicketingNotConfigured { .. } => {
                "Ticketing is not enabled for this server.".to_string()
            }
            Self::InvalidInput(message) => message.clone(),
            _ => GENERIC_ERROR_REPLY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_carry_specific_text() {
        let err = TicketryError::PermissionDenied(Denial::ClaimedByOther {
            claimant_id: "42".into(),
        });
        assert!(err.is_rejection());
        assert_eq!(err.user_message(), "This ticket is already claimed by <@42>.");

        let err = TicketryError::PermissionDenied(Denial::MissingStaffRole {
            role_id: "7".into(),
        });
        assert!(err.user_message().contains("<@&7>"));
    }

    #[test]
    fn faults_use_generic_reply() {
        let faults = [
            TicketryError::not_found("channel", "1"),
            TicketryError::upstream("create_channel", "boom"),
            TicketryError::persistence("disk full"),
            TicketryError::NoHandler {
                kind: "command".into(),
                name: "nope".into(),
            },
            TicketryError::Panic("oops".into()),
        ];
        for err in faults {
            assert!(!err.is_rejection(), "{err} should not be a rejection");
            assert_eq!(err.user_message(), GENERIC_ERROR_REPLY);
        }
    }

    #[test]
    fn not_found_is_detectable() {
        assert!(TicketryError::not_found("category", "9").is_not_found());
        assert!(!TicketryError::Internal("x".into()).is_not_found());
    }
}
