// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ticketry support bot.
//!
//! This crate provides the error type, the persisted records, the
//! platform-neutral message shapes and the adapter traits that the
//! lifecycle engine is written against.

pub mod error;
pub mod message;
pub mod ticket;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{Denial, GENERIC_ERROR_REPLY, TicketryError};
pub use message::{
    Actor, Button, ButtonStyle, ChannelEdit, ChannelKind, ChannelSpec, Embed, EmbedField,
    InteractionHandle, OutboundMessage, Overwrite, RemoteChannel, RemoteMessage, Reply, Visibility,
};
pub use ticket::{DeletionStatus, GuildConfig, ScheduledDeletion, Ticket, TicketState, TopicStatus};
pub use types::{AdapterType, HealthStatus};

pub use traits::{DeletionStore, GuildStore, Platform, PluginAdapter, StorageAdapter, TicketStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Platform,
            AdapterType::Storage,
            AdapterType::Observability,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn adapter_type_serialization() {
        let storage = AdapterType::Storage;
        let json = serde_json::to_string(&storage).expect("should serialize");
        let parsed: AdapterType = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(storage, parsed);
    }

    #[test]
    fn health_status_variants() {
        assert!(HealthStatus::Healthy.is_healthy());
        assert!(!HealthStatus::Degraded("slow".into()).is_healthy());
        assert!(!HealthStatus::Unhealthy("down".into()).is_healthy());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_platform<T: Platform>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
    }

    #[test]
    fn ticket_state_parses_lowercase() {
        use std::str::FromStr;
        assert_eq!(TicketState::from_str("claimed").unwrap(), TicketState::Claimed);
    }
}
