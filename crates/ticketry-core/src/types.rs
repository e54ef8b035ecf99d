// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by adapters and the lifecycle engine.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Platform,
    Storage,
    Observability,
}

/// Formats a UTC instant the way every stored timestamp is written.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as a normalized timestamp, e.g. `2026-03-01T12:00:00Z`.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Parses a stored timestamp back into a UTC instant.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_normalized_to_seconds() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 5).unwrap();
        let raw = format_timestamp(at);
        assert_eq!(raw, "2026-03-01T12:00:05Z");
        assert_eq!(parse_timestamp(&raw), Some(at));
    }

    #[test]
    fn garbage_timestamp_is_none() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
