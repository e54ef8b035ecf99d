// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder can collect these metrics.
//! Crates that emit metrics depend on this module, never on the exporter.

use std::time::Duration;

use metrics::{describe_counter, describe_gauge, describe_histogram};

pub const DISCORD_EVENTS: &str = "ticketry_discord_events_total";
pub const GUILDS: &str = "ticketry_guilds";
pub const INTERACTION_DURATION: &str = "ticketry_interaction_duration_seconds";
pub const TICKET_TRANSITIONS: &str = "ticketry_ticket_transitions_total";
pub const BACKGROUND_EFFECTS: &str = "ticketry_background_effects_total";
pub const STORE_QUERIES: &str = "ticketry_store_queries_total";
pub const STORE_QUERY_DURATION: &str = "ticketry_store_query_duration_seconds";
pub const HTTP_REQUESTS: &str = "ticketry_http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "ticketry_http_request_duration_seconds";

/// Register all metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(DISCORD_EVENTS, "Gateway events received, by event type");
    describe_gauge!(GUILDS, "Guilds the bot is currently a member of");
    describe_histogram!(
        INTERACTION_DURATION,
        "Time to handle a slash command or button press, in seconds"
    );
    describe_counter!(
        TICKET_TRANSITIONS,
        "Ticket lifecycle operations, by operation and outcome"
    );
    describe_counter!(
        BACKGROUND_EFFECTS,
        "Detached effects run after an interaction, by effect and outcome"
    );
    describe_counter!(STORE_QUERIES, "Storage queries issued");
    describe_histogram!(STORE_QUERY_DURATION, "Storage query latency in seconds");
    describe_counter!(HTTP_REQUESTS, "Monitoring HTTP requests served");
    describe_histogram!(
        HTTP_REQUEST_DURATION,
        "Monitoring HTTP request latency in seconds"
    );
}

pub fn record_discord_event(event: &str) {
    metrics::counter!(DISCORD_EVENTS, "event" => event.to_string()).increment(1);
}

pub fn increment_guilds() {
    metrics::gauge!(GUILDS).increment(1.0);
}

pub fn decrement_guilds() {
    metrics::gauge!(GUILDS).decrement(1.0);
}

/// Records how long an interaction took. `kind` is `command` or `button`.
pub fn record_interaction(kind: &str, name: &str, elapsed: Duration) {
    metrics::histogram!(
        INTERACTION_DURATION,
        "kind" => kind.to_string(),
        "name" => name.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Records a lifecycle operation. `outcome` is `ok`, `rejected` or `error`.
pub fn record_transition(operation: &str, outcome: &str) {
    metrics::counter!(
        TICKET_TRANSITIONS,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_effect(effect: &str, outcome: &str) {
    metrics::counter!(
        BACKGROUND_EFFECTS,
        "effect" => effect.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_store_query(store: &str, query: &str, elapsed: Duration) {
    metrics::counter!(
        STORE_QUERIES,
        "store" => store.to_string(),
        "query" => query.to_string()
    )
    .increment(1);
    metrics::histogram!(
        STORE_QUERY_DURATION,
        "store" => store.to_string(),
        "query" => query.to_string()
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_http_request(path: &str, method: &str, status: u16, elapsed: Duration) {
    metrics::counter!(
        HTTP_REQUESTS,
        "path" => path.to_string(),
        "method" => method.to_string(),
        "status_code" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        HTTP_REQUEST_DURATION,
        "path" => path.to_string(),
        "method" => method.to_string()
    )
    .record(elapsed.as_secs_f64());
}
