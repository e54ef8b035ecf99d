// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ticketry configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketryConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Discord credentials and command registration.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Health and metrics HTTP server.
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Ticket lifecycle tunables.
    #[serde(default)]
    pub ticketing: TicketingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Name used in logs and the health response.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "ticketry".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Discord gateway credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Bot token from the developer portal. Required by `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Application id, numeric snowflake.
    #[serde(default)]
    pub application_id: Option<String>,

    /// Register the slash commands in every guild the bot joins.
    #[serde(default = "default_true")]
    pub register_commands: bool,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            application_id: None,
            register_commands: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("ticketry").join("ticketry.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("ticketry.db"))
        .to_string_lossy()
        .into_owned()
}

/// Health and metrics server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitoringConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_monitoring_host")]
    pub host: String,

    #[serde(default = "default_monitoring_port")]
    pub port: u16,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_monitoring_host(),
            port: default_monitoring_port(),
        }
    }
}

fn default_monitoring_host() -> String {
    "0.0.0.0".to_string()
}

fn default_monitoring_port() -> u16 {
    8080
}

/// Ticket lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketingConfig {
    /// Seconds between delete confirmation and channel removal.
    #[serde(default = "default_delete_delay_secs")]
    pub delete_delay_secs: u64,

    /// Attempts before a scheduled channel removal is given up.
    #[serde(default = "default_max_deletion_attempts")]
    pub max_deletion_attempts: i64,

    #[serde(default = "default_open_category_name")]
    pub open_category_name: String,

    #[serde(default = "default_claimed_category_name")]
    pub claimed_category_name: String,

    #[serde(default = "default_closed_category_name")]
    pub closed_category_name: String,

    /// How long shutdown waits for background effects to finish.
    #[serde(default = "default_drain_timeout_secs")]
    pub drain_timeout_secs: u64,
}

impl Default for TicketingConfig {
    fn default() -> Self {
        Self {
            delete_delay_secs: default_delete_delay_secs(),
            max_deletion_attempts: default_max_deletion_attempts(),
            open_category_name: default_open_category_name(),
            claimed_category_name: default_claimed_category_name(),
            closed_category_name: default_closed_category_name(),
            drain_timeout_secs: default_drain_timeout_secs(),
        }
    }
}

fn default_delete_delay_secs() -> u64 {
    60
}

fn default_max_deletion_attempts() -> i64 {
    3
}

fn default_open_category_name() -> String {
    "Created Tickets".to_string()
}

fn default_claimed_category_name() -> String {
    "Claimed Tickets".to_string()
}

fn default_closed_category_name() -> String {
    "Closed Tickets".to_string()
}

fn default_drain_timeout_secs() -> u64 {
    10
}
