// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express. Every problem is collected so
//! the operator sees all of them in one run.

use crate::diagnostic::ConfigError;
use crate::model::TicketryConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Discord rejects channel names longer than this.
const MAX_CHANNEL_NAME_LEN: usize = 100;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &TicketryConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.bot.log_level.as_str()) {
        invalid(format!(
            "bot.log_level `{}` must be one of {}",
            config.bot.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if let Some(id) = config.discord.application_id.as_deref()
        && id.parse::<u64>().is_err()
    {
        invalid(format!(
            "discord.application_id `{id}` must be a numeric snowflake"
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    let host = config.monitoring.host.trim();
    if host.is_empty() {
        invalid("monitoring.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            invalid(format!(
                "monitoring.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.monitoring.enabled && config.monitoring.port == 0 {
        invalid("monitoring.port must not be 0".to_string());
    }

    if config.ticketing.max_deletion_attempts < 1 {
        invalid(format!(
            "ticketing.max_deletion_attempts must be at least 1, got {}",
            config.ticketing.max_deletion_attempts
        ));
    }

    for (key, name) in [
        ("open_category_name", &config.ticketing.open_category_name),
        ("claimed_category_name", &config.ticketing.claimed_category_name),
        ("closed_category_name", &config.ticketing.closed_category_name),
    ] {
        if name.trim().is_empty() || name.chars().count() > MAX_CHANNEL_NAME_LEN {
            invalid(format!(
                "ticketing.{key} must be between 1 and {MAX_CHANNEL_NAME_LEN} characters"
            ));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Checks the settings only `serve` needs.
pub fn validate_serve(config: &TicketryConfig) -> Result<(), Vec<ConfigError>> {
    match config.discord.bot_token.as_deref() {
        Some(token) if !token.trim().is_empty() => Ok(()),
        _ => Err(vec![ConfigError::MissingKey {
            key: "discord.bot_token".to_string(),
        }]),
    }
}
