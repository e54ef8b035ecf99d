// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ticketry.toml` > `~/.config/ticketry/ticketry.toml` >
//! `/etc/ticketry/ticketry.toml` with environment variable overrides via the
//! `TICKETRY_` prefix and the bare `BOT_TOKEN`, `APPLICATION_ID` and
//! `MONITORING_PORT` names older deployments export.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TicketryConfig;

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/ticketry/ticketry.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "ticketry.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ticketry/ticketry.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ticketry/ticketry.toml` (system-wide)
/// 3. `~/.config/ticketry/ticketry.toml` (user XDG config)
/// 4. `./ticketry.toml` (local directory)
/// 5. `TICKETRY_*` environment variables
/// 6. Legacy bare environment variables
pub fn load_config() -> Result<TicketryConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TicketryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketryConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TicketryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketryConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(legacy_env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TicketryConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
        .merge(legacy_env_provider())
}

/// Maps `TICKETRY_<SECTION>_<KEY>` onto `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")`: keys contain underscores,
/// so `TICKETRY_DISCORD_BOT_TOKEN` must become `discord.bot_token`, not
/// `discord.bot.token`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("TICKETRY_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ["bot", "discord", "storage", "monitoring", "ticketing"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}

fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["BOT_TOKEN", "APPLICATION_ID", "MONITORING_PORT"])
        .map(|key| map_legacy_key(key.as_str()).into())
}

pub(crate) fn map_legacy_key(key: &str) -> String {
    match key.to_ascii_lowercase().as_str() {
        "bot_token" => "discord.bot_token".to_string(),
        "application_id" => "discord.application_id".to_string(),
        "monitoring_port" => "monitoring.port".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_first_section_only() {
        assert_eq!(map_env_key("discord_bot_token"), "discord.bot_token");
        assert_eq!(map_env_key("TICKETING_DELETE_DELAY_SECS"), "ticketing.delete_delay_secs");
        assert_eq!(map_env_key("bot_log_level"), "bot.log_level");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn legacy_keys_land_in_sections() {
        assert_eq!(map_legacy_key("BOT_TOKEN"), "discord.bot_token");
        assert_eq!(map_legacy_key("application_id"), "discord.application_id");
        assert_eq!(map_legacy_key("MONITORING_PORT"), "monitoring.port");
    }
}
