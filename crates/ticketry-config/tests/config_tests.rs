// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Ticketry configuration system.

use ticketry_config::diagnostic::ConfigError;
use ticketry_config::model::TicketryConfig;
use ticketry_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[bot]
name = "helpdesk"
log_level = "debug"

[discord]
bot_token = "abc.def"
application_id = "123456789"
register_commands = false

[storage]
database_path = "/tmp/tickets.db"
wal_mode = false

[monitoring]
enabled = true
host = "127.0.0.1"
port = 9100

[ticketing]
delete_delay_secs = 30
open_category_name = "Open"
claimed_category_name = "Working"
closed_category_name = "Done"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "helpdesk");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.discord.bot_token.as_deref(), Some("abc.def"));
    assert_eq!(config.discord.application_id.as_deref(), Some("123456789"));
    assert!(!config.discord.register_commands);
    assert_eq!(config.storage.database_path, "/tmp/tickets.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.monitoring.host, "127.0.0.1");
    assert_eq!(config.monitoring.port, 9100);
    assert_eq!(config.ticketing.delete_delay_secs, 30);
    assert_eq!(config.ticketing.claimed_category_name, "Working");
}

/// Sections left out of the file fall back to compiled defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    assert_eq!(config.bot.name, "ticketry");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.discord.bot_token.is_none());
    assert!(config.discord.register_commands);
    assert!(config.storage.wal_mode);
    assert_eq!(config.monitoring.port, 8080);
    assert_eq!(config.ticketing.delete_delay_secs, 60);
    assert_eq!(config.ticketing.max_deletion_attempts, 3);
    assert_eq!(config.ticketing.open_category_name, "Created Tickets");
    assert_eq!(config.ticketing.closed_category_name, "Closed Tickets");
}

/// A dotted override (what the env provider produces) wins over TOML.
#[test]
fn dotted_override_sets_bot_token() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: TicketryConfig = Figment::new()
        .merge(Serialized::defaults(TicketryConfig::default()))
        .merge(Toml::string("[discord]\nbot_token = \"from-toml\"\n"))
        .merge(("discord.bot_token", "from-env"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.discord.bot_token.as_deref(), Some("from-env"));
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let err = load_config_from_str("[mongo]\nuri = \"x\"\n").expect_err("unknown section");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("mongo"),
        "got: {err_str}"
    );
}

/// Unknown keys carry a suggestion and the list of valid keys.
#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
[discord]
bot_tokn = "abc"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "bot_tokn"
                && suggestion.as_deref() == Some("bot_token")
                && valid_keys.contains("application_id")
        })
    });
    assert!(found, "expected UnknownKey for bot_tokn, got: {errors:?}");
}

#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[monitoring]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "got: {errors:?}"
    );
}

#[test]
fn validation_runs_after_deserialization() {
    let toml = r#"
[bot]
log_level = "chatty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(matches!(&errors[0], ConfigError::Validation { message } if message.contains("bot.log_level")));
}

#[test]
#[serial_test::serial]
fn load_from_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ticketry.toml");
    std::fs::write(&path, "[ticketing]\ndelete_delay_secs = 5\n").unwrap();

    let config = load_and_validate_path(&path).expect("file should load");
    assert_eq!(config.ticketing.delete_delay_secs, 5);
}

/// ConfigError renders through miette without panicking.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::MissingKey {
        key: "discord.bot_token".to_string(),
    };
    assert!(error.help().is_some());

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error as &dyn Diagnostic)
        .expect("should render");
    assert!(buf.contains("discord.bot_token"));
}

/// A serialized default config is itself a valid config file.
#[test]
fn default_config_round_trips_through_toml() {
    let rendered = toml::to_string_pretty(&TicketryConfig::default()).expect("should serialize");
    assert!(rendered.contains("[ticketing]"));

    let config = load_config_from_str(&rendered).expect("rendered defaults should load");
    assert_eq!(config.ticketing.open_category_name, "Created Tickets");
}

mod env_overrides {
    use serial_test::serial;

    use ticketry_config::loader::build_figment;
    use ticketry_config::model::TicketryConfig;

    const VARS: [&str; 4] = [
        "TICKETRY_DISCORD_BOT_TOKEN",
        "TICKETRY_TICKETING_DELETE_DELAY_SECS",
        "BOT_TOKEN",
        "MONITORING_PORT",
    ];

    fn clear() {
        for var in VARS {
            // SAFETY: env-mutating tests are serialized.
            unsafe { std::env::remove_var(var) };
        }
    }

    fn set(var: &str, value: &str) {
        // SAFETY: env-mutating tests are serialized.
        unsafe { std::env::set_var(var, value) };
    }

    #[test]
    #[serial]
    fn prefixed_vars_map_onto_sections() {
        clear();
        set("TICKETRY_DISCORD_BOT_TOKEN", "env-token");
        set("TICKETRY_TICKETING_DELETE_DELAY_SECS", "15");

        let config: TicketryConfig = build_figment().extract().expect("should load");
        clear();

        assert_eq!(config.discord.bot_token.as_deref(), Some("env-token"));
        assert_eq!(config.ticketing.delete_delay_secs, 15);
    }

    #[test]
    #[serial]
    fn legacy_names_are_honoured() {
        clear();
        set("BOT_TOKEN", "legacy-token");
        set("MONITORING_PORT", "9200");

        let config: TicketryConfig = build_figment().extract().expect("should load");
        clear();

        assert_eq!(config.discord.bot_token.as_deref(), Some("legacy-token"));
        assert_eq!(config.monitoring.port, 9200);
    }
}
