// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ticketry check` and `ticketry migrate`.

use ticketry_config::TicketryConfig;
use ticketry_core::TicketryError;
use ticketry_storage::Database;

/// Human-readable overview of the effective configuration. Secrets are
/// reported only as present or missing.
pub fn summary(config: &TicketryConfig) -> String {
    let token = match config.discord.bot_token.as_deref() {
        Some(t) if !t.trim().is_empty() => "set",
        _ => "missing (required by `ticketry serve`)",
    };
    let monitoring = if config.monitoring.enabled {
        format!("{}:{}", config.monitoring.host, config.monitoring.port)
    } else {
        "disabled".to_string()
    };

    [
        format!("config ok ({})", config.bot.name),
        format!("  log level:        {}", config.bot.log_level),
        format!("  bot token:        {token}"),
        format!(
            "  application id:   {}",
            config.discord.application_id.as_deref().unwrap_or("auto")
        ),
        format!("  database:         {}", config.storage.database_path),
        format!("  monitoring:       {monitoring}"),
        format!(
            "  categories:       {} / {} / {}",
            config.ticketing.open_category_name,
            config.ticketing.claimed_category_name,
            config.ticketing.closed_category_name
        ),
        format!("  delete delay:     {}s", config.ticketing.delete_delay_secs),
    ]
    .join("\n")
}

/// Opens the database, which applies any pending migrations.
pub async fn run_migrate(config: &TicketryConfig) -> Result<(), TicketryError> {
    let db = Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
    db.checkpoint().await?;
    println!("migrations applied to {}", config.storage.database_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_hides_token() {
        let mut config = TicketryConfig::default();
        config.discord.bot_token = Some("super-secret".into());
        let text = summary(&config);
        assert!(text.contains("bot token:        set"));
        assert!(!text.contains("super-secret"));
    }

    #[test]
    fn summary_flags_missing_token_and_disabled_monitoring() {
        let mut config = TicketryConfig::default();
        config.monitoring.enabled = false;
        let text = summary(&config);
        assert!(text.contains("missing"));
        assert!(text.contains("monitoring:       disabled"));
    }

    #[tokio::test]
    async fn migrate_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ticketry.db");
        let mut config = TicketryConfig::default();
        config.storage.database_path = path.to_string_lossy().into_owned();

        run_migrate(&config).await.unwrap();
        assert!(path.exists());

        // A second run finds nothing pending.
        run_migrate(&config).await.unwrap();
    }
}
