// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ticketry serve` command implementation.
//!
//! Builds the application context once (storage, Discord REST client,
//! effect runner, lifecycle engine, handler registry), re-arms persisted
//! channel deletions, starts the monitoring server and connects to the
//! Discord gateway until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use serenity::all::{ApplicationId, GatewayIntents};
use serenity::http::Http;
use serenity::Client;
use tracing::{debug, error, info, warn};

use ticketry_config::TicketryConfig;
use ticketry_core::{Platform, StorageAdapter, TicketryError};
use ticketry_discord::render::snowflake;
use ticketry_discord::{AppContext, Dispatcher, SerenityPlatform, TicketryHandler};
use ticketry_gateway::GatewayState;
use ticketry_lifecycle::{EffectRunner, LifecycleSettings, TicketEngine};
use ticketry_prometheus::PrometheusAdapter;
use ticketry_storage::SqliteStorage;

use crate::shutdown;

/// Runs the `ticketry serve` command.
pub async fn run_serve(config: TicketryConfig) -> Result<(), TicketryError> {
    init_tracing(&config.bot.log_level);
    install_panic_hook();

    info!(name = %config.bot.name, "starting ticketry serve");

    let prometheus = if config.monitoring.enabled {
        match PrometheusAdapter::new() {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                warn!(error = %e, "prometheus initialization failed, continuing without metrics");
                None
            }
        }
    } else {
        debug!("monitoring disabled by configuration");
        None
    };

    let storage = {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        Arc::new(storage)
    };
    let storage_dyn: Arc<dyn StorageAdapter> = storage.clone();

    let token = config
        .discord
        .bot_token
        .clone()
        .ok_or_else(|| TicketryError::Config("discord.bot_token is required".into()))?;
    let http = Arc::new(Http::new(&token));
    let platform: Arc<dyn Platform> = Arc::new(SerenityPlatform::new(http));

    let cancel = shutdown::install_signal_handler();
    let effects = EffectRunner::new(cancel.child_token());
    let engine = TicketEngine::new(
        platform.clone(),
        storage_dyn.clone(),
        effects.clone(),
        LifecycleSettings::from_config(&config.ticketing),
    );

    match engine.recover_deletions().await {
        Ok(0) => debug!("no pending channel deletions"),
        Ok(count) => info!(count, "re-armed pending channel deletions"),
        Err(e) => error!(error = %e, "failed to recover pending channel deletions"),
    }

    let registry = ticketry_discord::default_registry()?;
    let dispatcher = Dispatcher::new(AppContext::new(engine, platform.clone()), registry);

    let monitoring = if config.monitoring.enabled {
        let mut state = GatewayState::new(storage_dyn.clone(), platform.clone());
        if let Some(adapter) = &prometheus {
            let handle = adapter.handle().clone();
            state = state.with_metrics(Arc::new(move || handle.render()));
        }
        let monitoring_config = config.monitoring.clone();
        let cancel = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = ticketry_gateway::start_server(&monitoring_config, state, cancel).await {
                error!(error = %e, "monitoring server failed");
            }
        }))
    } else {
        None
    };

    let mut builder = Client::builder(&token, GatewayIntents::GUILDS).event_handler(
        TicketryHandler::new(dispatcher, config.discord.register_commands),
    );
    if let Some(raw) = config.discord.application_id.as_deref() {
        builder = builder.application_id(ApplicationId::new(snowflake(raw)?));
    }
    let mut client = builder
        .await
        .map_err(|e| TicketryError::upstream("build_client", e))?;

    let shard_manager = client.shard_manager.clone();
    let shard_cancel = cancel.clone();
    tokio::spawn(async move {
        shard_cancel.cancelled().await;
        info!("stopping gateway shards");
        shard_manager.shutdown_all().await;
    });

    info!("connecting to Discord");
    let run = client.start().await;
    if let Err(e) = &run {
        error!(error = %e, "Discord client stopped with error");
    }
    cancel.cancel();

    let drain_timeout = Duration::from_secs(config.ticketing.drain_timeout_secs);
    shutdown::drain_effects(&effects, drain_timeout).await;

    if let Some(task) = monitoring
        && let Err(e) = task.await
    {
        warn!(error = %e, "monitoring task ended abnormally");
    }

    storage.close().await?;
    info!("ticketry serve stopped");

    run.map_err(|e| TicketryError::upstream("gateway", e))
}

/// Logs panics from any thread with a captured backtrace.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        error!(panic = %info, backtrace = %backtrace, "panic");
    }));
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

fn default_filter(log_level: &str) -> String {
    format!("ticketry={log_level},warn")
}
