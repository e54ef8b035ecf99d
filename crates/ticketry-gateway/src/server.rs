// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monitoring server built on axum.
//!
//! Sets up routes, fallbacks, the request metrics middleware and shared state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{Router, middleware as axum_middleware, routing::get};
use tokio_util::sync::CancellationToken;

use ticketry_config::model::MonitoringConfig;
use ticketry_core::{Platform, StorageAdapter, TicketryError};

use crate::handlers;

/// Upper bound on a single adapter health check.
const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared state for the monitoring handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
    pub storage: Arc<dyn StorageAdapter>,
    pub platform: Arc<dyn Platform>,
    pub check_timeout: Duration,
}

impl GatewayState {
    pub fn new(storage: Arc<dyn StorageAdapter>, platform: Arc<dyn Platform>) -> Self {
        Self {
            start_time: Instant::now(),
            prometheus_render: None,
            storage,
            platform,
            check_timeout: CHECK_TIMEOUT,
        }
    }

    pub fn with_metrics(mut self, render: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        self.prometheus_render = Some(render);
        self
    }
}

/// Builds the monitoring router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(axum_middleware::from_fn(handlers::track_requests))
        .with_state(state)
}

/// Start the monitoring server and run it until `cancel` fires.
pub async fn start_server(
    config: &MonitoringConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), TicketryError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TicketryError::Internal(format!("failed to bind monitoring to {addr}: {e}")))?;

    tracing::info!(addr = %addr, "monitoring server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| TicketryError::Internal(format!("monitoring server error: {e}")))?;

    tracing::info!("monitoring server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketry_test_utils::{MemoryStorage, MockPlatform};

    #[test]
    fn gateway_state_is_clone() {
        let state = GatewayState::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(MockPlatform::new()),
        );
        let cloned = state.clone();
        assert_eq!(cloned.check_timeout, Duration::from_secs(2));
        assert!(cloned.prometheus_render.is_none());
    }

    #[test]
    fn with_metrics_installs_renderer() {
        let state = GatewayState::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(MockPlatform::new()),
        )
        .with_metrics(Arc::new(|| "up 1\n".to_string()));
        let render = state.prometheus_render.as_ref().map(|f| f());
        assert_eq!(render.as_deref(), Some("up 1\n"));
    }
}
