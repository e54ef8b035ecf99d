// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics adapter for the Ticketry support bot.
//!
//! Uses the metrics-rs facade with the Prometheus exporter.
//! Metrics are rendered as Prometheus text format via the `render()` method,
//! which is exposed through the monitoring gateway's /metrics endpoint.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use ticketry_core::TicketryError;
use ticketry_core::traits::adapter::PluginAdapter;
use ticketry_core::types::{AdapterType, HealthStatus};

pub use recording::{
    decrement_guilds, increment_guilds, record_discord_event, record_effect,
    record_http_request, record_interaction, record_store_query, record_transition,
};

/// Prometheus metrics adapter.
///
/// Installs the Prometheus recorder and exposes a handle for rendering
/// metrics in Prometheus text format.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Installs the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call fails.
    pub fn new() -> Result<Self, TicketryError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            TicketryError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, TicketryError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TicketryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only this test installs the global recorder.
    #[tokio::test]
    async fn adapter_installs_once_and_renders() {
        let adapter = PrometheusAdapter::new().expect("first install succeeds");
        assert_eq!(adapter.name(), "prometheus");
        assert_eq!(adapter.adapter_type(), AdapterType::Observability);
        assert!(adapter.health_check().await.unwrap().is_healthy());

        record_discord_event("INTERACTION_CREATE");
        assert!(adapter.render().contains("ticketry_discord_events_total"));

        assert!(PrometheusAdapter::new().is_err(), "second install must fail");
    }
}
