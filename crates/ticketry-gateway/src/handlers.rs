// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the monitoring endpoints.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{
    Json,
    extract::{MatchedPath, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use ticketry_core::{HealthStatus, TicketryError};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub checks: BTreeMap<String, CheckReport>,
}

/// Outcome of one adapter health check.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckReport {
    fn from_outcome(outcome: Result<HealthStatus, TicketryError>) -> Self {
        match outcome {
            Ok(HealthStatus::Healthy) => Self {
                status: "healthy".into(),
                detail: None,
            },
            Ok(HealthStatus::Degraded(reason)) => Self {
                status: "degraded".into(),
                detail: Some(reason),
            },
            Ok(HealthStatus::Unhealthy(reason)) => Self {
                status: "unhealthy".into(),
                detail: Some(reason),
            },
            Err(e) => Self {
                status: "unhealthy".into(),
                detail: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// GET /health
///
/// Runs the storage and platform health checks, each bounded by the state's
/// check timeout. Returns 200 when every check is healthy, 503 otherwise.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let timeout = state.check_timeout;
    let (storage, platform) = tokio::join!(
        tokio::time::timeout(timeout, state.storage.health_check()),
        tokio::time::timeout(timeout, state.platform.health_check()),
    );

    let mut checks = BTreeMap::new();
    for (name, outcome) in [("storage", storage), ("platform", platform)] {
        let outcome = outcome.unwrap_or(Err(TicketryError::Timeout { duration: timeout }));
        checks.insert(name.to_string(), CheckReport::from_outcome(outcome));
    }

    let healthy = checks.values().all(CheckReport::is_healthy);
    let status = if healthy {
        StatusCode::OK
    } else {
        tracing::warn!(?checks, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if healthy { "ok" } else { "unavailable" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        checks,
    };
    (status, Json(body)).into_response()
}

/// GET /metrics
///
/// Prometheus text exposition. 503 when no recorder is installed.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new("Metrics are disabled"),
        )
            .into_response(),
    }
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, ErrorResponse::new("Not found")).into_response()
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorResponse::new("Method not allowed"),
    )
        .into_response()
}

/// Counts and times every request. Unrouted paths share one label so
/// scanners cannot blow up metric cardinality.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    ticketry_prometheus::record_http_request(
        &path,
        &method,
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let mut checks = BTreeMap::new();
        checks.insert(
            "storage".to_string(),
            CheckReport::from_outcome(Ok(HealthStatus::Healthy)),
        );
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
            checks,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
        assert!(json.contains("\"storage\":{\"status\":\"healthy\"}"));
    }

    #[test]
    fn error_response_uses_capitalized_key() {
        let json = serde_json::to_string(&ErrorResponse {
            message: "Not found".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"Message":"Not found"}"#);
    }

    #[test]
    fn failed_check_reports_reason() {
        let report = CheckReport::from_outcome(Err(TicketryError::Internal("db gone".into())));
        assert!(!report.is_healthy());
        assert!(report.detail.unwrap().contains("db gone"));

        let report = CheckReport::from_outcome(Ok(HealthStatus::Degraded("slow".into())));
        assert_eq!(report.status, "degraded");
    }
}
