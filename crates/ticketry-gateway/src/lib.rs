// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monitoring HTTP server for the Ticketry support bot.
//!
//! Serves `/health` for process supervisors and `/metrics` for Prometheus.
//! Every request passes through a middleware that counts and times it.

pub mod handlers;
pub mod server;

pub use handlers::{CheckReport, ErrorResponse, HealthResponse};
pub use server::{GatewayState, router, start_server};
