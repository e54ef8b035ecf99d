// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use ticketry_core::Platform;
use ticketry_lifecycle::TicketEngine;

/// Shared resources handed to every command and button processor.
///
/// Built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub engine: TicketEngine,
    pub platform: Arc<dyn Platform>,
}

impl AppContext {
    pub fn new(engine: TicketEngine, platform: Arc<dyn Platform>) -> Self {
        Self { engine, platform }
    }
}
