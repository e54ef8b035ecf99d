// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle tunables derived from the `[ticketing]` config section.

use std::time::Duration;

use ticketry_config::model::TicketingConfig;
use ticketry_core::TicketState;

#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub delete_delay: Duration,
    pub max_deletion_attempts: i64,
    pub open_category_name: String,
    pub claimed_category_name: String,
    pub closed_category_name: String,
}

impl LifecycleSettings {
    pub fn from_config(config: &TicketingConfig) -> Self {
        Self {
            delete_delay: Duration::from_secs(config.delete_delay_secs),
            max_deletion_attempts: config.max_deletion_attempts,
            open_category_name: config.open_category_name.clone(),
            claimed_category_name: config.claimed_category_name.clone(),
            closed_category_name: config.closed_category_name.clone(),
        }
    }

    /// Display name of the category folder holding tickets in `stage`.
    pub fn category_name(&self, stage: TicketState) -> &str {
        match stage {
            TicketState::Open => &self.open_category_name,
            TicketState::Claimed => &self.claimed_category_name,
            TicketState::Closed => &self.closed_category_name,
        }
    }
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self::from_config(&TicketingConfig::default())
    }
}
