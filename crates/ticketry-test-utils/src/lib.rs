// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ticketry integration tests.
//!
//! Provides in-memory adapters and a harness so the lifecycle engine and the
//! dispatch layer can be exercised without a Discord connection.
//!
//! # Components
//!
//! - [`MockPlatform`] - In-memory chat platform with call capture and failure injection
//! - [`MemoryStorage`] - In-memory implementation of every storage trait
//! - [`TestHarness`] - Engine wired to the two, plus setup helpers

pub mod harness;
pub mod memory_storage;
pub mod mock_platform;

pub use harness::{GUILD_ID, INTAKE_CHANNEL_ID, STAFF_ROLE_ID, TestHarness};
pub use memory_storage::MemoryStorage;
pub use mock_platform::MockPlatform;
