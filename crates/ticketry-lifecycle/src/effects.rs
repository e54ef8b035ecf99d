// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supervised runner for effects detached from an interaction.
//!
//! Button re-renders, topic refreshes and delayed channel removal run here
//! after the user already has their reply. Each effect is named; failures and
//! panics are logged and counted under that name. Effects are best-effort and
//! do not survive a restart (delayed deletions are re-armed from storage).

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, warn};

use ticketry_core::TicketryError;

#[derive(Clone)]
pub struct EffectRunner {
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl EffectRunner {
    /// Cancelling `cancel` aborts effects still waiting on a delay.
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            tracker: TaskTracker::new(),
            cancel,
        }
    }

    /// Runs `effect` on its own task.
    pub fn spawn<F>(&self, name: &'static str, effect: F)
    where
        F: Future<Output = Result<(), TicketryError>> + Send + 'static,
    {
        self.tracker.spawn(supervise(name, effect));
    }

    /// Runs `effect` once `delay` has elapsed, unless the runner is shut down first.
    pub fn spawn_after<F>(&self, name: &'static str, delay: Duration, effect: F)
    where
        F: Future<Output = Result<(), TicketryError>> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(effect = name, "delayed effect cancelled before it was due");
                    ticketry_prometheus::record_effect(name, "cancelled");
                }
                _ = tokio::time::sleep(delay) => supervise(name, effect).await,
            }
        });
    }

    /// Token cancelled when the runner shuts down, for effects that wait
    /// between retries.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Number of effects running or waiting.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Waits until every effect spawned so far has finished.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Cancels delayed effects and waits up to `timeout` for the rest.
    /// Returns `false` if effects were still running at the deadline.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.cancel.cancel();
        self.tracker.close();
        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    remaining = self.tracker.len(),
                    "background effects still running at shutdown deadline"
                );
                false
            }
        }
    }
}

async fn supervise<F>(name: &'static str, effect: F)
where
    F: Future<Output = Result<(), TicketryError>> + Send + 'static,
{
    let outcome = match AssertUnwindSafe(effect).catch_unwind().await {
        Ok(Ok(())) => "ok",
        Ok(Err(e)) => {
            error!(effect = name, error = %e, "background effect failed");
            "error"
        }
        Err(payload) => {
            error!(
                effect = name,
                panic = %panic_message(payload.as_ref()),
                "background effect panicked"
            );
            "panic"
        }
    };
    ticketry_prometheus::record_effect(name, outcome);
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
