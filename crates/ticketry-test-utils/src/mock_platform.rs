// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat platform for deterministic testing.
//!
//! `MockPlatform` keeps channels, messages and member roles in memory,
//! captures every interaction reply, and can be told to fail or stall the
//! next call to a given operation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ticketry_core::{
    AdapterType, ChannelEdit, ChannelKind, ChannelSpec, HealthStatus, InteractionHandle,
    OutboundMessage, Overwrite, Platform, PluginAdapter, RemoteChannel, RemoteMessage, Reply,
    TicketryError,
};

#[derive(Debug, Clone, Copy)]
enum Injected {
    Upstream,
    NotFound,
}

#[derive(Default)]
struct State {
    channels: HashMap<String, RemoteChannel>,
    overwrites: HashMap<String, Vec<Overwrite>>,
    created: Vec<String>,
    messages: HashMap<String, RemoteMessage>,
    pinned: Vec<String>,
    roles: HashMap<(String, String), Vec<String>>,
    responses: Vec<(InteractionHandle, Reply)>,
    calls: Vec<String>,
    failures: HashMap<String, Injected>,
    delays: HashMap<String, Duration>,
    health: Option<HealthStatus>,
}

/// An in-memory chat platform.
pub struct MockPlatform {
    state: Mutex<State>,
    next_id: AtomicU64,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            next_id: AtomicU64::new(1000),
        }
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Overrides the status reported by `health_check`.
    pub async fn set_health(&self, status: HealthStatus) {
        self.state.lock().await.health = Some(status);
    }

    /// Adds a text channel and returns its id.
    pub async fn add_text_channel(&self, id: &str, name: &str) -> String {
        self.add_channel(RemoteChannel {
            id: id.to_string(),
            name: name.to_string(),
            kind: ChannelKind::Text,
            parent_id: None,
            topic: None,
        })
        .await;
        id.to_string()
    }

    pub async fn add_channel(&self, channel: RemoteChannel) {
        self.state
            .lock()
            .await
            .channels
            .insert(channel.id.clone(), channel);
    }

    /// Removes a channel as if a moderator deleted it by hand.
    pub async fn remove_channel(&self, id: &str) {
        self.state.lock().await.channels.remove(id);
    }

    pub async fn remove_message(&self, id: &str) {
        self.state.lock().await.messages.remove(id);
    }

    pub async fn channel_snapshot(&self, id: &str) -> Option<RemoteChannel> {
        self.state.lock().await.channels.get(id).cloned()
    }

    pub async fn message_snapshot(&self, id: &str) -> Option<RemoteMessage> {
        self.state.lock().await.messages.get(id).cloned()
    }

    /// Messages posted to a channel, oldest first.
    pub async fn messages_in(&self, channel_id: &str) -> Vec<RemoteMessage> {
        let state = self.state.lock().await;
        let mut messages: Vec<_> = state
            .messages
            .values()
            .filter(|m| m.channel_id == channel_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| id_number(&m.id));
        messages
    }

    pub async fn overwrites(&self, channel_id: &str) -> Vec<Overwrite> {
        self.state
            .lock()
            .await
            .overwrites
            .get(channel_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Ids of channels created through the platform, in creation order.
    pub async fn created_channels(&self) -> Vec<String> {
        self.state.lock().await.created.clone()
    }

    /// Category channels currently present with the given name.
    pub async fn categories_named(&self, name: &str) -> Vec<RemoteChannel> {
        self.state
            .lock()
            .await
            .channels
            .values()
            .filter(|c| c.kind == ChannelKind::Category && c.name == name)
            .cloned()
            .collect()
    }

    pub async fn pinned(&self) -> Vec<String> {
        self.state.lock().await.pinned.clone()
    }

    pub async fn grant_role(&self, guild_id: &str, user_id: &str, role_id: &str) {
        self.state
            .lock()
            .await
            .roles
            .entry((guild_id.to_string(), user_id.to_string()))
            .or_default()
            .push(role_id.to_string());
    }

    /// Every reply sent to an interaction, oldest first.
    pub async fn responses(&self) -> Vec<Reply> {
        self.state
            .lock()
            .await
            .responses
            .iter()
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    pub async fn last_response(&self) -> Option<Reply> {
        self.state
            .lock()
            .await
            .responses
            .last()
            .map(|(_, reply)| reply.clone())
    }

    /// Names of every platform call made, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| *c == operation)
            .count()
    }

    /// Makes the next call to `operation` fail with an upstream error.
    pub async fn fail_next(&self, operation: &str) {
        self.state
            .lock()
            .await
            .failures
            .insert(operation.to_string(), Injected::Upstream);
    }

    /// Makes the next call to `operation` report the resource as missing.
    pub async fn fail_next_not_found(&self, operation: &str) {
        self.state
            .lock()
            .await
            .failures
            .insert(operation.to_string(), Injected::NotFound);
    }

    /// Makes the next call to `operation` wait `delay` before doing anything.
    pub async fn delay_next(&self, operation: &str, delay: Duration) {
        self.state
            .lock()
            .await
            .delays
            .insert(operation.to_string(), delay);
    }

    /// Sleeps out an injected delay without holding the state lock.
    async fn stall(&self, operation: &str) {
        let delay = self.state.lock().await.delays.remove(operation);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Records the call and applies any injected failure.
    fn enter(state: &mut State, operation: &str, id: &str) -> Result<(), TicketryError> {
        state.calls.push(operation.to_string());
        match state.failures.remove(operation) {
            Some(Injected::Upstream) => Err(TicketryError::upstream(
                operation,
                format!("injected failure for {id}"),
            )),
            Some(Injected::NotFound) => Err(TicketryError::not_found(operation, id)),
            None => Ok(()),
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn id_number(id: &str) -> u64 {
    id.rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl PluginAdapter for MockPlatform {
    fn name(&self) -> &str {
        "mock-platform"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Platform
    }

    async fn health_check(&self) -> Result<HealthStatus, TicketryError> {
        let state = self.state.lock().await;
        Ok(state.health.clone().unwrap_or(HealthStatus::Healthy))
    }

    async fn shutdown(&self) -> Result<(), TicketryError> {
        Ok(())
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn channel(&self, channel_id: &str) -> Result<RemoteChannel, TicketryError> {
        self.stall("channel").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "channel", channel_id)?;
        state
            .channels
            .get(channel_id)
            .cloned()
            .ok_or_else(|| TicketryError::not_found("channel", channel_id))
    }

    async fn create_channel(
        &self,
        _guild_id: &str,
        spec: ChannelSpec,
    ) -> Result<RemoteChannel, TicketryError> {
        self.stall("create_channel").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "create_channel", &spec.name)?;
        let channel = RemoteChannel {
            id: self.fresh_id("channel"),
            name: spec.name,
            kind: spec.kind,
            parent_id: spec.parent_id,
            topic: spec.topic,
        };
        state
            .overwrites
            .insert(channel.id.clone(), spec.overwrites);
        state.created.push(channel.id.clone());
        state.channels.insert(channel.id.clone(), channel.clone());
        Ok(channel)
    }

    async fn edit_channel(&self, channel_id: &str, edit: ChannelEdit) -> Result<(), TicketryError> {
        self.stall("edit_channel").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "edit_channel", channel_id)?;
        let channel = state
            .channels
            .get_mut(channel_id)
            .ok_or_else(|| TicketryError::not_found("channel", channel_id))?;
        if let Some(name) = edit.name {
            channel.name = name;
        }
        if let Some(parent_id) = edit.parent_id {
            channel.parent_id = Some(parent_id);
        }
        if let Some(topic) = edit.topic {
            channel.topic = Some(topic);
        }
        Ok(())
    }

    async fn delete_channel(&self, channel_id: &str) -> Result<(), TicketryError> {
        self.stall("delete_channel").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "delete_channel", channel_id)?;
        state
            .channels
            .remove(channel_id)
            .map(|_| ())
            .ok_or_else(|| TicketryError::not_found("channel", channel_id))
    }

    async fn member_roles(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<Vec<String>, TicketryError> {
        self.stall("member_roles").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "member_roles", user_id)?;
        Ok(state
            .roles
            .get(&(guild_id.to_string(), user_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        channel_id: &str,
        message: OutboundMessage,
    ) -> Result<String, TicketryError> {
        self.stall("send_message").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "send_message", channel_id)?;
        if !state.channels.contains_key(channel_id) {
            return Err(TicketryError::not_found("channel", channel_id));
        }
        let id = self.fresh_id("message");
        state.messages.insert(
            id.clone(),
            RemoteMessage {
                id: id.clone(),
                channel_id: channel_id.to_string(),
                content: message.content,
                buttons: message.buttons,
            },
        );
        Ok(id)
    }

    async fn message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<RemoteMessage, TicketryError> {
        self.stall("message").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "message", message_id)?;
        state
            .messages
            .get(message_id)
            .filter(|m| m.channel_id == channel_id)
            .cloned()
            .ok_or_else(|| TicketryError::not_found("message", message_id))
    }

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        message: OutboundMessage,
    ) -> Result<(), TicketryError> {
        self.stall("edit_message").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "edit_message", message_id)?;
        let stored = state
            .messages
            .get_mut(message_id)
            .filter(|m| m.channel_id == channel_id)
            .ok_or_else(|| TicketryError::not_found("message", message_id))?;
        stored.content = message.content;
        stored.buttons = message.buttons;
        Ok(())
    }

    async fn pin_message(&self, channel_id: &str, message_id: &str) -> Result<(), TicketryError> {
        self.stall("pin_message").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "pin_message", message_id)?;
        let exists = state
            .messages
            .get(message_id)
            .is_some_and(|m| m.channel_id == channel_id);
        if !exists {
            return Err(TicketryError::not_found("message", message_id));
        }
        state.pinned.push(message_id.to_string());
        Ok(())
    }

    async fn respond(
        &self,
        interaction: &InteractionHandle,
        reply: Reply,
    ) -> Result<(), TicketryError> {
        self.stall("respond").await;
        let mut state = self.state.lock().await;
        Self::enter(&mut state, "respond", &interaction.id)?;
        state.responses.push((interaction.clone(), reply));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_channel_is_not_found() {
        let platform = MockPlatform::new();
        let err = platform.channel("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let platform = MockPlatform::new();
        platform.add_text_channel("c1", "general").await;
        platform.fail_next("channel").await;
        assert!(platform.channel("c1").await.is_err());
        assert!(platform.channel("c1").await.is_ok());
        assert_eq!(platform.call_count("channel").await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_call_waits_then_succeeds() {
        let platform = MockPlatform::new();
        platform.add_text_channel("c1", "general").await;
        platform.delay_next("channel", Duration::from_secs(5)).await;

        let started = tokio::time::Instant::now();
        assert!(platform.channel("c1").await.is_ok());
        assert!(started.elapsed() >= Duration::from_secs(5));

        let again = tokio::time::Instant::now();
        platform.channel("c1").await.unwrap();
        assert!(again.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn messages_are_listed_in_order() {
        let platform = MockPlatform::new();
        platform.add_text_channel("c1", "general").await;
        for text in ["one", "two"] {
            platform
                .send_message(
                    "c1",
                    OutboundMessage {
                        content: text.into(),
                        buttons: vec![],
                    },
                )
                .await
                .unwrap();
        }
        let contents: Vec<_> = platform
            .messages_in("c1")
            .await
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, ["one", "two"]);
    }
}
