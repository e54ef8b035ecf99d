// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guild setup: enabling and disabling ticketing.

use ticketry_core::{ChannelKind, Denial, RemoteChannel, TicketryError};
use ticketry_test_utils::{GUILD_ID, INTAKE_CHANNEL_ID, STAFF_ROLE_ID, TestHarness};

#[tokio::test]
async fn enable_posts_intake_message_and_saves_guild() {
    let harness = TestHarness::builder().build().await.unwrap();

    let reply = harness.enable_ticketing().await.unwrap();
    assert!(reply.is_ephemeral());
    assert_eq!(
        reply.content.as_deref(),
        Some("Ticketing has been enabled in channel <#intake-1>")
    );

    let guild = harness.storage.get_guild(GUILD_ID).await.unwrap().unwrap();
    assert!(guild.is_configured());
    assert_eq!(guild.staff_role_id.as_deref(), Some(STAFF_ROLE_ID));

    let messages = harness.platform.messages_in(INTAKE_CHANNEL_ID).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].content.starts_with("How can we help?"));
    assert_eq!(messages[0].buttons[0].custom_id, "open_ticket_button");
    assert_eq!(guild.intake_message_id, Some(messages[0].id.clone()));
}

#[tokio::test]
async fn enabling_twice_keeps_one_intake_message() {
    let harness = TestHarness::enabled().await.unwrap();
    harness.enable_ticketing().await.unwrap();
    assert_eq!(harness.platform.messages_in(INTAKE_CHANNEL_ID).await.len(), 1);
}

#[tokio::test]
async fn missing_intake_message_is_reposted() {
    let harness = TestHarness::enabled().await.unwrap();
    let old = harness.platform.messages_in(INTAKE_CHANNEL_ID).await[0].id.clone();
    harness.platform.remove_message(&old).await;

    harness.enable_ticketing().await.unwrap();

    let messages = harness.platform.messages_in(INTAKE_CHANNEL_ID).await;
    assert_eq!(messages.len(), 1);
    assert_ne!(messages[0].id, old);
    let guild = harness.storage.get_guild(GUILD_ID).await.unwrap().unwrap();
    assert_eq!(guild.intake_message_id, Some(messages[0].id.clone()));
}

#[tokio::test]
async fn intake_lookup_failure_is_propagated() {
    let harness = TestHarness::enabled().await.unwrap();
    harness.platform.fail_next("message").await;

    let err = harness.enable_ticketing().await.unwrap_err();
    assert!(matches!(err, TicketryError::Upstream { .. }));
}

#[tokio::test]
async fn enable_requires_administrator() {
    let harness = TestHarness::builder().build().await.unwrap();
    let member = harness.member("100", "alice");

    let err = harness
        .engine
        .enable_ticketing(
            &harness.invocation(&member, INTAKE_CHANNEL_ID),
            INTAKE_CHANNEL_ID,
            STAFF_ROLE_ID,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TicketryError::PermissionDenied(Denial::NotAdministrator)));
    assert!(harness.storage.get_guild(GUILD_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn enable_rejects_non_text_channel() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .platform
        .add_channel(RemoteChannel {
            id: "voice-1".into(),
            name: "lounge".into(),
            kind: ChannelKind::Other,
            parent_id: None,
            topic: None,
        })
        .await;

    let err = harness
        .engine
        .enable_ticketing(
            &harness.invocation(&harness.admin(), INTAKE_CHANNEL_ID),
            "voice-1",
            STAFF_ROLE_ID,
        )
        .await
        .unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.user_message(), "You must provide a text channel for ticketing.");
}

#[tokio::test]
async fn disable_stops_new_tickets() {
    let harness = TestHarness::enabled().await.unwrap();
    let reply = harness
        .engine
        .disable_ticketing(&harness.invocation(&harness.admin(), INTAKE_CHANNEL_ID))
        .await
        .unwrap();
    assert_eq!(reply.content.as_deref(), Some("Ticketing has been disabled"));

    let err = harness
        .engine
        .create(&harness.invocation(&harness.member("100", "alice"), INTAKE_CHANNEL_ID))
        .await
        .unwrap_err();
    assert!(matches!(err, TicketryError::TicketingNotConfigured { .. }));
}
