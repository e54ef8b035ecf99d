// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete ticket pipeline.
//!
//! Each test builds an isolated harness on a temp SQLite database with the
//! mock platform, and drives it through the same dispatcher and registry
//! that `ticketry serve` wires up.

use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use ticketry_core::{InteractionHandle, Reply, TicketState};
use ticketry_discord::{
    AppContext, CommandInvocation, CommandOption, ComponentInvocation, Dispatcher, InboundEvent,
    OptionValue, default_registry,
};
use ticketry_gateway::{GatewayState, router};
use ticketry_test_utils::{GUILD_ID, INTAKE_CHANNEL_ID, STAFF_ROLE_ID, TestHarness};

async fn sqlite_harness() -> TestHarness {
    TestHarness::builder()
        .with_sqlite()
        .with_delete_delay(Duration::from_millis(50))
        .build()
        .await
        .unwrap()
}

fn dispatcher(harness: &TestHarness) -> Dispatcher {
    Dispatcher::new(
        AppContext::new(harness.engine.clone(), harness.platform.clone()),
        default_registry().unwrap(),
    )
}

fn handle() -> InteractionHandle {
    InteractionHandle {
        id: "1".into(),
        token: "token".into(),
    }
}

fn press(actor: &ticketry_core::Actor, channel_id: &str, custom_id: &str) -> InboundEvent {
    InboundEvent::Component(ComponentInvocation {
        handle: handle(),
        actor: actor.clone(),
        guild_id: Some(GUILD_ID.into()),
        channel_id: channel_id.into(),
        custom_id: custom_id.into(),
    })
}

fn slash(
    actor: &ticketry_core::Actor,
    channel_id: &str,
    name: &str,
    sub: &str,
    options: Vec<CommandOption>,
) -> InboundEvent {
    InboundEvent::Command(CommandInvocation {
        handle: handle(),
        actor: actor.clone(),
        guild_id: Some(GUILD_ID.into()),
        channel_id: channel_id.into(),
        name: name.into(),
        options: vec![CommandOption {
            name: sub.into(),
            value: OptionValue::SubCommand(options),
        }],
    })
}

async fn last_reply(harness: &TestHarness) -> Reply {
    harness.platform.last_response().await.unwrap()
}

#[tokio::test]
async fn full_ticket_lifecycle_over_sqlite() {
    let harness = sqlite_harness().await;
    let dispatcher = dispatcher(&harness);
    let admin = harness.admin();
    let alice = harness.member("100", "alice");
    let sam = harness.staff("900", "sam").await;

    dispatcher
        .dispatch(slash(
            &admin,
            INTAKE_CHANNEL_ID,
            "setup",
            "ticketing_enable",
            vec![
                CommandOption {
                    name: "channel".into(),
                    value: OptionValue::Channel(INTAKE_CHANNEL_ID.into()),
                },
                CommandOption {
                    name: "role".into(),
                    value: OptionValue::Role(STAFF_ROLE_ID.into()),
                },
            ],
        ))
        .await;
    assert_eq!(harness.platform.messages_in(INTAKE_CHANNEL_ID).await.len(), 1);

    dispatcher
        .dispatch(press(&alice, INTAKE_CHANNEL_ID, "open_ticket_button"))
        .await;
    harness.settle().await;
    let channel_id = harness.platform.created_channels().await.last().cloned().unwrap();
    let ticket = harness.ticket(&channel_id).await.unwrap().unwrap();
    assert_eq!(ticket.number, 1);
    assert_eq!(ticket.creator_id, "100");
    assert_eq!(harness.platform.categories_named("Created Tickets").await.len(), 1);

    dispatcher
        .dispatch(slash(&sam, &channel_id, "ticket", "claim", vec![]))
        .await;
    dispatcher
        .dispatch(press(&sam, &channel_id, "close_ticket_button"))
        .await;
    harness.settle().await;
    let ticket = harness.ticket(&channel_id).await.unwrap().unwrap();
    assert_eq!(ticket.state(), TicketState::Closed);
    assert_eq!(ticket.claimed_by.as_deref(), Some("900"));

    dispatcher
        .dispatch(press(&alice, &channel_id, "reopen_ticket_button"))
        .await;
    harness.settle().await;
    let ticket = harness.ticket(&channel_id).await.unwrap().unwrap();
    assert_eq!(ticket.state(), TicketState::Open);
    let channel = harness.platform.channel_snapshot(&channel_id).await.unwrap();
    let open = harness.platform.categories_named("Created Tickets").await;
    assert_eq!(channel.parent_id.as_deref(), Some(open[0].id.as_str()));

    dispatcher
        .dispatch(slash(&sam, &channel_id, "ticket", "delete", vec![]))
        .await;
    assert_eq!(last_reply(&harness).await.embeds[0].title, "Please confirm");
    dispatcher
        .dispatch(press(&sam, &channel_id, "delete_confirmation_button"))
        .await;
    assert!(
        last_reply(&harness)
            .await
            .content
            .unwrap()
            .contains("this ticket has been deleted")
    );

    harness.settle().await;
    assert!(harness.platform.channel_snapshot(&channel_id).await.is_none());
    assert!(harness.ticket(&channel_id).await.unwrap().is_none());
    assert!(harness.storage.pending_deletions().await.unwrap().is_empty());
}

#[tokio::test]
async fn numbers_keep_counting_after_deletion() {
    let harness = sqlite_harness().await;
    harness.enable_ticketing().await.unwrap();
    let dispatcher = dispatcher(&harness);
    let alice = harness.member("100", "alice");
    let sam = harness.staff("900", "sam").await;

    let first = harness.open_ticket(&alice).await.unwrap();
    dispatcher
        .dispatch(press(&sam, &first.channel_id, "delete_confirmation_button"))
        .await;
    harness.settle().await;

    let second = harness.open_ticket(&alice).await.unwrap();
    assert_eq!(second.number, 2);
    assert_eq!(harness.storage.latest_ticket_number(GUILD_ID).await.unwrap(), Some(2));
}

#[tokio::test]
async fn health_endpoint_sees_the_same_storage() {
    let harness = sqlite_harness().await;
    let state = GatewayState::new(harness.storage.clone(), harness.platform.clone());

    let response = router(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["checks"]["storage"]["status"], "healthy");
}
