// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch layer tests: routing, error replies and panic recovery.

use std::sync::Arc;

use async_trait::async_trait;

use ticketry_core::{Actor, GENERIC_ERROR_REPLY, InteractionHandle, Reply, TicketryError};
use ticketry_discord::{
    AppContext, ButtonProcessor, CommandInvocation, CommandOption, ComponentInvocation,
    Dispatcher, HandlerRegistry, InboundEvent, OptionValue, buttons, default_registry,
};
use ticketry_test_utils::{GUILD_ID, INTAKE_CHANNEL_ID, STAFF_ROLE_ID, TestHarness};

fn handle(id: &str) -> InteractionHandle {
    InteractionHandle {
        id: id.to_string(),
        token: format!("token-{id}"),
    }
}

fn dispatcher(harness: &TestHarness, registry: HandlerRegistry) -> Dispatcher {
    Dispatcher::new(
        AppContext::new(harness.engine.clone(), harness.platform.clone()),
        registry,
    )
}

fn press(actor: &Actor, channel_id: &str, custom_id: &str) -> InboundEvent {
    InboundEvent::Component(ComponentInvocation {
        handle: handle("1"),
        actor: actor.clone(),
        guild_id: Some(GUILD_ID.to_string()),
        channel_id: channel_id.to_string(),
        custom_id: custom_id.to_string(),
    })
}

fn slash(actor: &Actor, channel_id: &str, name: &str, sub: &str, options: Vec<CommandOption>) -> InboundEvent {
    InboundEvent::Command(CommandInvocation {
        handle: handle("2"),
        actor: actor.clone(),
        guild_id: Some(GUILD_ID.to_string()),
        channel_id: channel_id.to_string(),
        name: name.to_string(),
        options: vec![CommandOption {
            name: sub.to_string(),
            value: OptionValue::SubCommand(options),
        }],
    })
}

async fn last_reply(harness: &TestHarness) -> Reply {
    harness.platform.last_response().await.expect("a reply was sent")
}

#[tokio::test]
async fn setup_command_enables_ticketing() {
    let harness = TestHarness::builder().build().await.unwrap();
    let dispatcher = dispatcher(&harness, default_registry().unwrap());
    let admin = harness.admin();

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

    let reply = last_reply(&harness).await;
    assert!(reply.is_ephemeral());
    assert_eq!(
        reply.content.as_deref(),
        Some("Ticketing has been enabled in channel <#intake-1>")
    );
}

#[tokio::test]
async fn setup_requires_administrator() {
    let harness = TestHarness::builder().build().await.unwrap();
    let dispatcher = dispatcher(&harness, default_registry().unwrap());
    let member = harness.member("100", "alice");

    dispatcher
        .dispatch(slash(&member, INTAKE_CHANNEL_ID, "setup", "ticketing_disable", vec![]))
        .await;

    assert_eq!(
        last_reply(&harness).await.content.as_deref(),
        Some("You must be an administrator to use this command")
    );
}

#[tokio::test]
async fn buttons_drive_the_ticket_lifecycle() {
    let harness = TestHarness::enabled().await.unwrap();
    let dispatcher = dispatcher(&harness, default_registry().unwrap());
    let alice = harness.member("100", "alice");
    let staff = harness.staff("900", "sam").await;

    dispatcher
        .dispatch(press(&alice, INTAKE_CHANNEL_ID, "open_ticket_button"))
        .await;
    harness.settle().await;
    let created = last_reply(&harness).await;
    assert_eq!(created.embeds[0].title, "Ticket Created");

    let channel_id = harness.platform.created_channels().await.last().cloned().unwrap();
    dispatcher
        .dispatch(press(&staff, &channel_id, "claim_ticket_button"))
        .await;
    assert_eq!(
        last_reply(&harness).await.content.as_deref(),
        Some("<@900>, you have claimed this ticket.")
    );

    dispatcher
        .dispatch(slash(&staff, &channel_id, "ticket", "close", vec![]))
        .await;
    let ticket = harness
        .storage
        .get_ticket(GUILD_ID, &channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ticket.closed_by.as_deref(), Some("900"));

    dispatcher
        .dispatch(press(&staff, &channel_id, "delete_ticket_button"))
        .await;
    let prompt = last_reply(&harness).await;
    assert_eq!(prompt.embeds[0].title, "Please confirm");
    assert_eq!(prompt.buttons[0].custom_id, "delete_confirmation_button");
}

#[tokio::test]
async fn rejections_are_answered_privately_with_their_reason() {
    let harness = TestHarness::enabled().await.unwrap();
    let dispatcher = dispatcher(&harness, default_registry().unwrap());
    let alice = harness.member("100", "alice");
    let ticket = harness.open_ticket(&alice).await.unwrap();

    dispatcher
        .dispatch(press(&alice, &ticket.channel_id, "claim_ticket_button"))
        .await;

    let reply = last_reply(&harness).await;
    assert!(reply.is_ephemeral());
    assert_eq!(
        reply.content.as_deref(),
        Some("You do not have the ticket role to manage tickets. [<@&role-staff>]")
    );
}

#[tokio::test]
async fn unknown_command_and_button_get_generic_reply() {
    let harness = TestHarness::enabled().await.unwrap();
    let dispatcher = dispatcher(&harness, default_registry().unwrap());
    let alice = harness.member("100", "alice");

    dispatcher
        .dispatch(slash(&alice, INTAKE_CHANNEL_ID, "nope", "x", vec![]))
        .await;
    dispatcher
        .dispatch(press(&alice, INTAKE_CHANNEL_ID, "mystery_button"))
        .await;
    dispatcher
        .dispatch(slash(&alice, INTAKE_CHANNEL_ID, "ticket", "archive", vec![]))
        .await;
    dispatcher
        .dispatch(InboundEvent::Unknown {
            kind: "modal".into(),
            handle: Some(handle("3")),
        })
        .await;

    let replies = harness.platform.responses().await;
    assert_eq!(replies.len(), 4);
    for reply in replies {
        assert!(reply.is_ephemeral());
        assert_eq!(reply.content.as_deref(), Some(GENERIC_ERROR_REPLY));
    }
}

#[tokio::test]
async fn upstream_failure_gets_generic_reply() {
    let harness = TestHarness::enabled().await.unwrap();
    let dispatcher = dispatcher(&harness, default_registry().unwrap());
    harness.platform.fail_next("create_channel").await;

    dispatcher
        .dispatch(press(
            &harness.member("100", "alice"),
            INTAKE_CHANNEL_ID,
            "open_ticket_button",
        ))
        .await;

    assert_eq!(
        last_reply(&harness).await.content.as_deref(),
        Some(GENERIC_ERROR_REPLY)
    );
}

#[tokio::test]
async fn store_failure_gets_generic_reply() {
    let harness = TestHarness::enabled().await.unwrap();
    let dispatcher = dispatcher(&harness, default_registry().unwrap());
    let staff = harness.staff("900", "sam").await;
    let ticket = harness
        .open_ticket(&harness.member("100", "alice"))
        .await
        .unwrap();
    let memory = harness.memory.clone().unwrap();
    memory.fail_next("save_ticket").await;

    dispatcher
        .dispatch(press(&staff, &ticket.channel_id, "claim_ticket_button"))
        .await;
    harness.settle().await;

    let reply = last_reply(&harness).await;
    assert!(reply.is_ephemeral());
    assert_eq!(reply.content.as_deref(), Some(GENERIC_ERROR_REPLY));
    let stored = harness.ticket(&ticket.channel_id).await.unwrap().unwrap();
    assert_eq!(stored.claimed_by, None);
}

struct Exploding;

#[async_trait]
impl ButtonProcessor for Exploding {
    fn custom_id(&self) -> &str {
        "explode"
    }

    async fn process(
        &self,
        _ctx: &AppContext,
        component: &ComponentInvocation,
    ) -> Result<Reply, TicketryError> {
        if component.custom_id == "explode" {
            panic!("processor blew up");
        }
        Ok(Reply::ephemeral("unreachable"))
    }
}

#[tokio::test]
async fn panicking_processor_is_contained() {
    let harness = TestHarness::enabled().await.unwrap();
    let mut handlers = buttons::ticket_buttons();
    handlers.push(Arc::new(Exploding));
    let registry = HandlerRegistry::new(Vec::new(), handlers).unwrap();
    let dispatcher = dispatcher(&harness, registry);
    let alice = harness.member("100", "alice");

    dispatcher
        .dispatch(press(&alice, INTAKE_CHANNEL_ID, "explode"))
        .await;
    assert_eq!(
        last_reply(&harness).await.content.as_deref(),
        Some(GENERIC_ERROR_REPLY)
    );

    dispatcher
        .dispatch(press(&alice, INTAKE_CHANNEL_ID, "open_ticket_button"))
        .await;
    assert_eq!(last_reply(&harness).await.embeds[0].title, "Ticket Created");
}

#[tokio::test]
async fn duplicate_buttons_fail_fast() {
    let mut handlers = buttons::ticket_buttons();
    handlers.push(Arc::new(Exploding));
    handlers.push(Arc::new(Exploding));

    let err = HandlerRegistry::new(Vec::new(), handlers).err().unwrap();
    assert!(matches!(
        err,
        TicketryError::DuplicateHandler { ref name, .. } if name == "explode"
    ));
}

#[test]
fn default_registry_covers_commands_and_buttons() {
    let registry = default_registry().unwrap();
    assert!(registry.has_command("setup"));
    assert!(registry.has_command("ticket"));
    for id in [
        "open_ticket_button",
        "claim_ticket_button",
        "close_ticket_button",
        "reopen_ticket_button",
        "delete_ticket_button",
        "delete_confirmation_button",
    ] {
        assert!(registry.has_button(id), "{id} is not registered");
    }
    assert_eq!(registry.definitions().len(), 2);
}
