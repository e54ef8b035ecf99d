// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Buttons and canned messages shown to users.

use strum::{Display, EnumString};
use ticketry_core::{
    Actor, Button, ButtonStyle, Embed, OutboundMessage, Reply, Ticket, TicketState,
};

/// Custom ids carried by every button the bot renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ButtonId {
    #[strum(serialize = "open_ticket_button")]
    OpenTicket,
    #[strum(serialize = "claim_ticket_button")]
    ClaimTicket,
    #[strum(serialize = "close_ticket_button")]
    CloseTicket,
    #[strum(serialize = "reopen_ticket_button")]
    ReopenTicket,
    #[strum(serialize = "delete_ticket_button")]
    DeleteTicket,
    #[strum(serialize = "delete_confirmation_button")]
    DeleteConfirmation,
}

impl ButtonId {
    pub const ALL: [ButtonId; 6] = [
        ButtonId::OpenTicket,
        ButtonId::ClaimTicket,
        ButtonId::CloseTicket,
        ButtonId::ReopenTicket,
        ButtonId::DeleteTicket,
        ButtonId::DeleteConfirmation,
    ];
}

const EMOJI_OPEN: &str = "\u{1F4E9}";
const EMOJI_CLAIM: &str = "\u{1F3AB}";
const EMOJI_CLOSE: &str = "\u{1F510}";
const EMOJI_REOPEN: &str = "\u{1F513}";
const EMOJI_DELETE: &str = "\u{274C}";
const EMOJI_WASTEBASKET: &str = "\u{1F5D1}";

const CREATED_COLOUR: u32 = 0x00ff00;

pub const CONTROL_MESSAGE_TEXT: &str = "Your ticket has been created.\nPlease provide any additional info you deem relevant to help us answer faster.";

pub const INTAKE_MESSAGE_TEXT: &str = "How can we help?\nWelcome to our tickets channel. If you have any questions or inquiries, please click on the button below to contact the staff by opening a ticket!";

fn button(id: ButtonId, label: &str, emoji: &str, style: ButtonStyle, disabled: bool) -> Button {
    Button {
        custom_id: id.to_string(),
        label: label.to_string(),
        emoji: Some(emoji.to_string()),
        style,
        disabled,
    }
}

/// Claim, Close, Reopen and Delete buttons with affordances for `state`.
///
/// | state   | claim | close | reopen | delete |
/// |---------|-------|-------|--------|--------|
/// | open    | on    | on    | off    | on     |
/// | claimed | off   | on    | off    | on     |
/// | closed  | off   | off   | on     | off    |
pub fn control_panel(state: TicketState) -> Vec<Button> {
    let closed = state == TicketState::Closed;
    vec![
        button(
            ButtonId::ClaimTicket,
            "Claim",
            EMOJI_CLAIM,
            ButtonStyle::Primary,
            state != TicketState::Open,
        ),
        button(ButtonId::CloseTicket, "Close", EMOJI_CLOSE, ButtonStyle::Secondary, closed),
        button(ButtonId::ReopenTicket, "Reopen", EMOJI_REOPEN, ButtonStyle::Success, !closed),
        button(ButtonId::DeleteTicket, "Delete", EMOJI_DELETE, ButtonStyle::Danger, closed),
    ]
}

/// The pinned message inside a ticket channel.
pub fn control_message(state: TicketState) -> OutboundMessage {
    OutboundMessage {
        content: CONTROL_MESSAGE_TEXT.to_string(),
        buttons: control_panel(state),
    }
}

/// The message in the intake channel members click to open a ticket.
pub fn intake_message() -> OutboundMessage {
    OutboundMessage {
        content: INTAKE_MESSAGE_TEXT.to_string(),
        buttons: vec![button(
            ButtonId::OpenTicket,
            "Open Ticket",
            EMOJI_OPEN,
            ButtonStyle::Primary,
            false,
        )],
    }
}

pub fn ticket_created_reply(actor: &Actor, ticket: &Ticket, category_name: &str) -> Reply {
    Reply::ephemeral_embed(
        Embed::new(
            "Ticket Created",
            format!(
                "{}, you created a ticket and it has been moved to the **{category_name}** category.",
                actor.mention()
            ),
        )
        .colour(CREATED_COLOUR)
        .field("Ticket Name", ticket.channel_name())
        .field("Ticket Channel", format!("<#{}>", ticket.channel_id)),
    )
}

pub fn delete_prompt_reply() -> Reply {
    Reply::ephemeral_embed(Embed::new(
        "Please confirm",
        "Are you sure you want to delete this ticket?",
    ))
    .with_buttons(vec![button(
        ButtonId::DeleteConfirmation,
        "Proceed",
        EMOJI_WASTEBASKET,
        ButtonStyle::Danger,
        false,
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn disabled(panel: &[Button]) -> Vec<bool> {
        panel.iter().map(|b| b.disabled).collect()
    }

    #[test]
    fn panel_matches_state() {
        assert_eq!(disabled(&control_panel(TicketState::Open)), [false, false, true, false]);
        assert_eq!(disabled(&control_panel(TicketState::Claimed)), [true, false, true, false]);
        assert_eq!(disabled(&control_panel(TicketState::Closed)), [true, true, false, true]);
    }

    #[test]
    fn button_ids_use_wire_names() {
        assert_eq!(ButtonId::DeleteConfirmation.to_string(), "delete_confirmation_button");
        for id in ButtonId::ALL {
            assert_eq!(ButtonId::from_str(&id.to_string()).unwrap(), id);
        }
    }

    #[test]
    fn new_ticket_panel_has_reopen_disabled() {
        let message = control_message(TicketState::Open);
        let reopen = message
            .buttons
            .iter()
            .find(|b| b.custom_id == "reopen_ticket_button")
            .unwrap();
        assert!(reopen.disabled);
        assert_eq!(reopen.style, ButtonStyle::Success);
    }

    #[test]
    fn delete_prompt_is_private_with_one_button() {
        let reply = delete_prompt_reply();
        assert!(reply.is_ephemeral());
        assert_eq!(reply.buttons.len(), 1);
        assert_eq!(reply.buttons[0].style, ButtonStyle::Danger);
    }
}
