//! Inbound and outbound chat events.
//!
//! The engine consumes transport-agnostic events and produces replies; the
//! teloxide wiring in `main.rs` converts to and from these types.

/// An inbound chat message.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: i64,
    /// Display name of the sender, used in the broadcast confirmation.
    pub sender_name: String,
    pub text: String,
}

/// A text reply addressed to one chat.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
}

impl OutboundMessage {
    pub fn new(chat_id: i64, text: String) -> Self {
        Self { chat_id, text }
    }
}
