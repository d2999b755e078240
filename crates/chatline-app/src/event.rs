//! Unsolicited engine events.
//!
//! Events arrive as flat JSON objects tagged by `eventType`. Decoding goes
//! through the tolerant field extractor, so malformed payloads degrade into
//! [`EngineEvent::Unknown`] or empty fields rather than errors.

use crate::{
    codec::{MAX_HEX_LEN, decode_hex_lossy},
    extract::extract_fields,
    session::CONVERSATION_ID_CAP,
};

/// Longest event type kept for diagnostics.
pub const EVENT_TYPE_CAP: usize = 31;

/// Decoded engine event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A peer sent a message.
    NewMessage {
        /// Conversation the message belongs to.
        conversation_id: String,
        /// Decoded message text.
        content: String,
    },

    /// A conversation was opened, by us or by a peer.
    NewConversation {
        /// Id of the new conversation.
        conversation_id: String,
    },

    /// A sent message was acknowledged.
    DeliveryAck {
        /// Conversation the acknowledged message belongs to.
        conversation_id: String,
    },

    /// Any other event type, including a missing one.
    Unknown {
        /// Raw event type, possibly empty.
        event_type: String,
    },
}

impl EngineEvent {
    /// Decode an event payload. Never fails.
    pub fn parse(payload: &str) -> Self {
        let [event_type, conversation_id, content] = extract_fields(payload, [
            ("eventType", EVENT_TYPE_CAP),
            ("conversationId", CONVERSATION_ID_CAP),
            ("content", MAX_HEX_LEN),
        ]);

        match event_type.as_str() {
            "new_message" => Self::NewMessage { conversation_id, content: decode_hex_lossy(&content) },
            "new_conversation" => Self::NewConversation { conversation_id },
            "delivery_ack" => Self::DeliveryAck { conversation_id },
            _ => Self::Unknown { event_type },
        }
    }
}
