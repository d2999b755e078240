//! Messaging engine contract.
//!
//! The engine is an external collaborator that owns its own threads. Every
//! request returns a [`Pending`] completion which the engine fulfils exactly
//! once, from whichever thread it likes. Unsolicited events arrive on a
//! separate unbounded channel handed out once by
//! [`Backend::subscribe_events`].
//!
//! A completion whose sender is dropped without a reply is treated as
//! [`Status::MissingCallback`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Outcome class of an engine request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Request succeeded.
    Ok,
    /// Request failed; the payload carries the engine's message.
    Error,
    /// The engine never answered.
    MissingCallback,
}

impl Status {
    /// Whether the request succeeded.
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

/// Status plus payload delivered once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Outcome class.
    pub status: Status,
    /// Engine payload. Often JSON, sometimes an id, sometimes empty.
    pub payload: String,
}

impl Completion {
    /// Successful completion.
    pub fn ok(payload: impl Into<String>) -> Self {
        Self { status: Status::Ok, payload: payload.into() }
    }

    /// Failed completion.
    pub fn error(payload: impl Into<String>) -> Self {
        Self { status: Status::Error, payload: payload.into() }
    }

    /// Stand-in for a request the engine dropped.
    pub fn missing() -> Self {
        Self { status: Status::MissingCallback, payload: String::new() }
    }
}

/// Receiving half of a completion.
pub type Pending = oneshot::Receiver<Completion>;
/// Sending half of a completion, held by the engine.
pub type Responder = oneshot::Sender<Completion>;
/// Unsolicited engine events, one JSON payload each.
pub type EventReceiver = mpsc::UnboundedReceiver<String>;
/// Engine side of the event stream.
pub type EventSender = mpsc::UnboundedSender<String>;

/// Create a single-use completion channel.
pub fn completion_channel() -> (Responder, Pending) {
    oneshot::channel()
}

/// Engine request kinds, used to route completions and label diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Session creation.
    Create,
    /// Start the engine.
    Start,
    /// Stop the engine.
    Stop,
    /// Release the session.
    Destroy,
    /// Send to an existing conversation.
    SendMessage,
    /// Open a conversation from an intro bundle.
    NewConversation,
    /// Fetch own identity.
    Identity,
    /// Fetch default inbox id.
    DefaultInbox,
    /// Create a shareable intro bundle.
    IntroBundle,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Destroy => "destroy",
            Self::SendMessage => "send_message",
            Self::NewConversation => "new_private_conversation",
            Self::Identity => "identity",
            Self::DefaultInbox => "default_inbox_id",
            Self::IntroBundle => "create_intro_bundle",
        };
        f.write_str(name)
    }
}

/// Session parameters forwarded to the engine as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Identity name.
    pub name: String,
    /// Listen port. Zero lets the engine pick one.
    pub port: u16,
    /// Network cluster.
    pub cluster_id: u32,
    /// Network shard.
    pub shard_id: u32,
    /// Bootstrap peer address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_peer: Option<String>,
}

impl SessionConfig {
    /// Serialize to the engine's configuration JSON.
    pub fn to_json(&self) -> Result<String, BackendError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Session creation failures.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The configuration JSON could not be produced or understood.
    #[error("invalid session configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The engine refused to create a session.
    #[error("engine refused to create a session: {0}")]
    Create(String),
}

/// Asynchronous messaging engine.
///
/// All calls return immediately. Completions may be fulfilled on any thread
/// and in any order relative to each other.
pub trait Backend: Send + Sync {
    /// Take the unsolicited event stream. `None` after the first call.
    fn subscribe_events(&self) -> Option<EventReceiver>;

    /// Start networking.
    fn start(&self) -> Pending;

    /// Stop networking.
    fn stop(&self) -> Pending;

    /// Release the session. No further completions are fulfilled afterwards.
    fn destroy(&self) -> Pending;

    /// Own identity as `{"name":..,"address":..}`.
    fn identity(&self) -> Pending;

    /// Default inbox id as a bare string.
    fn default_inbox_id(&self) -> Pending;

    /// Shareable intro bundle.
    fn create_intro_bundle(&self) -> Pending;

    /// Open a conversation with the bundle's owner, sending `content_hex`
    /// as the first message.
    fn new_private_conversation(&self, intro_bundle: &str, content_hex: &str) -> Pending;

    /// Send hex-encoded content to an existing conversation.
    fn send_message(&self, conversation_id: &str, content_hex: &str) -> Pending;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_json_shape() {
        let config = SessionConfig {
            name: "alice".into(),
            port: 0,
            cluster_id: 42,
            shard_id: 2,
            static_peer: None,
        };
        assert_eq!(
            config.to_json().unwrap(),
            r#"{"name":"alice","port":0,"clusterId":42,"shardId":2}"#
        );
    }

    #[test]
    fn config_json_includes_peer() {
        let config = SessionConfig {
            name: "bob".into(),
            port: 6000,
            cluster_id: 1,
            shard_id: 0,
            static_peer: Some("/ip4/127.0.0.1/tcp/60000".into()),
        };
        let json = config.to_json().unwrap();
        assert!(json.ends_with(r#""staticPeer":"/ip4/127.0.0.1/tcp/60000"}"#));

        let parsed: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn operation_labels() {
        assert_eq!(Operation::SendMessage.to_string(), "send_message");
        assert_eq!(Operation::IntroBundle.to_string(), "create_intro_bundle");
    }
}
