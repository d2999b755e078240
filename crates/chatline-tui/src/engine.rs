//! In-process loopback engine.
//!
//! Implements the [`Backend`] contract on a tokio task, so completions and
//! events are delivered from runtime worker threads exactly like an external
//! engine would. Every conversation has an echo peer: each message sent is
//! acknowledged and then reflected back as an incoming message.

use std::{
    collections::HashSet,
    sync::{Mutex, PoisonError},
};

use chatline_app::{
    Backend, BackendError, Completion, EventReceiver, EventSender, Pending, Responder,
    SessionConfig, completion_channel, extract_field,
};
use serde_json::json;
use tokio::{runtime::Handle, sync::mpsc, task::AbortHandle};

/// Requests forwarded to the engine task.
#[derive(Debug)]
enum Request {
    Start(Responder),
    Stop(Responder),
    Destroy(Responder),
    Identity(Responder),
    DefaultInbox(Responder),
    IntroBundle(Responder),
    NewConversation { intro_bundle: String, content_hex: String, reply: Responder },
    Send { conversation_id: String, content_hex: String, reply: Responder },
}

/// Handle to a running loopback engine.
#[derive(Debug)]
pub struct LoopbackEngine {
    requests: mpsc::UnboundedSender<Request>,
    events: Mutex<Option<EventReceiver>>,
    task: AbortHandle,
}

impl LoopbackEngine {
    /// Create a session from the engine configuration JSON.
    ///
    /// The returned completion resolves once the engine task is running.
    pub fn create(config_json: &str, runtime: &Handle) -> Result<(Self, Pending), BackendError> {
        let config: SessionConfig = serde_json::from_str(config_json)?;
        if config.name.is_empty() {
            return Err(BackendError::Create("identity name must not be empty".into()));
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (created_tx, created) = completion_channel();

        let state = EngineState::new(config, event_tx);
        let task = runtime.spawn(state.run(request_rx, created_tx)).abort_handle();

        let engine = Self { requests: request_tx, events: Mutex::new(Some(event_rx)), task };
        Ok((engine, created))
    }

    // A request sent after the task exited drops its responder, which the
    // ingestor reports as a missing callback.
    fn submit(&self, request: impl FnOnce(Responder) -> Request) -> Pending {
        let (reply, pending) = completion_channel();
        if self.requests.send(request(reply)).is_err() {
            tracing::debug!("loopback engine is gone");
        }
        pending
    }
}

impl Backend for LoopbackEngine {
    fn subscribe_events(&self) -> Option<EventReceiver> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    fn start(&self) -> Pending {
        self.submit(Request::Start)
    }

    fn stop(&self) -> Pending {
        self.submit(Request::Stop)
    }

    fn destroy(&self) -> Pending {
        self.submit(Request::Destroy)
    }

    fn identity(&self) -> Pending {
        self.submit(Request::Identity)
    }

    fn default_inbox_id(&self) -> Pending {
        self.submit(Request::DefaultInbox)
    }

    fn create_intro_bundle(&self) -> Pending {
        self.submit(Request::IntroBundle)
    }

    fn new_private_conversation(&self, intro_bundle: &str, content_hex: &str) -> Pending {
        self.submit(|reply| Request::NewConversation {
            intro_bundle: intro_bundle.to_owned(),
            content_hex: content_hex.to_owned(),
            reply,
        })
    }

    fn send_message(&self, conversation_id: &str, content_hex: &str) -> Pending {
        self.submit(|reply| Request::Send {
            conversation_id: conversation_id.to_owned(),
            content_hex: content_hex.to_owned(),
            reply,
        })
    }
}

impl Drop for LoopbackEngine {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// State owned by the engine task.
struct EngineState {
    config: SessionConfig,
    address: String,
    inbox_id: String,
    started: bool,
    conversations: HashSet<String>,
    events: EventSender,
}

impl EngineState {
    fn new(config: SessionConfig, events: EventSender) -> Self {
        Self {
            config,
            address: format!("0x{}", hex::encode(rand::random::<[u8; 20]>())),
            inbox_id: hex::encode(rand::random::<[u8; 16]>()),
            started: false,
            conversations: HashSet::new(),
            events,
        }
    }

    async fn run(mut self, mut requests: mpsc::UnboundedReceiver<Request>, created: Responder) {
        tracing::info!(
            name = %self.config.name,
            port = self.config.port,
            cluster = self.config.cluster_id,
            shard = self.config.shard_id,
            peer = ?self.config.static_peer,
            "loopback engine created"
        );
        let _ = created.send(Completion::ok(""));

        while let Some(request) = requests.recv().await {
            if !self.handle(request) {
                break;
            }
        }
        tracing::info!("loopback engine destroyed");
    }

    /// Returns `false` once the session is destroyed.
    fn handle(&mut self, request: Request) -> bool {
        match request {
            Request::Start(reply) => {
                self.started = true;
                let _ = reply.send(Completion::ok(""));
            },
            Request::Stop(reply) => {
                self.started = false;
                let _ = reply.send(Completion::ok(""));
            },
            Request::Destroy(reply) => {
                let _ = reply.send(Completion::ok(""));
                return false;
            },
            Request::Identity(reply) => {
                let identity = json!({ "name": self.config.name, "address": self.address });
                let _ = reply.send(Completion::ok(identity.to_string()));
            },
            Request::DefaultInbox(reply) => {
                let _ = reply.send(Completion::ok(self.inbox_id.clone()));
            },
            Request::IntroBundle(reply) => {
                let _ = reply.send(self.intro_bundle());
            },
            Request::NewConversation { intro_bundle, content_hex, reply } => {
                let _ = reply.send(self.open_conversation(&intro_bundle, &content_hex));
            },
            Request::Send { conversation_id, content_hex, reply } => {
                let _ = reply.send(self.send(&conversation_id, &content_hex));
            },
        }
        true
    }

    fn intro_bundle(&self) -> Completion {
        if !self.started {
            return Completion::error("client not started");
        }
        let bundle = json!({
            "ident": self.address,
            "name": self.config.name,
            "inbox": self.inbox_id,
        });
        Completion::ok(bundle.to_string())
    }

    fn open_conversation(&mut self, intro_bundle: &str, content_hex: &str) -> Completion {
        if !self.started {
            return Completion::error("client not started");
        }
        if extract_field(intro_bundle, "ident", 128).is_none_or(|ident| ident.is_empty()) {
            return Completion::error("invalid intro bundle");
        }

        let conversation_id = hex::encode(rand::random::<[u8; 16]>());
        self.conversations.insert(conversation_id.clone());
        self.emit(&json!({ "eventType": "new_conversation", "conversationId": conversation_id }));
        self.echo(&conversation_id, content_hex);

        Completion::ok(conversation_id)
    }

    fn send(&self, conversation_id: &str, content_hex: &str) -> Completion {
        if !self.started {
            return Completion::error("client not started");
        }
        if !self.conversations.contains(conversation_id) {
            return Completion::error(format!("unknown conversation: {conversation_id}"));
        }

        let message_id = hex::encode(rand::random::<[u8; 8]>());
        self.emit(&json!({
            "eventType": "delivery_ack",
            "conversationId": conversation_id,
            "messageId": message_id,
        }));
        self.echo(conversation_id, content_hex);

        Completion::ok(message_id)
    }

    fn echo(&self, conversation_id: &str, content_hex: &str) {
        self.emit(&json!({
            "eventType": "new_message",
            "conversationId": conversation_id,
            "content": content_hex,
        }));
    }

    fn emit(&self, event: &serde_json::Value) {
        if self.events.send(event.to_string()).is_err() {
            tracing::debug!("event dropped, no subscriber");
        }
    }
}
