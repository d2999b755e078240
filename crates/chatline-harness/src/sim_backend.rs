//! Simulation backend implementing the Backend trait.
//!
//! `SimBackend` records every request and parks its completion instead of
//! answering. Tests decide when, in what order, from which thread and with
//! what status each completion is fulfilled, and inject unsolicited events
//! at will. This reproduces the nondeterminism of a real engine on demand.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chatline_app::{
    Backend, Completion, EventReceiver, EventSender, Operation, Pending, Responder,
    completion_channel,
};
use tokio::sync::mpsc;

/// One recorded engine request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// `start`.
    Start,
    /// `stop`.
    Stop,
    /// `destroy`.
    Destroy,
    /// `identity`.
    Identity,
    /// `default_inbox_id`.
    DefaultInbox,
    /// `create_intro_bundle`.
    IntroBundle,
    /// `new_private_conversation`.
    NewConversation {
        /// Bundle passed by the caller.
        intro_bundle: String,
        /// Hex-encoded first message.
        content_hex: String,
    },
    /// `send_message`.
    SendMessage {
        /// Target conversation.
        conversation_id: String,
        /// Hex-encoded content.
        content_hex: String,
    },
}

impl BackendCall {
    /// Operation this call belongs to.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Start => Operation::Start,
            Self::Stop => Operation::Stop,
            Self::Destroy => Operation::Destroy,
            Self::Identity => Operation::Identity,
            Self::DefaultInbox => Operation::DefaultInbox,
            Self::IntroBundle => Operation::IntroBundle,
            Self::NewConversation { .. } => Operation::NewConversation,
            Self::SendMessage { .. } => Operation::SendMessage,
        }
    }
}

#[derive(Debug, Default)]
struct SharedState {
    calls: Vec<BackendCall>,
    pending: VecDeque<(Operation, Responder)>,
    events: Option<EventReceiver>,
}

/// Scriptable engine for deterministic tests.
#[derive(Debug)]
pub struct SimBackend {
    state: Mutex<SharedState>,
    events: EventSender,
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBackend {
    /// Create a backend with no recorded calls.
    pub fn new() -> Self {
        let (events, receiver) = mpsc::unbounded_channel();
        let state = SharedState { events: Some(receiver), ..SharedState::default() };
        Self { state: Mutex::new(state), events }
    }

    /// Every request so far, in issue order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Number of requests so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Requests whose completion has not been fulfilled yet.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Fulfil the oldest parked completion of `operation`.
    ///
    /// Returns `false` when none is parked. Callable from any thread.
    pub fn complete(&self, operation: Operation, completion: Completion) -> bool {
        let Some(responder) = self.take_pending(operation) else {
            return false;
        };
        tracing::debug!(%operation, status = ?completion.status, "sim completion");
        // The ingestor may already be gone during teardown
        let _ = responder.send(completion);
        true
    }

    /// Drop the oldest parked completion of `operation` without answering.
    pub fn abandon(&self, operation: Operation) -> bool {
        self.take_pending(operation).is_some()
    }

    /// Fulfil every parked completion with an empty success.
    pub fn complete_all_ok(&self) -> usize {
        let pending = std::mem::take(&mut self.lock().pending);
        let count = pending.len();
        for (_, responder) in pending {
            let _ = responder.send(Completion::ok(""));
        }
        count
    }

    /// Deliver an unsolicited event payload.
    pub fn emit_event(&self, payload: impl Into<String>) {
        let _ = self.events.send(payload.into());
    }

    fn take_pending(&self, operation: Operation) -> Option<Responder> {
        let mut state = self.lock();
        let index = state.pending.iter().position(|(op, _)| *op == operation)?;
        state.pending.remove(index).map(|(_, responder)| responder)
    }

    fn record(&self, call: BackendCall) -> Pending {
        let (responder, pending) = completion_channel();
        let mut state = self.lock();
        state.pending.push_back((call.operation(), responder));
        state.calls.push(call);
        pending
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for SimBackend {
    fn subscribe_events(&self) -> Option<EventReceiver> {
        self.lock().events.take()
    }

    fn start(&self) -> Pending {
        self.record(BackendCall::Start)
    }

    fn stop(&self) -> Pending {
        self.record(BackendCall::Stop)
    }

    fn destroy(&self) -> Pending {
        self.record(BackendCall::Destroy)
    }

    fn identity(&self) -> Pending {
        self.record(BackendCall::Identity)
    }

    fn default_inbox_id(&self) -> Pending {
        self.record(BackendCall::DefaultInbox)
    }

    fn create_intro_bundle(&self) -> Pending {
        self.record(BackendCall::IntroBundle)
    }

    fn new_private_conversation(&self, intro_bundle: &str, content_hex: &str) -> Pending {
        self.record(BackendCall::NewConversation {
            intro_bundle: intro_bundle.to_owned(),
            content_hex: content_hex.to_owned(),
        })
    }

    fn send_message(&self, conversation_id: &str, content_hex: &str) -> Pending {
        self.record(BackendCall::SendMessage {
            conversation_id: conversation_id.to_owned(),
            content_hex: content_hex.to_owned(),
        })
    }
}
