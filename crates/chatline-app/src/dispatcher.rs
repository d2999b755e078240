//! Submitted-line dispatch.
//!
//! Runs on the render thread. Every engine request is fire-and-forget: the
//! dispatcher hands the [`crate::Pending`] completion to the
//! [`EventIngestor`] and returns without waiting.

use std::sync::Arc;

use crate::{
    backend::{Backend, Operation},
    codec::encode_hex,
    command::Command,
    context::AppContext,
    ingest::EventIngestor,
};

/// First message sent when opening a conversation from a bundle.
pub const GREETING: &str = "Hello!";

/// Shown when chat text is submitted before any conversation exists.
pub const NO_CONVERSATION: &str = "No active conversation. Use /join or receive an invite.";

/// Static `/help` output.
pub const HELP_LINES: [&str; 6] = [
    "Commands:",
    "  /join <bundle>  - Join conversation with IntroBundle",
    "  /bundle         - Show your IntroBundle",
    "  /help           - Show this list",
    "  /quit           - Exit",
    "  <message>       - Send message",
];

/// Turns submitted lines into engine requests and local feedback.
pub struct CommandDispatcher {
    ctx: Arc<AppContext>,
    backend: Arc<dyn Backend>,
    ingestor: EventIngestor,
}

impl CommandDispatcher {
    /// Dispatcher issuing requests to `backend`, with completions routed
    /// through `ingestor`.
    pub fn new(ctx: Arc<AppContext>, backend: Arc<dyn Backend>, ingestor: EventIngestor) -> Self {
        Self { ctx, backend, ingestor }
    }

    /// Act on one submitted line.
    pub fn dispatch(&self, line: &str) {
        match Command::parse(line) {
            Command::Empty => {},
            Command::Message(text) => self.send(text),
            Command::Quit => {
                tracing::info!("quit requested");
                self.ctx.running().stop();
            },
            Command::Join { bundle } => {
                let pending = self.backend.new_private_conversation(bundle, &encode_hex(GREETING));
                self.ingestor.track(Operation::NewConversation, pending);
                self.ctx.message("* Creating conversation...");
            },
            Command::Bundle => {
                self.ingestor.track(Operation::IntroBundle, self.backend.create_intro_bundle());
            },
            Command::Help => {
                for line in HELP_LINES {
                    self.ctx.message(line);
                }
            },
            Command::InvalidArgs { usage } => self.ctx.message(usage),
            Command::Unknown(input) => self.ctx.message(&format!("Unknown command: {input}")),
        }
    }

    fn send(&self, text: &str) {
        let Some(conversation_id) = self.ctx.session().current_conversation() else {
            self.ctx.message(NO_CONVERSATION);
            return;
        };

        let pending = self.backend.send_message(&conversation_id, &encode_hex(text));
        self.ingestor.track(Operation::SendMessage, pending);
        self.ctx.message(&format!("-> You: {text}"));
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher").finish_non_exhaustive()
    }
}
