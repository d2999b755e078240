//! Engine-to-display translation layer.
//!
//! The [`EventIngestor`] turns engine completions and unsolicited events into
//! line-buffer appends and session updates.
//!
//! # Responsibilities
//!
//! - Awaits each [`Pending`] completion on an engine-side task and routes it
//!   to the handler for its [`Operation`].
//! - Drains the unsolicited event stream, updating the current conversation
//!   and echoing every payload into the log pane.
//! - Never touches the terminal. Handlers only append lines and flip flags,
//!   so they are safe to run on any thread.

use std::sync::Arc;

use tokio::{runtime::Handle, task::JoinHandle};

use crate::{
    backend::{Completion, EventReceiver, Operation, Pending},
    context::AppContext,
    event::EngineEvent,
    extract::extract_fields,
    line::truncate_chars,
    session::{IDENTITY_ADDRESS_CAP, IDENTITY_NAME_CAP, INBOX_ID_CAP},
};

/// Payload characters shown on a completion line.
const COMPLETION_PREVIEW: usize = 60;
/// Payload characters shown when echoing an event.
const EVENT_PREVIEW: usize = 70;
/// Address and inbox characters shown in the log pane.
const ID_PREVIEW: usize = 24;
/// Conversation id characters shown in the message pane.
const CONVERSATION_PREVIEW: usize = 32;

/// Routes engine callbacks into the shared context.
#[derive(Debug, Clone)]
pub struct EventIngestor {
    ctx: Arc<AppContext>,
    runtime: Handle,
}

impl EventIngestor {
    /// Handlers run on tasks spawned onto `runtime`.
    pub fn new(ctx: Arc<AppContext>, runtime: Handle) -> Self {
        Self { ctx, runtime }
    }

    /// Await `pending` off the render thread and handle its completion.
    ///
    /// A completion dropped by the engine is handled as a missing callback.
    pub fn track(&self, operation: Operation, pending: Pending) -> JoinHandle<()> {
        let ctx = Arc::clone(&self.ctx);
        self.runtime.spawn(async move {
            let completion = pending.await.unwrap_or_else(|_| Completion::missing());
            on_completion(&ctx, operation, &completion);
        })
    }

    /// Handle every event on `events` until the engine closes the stream.
    pub fn pump_events(&self, mut events: EventReceiver) -> JoinHandle<()> {
        let ctx = Arc::clone(&self.ctx);
        self.runtime.spawn(async move {
            while let Some(payload) = events.recv().await {
                on_event(&ctx, &payload);
            }
            tracing::debug!("engine event stream closed");
        })
    }
}

/// Route a completion to the handler for `operation`.
pub fn on_completion(ctx: &AppContext, operation: Operation, completion: &Completion) {
    tracing::debug!(
        %operation,
        status = ?completion.status,
        payload_len = completion.payload.len(),
        "engine completion"
    );

    match operation {
        Operation::Identity => on_identity(ctx, completion),
        Operation::DefaultInbox => on_inbox(ctx, completion),
        Operation::IntroBundle => on_intro_bundle(ctx, completion),
        _ => on_general(ctx, completion),
    }
}

/// Log `OK`, `OK: <payload>` or `ERR: <payload>`.
pub fn on_general(ctx: &AppContext, completion: &Completion) {
    let preview = truncate_chars(&completion.payload, COMPLETION_PREVIEW);
    let line = match (completion.status.is_ok(), preview.is_empty()) {
        (true, true) => "OK".to_owned(),
        (true, false) => format!("OK: {preview}"),
        (false, _) => format!("ERR: {preview}"),
    };
    ctx.log(&line);
}

fn on_identity(ctx: &AppContext, completion: &Completion) {
    if !completion.status.is_ok() {
        on_general(ctx, completion);
        return;
    }

    let [name, address] = extract_fields(&completion.payload, [
        ("name", IDENTITY_NAME_CAP),
        ("address", IDENTITY_ADDRESS_CAP),
    ]);
    ctx.session().set_identity(&name, &address);
    ctx.log(&format!("Identity: {name} ({}...)", truncate_chars(&address, ID_PREVIEW)));
}

fn on_inbox(ctx: &AppContext, completion: &Completion) {
    if !completion.status.is_ok() {
        on_general(ctx, completion);
        return;
    }
    if completion.payload.is_empty() {
        return;
    }

    let inbox = truncate_chars(&completion.payload, INBOX_ID_CAP);
    ctx.session().set_inbox(inbox);
    ctx.log(&format!("Inbox: {}...", truncate_chars(inbox, ID_PREVIEW)));
}

fn on_intro_bundle(ctx: &AppContext, completion: &Completion) {
    if completion.status.is_ok() && !completion.payload.is_empty() {
        ctx.message("Your IntroBundle:");
        ctx.message("");
        ctx.message(&completion.payload);
        ctx.message("");
    } else {
        ctx.message(&format!("Failed to get bundle: {}", completion.payload));
    }
}

/// Handle one unsolicited event payload.
pub fn on_event(ctx: &AppContext, payload: &str) {
    match EngineEvent::parse(payload) {
        EngineEvent::NewMessage { content, .. } => {
            ctx.message(&format!("<- {content}"));
        },
        EngineEvent::NewConversation { conversation_id } => {
            let replaced = ctx.session().set_current_conversation(&conversation_id);
            tracing::info!(?replaced, conversation = %conversation_id, "current conversation changed");
            let preview = truncate_chars(&conversation_id, CONVERSATION_PREVIEW);
            ctx.message(&format!("* New conversation: {preview}..."));
        },
        EngineEvent::DeliveryAck { .. } => ctx.log("Delivery acknowledged"),
        EngineEvent::Unknown { event_type } => {
            ctx.log(&format!("Unhandled event: {event_type}"));
        },
    }

    ctx.log(&event_echo(payload));
}

fn event_echo(payload: &str) -> String {
    let preview = truncate_chars(payload, EVENT_PREVIEW);
    if preview.len() < payload.len() {
        format!("EVT: {preview}...")
    } else {
        format!("EVT: {preview}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ClientConfig;

    fn ctx() -> Arc<AppContext> {
        AppContext::new(&ClientConfig::default(), "alice").unwrap()
    }

    // Log lines carry a "[HH:MM:SS] " stamp
    fn log_bodies(ctx: &AppContext) -> Vec<String> {
        ctx.logs().lines().into_iter().map(|line| line[11..].to_owned()).collect()
    }

    #[test]
    fn general_completion_lines() {
        let ctx = ctx();
        on_general(&ctx, &Completion::ok(""));
        on_general(&ctx, &Completion::ok("msg-1"));
        on_general(&ctx, &Completion::error("boom"));
        on_general(&ctx, &Completion::missing());

        assert_eq!(log_bodies(&ctx), vec!["OK", "OK: msg-1", "ERR: boom", "ERR: "]);
    }

    #[test]
    fn completion_payload_is_previewed() {
        let ctx = ctx();
        on_general(&ctx, &Completion::ok("p".repeat(100)));
        assert_eq!(log_bodies(&ctx), vec![format!("OK: {}", "p".repeat(60))]);
    }

    #[test]
    fn identity_updates_session() {
        let ctx = ctx();
        let payload = r#"{"name":"Alice","address":"0x0123456789abcdef0123456789abcdef"}"#;
        on_completion(&ctx, Operation::Identity, &Completion::ok(payload));

        let session = ctx.session().snapshot();
        assert_eq!(session.identity_name, "Alice");
        assert_eq!(session.identity_address, "0x0123456789abcdef0123456789abcdef");
        assert_eq!(log_bodies(&ctx), vec!["Identity: Alice (0x0123456789abcdef012345...)"]);
    }

    #[test]
    fn failed_identity_keeps_name() {
        let ctx = ctx();
        on_completion(&ctx, Operation::Identity, &Completion::error("not started"));

        assert_eq!(ctx.session().identity_name(), "alice");
        assert_eq!(log_bodies(&ctx), vec!["ERR: not started"]);
    }

    #[test]
    fn inbox_recorded() {
        let ctx = ctx();
        on_completion(&ctx, Operation::DefaultInbox, &Completion::ok("inbox-42"));

        assert_eq!(ctx.session().snapshot().inbox_id, "inbox-42");
        assert_eq!(log_bodies(&ctx), vec!["Inbox: inbox-42..."]);
    }

    #[test]
    fn bundle_success_and_failure() {
        let ctx = ctx();
        on_completion(&ctx, Operation::IntroBundle, &Completion::ok("{\"ident\":\"x\"}"));
        on_completion(&ctx, Operation::IntroBundle, &Completion::error("offline"));

        assert_eq!(ctx.messages().lines(), vec![
            "Your IntroBundle:",
            "",
            "{\"ident\":\"x\"}",
            "",
            "Failed to get bundle: offline",
        ]);
    }

    #[test]
    fn new_conversation_replaces_current() {
        let ctx = ctx();
        on_event(&ctx, r#"{"eventType":"new_conversation","conversationId":"c1"}"#);
        on_event(&ctx, r#"{"eventType":"new_conversation","conversationId":"c2"}"#);

        assert_eq!(ctx.session().current_conversation().as_deref(), Some("c2"));
        assert_eq!(ctx.messages().lines(), vec![
            "* New conversation: c1...",
            "* New conversation: c2..."
        ]);
    }

    #[test]
    fn new_message_is_decoded_and_echoed() {
        let ctx = ctx();
        let payload = r#"{"eventType":"new_message","conversationId":"c1","content":"48692121212121"}"#;
        on_event(&ctx, payload);

        assert_eq!(ctx.messages().lines(), vec!["<- Hi!!!!!"]);
        let logs = log_bodies(&ctx);
        assert_eq!(logs.len(), 1);
        assert!(logs[0].starts_with("EVT: {\"eventType\""));
        assert!(logs[0].ends_with("..."));
    }

    #[test]
    fn unknown_event_logged() {
        let ctx = ctx();
        on_event(&ctx, r#"{"eventType":"typing"}"#);

        assert!(ctx.messages().is_empty());
        assert_eq!(log_bodies(&ctx), vec![
            "Unhandled event: typing",
            r#"EVT: {"eventType":"typing"}"#
        ]);
    }

    #[tokio::test]
    async fn tracked_completion_reaches_handler() {
        let ctx = ctx();
        let ingestor = EventIngestor::new(Arc::clone(&ctx), Handle::current());
        let (responder, pending) = crate::backend::completion_channel();

        let task = ingestor.track(Operation::Start, pending);
        responder.send(Completion::ok("")).unwrap();
        task.await.unwrap();

        assert_eq!(log_bodies(&ctx), vec!["OK"]);
    }

    #[tokio::test]
    async fn dropped_responder_is_missing_callback() {
        let ctx = ctx();
        let ingestor = EventIngestor::new(Arc::clone(&ctx), Handle::current());
        let (responder, pending) = crate::backend::completion_channel();

        let task = ingestor.track(Operation::Stop, pending);
        drop(responder);
        task.await.unwrap();

        assert_eq!(log_bodies(&ctx), vec!["ERR: "]);
    }

    #[tokio::test]
    async fn event_pump_drains_until_closed() {
        let ctx = ctx();
        let ingestor = EventIngestor::new(Arc::clone(&ctx), Handle::current());
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        let task = ingestor.pump_events(rx);
        tx.send(r#"{"eventType":"delivery_ack"}"#.to_owned()).unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(log_bodies(&ctx)[0], "Delivery acknowledged");
    }
}
