//! Session-wide identity and conversation state.
//!
//! Written by engine callbacks, read by the dispatcher and the render loop.
//! Every accessor copies out under the lock; nothing hands out a reference
//! into the guarded state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::line::truncate_chars;

/// Longest stored conversation id.
pub const CONVERSATION_ID_CAP: usize = 127;
/// Longest stored identity name.
pub const IDENTITY_NAME_CAP: usize = 63;
/// Longest stored identity address.
pub const IDENTITY_ADDRESS_CAP: usize = 127;
/// Longest stored inbox id.
pub const INBOX_ID_CAP: usize = 127;

/// Copy of the session fields at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Conversation outgoing messages go to. `None` until one is joined.
    pub conversation_id: Option<String>,
    /// Display name. Starts as the command-line name.
    pub identity_name: String,
    /// Engine address for the identity.
    pub identity_address: String,
    /// Default inbox id.
    pub inbox_id: String,
}

/// Mutex-guarded [`SessionSnapshot`].
#[derive(Debug, Default)]
pub struct SessionState {
    inner: Mutex<SessionSnapshot>,
}

impl SessionState {
    /// Start a session shown under `identity_name` until the engine reports one.
    pub fn new(identity_name: &str) -> Self {
        let state = SessionSnapshot {
            identity_name: truncate_chars(identity_name, IDENTITY_NAME_CAP).to_owned(),
            ..SessionSnapshot::default()
        };
        Self { inner: Mutex::new(state) }
    }

    /// Current conversation id, if any.
    pub fn current_conversation(&self) -> Option<String> {
        self.lock().conversation_id.clone()
    }

    /// Replace the current conversation. An empty id clears it.
    ///
    /// Returns the id that was replaced.
    pub fn set_current_conversation(&self, conversation_id: &str) -> Option<String> {
        let next = (!conversation_id.is_empty())
            .then(|| truncate_chars(conversation_id, CONVERSATION_ID_CAP).to_owned());
        std::mem::replace(&mut self.lock().conversation_id, next)
    }

    /// Record the identity reported by the engine.
    pub fn set_identity(&self, name: &str, address: &str) {
        let mut state = self.lock();
        state.identity_name = truncate_chars(name, IDENTITY_NAME_CAP).to_owned();
        state.identity_address = truncate_chars(address, IDENTITY_ADDRESS_CAP).to_owned();
    }

    /// Record the default inbox id.
    pub fn set_inbox(&self, inbox_id: &str) {
        self.lock().inbox_id = truncate_chars(inbox_id, INBOX_ID_CAP).to_owned();
    }

    /// Current display name.
    pub fn identity_name(&self) -> String {
        self.lock().identity_name.clone()
    }

    /// Copy of every field.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SessionSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_command_line_name() {
        let session = SessionState::new("alice");
        let snap = session.snapshot();

        assert_eq!(snap.identity_name, "alice");
        assert_eq!(snap.conversation_id, None);
        assert!(snap.inbox_id.is_empty());
    }

    #[test]
    fn conversation_replaced_and_cleared() {
        let session = SessionState::new("alice");

        assert_eq!(session.set_current_conversation("c1"), None);
        assert_eq!(session.set_current_conversation("c2"), Some("c1".to_owned()));
        assert_eq!(session.current_conversation().as_deref(), Some("c2"));

        session.set_current_conversation("");
        assert_eq!(session.current_conversation(), None);
    }

    #[test]
    fn fields_are_bounded() {
        let session = SessionState::new(&"n".repeat(200));
        session.set_current_conversation(&"c".repeat(500));
        session.set_inbox(&"i".repeat(500));

        let snap = session.snapshot();
        assert_eq!(snap.identity_name.len(), IDENTITY_NAME_CAP);
        assert_eq!(snap.conversation_id.map(|c| c.len()), Some(CONVERSATION_ID_CAP));
        assert_eq!(snap.inbox_id.len(), INBOX_ID_CAP);
    }

    #[test]
    fn identity_overwrites_name() {
        let session = SessionState::new("alice");
        session.set_identity("Alice A.", "0xabc");

        assert_eq!(session.identity_name(), "Alice A.");
        assert_eq!(session.snapshot().identity_address, "0xabc");
    }
}
