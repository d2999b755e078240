//! Shared application context and client tuning.
//!
//! One [`AppContext`] is created at startup and shared by `Arc` between the
//! render loop, the dispatcher and every engine callback. It owns both line
//! buffers, the session state and the flags, and outlives all of them.

use std::{sync::Arc, time::Duration};

use crate::{
    buffer::{BufferError, SharedLineBuffer},
    flags::{DirtyFlags, RunningFlag},
    session::SessionState,
};

/// Sizes and timing of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Lines kept in the message pane history.
    pub message_capacity: usize,
    /// Lines kept in the log pane history.
    pub log_capacity: usize,
    /// Preferred visible rows of the log pane, borders excluded.
    pub log_pane_rows: u16,
    /// Preferred visible rows of the message pane, borders excluded.
    pub message_pane_rows: u16,
    /// Sleep between render ticks.
    pub tick_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            message_capacity: 100,
            log_capacity: 50,
            log_pane_rows: 6,
            message_pane_rows: 12,
            tick_interval: Duration::from_millis(10),
        }
    }
}

/// State shared by every thread of the client.
#[derive(Debug)]
pub struct AppContext {
    flags: Arc<DirtyFlags>,
    running: RunningFlag,
    logs: SharedLineBuffer,
    messages: SharedLineBuffer,
    session: SessionState,
}

impl AppContext {
    /// Allocate both buffers. Fails only if storage cannot be reserved.
    pub fn new(config: &ClientConfig, identity_name: &str) -> Result<Arc<Self>, BufferError> {
        let flags = Arc::new(DirtyFlags::new());
        let logs = SharedLineBuffer::with_capacity(config.log_capacity, Arc::clone(&flags))?;
        let messages =
            SharedLineBuffer::with_capacity(config.message_capacity, Arc::clone(&flags))?;

        Ok(Arc::new(Self {
            flags,
            running: RunningFlag::new(),
            logs,
            messages,
            session: SessionState::new(identity_name),
        }))
    }

    /// Append a diagnostic line stamped with the local wall-clock time.
    pub fn log(&self, text: &str) {
        let stamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.logs.append(text, Some(&stamp));
    }

    /// Append a chat line.
    pub fn message(&self, text: &str) {
        self.messages.append(text, None);
    }

    /// Repaint and resize flags.
    pub fn flags(&self) -> &DirtyFlags {
        &self.flags
    }

    /// Shared handle to the flags, for producers that outlive a borrow.
    pub fn flags_handle(&self) -> Arc<DirtyFlags> {
        Arc::clone(&self.flags)
    }

    /// Main loop liveness.
    pub fn running(&self) -> &RunningFlag {
        &self.running
    }

    /// Diagnostic pane history.
    pub fn logs(&self) -> &SharedLineBuffer {
        &self.logs
    }

    /// Chat pane history.
    pub fn messages(&self) -> &SharedLineBuffer {
        &self.messages
    }

    /// Identity and conversation state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }
}
