//! Point-in-time copy of what the coordinator exposes.
//!
//! Completions keep landing on other threads while checks run, so every
//! check reads the same copied values instead of live state.

use chatline_app::{Phase, Runtime, View};

use crate::SimDriver;

/// Observable coordinator state.
#[derive(Debug, Clone)]
pub struct CoordinatorSnapshot {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Whether the running flag is still set.
    pub running: bool,
    /// Characters in the input line.
    pub input_len: usize,
    /// Editor cursor position.
    pub cursor: usize,
    /// Lines held by the log buffer.
    pub log_len: usize,
    /// Log buffer capacity.
    pub log_capacity: usize,
    /// Lines held by the message buffer.
    pub message_len: usize,
    /// Message buffer capacity.
    pub message_capacity: usize,
    /// Current conversation id, if any.
    pub conversation_id: Option<String>,
    /// Most recent frame drawn by the driver.
    pub last_frame: Option<View>,
}

impl CoordinatorSnapshot {
    /// Capture the state of a runtime driven by a [`SimDriver`].
    pub fn capture(runtime: &Runtime<SimDriver>) -> Self {
        let ctx = runtime.context();
        let editor = runtime.editor();

        Self {
            phase: runtime.phase(),
            running: ctx.running().is_running(),
            input_len: editor.len(),
            cursor: editor.cursor(),
            log_len: ctx.logs().len(),
            log_capacity: ctx.logs().capacity(),
            message_len: ctx.messages().len(),
            message_capacity: ctx.messages().capacity(),
            conversation_id: ctx.session().current_conversation(),
            last_frame: runtime.driver().last_frame(),
        }
    }

    /// Snapshot of a freshly constructed client with default capacities.
    pub fn idle() -> Self {
        Self {
            phase: Phase::Init,
            running: true,
            input_len: 0,
            cursor: 0,
            log_len: 0,
            log_capacity: 50,
            message_len: 0,
            message_capacity: 100,
            conversation_id: None,
            last_frame: None,
        }
    }
}
