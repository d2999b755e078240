//! Coordinator core for the Chatline terminal client
//!
//! Thread-safe display state and a generic render loop for a chat client
//! whose messaging engine completes requests on its own threads. The same
//! loop runs against a real terminal and a scripted simulation.
//!
//! # Components
//!
//! - [`SharedLineBuffer`]: bounded line history shared by every producer
//! - [`DirtyFlags`] / [`RunningFlag`]: lock-free repaint and liveness flags
//! - [`SignalBridge`]: OS signals turned into flag writes
//! - [`Backend`]: asynchronous messaging engine contract
//! - [`EventIngestor`]: engine completions and events into buffers
//! - [`InputEditor`] / [`CommandDispatcher`]: line editing and commands
//! - [`Driver`]: trait for terminal I/O abstraction
//! - [`Runtime`]: generic render loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod backend;
mod buffer;
mod codec;
mod command;
mod context;
mod dispatcher;
mod driver;
mod editor;
mod event;
mod extract;
mod flags;
mod ingest;
mod input;
mod layout;
mod line;
mod runtime;
mod session;
mod signal;

pub use backend::{
    Backend, BackendError, Completion, EventReceiver, EventSender, Operation, Pending, Responder,
    SessionConfig, Status, completion_channel,
};
pub use buffer::{BufferError, SharedLineBuffer};
pub use codec::{MAX_HEX_LEN, decode_hex_lossy, encode_hex};
pub use command::{COMMAND_MARKER, Command, JOIN_USAGE};
pub use context::{AppContext, ClientConfig};
pub use dispatcher::{CommandDispatcher, GREETING, HELP_LINES, NO_CONVERSATION};
pub use driver::{Driver, View};
pub use editor::InputEditor;
pub use event::EngineEvent;
pub use extract::{extract_field, extract_fields};
pub use flags::{DirtyFlags, RunningFlag};
pub use ingest::{EventIngestor, on_completion, on_event};
pub use input::KeyInput;
pub use layout::{BORDER, INPUT_HEIGHT, PaneLayout};
pub use line::{LINE_CAP, Line, MAX_LINE_CHARS, truncate_chars};
pub use runtime::{Phase, Runtime, open_driver, shutdown_backend};
pub use session::{CONVERSATION_ID_CAP, SessionSnapshot, SessionState};
pub use signal::SignalBridge;
