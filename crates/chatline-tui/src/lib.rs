//! Terminal UI for Chatline
//!
//! A thin shell over [`chatline_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`chatline_app::Runtime`].
//!
//! This crate handles terminal rendering, process bootstrap and the
//! in-process loopback engine.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod engine;
pub mod launch;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use chatline_app::{Driver, KeyInput, Runtime, View};
pub use cli::Args;
pub use engine::LoopbackEngine;
pub use launch::LaunchError;
pub use terminal::{TerminalDriver, TerminalError};
