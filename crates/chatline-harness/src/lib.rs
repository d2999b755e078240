//! Test doubles and invariants for the Chatline coordinator.
//!
//! Scripted implementations of the Backend and Driver traits so the real
//! render loop runs against an engine whose completions arrive exactly when,
//! and on whichever thread, a test decides.
//!
//! # Invariant Testing
//!
//! [`CoordinatorSnapshot`] copies what a running client exposes, and
//! [`InvariantRegistry::standard()`] checks it after each simulated step.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod fixture;
pub mod invariants;
pub mod sim_backend;
pub mod sim_driver;

pub use fixture::{SimClient, eventually};
pub use invariants::{
    BufferWithinCapacity, ConversationIdBounded, CoordinatorSnapshot, CursorWithinInput,
    FrameFitsPanes, Invariant, InvariantRegistry, InvariantResult, StoppedAfterShutdown,
    Violation,
};
pub use sim_backend::{BackendCall, SimBackend};
pub use sim_driver::{SimDriver, SimDriverError};
