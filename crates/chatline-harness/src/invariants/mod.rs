//! Invariant checking for simulation testing.
//!
//! An invariant is a property of the client that no sequence of keys,
//! completions, events or resizes may break. Scenario tests pin down single
//! paths; invariants are checked after every step of randomized ones.
//!
//! # Architecture
//!
//! Observable state is extracted from a [`chatline_app::Runtime`] into a
//! [`CoordinatorSnapshot`], then registered [`Invariant`] checks run against
//! it. Violations trigger panics with detailed context for debugging.
//!
//! # Usage
//!
//! ```ignore
//! InvariantRegistry::standard()
//!     .assert_all(&CoordinatorSnapshot::capture(&runtime), "after tick");
//! ```

mod checks;
mod snapshot;

pub use checks::{
    BufferWithinCapacity, ConversationIdBounded, CursorWithinInput, FrameFitsPanes,
    StoppedAfterShutdown,
};
pub use snapshot::CoordinatorSnapshot;

/// Outcome of one check.
pub type InvariantResult = Result<(), Violation>;

/// A broken property and what was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Which invariant failed.
    pub invariant: &'static str,
    /// Observed state that breaks it.
    pub message: String,
}

impl Violation {
    /// Violation of `invariant` described by `message`.
    pub fn new(invariant: &'static str, message: impl Into<String>) -> Self {
        Self { invariant, message: message.into() }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of the coordinator that holds after every step.
pub trait Invariant: Send + Sync {
    /// Stable identifier used in reports.
    fn name(&self) -> &'static str;

    /// Examine one snapshot.
    fn check(&self, state: &CoordinatorSnapshot) -> InvariantResult;
}

/// Ordered set of invariants run together.
#[derive(Default)]
pub struct InvariantRegistry {
    checks: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every coordinator invariant:
    ///
    /// - [`CursorWithinInput`]: cursor in range, input under the cap
    /// - [`BufferWithinCapacity`]: line buffers never overfill
    /// - [`FrameFitsPanes`]: drawn rows fit their panes
    /// - [`StoppedAfterShutdown`]: shutdown clears the running flag
    /// - [`ConversationIdBounded`]: stored conversation id is capped
    pub fn standard() -> Self {
        Self::new()
            .with(CursorWithinInput)
            .with(BufferWithinCapacity)
            .with(FrameFitsPanes)
            .with(StoppedAfterShutdown)
            .with(ConversationIdBounded)
    }

    /// Builder form of [`InvariantRegistry::add`].
    #[must_use]
    pub fn with<I: Invariant + 'static>(mut self, invariant: I) -> Self {
        self.add(invariant);
        self
    }

    /// Register one more invariant. Checks run in registration order.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.checks.push(Box::new(invariant));
    }

    /// Run every check. The error lists each violation, in registration order.
    pub fn check_all(&self, state: &CoordinatorSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> =
            self.checks.iter().filter_map(|check| check.check(state).err()).collect();
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every check and panic with the full report if any fails.
    #[allow(clippy::panic, reason = "test assertion helper")]
    pub fn assert_all(&self, state: &CoordinatorSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
        panic!(
            "{} invariant(s) broken {context}:\n  {}\n{state:#?}",
            report.len(),
            report.join("\n  ")
        );
    }

    /// Registered invariant count.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
