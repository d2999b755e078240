//! Lock-free flags shared between producers and the render loop.
//!
//! Producers (engine threads, signal handlers, the editor) only ever set a
//! flag. The render loop is the single consumer and test-and-clears each flag
//! once per tick. No ordering holds between the two dirty flags beyond both
//! being visible to the tick that follows the store.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Repaint and resize requests.
#[derive(Debug, Default)]
pub struct DirtyFlags {
    needs_refresh: Arc<AtomicBool>,
    resize_pending: Arc<AtomicBool>,
}

impl DirtyFlags {
    /// Create clear flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the next tick to repaint.
    pub fn request_refresh(&self) {
        self.needs_refresh.store(true, Ordering::Release);
    }

    /// Ask the next tick to rebuild the surface, then repaint.
    pub fn request_resize(&self) {
        self.resize_pending.store(true, Ordering::Release);
        self.needs_refresh.store(true, Ordering::Release);
    }

    /// Clear the repaint request, returning whether it was set.
    pub fn take_refresh(&self) -> bool {
        self.needs_refresh.swap(false, Ordering::AcqRel)
    }

    /// Clear the resize request, returning whether it was set.
    pub fn take_resize(&self) -> bool {
        self.resize_pending.swap(false, Ordering::AcqRel)
    }

    /// Whether a repaint is pending. Does not clear the flag.
    #[cfg(test)]
    pub(crate) fn refresh_pending(&self) -> bool {
        self.needs_refresh.load(Ordering::Acquire)
    }

    /// Whether a resize is pending. Does not clear the flag.
    #[cfg(test)]
    pub(crate) fn resize_pending(&self) -> bool {
        self.resize_pending.load(Ordering::Acquire)
    }

    pub(crate) fn refresh_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.needs_refresh)
    }

    pub(crate) fn resize_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.resize_pending)
    }
}

/// Main loop liveness.
///
/// Stored inverted as a stop request so the signal path only ever sets a bit.
/// Once stopped the flag never becomes running again.
#[derive(Debug, Default)]
pub struct RunningFlag {
    stop_requested: Arc<AtomicBool>,
}

impl RunningFlag {
    /// Create a flag in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the main loop should keep going.
    pub fn is_running(&self) -> bool {
        !self.stop_requested.load(Ordering::Acquire)
    }

    /// Clear the flag. The loop exits at its next check.
    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    pub(crate) fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_requested)
    }
}
