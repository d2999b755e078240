//! Bounded, mutex-guarded line buffer shared by every producer.
//!
//! Engine threads append log and chat lines while the render loop takes
//! snapshots. Lines are built before the lock is taken, and an append only
//! moves one into a pre-reserved ring, so appends never allocate under the
//! lock. A render snapshot wraps rows while holding it; that work is bounded
//! by the capacity and the line cap, and drawing happens after release.

use std::{
    borrow::Cow,
    collections::{TryReserveError, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;

use crate::{
    flags::DirtyFlags,
    line::{Line, rows_for, wrap},
};

/// Buffer construction failure.
#[derive(Debug, Error)]
pub enum BufferError {
    /// A buffer must hold at least one line.
    #[error("line buffer capacity must be non-zero")]
    ZeroCapacity,
    /// Reserving storage for the ring failed.
    #[error("could not reserve line storage: {0}")]
    Alloc(#[from] TryReserveError),
}

/// FIFO of at most `capacity` lines. The oldest line is evicted on overflow.
#[derive(Debug)]
pub struct SharedLineBuffer {
    lines: Mutex<VecDeque<Line>>,
    capacity: usize,
    flags: Arc<DirtyFlags>,
}

impl SharedLineBuffer {
    /// Reserve storage for `capacity` lines up front.
    pub fn with_capacity(capacity: usize, flags: Arc<DirtyFlags>) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }

        let mut lines = VecDeque::new();
        lines.try_reserve_exact(capacity)?;

        Ok(Self { lines: Mutex::new(lines), capacity, flags })
    }

    /// Append a line, evicting the oldest when full, then request a repaint.
    ///
    /// Callable from any thread. Text and prefix are truncated to the line
    /// cap before the lock is taken.
    pub fn append(&self, text: &str, prefix: Option<&str>) {
        let line = Line::new(text, prefix);
        {
            let mut lines = self.lock();
            if lines.len() >= self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
        self.flags.request_refresh();
    }

    /// Wrapped rows for a `width` x `height` pane.
    ///
    /// Picks the longest suffix of lines whose wrapped rows fit in `height`.
    /// When even the newest line is taller than the pane, its last `height`
    /// rows are returned. Rows come back oldest first, owned, so drawing
    /// happens after the lock is released.
    pub fn snapshot_for_render(&self, width: usize, height: usize) -> Vec<String> {
        if height == 0 {
            return Vec::new();
        }
        let width = width.max(1);

        let lines = self.lock();
        let formatted: Vec<Cow<'_, str>> = lines.iter().map(Line::formatted).collect();
        let rows: Vec<usize> =
            formatted.iter().map(|text| rows_for(text.chars().count(), width)).collect();

        let mut start = formatted.len();
        let mut used = 0;
        while start > 0 && used + rows[start - 1] <= height {
            start -= 1;
            used += rows[start];
        }

        let mut out = Vec::with_capacity(height);
        if start == formatted.len() {
            if let Some(newest) = formatted.last() {
                let wrapped = wrap(newest, width);
                let skip = wrapped.len().saturating_sub(height);
                out.extend(wrapped.into_iter().skip(skip));
            }
            return out;
        }

        for text in &formatted[start..] {
            out.extend(wrap(text, width));
        }
        out
    }

    /// Formatted copy of every stored line, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|line| line.formatted().into_owned()).collect()
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no line has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of stored lines.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panicking producer must not take the display down with it.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Line>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
