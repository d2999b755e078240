//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`chatline_app::Runtime`] render loop runs in both production and
//! simulation. Keys are scripted up front or injected between ticks, and
//! every drawn [`View`] is captured for inspection.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chatline_app::{Driver, KeyInput, View};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Shared state for key injection and frame capture.
///
/// This allows injection while the runtime owns the driver.
#[derive(Debug)]
struct SharedState {
    keys: VecDeque<KeyInput>,
    size: (u16, u16),
    frames: Vec<View>,
    resets: usize,
    fail_draw: bool,
}

/// Simulation driver for deterministic testing.
///
/// Cloning yields another handle to the same simulated terminal, so a test
/// keeps one clone while the runtime owns the other.
#[derive(Debug, Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new(80, 25)
    }
}

impl SimDriver {
    /// Create a simulated terminal of `cols` x `rows`.
    pub fn new(cols: u16, rows: u16) -> Self {
        let state = SharedState {
            keys: VecDeque::new(),
            size: (cols, rows),
            frames: Vec::new(),
            resets: 0,
            fail_draw: false,
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Queue one key.
    pub fn press(&self, key: KeyInput) {
        self.lock().keys.push_back(key);
    }

    /// Queue each character of `text` as a key.
    pub fn type_text(&self, text: &str) {
        self.lock().keys.extend(text.chars().map(KeyInput::Char));
    }

    /// Queue `text` followed by Enter.
    pub fn submit(&self, text: &str) {
        self.type_text(text);
        self.press(KeyInput::Enter);
    }

    /// Change the reported terminal size. Takes effect on the next reset.
    pub fn set_size(&self, cols: u16, rows: u16) {
        self.lock().size = (cols, rows);
    }

    /// Make every following draw fail.
    pub fn fail_draws(&self) {
        self.lock().fail_draw = true;
    }

    /// Keys not consumed yet.
    pub fn pending_keys(&self) -> usize {
        self.lock().keys.len()
    }

    /// Every drawn frame, oldest first.
    pub fn frames(&self) -> Vec<View> {
        self.lock().frames.clone()
    }

    /// Most recently drawn frame.
    pub fn last_frame(&self) -> Option<View> {
        self.lock().frames.last().cloned()
    }

    /// Number of drawn frames.
    pub fn frame_count(&self) -> usize {
        self.lock().frames.len()
    }

    /// Number of surface rebuilds.
    pub fn reset_count(&self) -> usize {
        self.lock().resets
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    fn poll_key(&mut self) -> Result<Option<KeyInput>, Self::Error> {
        Ok(self.lock().keys.pop_front())
    }

    fn size(&self) -> Result<(u16, u16), Self::Error> {
        Ok(self.lock().size)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.lock().resets += 1;
        Ok(())
    }

    fn draw(&mut self, view: &View) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.fail_draw {
            return Err(SimDriverError("draw failed".into()));
        }
        state.frames.push(view.clone());
        Ok(())
    }
}
