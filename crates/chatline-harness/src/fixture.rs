//! Wiring for a simulated client.
//!
//! [`SimClient`] assembles the same pieces the terminal binary does, with a
//! [`SimBackend`] in place of the engine and a [`SimDriver`] in place of the
//! terminal. Tests keep handles to both to script input and completions.

use std::{sync::Arc, time::Duration};

use chatline_app::{
    AppContext, Backend, BufferError, ClientConfig, EventIngestor, Runtime,
};
use tokio::runtime::Handle;

use crate::{CoordinatorSnapshot, SimBackend, SimDriver};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);
const SETTLE_POLL: Duration = Duration::from_millis(2);

/// A complete client wired to simulated I/O.
#[derive(Debug)]
pub struct SimClient {
    /// Render loop under test.
    pub runtime: Runtime<SimDriver>,
    /// Handle to the driver the runtime owns.
    pub driver: SimDriver,
    /// Engine double.
    pub backend: Arc<SimBackend>,
    /// Shared context.
    pub ctx: Arc<AppContext>,
}

impl SimClient {
    /// Build a client on `handle` with a `cols` x `rows` surface.
    pub fn new(cols: u16, rows: u16, handle: Handle) -> Result<Self, BufferError> {
        Self::with_config(cols, rows, handle, ClientConfig::default(), "sim")
    }

    /// Build a client with explicit configuration and identity name.
    pub fn with_config(
        cols: u16,
        rows: u16,
        handle: Handle,
        config: ClientConfig,
        name: &str,
    ) -> Result<Self, BufferError> {
        let ctx = AppContext::new(&config, name)?;
        let backend = Arc::new(SimBackend::new());
        let driver = SimDriver::new(cols, rows);

        let ingestor = EventIngestor::new(Arc::clone(&ctx), handle);
        if let Some(events) = backend.subscribe_events() {
            ingestor.pump_events(events);
        }

        let engine: Arc<dyn Backend> = Arc::clone(&backend) as Arc<dyn Backend>;
        let runtime = Runtime::new(driver.clone(), Arc::clone(&ctx), engine, ingestor, config);
        Ok(Self { runtime, driver, backend, ctx })
    }

    /// Capture the observable state.
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot::capture(&self.runtime)
    }

    /// Formatted message lines.
    pub fn messages(&self) -> Vec<String> {
        self.ctx.messages().lines()
    }

    /// Log lines with their timestamp prefix removed.
    pub fn log_texts(&self) -> Vec<String> {
        self.ctx.logs().lines().into_iter().map(|line| strip_prefix(&line).to_owned()).collect()
    }

    /// Wait until `done` holds, yielding to the ingestor between checks.
    pub async fn settle(&self, done: impl Fn(&Self) -> bool) -> bool {
        eventually(|| done(self)).await
    }
}

/// Poll `condition` until it holds or a timeout elapses.
pub async fn eventually(condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(SETTLE_POLL).await;
    }
    condition()
}

fn strip_prefix(line: &str) -> &str {
    match line.strip_prefix('[') {
        Some(rest) => rest.split_once("] ").map_or(line, |(_, text)| text),
        None => line,
    }
}
