//! Process bootstrap.
//!
//! Wires the shared context, engine, ingestor, terminal and signal bridge
//! together in dependency order, runs the render loop, and tears everything
//! down in reverse. Any failure before the loop starts releases whatever was
//! already acquired and is reported as a [`LaunchError`].

use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
    sync::Arc,
};

use chatline_app::{
    AppContext, Backend, BackendError, BufferError, ClientConfig, EventIngestor, Operation,
    Runtime, SignalBridge, open_driver,
};
use thiserror::Error;
use tokio::runtime::Handle;

use crate::{
    cli::Args,
    engine::LoopbackEngine,
    terminal::{TerminalDriver, TerminalError},
};

/// Unrecoverable startup or runtime failure.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Line buffers could not be allocated.
    #[error("failed to allocate line buffers: {0}")]
    Buffers(#[from] BufferError),

    /// The engine session could not be created.
    #[error("failed to create chat session: {0}")]
    Engine(#[from] BackendError),

    /// The terminal surface could not be created or drawn.
    #[error("terminal failure: {0}")]
    Terminal(#[from] TerminalError),
}

impl LaunchError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Run the client until the user quits or a stop signal arrives.
pub async fn run(args: &Args) -> Result<(), LaunchError> {
    let config = ClientConfig::default();
    let ctx = AppContext::new(&config, &args.name)?;

    let session_json = args.session_config().to_json()?;
    let (engine, created) = LoopbackEngine::create(&session_json, &Handle::current())?;
    let backend: Arc<dyn Backend> = Arc::new(engine);

    let ingestor = EventIngestor::new(Arc::clone(&ctx), Handle::current());
    ingestor.track(Operation::Create, created);
    if let Some(events) = backend.subscribe_events() {
        ingestor.pump_events(events);
    }

    let driver =
        open_driver(backend.as_ref(), &ingestor, || TerminalDriver::new(ctx.flags_handle()))?;

    // Without the bridge only Ctrl-C and terminal resize events still work
    let signals = match SignalBridge::install(ctx.running(), ctx.flags()) {
        Ok(bridge) => Some(bridge),
        Err(e) => {
            tracing::warn!(error = %e, "signal handlers not installed");
            None
        },
    };

    let runtime = Runtime::new(driver, Arc::clone(&ctx), backend, ingestor, config);
    let result = runtime.run().await;

    drop(signals);
    tracing::info!(
        messages = ctx.messages().len(),
        logs = ctx.logs().len(),
        "session finished"
    );
    result.map_err(LaunchError::from)
}

/// Farewell shown once the terminal is restored.
pub fn goodbye_line(log_path: &Path) -> String {
    format!("Goodbye! (Library logs saved to {})", log_path.display())
}

/// Write `line` to the controlling terminal, or stdout when there is none.
pub fn say_goodbye(line: &str) -> io::Result<()> {
    match OpenOptions::new().write(true).open("/dev/tty") {
        Ok(mut tty) => writeln!(tty, "{line}"),
        Err(e) => {
            tracing::debug!(error = %e, "no controlling terminal");
            writeln!(io::stdout().lock(), "{line}")
        },
    }
}
