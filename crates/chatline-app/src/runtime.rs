//! Generic render loop.
//!
//! The [`Runtime`] is the only code that touches the [`Driver`]. Each tick it
//! drains pending keys into the editor, dispatches submitted lines, and
//! repaints only when a producer asked for it:
//!
//! 1. Drain keys without blocking. An interrupt key stops the loop.
//! 2. Test-and-clear the repaint flag. Nothing else happens on a clean tick.
//! 3. On a pending resize, rebuild the surface and recompute pane geometry.
//! 4. Snapshot both buffers and the session, then draw outside any lock.
//!
//! Engine callbacks never draw; they append lines and set flags, and the
//! next tick picks the change up.

use std::sync::Arc;

use crate::{
    Driver, KeyInput,
    backend::{Backend, Operation},
    context::{AppContext, ClientConfig},
    dispatcher::CommandDispatcher,
    driver::View,
    editor::InputEditor,
    ingest::EventIngestor,
    layout::PaneLayout,
};

/// Lifecycle of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, engine not yet started.
    Init,
    /// Main loop active.
    Running,
    /// Stop and destroy issued to the engine.
    ShuttingDown,
    /// Loop exited and the engine released.
    Terminated,
}

/// Render coordinator generic over the terminal driver.
pub struct Runtime<D: Driver> {
    driver: D,
    ctx: Arc<AppContext>,
    backend: Arc<dyn Backend>,
    ingestor: EventIngestor,
    dispatcher: CommandDispatcher,
    editor: InputEditor,
    config: ClientConfig,
    layout: Option<PaneLayout>,
    phase: Phase,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime in the [`Phase::Init`] phase.
    pub fn new(
        driver: D,
        ctx: Arc<AppContext>,
        backend: Arc<dyn Backend>,
        ingestor: EventIngestor,
        config: ClientConfig,
    ) -> Self {
        let dispatcher =
            CommandDispatcher::new(Arc::clone(&ctx), Arc::clone(&backend), ingestor.clone());
        Self {
            driver,
            ctx,
            backend,
            ingestor,
            dispatcher,
            editor: InputEditor::new(),
            config,
            layout: None,
            phase: Phase::Init,
        }
    }

    /// Start the engine, request identity and inbox, and greet the user.
    ///
    /// No-op outside [`Phase::Init`].
    pub fn start(&mut self) {
        if self.phase != Phase::Init {
            return;
        }

        self.ctx.log("Starting client...");
        self.ingestor.track(Operation::Start, self.backend.start());
        self.ingestor.track(Operation::Identity, self.backend.identity());
        self.ingestor.track(Operation::DefaultInbox, self.backend.default_inbox_id());

        self.ctx.message("Welcome to Chatline!");
        self.ctx.message("Type /help for commands, /quit to exit");
        self.ctx.message("");

        // First tick builds the surface and paints
        self.ctx.flags().request_resize();
        self.enter(Phase::Running);
    }

    /// Run until the running flag clears, then shut the engine down.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if reading keys or drawing fails. The
    /// engine is shut down either way.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.start();
        let result = self.drive().await;
        self.shutdown();
        result
    }

    async fn drive(&mut self) -> Result<(), D::Error> {
        while self.ctx.running().is_running() {
            self.tick()?;
            tokio::time::sleep(self.config.tick_interval).await;
        }
        Ok(())
    }

    /// One iteration of the loop. Returns whether a frame was drawn.
    pub fn tick(&mut self) -> Result<bool, D::Error> {
        while let Some(key) = self.driver.poll_key()? {
            if key == KeyInput::Interrupt {
                tracing::info!("interrupt key");
                self.ctx.running().stop();
                continue;
            }
            if let Some(line) = self.editor.handle_key(key, self.ctx.flags()) {
                self.dispatcher.dispatch(&line);
            }
        }

        if !self.ctx.flags().take_refresh() {
            return Ok(false);
        }

        let resized = self.ctx.flags().take_resize();
        let layout = match self.layout {
            Some(layout) if !resized => layout,
            _ => self.rebuild()?,
        };

        let view = self.view(layout);
        self.driver.draw(&view)?;
        Ok(true)
    }

    fn rebuild(&mut self) -> Result<PaneLayout, D::Error> {
        self.driver.reset()?;
        let (cols, rows) = self.driver.size()?;
        let layout = PaneLayout::compute(cols, rows, &self.config);
        tracing::debug!(cols, rows, ?layout, "surface rebuilt");
        self.layout = Some(layout);
        Ok(layout)
    }

    fn view(&self, layout: PaneLayout) -> View {
        let (log_width, log_rows) = layout.log_inner();
        let (message_width, message_rows) = layout.message_inner();
        let session = self.ctx.session().snapshot();

        View {
            layout,
            log_rows: self.ctx.logs().snapshot_for_render(log_width, log_rows),
            message_rows: self.ctx.messages().snapshot_for_render(message_width, message_rows),
            identity_name: session.identity_name,
            conversation_id: session.conversation_id,
            input: self.editor.text(),
            cursor: self.editor.cursor(),
        }
    }

    /// Issue stop and destroy to the engine. Runs at most once.
    pub fn shutdown(&mut self) {
        if matches!(self.phase, Phase::ShuttingDown | Phase::Terminated) {
            return;
        }
        self.ctx.running().stop();
        self.enter(Phase::ShuttingDown);
        self.ctx.log("Shutting down...");
        shutdown_backend(self.backend.as_ref(), &self.ingestor);
        self.enter(Phase::Terminated);
    }

    fn enter(&mut self, phase: Phase) {
        tracing::info!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Shared context.
    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Input editor state.
    pub fn editor(&self) -> &InputEditor {
        &self.editor
    }

    /// Pane geometry of the current surface, once built.
    pub fn layout(&self) -> Option<PaneLayout> {
        self.layout
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

/// Issue stop then destroy, routing both completions through `ingestor`.
pub fn shutdown_backend(backend: &dyn Backend, ingestor: &EventIngestor) {
    ingestor.track(Operation::Stop, backend.stop());
    ingestor.track(Operation::Destroy, backend.destroy());
}

/// Open the driver once the engine session exists.
///
/// When `open` fails the session is released with stop then destroy before
/// the error is handed back, so a failed startup never leaks the engine.
pub fn open_driver<D, E, F>(
    backend: &dyn Backend,
    ingestor: &EventIngestor,
    open: F,
) -> Result<D, E>
where
    D: Driver,
    E: std::fmt::Display,
    F: FnOnce() -> Result<D, E>,
{
    open().inspect_err(|e| {
        tracing::error!(error = %e, "driver initialisation failed");
        shutdown_backend(backend, ingestor);
    })
}

impl<D: Driver> std::fmt::Debug for Runtime<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("phase", &self.phase)
            .field("layout", &self.layout)
            .field("editor", &self.editor)
            .finish_non_exhaustive()
    }
}
