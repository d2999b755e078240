//! Chatline TUI entry point.

use std::process::ExitCode;

use chatline_tui::{Args, launch, logging};
use clap::Parser;

#[tokio::main]
#[allow(clippy::print_stderr, reason = "terminal is restored by now")]
async fn main() -> ExitCode {
    // --help and --version exit here with status 0
    let args = Args::parse();
    let log = logging::init(&args.name, args.log_dir.as_deref(), args.debug);
    tracing::info!(?args, "chatline starting");

    match launch::run(&args).await {
        Ok(()) => {
            if let Err(e) = launch::say_goodbye(&launch::goodbye_line(log.path())) {
                tracing::warn!(error = %e, "farewell not written");
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("chatline: {e}");
            eprintln!("Library logs saved to {}", log.path().display());
            ExitCode::from(e.exit_code())
        },
    }
}
