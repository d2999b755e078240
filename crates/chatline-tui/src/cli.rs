//! Command-line arguments.

use std::path::PathBuf;

use chatline_app::SessionConfig;
use clap::Parser;

/// Chatline terminal chat client
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "chatline")]
#[command(about = "Terminal chat client over an asynchronous messaging engine")]
#[command(version)]
pub struct Args {
    /// Identity name
    #[arg(long, default_value = "user")]
    pub name: String,

    /// Listen port (0 lets the engine choose)
    #[arg(long, default_value_t = 0)]
    pub port: u16,

    /// Network cluster id
    #[arg(long = "cluster", default_value_t = 42)]
    pub cluster_id: u32,

    /// Network shard id
    #[arg(long = "shard", default_value_t = 2)]
    pub shard_id: u32,

    /// Static peer multiaddr to bootstrap from
    #[arg(long)]
    pub peer: Option<String>,

    /// Record debug-level library logs
    #[arg(long)]
    pub debug: bool,

    /// Directory for the library log file
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    /// Session configuration forwarded to the engine.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            name: self.name.clone(),
            port: self.port,
            cluster_id: self.cluster_id,
            shard_id: self.shard_id,
            static_peer: self.peer.clone(),
        }
    }
}
