//! Main entry point for the HabitFlow MCP server
//!
//! This file sets up logging, parses command line arguments, and starts the MCP server.
//! The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use habitflow_mcp::HabitFlowServer;

/// Pick a writable data directory, falling back to the temp directory
fn get_default_data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_dirs = [
        dirs::home_dir().map(|p| p.join(".habitflow")),
        dirs::data_dir().map(|p| p.join("habitflow")),
        dirs::config_dir().map(|p| p.join("habitflow")),
        std::env::current_dir().ok().map(|p| p.join(".habitflow")),
    ];

    for dir in potential_dirs.iter().flatten() {
        if is_writable(dir) {
            return Ok(dir.clone());
        }
    }

    let temp_dir = std::env::temp_dir().join("habitflow");
    std::fs::create_dir_all(&temp_dir)?;
    warn!("Using temporary directory for data: {}", temp_dir.display());
    Ok(temp_dir)
}

fn is_writable(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write_probe");
    let writable = std::fs::write(&probe, "probe").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}

/// Log filter for the CLI flags
///
/// Audit lines stay visible at the default level, since the audit setting
/// is on unless the user turns it off.
fn log_filter(debug: bool, verbose: bool) -> String {
    let log_level = if verbose {
        "debug"
    } else if debug {
        "info"
    } else {
        "warn"
    };
    format!("habitflow_mcp={},habitflow_mcp::audit=info", log_level)
}

/// Command line arguments for the HabitFlow MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Directory CSV exports are written to (defaults to the database directory)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.debug, args.verbose))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting HabitFlow MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
        None => get_default_data_dir()?.join("habitflow.db"),
    };

    let export_dir = match args.export_dir {
        Some(dir) => dir,
        None => db_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    info!("Using database at: {}", db_path.display());
    info!("Exports go to: {}", export_dir.display());

    let server = HabitFlowServer::new(db_path, export_dir).await?;
    server.run().await?;

    info!("HabitFlow MCP server shutdown complete");
    Ok(())
}
