//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "todo-mcp")]
#[command(about = "Session-scoped todo lists served over MCP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (defaults to .todo-mcp/config.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON persistence file; overrides `storage.file` from config
    #[arg(short, long, global = true)]
    pub storage_file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

impl Cli {
    pub fn subcommand(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the MCP server on stdin/stdout
    Serve,

    /// List stored sessions
    Sessions,

    /// Show the todos of one session
    Show(ShowArgs),

    /// Show the most recent session with unfinished work
    Continue,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ShowArgs {
    /// Session identifier
    pub session_id: String,

    /// Only show todos with this status
    #[arg(long)]
    pub status: Option<String>,

    /// Only show todos with this priority
    #[arg(long)]
    pub priority: Option<String>,

    /// Include status and priority counts
    #[arg(long)]
    pub stats: bool,

    /// Omit the evaluation scorecard
    #[arg(long)]
    pub no_scorecard: bool,
}
