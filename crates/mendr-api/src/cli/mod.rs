//! CLI command definitions and dispatch for the `mendr` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod feedback;
pub mod history;
pub mod memory;

use clap::{Parser, Subcommand};

/// Self-healing question answering service.
#[derive(Parser)]
#[command(name = "mendr", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Ask a single question.
    Ask {
        /// The question to answer.
        query: String,
    },

    /// Record feedback on an earlier answer.
    Feedback {
        /// The original question.
        query: String,

        /// The answer that was given.
        response: String,

        /// `thumbs_up` or `thumbs_down`.
        feedback: String,

        /// Better answer to remember (only used with thumbs_up).
        #[arg(long)]
        correction: Option<String>,
    },

    /// Inspect the memory store.
    Memory {
        #[command(subcommand)]
        action: MemoryCommand,
    },

    /// Show recent interactions from the log.
    History {
        /// Number of entries to show.
        #[arg(long, short, default_value_t = 20)]
        limit: i64,

        /// List recorded feedback instead of interactions.
        #[arg(long)]
        feedback: bool,
    },
}

#[derive(Subcommand)]
pub enum MemoryCommand {
    /// List every memory with its id.
    #[command(alias = "ls")]
    List,
}
