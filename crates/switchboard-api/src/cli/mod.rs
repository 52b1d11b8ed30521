//! CLI command definitions for the `swbd` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod message;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// User id the terminal commands talk as unless `--user` is given.
pub const DEFAULT_CLI_USER: &str = "local";

/// Route chat messages to news, music, reminder and Q&A handlers.
#[derive(Parser)]
#[command(name = "swbd", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "SWITCHBOARD_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server for chat platform adapters.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Interactive chat in the terminal.
    Chat {
        /// Conversation owner.
        #[arg(short, long, default_value = DEFAULT_CLI_USER)]
        user: String,
    },

    /// Send one message and print the reply.
    Send {
        /// Message text.
        text: String,

        #[arg(short, long, default_value = DEFAULT_CLI_USER)]
        user: String,
    },

    /// Show a user's recent conversation history.
    History {
        #[arg(short, long, default_value = DEFAULT_CLI_USER)]
        user: String,

        /// How many records to show.
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Delete a user's conversation history.
    Forget {
        #[arg(short, long, default_value = DEFAULT_CLI_USER)]
        user: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// A cyan "thinking" spinner on stderr.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
