//! SevaSphere control - CLI client for the sevad daemon.
//!
//! Sends chat messages and reviews the unanswered-question queue over
//! the daemon's localhost HTTP API.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sevactl")]
#[command(about = "SevaSphere chatbot - operator CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Daemon address
    #[arg(long, default_value = "127.0.0.1:7810")]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message to the chatbot and print the answer
    Ask {
        /// The question or message
        message: String,
    },

    /// Review the unanswered-question curation queue
    Unanswered {
        #[command(subcommand)]
        command: UnansweredCommands,
    },

    /// Check daemon health
    Health,
}

#[derive(Subcommand)]
enum UnansweredCommands {
    /// List logged unanswered conversations, newest first
    List,

    /// Delete a reviewed entry by id
    Clear {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { message } => commands::ask(&cli.addr, &message).await,
        Commands::Unanswered { command } => match command {
            UnansweredCommands::List => commands::unanswered_list(&cli.addr).await,
            UnansweredCommands::Clear { id } => commands::unanswered_clear(&cli.addr, id).await,
        },
        Commands::Health => commands::health(&cli.addr).await,
    }
}
