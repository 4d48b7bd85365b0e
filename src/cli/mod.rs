// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chat;
pub mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Agentic assistant: URL extraction service and terminal chat
#[derive(Parser, Debug)]
#[command(name = "agentic-assistant")]
#[command(version = crate::version::VERSION)]
#[command(about = "Chat with a local model and pull web pages into the conversation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service exposing /api/fetch
    Serve(serve::ServeArgs),

    /// Start an interactive chat session
    Chat(chat::ChatArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Chat(args) => chat::run(args).await,
    }
}
