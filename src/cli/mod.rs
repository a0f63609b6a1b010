//! CLI for the page builder API

pub mod serve;

use clap::{Parser, Subcommand};

/// Page Builder API - bulk page creation over REST with key auth,
/// rate limiting and signed webhooks
#[derive(Parser)]
#[command(name = "pagebuilder-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
