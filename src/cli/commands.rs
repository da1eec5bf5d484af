use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pnwer-ai", version, about = "PNWER AI chat service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Chat in the terminal (/attach <path>, /detach, /new, /sessions, /exit)
    Chat,

    /// Manage files held by the document backend
    Files {
        #[command(subcommand)]
        action: FileAction,
    },

    /// List files recorded by the local upload relay
    Uploads,
}

#[derive(Subcommand)]
pub enum FileAction {
    /// List backend files
    List,

    /// Delete a backend file
    Delete {
        filename: String,
    },

    /// Upload a PDF for indexing
    Upload {
        path: PathBuf,
    },
}
