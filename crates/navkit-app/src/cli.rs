use std::path::PathBuf;

use clap::{Parser, Subcommand};
use navkit_common::SearchEngine;

/// navkit: drive the WebView navigation model from the command line.
#[derive(Parser, Debug)]
#[command(name = "navkit", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override, as an EnvFilter directive (e.g. `navkit=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Turn address bar input into the URL that would be loaded.
    Resolve {
        input: String,

        /// Search engine for non-URL input (defaults to the configured one).
        #[arg(long)]
        engine: Option<SearchEngine>,
    },

    /// Validate a URL and check it against the configured blocklist.
    Check { url: String },

    /// Run a JSON script of session steps against a headless renderer and
    /// print the resulting state, history and bookmarks.
    Replay {
        script: PathBuf,

        /// Load bookmarks from, and save them back to, this file.
        #[arg(long)]
        bookmarks: Option<PathBuf>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
