//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lamp-store")]
#[command(about = "Build the bundled reading database from JSON resources", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Path overrides shared by commands that touch the working store.
#[derive(Args, Clone, Default)]
pub(crate) struct PathArgs {
    /// Directory containing books.json, genres.json, plans.json, ...
    #[arg(short, long)]
    pub source_dir: Option<PathBuf>,

    /// Working database file (deleted and recreated on every build)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Directory the finished database is copied into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File name of the finished database
    #[arg(long)]
    pub file_name: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Reset the working store, import all resources, and export the bundle
    Build {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Delete the working store and its side-files
    Reset {
        /// Working database file
        #[arg(long)]
        store: Option<PathBuf>,

        /// Confirm deletion (required)
        #[arg(long)]
        confirm: bool,
    },

    /// Show row counts for an existing database
    Stats {
        /// Database file to inspect (defaults to the exported bundle)
        path: Option<PathBuf>,
    },

    /// Show resolved paths and the settings file location
    Config {
        #[command(flatten)]
        paths: PathArgs,
    },
}
