//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notepress")]
#[command(about = "Publish tagged notes from a markdown vault into a static-site content tree", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: $NOTEPRESS_CONFIG or ./notepress.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish eligible notes and remove stale output
    Publish {
        /// Report what would change without writing or deleting anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List which notes are eligible and why the others are skipped
    Discover,

    /// Write a starter configuration file
    Init {
        /// Directory to write notepress.toml into (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}
