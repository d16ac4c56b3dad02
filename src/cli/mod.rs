//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ExportFormat;

/// Cache Config - assemble cache configurations from features and export them.
#[derive(Parser, Debug)]
#[command(name = "cache-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format: json, yaml or xml (anything else = plain text).
    #[arg(short, long)]
    pub format: Option<String>,

    /// Configuration file (defaults to ~/.cache-config/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a draft from features and settings and render it.
    Render {
        /// Start from a draft saved as JSON.
        #[arg(short, long)]
        draft: Option<PathBuf>,

        /// Cache name.
        #[arg(short, long)]
        name: Option<String>,

        /// Template the cache is based on.
        #[arg(long)]
        template: Option<String>,

        /// Cache container.
        #[arg(long)]
        container: Option<String>,

        /// Enable a feature (repeatable).
        #[arg(long = "feature", value_name = "ID")]
        features: Vec<String>,

        /// Disable a feature enabled by the draft file (repeatable).
        #[arg(long = "without", value_name = "ID")]
        without: Vec<String>,

        /// Write a setting, e.g. `indexing.enabled=true` (repeatable).
        #[arg(long = "set", value_name = "PATH=VALUE")]
        settings: Vec<String>,

        /// Output file path (stdout if not specified).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write to the exports directory using the suggested file name.
        #[arg(long, conflicts_with = "output")]
        save: bool,

        /// Print a draft summary before the rendered output.
        #[arg(long)]
        summary: bool,
    },

    /// List the known features.
    Features,

    /// Filter schema names down to user schemas.
    Schemas {
        /// File with one schema name per line (stdin if not specified).
        file: Option<PathBuf>,

        /// Show every name with its classification instead.
        #[arg(short, long)]
        all: bool,
    },

    /// Show the viewer language for an export format.
    Language {
        /// Export format tag.
        format: String,
    },

    /// Write the default configuration file if it does not exist.
    Init,
}

impl Cli {
    /// Output format given on the command line, if any.
    pub fn requested_format(&self) -> Option<ExportFormat> {
        self.format.as_deref().map(ExportFormat::from)
    }
}
