//! Command-line argument structures and enums

use clap::{Parser, Subcommand, ValueEnum};
use datadoc_core::FacetKind;
use datadoc_core::config::ColorChoice;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datadoc")]
#[command(version)]
#[command(about = "Keep a dataset and what is known about it in one reviewable text file", long_about = None)]
pub struct Cli {
    /// Print debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Reject facets whose declared row count differs from their rows
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a conversation file from a CSV file
    Init {
        /// CSV file with a header row
        csv: PathBuf,

        /// Conversation file to create
        output: PathBuf,

        /// Replace the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Print a revision of a conversation file
    Show {
        /// Conversation file
        path: PathBuf,

        /// Revision to print (default: latest)
        #[arg(short, long)]
        revision: Option<usize>,

        /// Print the document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge fields into a row
    #[command(alias = "u")]
    Update {
        /// Conversation file
        path: PathBuf,

        /// Facet name (meaning, structure, ambiguity, intent, context, query, tasks, score)
        facet: FacetKind,

        /// 1-based row index
        index: usize,

        /// JSON object of fields, e.g. '{"definition": "Unique identifier"}'
        patch: String,
    },

    /// Append a row to a facet
    #[command(alias = "i")]
    Insert {
        /// Conversation file
        path: PathBuf,

        /// Facet name
        facet: FacetKind,

        /// JSON object of fields, e.g. '{"key": "owner", "value": "sales"}'
        row: String,
    },

    /// Remove rows from a facet
    #[command(alias = "rm")]
    Delete {
        /// Conversation file
        path: PathBuf,

        /// Facet name
        facet: FacetKind,

        /// 1-based row indices, all resolved before anything is removed
        #[arg(required = true)]
        indices: Vec<usize>,
    },

    /// Record a user question in the query facet
    Ask {
        /// Conversation file
        path: PathBuf,

        /// The question
        message: String,
    },

    /// Show what changed between two revisions
    Diff {
        /// Conversation file
        path: PathBuf,

        /// Older revision (default: the one before --to)
        #[arg(long)]
        from: Option<usize>,

        /// Newer revision (default: latest)
        #[arg(long)]
        to: Option<usize>,

        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,

        /// Colour the markdown output
        #[arg(long, value_enum)]
        color: Option<ColorArg>,
    },

    /// List the revisions and diffs in a conversation file
    #[command(alias = "log")]
    History {
        /// Conversation file
        path: PathBuf,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a configuration value
    Set {
        /// One of: color, diff_format, strict_counts
        key: String,

        /// New value
        value: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}
