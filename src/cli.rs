//! CLI argument parsing for mnemo
//!
//! Uses clap for argument parsing.
//! Supports global flags: --root, --format, --quiet, --verbose, --log-level,
//! --log-json

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use crate::format::OutputFormat;

/// Mnemo - file-backed knowledge archive for AI coding agents
#[derive(Parser, Debug)]
#[command(name = "mnemo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing (or to contain) the .mnemo data directory
    #[arg(long, global = true, env = "MNEMO_ROOT")]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Verbose output and debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (e.g. debug, mnemo=trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a .mnemo data directory
    Init,

    /// Add an entry to the archive
    Add {
        /// Project namespace (e.g. frontend, backend, shared)
        #[arg(long, short)]
        project: String,

        /// Section category (e.g. errors, fixes, setup)
        #[arg(long, short)]
        section: String,

        /// Entry title
        #[arg(long, short)]
        title: String,

        /// Entry content (reads stdin when neither --content nor --file is given)
        #[arg(long, short)]
        content: Option<String>,

        /// Read entry content from a file
        #[arg(long, short, conflicts_with = "content")]
        file: Option<PathBuf>,
    },

    /// Search the archive
    Search {
        /// Search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Restrict the search to one project
        #[arg(long, short)]
        project: Option<String>,

        /// Maximum number of results
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Manage custom rules
    Rule {
        #[command(subcommand)]
        command: RuleCommands,
    },

    /// Generate the merged instruction file
    Generate {
        /// Base instruction document (defaults to the built-in template)
        #[arg(long, short)]
        base: Option<PathBuf>,

        /// Output path (prints to stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List projects
    Projects,

    /// List sections of a project
    Sections {
        /// Project name
        #[arg(long, short)]
        project: String,
    },

    /// Run the REST server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 5001)]
        port: u16,
    },
}

#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    /// Add or replace a custom rule
    Add {
        /// Rule name
        #[arg(long, short)]
        name: String,

        /// Rule content (reads stdin when neither --content nor --file is given)
        #[arg(long, short)]
        content: Option<String>,

        /// Read rule content from a file
        #[arg(long, short, conflicts_with = "content")]
        file: Option<PathBuf>,
    },

    /// List custom rules
    List,
}

// Implement ValueEnum for OutputFormat to work with clap
impl ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[OutputFormat::Human, OutputFormat::Json, OutputFormat::Text]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            OutputFormat::Human => Some(clap::builder::PossibleValue::new("human")),
            OutputFormat::Json => Some(clap::builder::PossibleValue::new("json")),
            OutputFormat::Text => Some(clap::builder::PossibleValue::new("text")),
        }
    }
}
