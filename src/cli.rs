use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// A small, hand-editable catalog of the books you own.
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
pub struct Cli {
    /// Configuration file (.toml, .yaml, .yml or .json)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the catalog file
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Catalog file name, relative to the data directory
    #[arg(long = "file", global = true, value_name = "NAME")]
    pub catalog_file: Option<PathBuf>,

    /// Never write to disk
    #[arg(long, global = true)]
    pub read_only: bool,

    /// Log level for messages written to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu (default)
    Menu,
    /// Add a book
    Add {
        title: String,
        author: String,
    },
    /// Remove a book by id
    Remove {
        id: u32,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List every book
    List,
    /// Find books whose title or author contains a keyword (ignoring case)
    Search {
        #[arg(value_parser = non_blank)]
        keyword: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

fn non_blank(value: &str) -> Result<String, String> {
    match value.trim().is_empty() {
        true => Err("keyword must not be blank".to_string()),
        false => Ok(value.to_string()),
    }
}
