//! Command-line configuration. Every flag has an environment fallback so the
//! library location can be pinned without retyping it.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::storage::{default_library_path, default_log_path};

/// Terminal catalog for a personal book collection.
#[derive(Parser, Debug)]
#[command(name = "library", version)]
pub struct Cli {
    /// JSON file holding the library.
    #[arg(long = "file", env = "LIBRARY_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Where log output is written. Defaults to `library.log` beside the
    /// library file.
    #[arg(long = "log-file", env = "LIBRARY_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Minimum level written to the log file. `RUST_LOG` takes precedence.
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

/// Log verbosity accepted by `--log-level`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub library_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: LogLevel,
}

impl Config {
    /// Fill in defaults for anything the command line left out.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let library_path = match cli.file {
            Some(path) => path,
            None => default_library_path()?,
        };
        let log_path = cli
            .log_file
            .unwrap_or_else(|| default_log_path(&library_path));

        Ok(Self {
            library_path,
            log_path,
            log_level: cli.log_level,
        })
    }
}
