//! Core library surface for the personal library manager.
//!
//! The catalog and its storage file are usable without the terminal UI, so
//! the `bin` target and the tests drive the same pieces.
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod ui;

/// In-memory collection and its query types.
pub use catalog::{Catalog, RemoveOutcome, SearchField, Stats};

pub use config::{Cli, Config};
pub use error::{StorageError, ValidationError};
pub use logging::init_logging;
pub use models::{parse_year, Book, DEFAULT_YEAR};

/// Persistence handle used by `main.rs` to load the library at start-up.
pub use storage::{LibraryFile, LoadOutcome};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
