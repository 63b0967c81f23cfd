//! Error types for the catalog and its storage file.

use std::path::PathBuf;

use thiserror::Error;

/// Problems with user-entered book data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the {field} field is required")]
    MissingField { field: &'static str },

    /// The year was not an integer; callers substitute the default year.
    #[error("'{input}' is not a valid year")]
    InvalidYear { input: String },
}

/// Failures reading or writing the library file.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("library file {path} does not exist")]
    Missing { path: PathBuf },

    #[error("library file {path} is not a valid book list")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read library file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write library file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize library")]
    Serialize(#[source] serde_json::Error),
}

impl StorageError {
    /// A missing file is the normal first-run state rather than a fault.
    pub fn is_missing(&self) -> bool {
        matches!(self, StorageError::Missing { .. })
    }
}
