//! Persistence module split across logical submodules.

mod file;
mod paths;

pub use file::{LibraryFile, LoadOutcome};
pub use paths::{default_library_path, default_log_path};
