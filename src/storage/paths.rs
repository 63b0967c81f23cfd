use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".personal-library-manager";
/// Library file name stored inside the application data directory.
const LIBRARY_FILE_NAME: &str = "library.json";
/// Log file name, written next to the library file.
const LOG_FILE_NAME: &str = "library.log";

/// Resolve the absolute path to the library file inside the user's home.
pub fn default_library_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(LIBRARY_FILE_NAME))
}

/// Log file that sits beside `library_path`.
pub fn default_log_path(library_path: &Path) -> PathBuf {
    match library_path.parent() {
        Some(parent) => parent.join(LOG_FILE_NAME),
        None => PathBuf::from(LOG_FILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sits_next_to_library() {
        let log = default_log_path(Path::new("/tmp/books/library.json"));
        assert_eq!(log, PathBuf::from("/tmp/books/library.log"));
    }

    #[test]
    fn bare_file_name_logs_to_working_directory() {
        // `Path::parent` of a bare file name is the empty path.
        let log = default_log_path(Path::new("library.json"));
        assert_eq!(log, PathBuf::from("library.log"));
    }
}
