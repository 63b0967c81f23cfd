use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::StorageError;

/// Handle to the JSON file that holds the whole catalog. The file is always
/// read and written as a unit.
#[derive(Debug, Clone)]
pub struct LibraryFile {
    path: PathBuf,
}

/// Start-up result: the catalog to work with plus the problem, if any, that
/// forced an empty one.
#[derive(Debug)]
pub struct LoadOutcome {
    pub catalog: Catalog,
    pub warning: Option<StorageError>,
}

impl LibraryFile {
    /// The file does not have to exist yet; it is created on the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the library file, shown in status messages.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the full catalog.
    pub fn load(&self) -> Result<Catalog, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StorageError::Missing {
                    path: self.path.clone(),
                })
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|source| StorageError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path.display(), books = catalog.len(), "loaded library");
        Ok(catalog)
    }

    /// Load the catalog, degrading to an empty one on any failure. The
    /// failure is returned alongside so the caller can report it.
    pub fn load_or_empty(&self) -> LoadOutcome {
        match self.load() {
            Ok(catalog) => LoadOutcome {
                catalog,
                warning: None,
            },
            Err(err) => {
                if err.is_missing() {
                    info!(path = %self.path.display(), "no library file yet");
                } else {
                    warn!(error = %err, "starting with an empty library");
                }
                LoadOutcome {
                    catalog: Catalog::new(),
                    warning: Some(err),
                }
            }
        }
    }

    /// Replace the file contents with `catalog`. The data goes to a temporary
    /// file in the same directory first and is renamed over the target, so a
    /// failed save leaves the previous contents untouched.
    pub fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        self.save_with(catalog, |_| Ok(()))
    }

    /// `save` with a hook that runs once the temporary file is fully written,
    /// right before it replaces the target.
    fn save_with<F>(&self, catalog: &Catalog, before_persist: F) -> Result<(), StorageError>
    where
        F: FnOnce(&NamedTempFile) -> std::io::Result<()>,
    {
        let json = serde_json::to_string_pretty(catalog).map_err(StorageError::Serialize)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| self.write_error(source))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|source| self.write_error(source))?;
        temp.write_all(json.as_bytes())
            .map_err(|source| self.write_error(source))?;
        temp.as_file()
            .sync_all()
            .map_err(|source| self.write_error(source))?;
        before_persist(&temp).map_err(|source| self.write_error(source))?;
        temp.persist(&self.path)
            .map_err(|err| self.write_error(err.error))?;

        info!(path = %self.path.display(), books = catalog.len(), "saved library");
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        warn!(path = %self.path.display(), error = %source, "library save failed");
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
