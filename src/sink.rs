//! Persisting encoded frames.
//!
//! [`FrameSink`] is the seam between the splitter and storage. [`FileSink`]
//! writes each buffer to a temporary file next to its destination and renames
//! it into place, so a failed write never leaves a truncated frame behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::FilmstripError;

/// Destination for encoded frame bytes.
///
/// Implementations must be [`Sync`] so frames can be persisted from worker
/// threads when the `rayon` feature is enabled.
pub trait FrameSink: Sync {
    /// Make sure `dir` exists, creating ancestors as needed.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::Persist`] if the directory cannot be created.
    fn ensure_dir(&self, dir: &Path) -> Result<(), FilmstripError>;

    /// Write `bytes` as the complete content of `path`, replacing any
    /// previous content.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::Persist`] on any I/O failure.
    fn persist(&self, path: &Path, bytes: &[u8]) -> Result<(), FilmstripError>;
}

/// Filesystem sink with write-then-rename semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

impl FrameSink for FileSink {
    fn ensure_dir(&self, dir: &Path) -> Result<(), FilmstripError> {
        fs::create_dir_all(dir).map_err(|error| FilmstripError::persist(dir, error))
    }

    fn persist(&self, path: &Path, bytes: &[u8]) -> Result<(), FilmstripError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self.ensure_dir(parent)?;

        let mut temporary =
            NamedTempFile::new_in(parent).map_err(|error| FilmstripError::persist(path, error))?;
        temporary
            .write_all(bytes)
            .and_then(|()| temporary.flush())
            .map_err(|error| FilmstripError::persist(path, error))?;
        temporary
            .persist(path)
            .map_err(|error| FilmstripError::persist(path, error.error))?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
