//! Table File
//!
//! Reads and replaces the raw content of one table file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::{Config, WriteMode};
use crate::error::{Result, StoreError};

/// Raw byte access to table files
///
/// Holds no handle between calls: every read opens the file, every write
/// replaces it.
#[derive(Debug, Clone)]
pub struct TableFile {
    /// Atomic (temp + rename) or in-place replacement
    write_mode: WriteMode,

    /// fsync data before the write is reported successful
    sync: bool,
}

impl TableFile {
    /// Name prefix of the temporary files used by atomic writes
    pub const TEMP_PREFIX: &'static str = ".jsonstore-";

    /// Name suffix of the temporary files used by atomic writes
    pub const TEMP_SUFFIX: &'static str = ".tmp";

    pub fn new(write_mode: WriteMode, sync: bool) -> Self {
        Self { write_mode, sync }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.write_mode, config.sync_writes)
    }

    /// Read the whole table file
    ///
    /// Returns `StoreError::NotFound` if the file does not exist.
    pub fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(path.to_path_buf())
            } else {
                StoreError::Io(e)
            }
        })
    }

    /// Create or replace the table file with `bytes`
    pub fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        match self.write_mode {
            WriteMode::Atomic => self.write_atomic(path, bytes),
            WriteMode::InPlace => self.write_in_place(path, bytes),
        }
    }

    /// Whether the table file exists
    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Write a fresh temp file, fsync, rename over the target. The old file
    /// survives any failure and the temp file is removed on drop.
    ///
    /// Temp names are random and created exclusively, so they never reuse an
    /// existing file (another table included) and concurrent writers never
    /// share one.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut temp = tempfile::Builder::new()
            .prefix(Self::TEMP_PREFIX)
            .suffix(Self::TEMP_SUFFIX)
            .tempfile_in(dir)?;

        temp.write_all(bytes)?;
        if self.sync {
            temp.as_file().sync_all()?;
        }

        persist(temp, path)?;

        if self.sync {
            sync_dir(dir)?;
        }

        Ok(())
    }

    fn write_in_place(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.write_file(path, bytes)?;
        Ok(())
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        file.write_all(bytes)?;

        if self.sync {
            file.sync_all()?;
        }

        Ok(())
    }
}

/// Rename the temp file over `path`; on failure the temp file is deleted
fn persist(temp: NamedTempFile, path: &Path) -> std::io::Result<()> {
    temp.persist(path).map(|_| ()).map_err(|e| e.error)
}

/// Make the rename itself durable
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
