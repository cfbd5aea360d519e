//! Configuration for jsonstore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a jsonstore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory holding every database
    /// Internal structure:
    ///   {data_dir}/
    ///     └── {database}/      (one directory per database)
    ///           └── {table}    (one JSON array file per table)
    pub data_dir: PathBuf,

    /// How table files are replaced on every mutation
    pub write_mode: WriteMode,

    /// fsync the new table content before it becomes visible
    pub sync_writes: bool,

    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Indentation width (spaces) of the pretty-printed table file
    pub indent_width: usize,

    /// What to do with table content that is not valid JSON
    pub decode_mode: DecodeMode,

    // -------------------------------------------------------------------------
    // Concurrency Configuration
    // -------------------------------------------------------------------------
    /// Max wait for a table lock (milliseconds); `None` waits forever
    pub lock_timeout_ms: Option<u64>,
}

/// Handling of malformed table content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Fail the operation with `StoreError::Decode`
    Strict,

    /// Treat the table as empty (legacy behaviour, masks corruption)
    Lenient,
}

/// Table file replacement strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Write a temp file in the same directory, then rename over the table
    Atomic,

    /// Truncate and rewrite the table file in place (legacy, not crash safe)
    InPlace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./jsonstore_data"),
            write_mode: WriteMode::Atomic,
            sync_writes: true,
            indent_width: 2,
            decode_mode: DecodeMode::Strict,
            lock_timeout_ms: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Lock acquisition deadline as a Duration
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_ms.map(Duration::from_millis)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all databases)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the write mode
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.config.write_mode = mode;
        self
    }

    /// Enable or disable fsync on every table write
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    /// Set the indentation width of encoded tables
    pub fn indent_width(mut self, width: usize) -> Self {
        self.config.indent_width = width;
        self
    }

    /// Set the decode mode
    pub fn decode_mode(mut self, mode: DecodeMode) -> Self {
        self.config.decode_mode = mode;
        self
    }

    /// Set the lock timeout (in milliseconds)
    pub fn lock_timeout_ms(mut self, ms: u64) -> Self {
        self.config.lock_timeout_ms = Some(ms);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
