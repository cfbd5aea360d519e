//! Engine Module
//!
//! The record-level CRUD engine that coordinates all components.
//!
//! ## Responsibilities
//! - Resolve (database, table) names to table files
//! - Run every operation as one guarded read-modify-write cycle
//! - Map write failures to `StoreError::Persistence`
//!
//! ## Cycle
//! ```text
//! lock(table) → read bytes → decode → mutate → encode → write → unlock
//! ```
//! No table state outlives a call: every operation reloads the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::codec::{merge_patch, Record, RecordCodec, RecordId};
use crate::command::{Command, Outcome};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::guard::TableLocks;
use crate::table::{TableFile, TableRef};

/// The main storage engine
///
/// ## Concurrency Model: one cycle per table
///
/// - Every operation (reads included) takes the table's lock in `locks`
///   before touching the file and keeps it until the write is done.
/// - Locks live in the process-wide table, keyed by the canonical table
///   path, so engines opened on the same directory exclude each other.
/// - Operations on different tables run in parallel.
/// - `Engine` is `Send + Sync`; share it with `Arc<Engine>`.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Table content codec (decode mode, indentation)
    codec: RecordCodec,

    /// Table file reader/writer (write mode, fsync)
    files: TableFile,

    /// Per-table exclusive locks
    locks: TableLocks,

    /// Canonical form of `config.data_dir`; lock keys are built from it
    lock_root: PathBuf,
}

impl Engine {
    /// Open an engine rooted at `config.data_dir`
    ///
    /// Creates the data directory if it does not exist. Databases inside it
    /// are managed by the caller.
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        let lock_root = config.data_dir.canonicalize()?;

        tracing::info!(
            data_dir = %config.data_dir.display(),
            decode_mode = ?config.decode_mode,
            write_mode = ?config.write_mode,
            "engine opened"
        );

        Ok(Self {
            codec: RecordCodec::from_config(&config),
            files: TableFile::from_config(&config),
            locks: TableLocks::shared(config.lock_timeout()),
            lock_root,
            config,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Execute a command
    ///
    /// Routes commands to the matching operation
    pub fn execute(&self, command: Command) -> Result<Outcome> {
        match command {
            Command::Create { table, record } => {
                self.create_in(&table, record)?;
                Ok(Outcome::Created)
            }
            Command::Read { table, id } => self.read_in(&table, &id).map(Outcome::Record),
            Command::Update { table, id, patch } => {
                self.update_in(&table, &id, patch).map(Outcome::Updated)
            }
            Command::Delete { table, id } => {
                self.delete_in(&table, &id)?;
                Ok(Outcome::Deleted)
            }
            Command::Scan { table } => self.scan_in(&table).map(Outcome::Records),
        }
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Append `record` to the table, creating the table file if needed
    ///
    /// Ids are not checked for collisions. The database directory must
    /// already exist.
    pub fn create_record(&self, database: &str, table: &str, record: Record) -> Result<()> {
        self.create_in(&TableRef::new(database, table)?, record)
    }

    /// Read the first record whose id loosely equals `id`
    ///
    /// Returns `Ok(None)` when no record matches.
    pub fn read_record(
        &self,
        database: &str,
        table: &str,
        id: impl Into<RecordId>,
    ) -> Result<Option<Record>> {
        self.read_in(&TableRef::new(database, table)?, &id.into())
    }

    /// Shallow-merge `patch` into the first record matching `id`
    ///
    /// Returns `Ok(false)` without writing when no record matches.
    pub fn update_record(
        &self,
        database: &str,
        table: &str,
        id: impl Into<RecordId>,
        patch: Record,
    ) -> Result<bool> {
        self.update_in(&TableRef::new(database, table)?, &id.into(), patch)
    }

    /// Remove every record matching `id`
    ///
    /// Always returns `Ok(true)`: deleting a missing id is a no-op success.
    pub fn delete_record(&self, database: &str, table: &str, id: impl Into<RecordId>) -> Result<bool> {
        self.delete_in(&TableRef::new(database, table)?, &id.into())?;
        Ok(true)
    }

    /// Read every element of the table in file order
    pub fn read_table(&self, database: &str, table: &str) -> Result<Vec<Value>> {
        self.scan_in(&TableRef::new(database, table)?)
    }

    // =========================================================================
    // Cycles
    // =========================================================================

    fn create_in(&self, table: &TableRef, record: Record) -> Result<()> {
        let path = table.path(&self.config.data_dir);

        self.locks.with_lock(&self.lock_key(table), || {
            let mut records = match self.files.read(&path) {
                Ok(raw) => self.codec.decode(&raw)?,
                Err(StoreError::NotFound(_)) => {
                    let database_dir = table.database_dir(&self.config.data_dir);
                    if !database_dir.is_dir() {
                        return Err(StoreError::NotFound(database_dir));
                    }
                    tracing::debug!(%table, "creating table file");
                    Vec::new()
                }
                Err(e) => return Err(e),
            };

            records.push(Value::Object(record));
            self.store(&path, &records)?;

            tracing::debug!(%table, count = records.len(), "record created");
            Ok(())
        })
    }

    fn read_in(&self, table: &TableRef, id: &RecordId) -> Result<Option<Record>> {
        let path = table.path(&self.config.data_dir);

        let found = self.locks.with_lock(&self.lock_key(table), || {
            let records = self.load(&path)?;
            Ok(records.into_iter().find(|r| id.matches(r)))
        })?;

        tracing::debug!(%table, %id, found = found.is_some(), "record read");
        Ok(found.and_then(|record| match record {
            Value::Object(fields) => Some(fields),
            _ => None,
        }))
    }

    fn update_in(&self, table: &TableRef, id: &RecordId, patch: Record) -> Result<bool> {
        let path = table.path(&self.config.data_dir);

        self.locks.with_lock(&self.lock_key(table), || {
            let mut records = self.load(&path)?;

            let matched = match records
                .iter_mut()
                .find(|r| id.matches(r))
                .and_then(Value::as_object_mut)
            {
                Some(existing) => {
                    merge_patch(existing, patch);
                    true
                }
                None => false,
            };

            if !matched {
                tracing::debug!(%table, %id, "update matched no record");
                return Ok(false);
            }

            self.store(&path, &records)?;
            tracing::debug!(%table, %id, "record updated");
            Ok(true)
        })
    }

    fn delete_in(&self, table: &TableRef, id: &RecordId) -> Result<()> {
        let path = table.path(&self.config.data_dir);

        self.locks.with_lock(&self.lock_key(table), || {
            let mut records = self.load(&path)?;
            let before = records.len();

            records.retain(|r| !id.matches(r));
            self.store(&path, &records)?;

            tracing::debug!(%table, %id, removed = before - records.len(), "records deleted");
            Ok(())
        })
    }

    fn scan_in(&self, table: &TableRef) -> Result<Vec<Value>> {
        let path = table.path(&self.config.data_dir);
        self.locks.with_lock(&self.lock_key(table), || self.load(&path))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Lock registry key: the table path under the canonical data directory
    fn lock_key(&self, table: &TableRef) -> PathBuf {
        table.path(&self.lock_root)
    }

    /// Read and decode a table (called with the table lock held)
    fn load(&self, path: &Path) -> Result<Vec<Value>> {
        let raw = self.files.read(path)?;
        self.codec.decode(&raw)
    }

    /// Encode and write a table (called with the table lock held)
    fn store(&self, path: &Path, records: &[Value]) -> Result<()> {
        let bytes = self.codec.encode(records)?;

        self.files.write(path, &bytes).map_err(|e| match e {
            StoreError::Io(source) => {
                tracing::warn!(path = %path.display(), error = %source, "table write failed");
                StoreError::Persistence {
                    path: path.to_path_buf(),
                    source,
                }
            }
            other => other,
        })
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of tables under this data directory with a live lock entry
    pub fn active_locks(&self) -> usize {
        self.locks.active_under(&self.lock_root)
    }
}
