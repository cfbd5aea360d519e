//! Table Module
//!
//! Naming and file access for tables.
//!
//! ## Layout
//! ```text
//! {data_dir}/
//!   ├── shop/                 (database = directory)
//!   │     ├── product.json    (table = one JSON array file)
//!   │     └── order.json
//!   └── vivek/
//!         └── student.json
//! ```
//!
//! Databases and tables are created, renamed and removed by whoever owns
//! the directory tree; this module only resolves names to paths and
//! reads/writes table content.

mod file;

pub use file::TableFile;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// A validated (database, table) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    database: String,
    table: String,
}

impl TableRef {
    /// Validate both names as single path segments
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Result<Self> {
        let database = database.into();
        let table = table.into();

        validate_segment("database", &database)?;
        validate_segment("table", &table)?;

        Ok(Self { database, table })
    }

    /// Database (directory) name
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Table (file) name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Directory of the owning database under `data_dir`
    pub fn database_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database)
    }

    /// Path of the backing file under `data_dir`
    pub fn path(&self, data_dir: &Path) -> PathBuf {
        self.database_dir(data_dir).join(&self.table)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.table)
    }
}

/// Reject anything that is not exactly one path component
fn validate_segment(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidName(format!("{} name is empty", kind)));
    }

    if name == "." || name == ".." {
        return Err(StoreError::InvalidName(format!(
            "{} name '{}' is reserved",
            kind, name
        )));
    }

    if let Some(bad) = name.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(StoreError::InvalidName(format!(
            "{} name '{}' contains {:?}",
            kind, name, bad
        )));
    }

    Ok(())
}
