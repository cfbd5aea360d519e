//! Command definitions
//!
//! Represents one CRUD request against a table.

use serde_json::Value;

use crate::codec::{Record, RecordId};
use crate::table::TableRef;

/// Command kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Create,
    Read,
    Update,
    Delete,
    Scan,
}

/// A parsed command
#[derive(Debug, Clone)]
pub enum Command {
    /// Append a record
    Create { table: TableRef, record: Record },

    /// Read the first record with a matching id
    Read { table: TableRef, id: RecordId },

    /// Shallow-merge `patch` into the first record with a matching id
    Update {
        table: TableRef,
        id: RecordId,
        patch: Record,
    },

    /// Remove every record with a matching id
    Delete { table: TableRef, id: RecordId },

    /// Read the whole table
    Scan { table: TableRef },
}

impl Command {
    /// Get the command kind
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Create { .. } => CommandKind::Create,
            Command::Read { .. } => CommandKind::Read,
            Command::Update { .. } => CommandKind::Update,
            Command::Delete { .. } => CommandKind::Delete,
            Command::Scan { .. } => CommandKind::Scan,
        }
    }

    /// The table this command targets
    pub fn table(&self) -> &TableRef {
        match self {
            Command::Create { table, .. }
            | Command::Read { table, .. }
            | Command::Update { table, .. }
            | Command::Delete { table, .. }
            | Command::Scan { table } => table,
        }
    }
}

/// Successful result of a command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Record appended
    Created,

    /// Lookup result; `None` when no record matched
    Record(Option<Record>),

    /// Whether a record matched and was updated
    Updated(bool),

    /// Delete completed (whether or not anything matched)
    Deleted,

    /// Every element of the table, in file order
    Records(Vec<Value>),
}
