//! # jsonstore
//!
//! A minimal persistent document store built directly on the filesystem:
//! - A database is a directory
//! - A table is one file holding a JSON array of records
//! - A record is a JSON object identified by its `id` field
//!
//! Every operation is a whole-table read-modify-write cycle, serialized per
//! table and committed with an atomic temp-file rename.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Caller (HTTP routes, CLI, library)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Command / create · read · update · delete
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                                │
//! │              (one guarded cycle per call)                    │
//! └──────┬───────────────────┬───────────────────┬──────────────┘
//!        │                   │                   │
//!        ▼                   ▼                   ▼
//!   ┌──────────┐      ┌─────────────┐     ┌─────────────┐
//!   │  Guard   │      │    Codec    │     │  TableFile  │
//!   │(per-table│      │(JSON array ⇄│     │(read, temp +│
//!   │  Mutex)  │      │  records)   │     │   rename)   │
//!   └──────────┘      └─────────────┘     └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use jsonstore::{Config, Engine};
//! use serde_json::json;
//!
//! # fn main() -> jsonstore::Result<()> {
//! let engine = Engine::open(Config::builder().data_dir("./data").build())?;
//! std::fs::create_dir_all("./data/shop")?;
//!
//! let record = json!({ "id": 1, "name": "a" });
//! engine.create_record("shop", "product.json", record.as_object().cloned().unwrap_or_default())?;
//!
//! let found = engine.read_record("shop", "product.json", "1")?;
//! assert!(found.is_some());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod table;
pub mod guard;
pub mod command;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, DecodeMode, WriteMode};
pub use codec::{Record, RecordCodec, RecordId};
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsonstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
