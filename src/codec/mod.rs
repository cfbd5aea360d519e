//! Codec Module
//!
//! Converts between the raw bytes of a table file and the in-memory record
//! sequence the engine mutates.
//!
//! ## Responsibilities
//! - Normalize any stored content (empty, bare object, array) into a sequence
//! - Surface or discard malformed content depending on `DecodeMode`
//! - Write the sequence back as a pretty-printed JSON array
//! - Record-level helpers: id lookup, loose id equality, shallow merge
//!
//! ## File Format
//! ```text
//! [
//!   {
//!     "id": 1,
//!     "name": "a"
//!   },
//!   {
//!     "id": "b7c1",
//!     "stock": 4
//!   }
//! ]
//! ```
//! UTF-8, 2-space indentation by default, newline-terminated. No header,
//! version marker or checksum: any JSON array is a valid table.

mod json;
mod record;

pub use json::RecordCodec;
pub use record::{loose_eq, merge_patch, record_id, Record, RecordId, ID_FIELD};
