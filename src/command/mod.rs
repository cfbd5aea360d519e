//! Command Module
//!
//! Operations expressed as values, for callers that route requests
//! (an HTTP layer, the CLI) rather than calling engine methods directly.
//!
//! ## Flow
//! ```text
//! request params ──► Command ──► Engine::execute ──► Result<Outcome>
//!                                                        │
//!                                                        ▼
//!                                                    Response
//!                                           (Ok / NotFound / Error + JSON)
//! ```
//!
//! ### Status Mapping
//! - OK:        the operation succeeded (including delete of a missing id)
//! - NOT_FOUND: read/update found no matching record (a normal result)
//! - ERROR:     any `StoreError`, including a missing table

mod command;
mod response;

pub use command::{Command, CommandKind, Outcome};
pub use response::{Response, Status};
