//! Response definitions
//!
//! Maps command results to a status plus JSON body for the caller.

use serde_json::{json, Value};

use crate::error::Result;

use super::Outcome;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
    Error,
}

/// A response to hand back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// JSON body (record, flag, table contents or error message)
    pub body: Value,
}

impl Response {
    /// Create an OK response
    pub fn ok(body: Value) -> Self {
        Self {
            status: Status::Ok,
            body,
        }
    }

    /// Create a NOT_FOUND response
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            body: Value::Null,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            body: json!({ "error": message }),
        }
    }

    /// Convert the result of `Engine::execute`
    pub fn from_result(result: Result<Outcome>) -> Self {
        match result {
            Ok(Outcome::Created) => Self::ok(json!({
                "success": true,
                "message": "Record added successfully",
            })),
            Ok(Outcome::Record(Some(record))) => Self::ok(Value::Object(record)),
            Ok(Outcome::Record(None)) => Self::not_found(),
            Ok(Outcome::Updated(true)) => Self::ok(Value::Bool(true)),
            Ok(Outcome::Updated(false)) => Self::not_found(),
            Ok(Outcome::Deleted) => Self::ok(Value::Bool(true)),
            Ok(Outcome::Records(records)) => Self::ok(Value::Array(records)),
            Err(e) => Self::error(&e.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
