//! JSON record codec
//!
//! Decodes table bytes into a record sequence and encodes it back.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::config::{Config, DecodeMode};
use crate::error::{Result, StoreError};

/// Encodes and decodes whole tables
#[derive(Debug, Clone)]
pub struct RecordCodec {
    /// Strict (surface malformed content) or lenient (discard it)
    mode: DecodeMode,

    /// Indentation unit used by the pretty printer
    indent: Vec<u8>,
}

impl RecordCodec {
    /// Create a codec with the given decode mode and indentation width
    pub fn new(mode: DecodeMode, indent_width: usize) -> Self {
        Self {
            mode,
            indent: vec![b' '; indent_width],
        }
    }

    /// Create a codec from the store configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.decode_mode, config.indent_width)
    }

    /// The active decode mode
    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Decode raw table content into a record sequence
    ///
    /// - empty / whitespace-only → empty sequence
    /// - JSON array → its elements, unvalidated
    /// - JSON object → one-element sequence
    /// - anything else → `StoreError::Decode` (strict) or empty (lenient)
    pub fn decode(&self, raw: &[u8]) -> Result<Vec<Value>> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(record @ Value::Object(_)) => Ok(vec![record]),
            Ok(other) => self.malformed(format!(
                "top-level value is {}, expected an array or an object",
                kind_of(&other)
            )),
            Err(e) => self.malformed(e.to_string()),
        }
    }

    /// Encode a record sequence as a pretty-printed, newline-terminated array
    pub fn encode(&self, records: &[Value]) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(64 * records.len().max(1));
        {
            let formatter = PrettyFormatter::with_indent(&self.indent);
            let mut serializer = Serializer::with_formatter(&mut buf, formatter);
            records
                .serialize(&mut serializer)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
        }
        buf.push(b'\n');
        Ok(buf)
    }

    fn malformed(&self, reason: String) -> Result<Vec<Value>> {
        match self.mode {
            DecodeMode::Strict => Err(StoreError::Decode(reason)),
            DecodeMode::Lenient => {
                tracing::warn!(%reason, "discarding malformed table content");
                Ok(Vec::new())
            }
        }
    }
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new(DecodeMode::Strict, 2)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
