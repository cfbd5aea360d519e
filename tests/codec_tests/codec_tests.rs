//! Tests for RecordCodec
//!
//! These tests verify:
//! - Normalization of empty, bare-object and array content
//! - Strict vs lenient handling of malformed content
//! - Canonical pretty-printed output (indentation, key order, newline)
//! - Decode/encode round trips

use jsonstore::{DecodeMode, RecordCodec, StoreError};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn strict() -> RecordCodec {
    RecordCodec::new(DecodeMode::Strict, 2)
}

fn lenient() -> RecordCodec {
    RecordCodec::new(DecodeMode::Lenient, 2)
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_empty_input() {
    let records = strict().decode(b"").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_decode_whitespace_only() {
    let records = strict().decode(b"  \n\t \r\n").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_decode_array() {
    let records = strict()
        .decode(br#"[{"id":1,"name":"a"},{"id":2}]"#)
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0], json!({"id": 1, "name": "a"}));
    assert_eq!(records[1], json!({"id": 2}));
}

#[test]
fn test_decode_empty_array() {
    let records = strict().decode(b"[]\n").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_decode_bare_object_becomes_single_record() {
    let records = strict().decode(br#"{"id":5}"#).unwrap();
    assert_eq!(records, vec![json!({"id": 5})]);
}

#[test]
fn test_decode_keeps_non_object_elements() {
    let records = strict().decode(br#"[{"id":1}, 7, "x", null]"#).unwrap();
    assert_eq!(records, vec![json!({"id": 1}), json!(7), json!("x"), Value::Null]);
}

#[test]
fn test_decode_malformed_strict_fails() {
    let result = strict().decode(b"[{\"id\": 1,");
    assert!(matches!(result, Err(StoreError::Decode(_))));
}

#[test]
fn test_decode_malformed_lenient_is_empty() {
    let records = lenient().decode(b"not json at all").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_decode_scalar_top_level_strict_fails() {
    let result = strict().decode(b"42");
    assert!(matches!(result, Err(StoreError::Decode(_))));
}

#[test]
fn test_decode_scalar_top_level_lenient_is_empty() {
    assert!(lenient().decode(b"\"hello\"").unwrap().is_empty());
}

#[test]
fn test_codec_reports_mode() {
    assert_eq!(strict().mode(), DecodeMode::Strict);
    assert_eq!(lenient().mode(), DecodeMode::Lenient);
    assert_eq!(RecordCodec::default().mode(), DecodeMode::Strict);
}

// =============================================================================
// Encode Tests
// =============================================================================

#[test]
fn test_encode_two_space_indent() {
    let bytes = strict().encode(&[json!({"id": 1, "name": "a"})]).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(text, "[\n  {\n    \"id\": 1,\n    \"name\": \"a\"\n  }\n]\n");
}

#[test]
fn test_encode_empty_sequence() {
    let bytes = strict().encode(&[]).unwrap();
    assert_eq!(bytes, b"[]\n");
}

#[test]
fn test_encode_custom_indent() {
    let codec = RecordCodec::new(DecodeMode::Strict, 4);
    let text = String::from_utf8(codec.encode(&[json!({"id": 1})]).unwrap()).unwrap();

    assert_eq!(text, "[\n    {\n        \"id\": 1\n    }\n]\n");
}

#[test]
fn test_encode_preserves_key_order() {
    let codec = strict();
    let records = codec.decode(br#"[{"zeta":1,"id":3,"alpha":2}]"#).unwrap();
    let text = String::from_utf8(codec.encode(&records).unwrap()).unwrap();

    let zeta = text.find("zeta").unwrap();
    let id = text.find("\"id\"").unwrap();
    let alpha = text.find("alpha").unwrap();
    assert!(zeta < id && id < alpha);
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_nested_values() {
    let codec = strict();
    let original = vec![
        json!({"id": 69, "key1": "lalalalalalal", "key2": "k", "key3": [1, 2, 3]}),
        json!({"id": "a1b2", "nested": {"deep": {"x": null, "y": true}}, "price": 9.5}),
    ];

    let encoded = codec.encode(&original).unwrap();
    let decoded = codec.decode(&encoded).unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn test_round_trip_normalizes_bare_object() {
    let codec = strict();
    let decoded = codec.decode(br#"{"id":5,"name":"solo"}"#).unwrap();
    let encoded = codec.encode(&decoded).unwrap();

    let reparsed: Value = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(reparsed, json!([{"id": 5, "name": "solo"}]));
    assert_eq!(codec.decode(&encoded).unwrap(), decoded);
}
