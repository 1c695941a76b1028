//! Inbound request parsing.
//!
//! Everything that can go wrong between raw text and a valid
//! [`JsonRpcRequest`] collapses into a [`ParseFailure`]; callers answer all
//! of them with a single parse-error response carrying a `null` id.

use serde_json::Value;
use thiserror::Error;

use crate::error::JsonRpcError;
use crate::request::{JsonRpcRequest, RequestParams};
use crate::types::{JsonRpcVersion, RequestId};

/// Reasons an inbound frame could not become a request
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("empty frame")]
    Empty,

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: usize, max: usize },

    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("missing or unsupported jsonrpc version")]
    Version,

    #[error("missing or empty method name")]
    Method,

    #[error("id must be a string, a number or null")]
    Id,
}

impl ParseFailure {
    /// The error response sent back for this failure
    pub fn to_response(&self) -> JsonRpcError {
        JsonRpcError::parse_error()
    }
}

/// Parse `text` into a validated request.
///
/// Frames longer than `max_request_size` bytes are refused before any JSON
/// work is done.
pub fn parse_request(text: &str, max_request_size: usize) -> Result<JsonRpcRequest, ParseFailure> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseFailure::Empty);
    }
    if text.len() > max_request_size {
        return Err(ParseFailure::TooLarge {
            len: text.len(),
            max: max_request_size,
        });
    }

    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut obj) = value else {
        return Err(ParseFailure::NotAnObject);
    };

    match obj.get("jsonrpc") {
        Some(Value::String(v)) if v == JsonRpcVersion::V2_0.as_str() => {}
        _ => return Err(ParseFailure::Version),
    }

    let method = match obj.remove("method") {
        Some(Value::String(method)) if !method.is_empty() => method,
        _ => return Err(ParseFailure::Method),
    };

    let id = match obj.get("id") {
        Some(raw) => RequestId::from_json(raw).map_err(|_| ParseFailure::Id)?,
        None => None,
    };

    let params = obj.remove("params").and_then(RequestParams::from_value);

    Ok(JsonRpcRequest::new(id, method, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LIMIT: usize = 512;

    #[test]
    fn test_parse_valid_request() {
        let json = r#"{"jsonrpc": "2.0", "method": "test", "id": 1}"#;
        let request = parse_request(json, LIMIT).unwrap();

        assert!(!request.is_notification());
        assert_eq!(request.method, "test");
        assert_eq!(request.id, Some(RequestId::from(1)));
    }

    #[test]
    fn test_parse_valid_notification() {
        let json = r#"{"jsonrpc": "2.0", "method": "notify", "params": [1, 2]}"#;
        let request = parse_request(json, LIMIT).unwrap();

        assert!(request.is_notification());
        assert_eq!(request.get_param_index(1), Some(&json!(2)));
    }

    #[test]
    fn test_null_id_is_notification() {
        let json = r#"{"jsonrpc": "2.0", "method": "notify", "id": null}"#;
        assert!(parse_request(json, LIMIT).unwrap().is_notification());
    }

    #[test]
    fn test_null_params_are_absent() {
        let json = r#"{"jsonrpc": "2.0", "method": "m", "params": null, "id": "a"}"#;
        let request = parse_request(json, LIMIT).unwrap();
        assert!(request.params.is_none());
        assert_eq!(request.id, Some(RequestId::from("a")));
    }

    #[test]
    fn test_parse_invalid_json() {
        let json = r#"{"jsonrpc": "2.0", "method": "test""#;
        assert!(matches!(parse_request(json, LIMIT), Err(ParseFailure::Syntax(_))));
        assert!(matches!(parse_request("not json", LIMIT), Err(ParseFailure::Syntax(_))));
    }

    #[test]
    fn test_parse_rejections() {
        assert!(matches!(parse_request("   ", LIMIT), Err(ParseFailure::Empty)));
        assert!(matches!(
            parse_request(r#"[{"jsonrpc":"2.0","method":"a","id":1}]"#, LIMIT),
            Err(ParseFailure::NotAnObject)
        ));
        assert!(matches!(
            parse_request(r#"{"jsonrpc":"1.0","method":"a","id":1}"#, LIMIT),
            Err(ParseFailure::Version)
        ));
        assert!(matches!(
            parse_request(r#"{"method":"a","id":1}"#, LIMIT),
            Err(ParseFailure::Version)
        ));
        assert!(matches!(
            parse_request(r#"{"jsonrpc":"2.0","method":"","id":1}"#, LIMIT),
            Err(ParseFailure::Method)
        ));
        assert!(matches!(
            parse_request(r#"{"jsonrpc":"2.0","method":7,"id":1}"#, LIMIT),
            Err(ParseFailure::Method)
        ));
        assert!(matches!(
            parse_request(r#"{"jsonrpc":"2.0","method":"a","id":true}"#, LIMIT),
            Err(ParseFailure::Id)
        ));
    }

    #[test]
    fn test_numeric_ids_kept_verbatim() {
        for raw in ["1.5", "18446744073709551615", "-3"] {
            let json = format!(r#"{{"jsonrpc":"2.0","method":"m","id":{}}}"#, raw);
            let request = parse_request(&json, LIMIT).unwrap();
            assert!(!request.is_notification());
            assert_eq!(serde_json::to_string(&request.id).unwrap(), raw);
        }
    }

    #[test]
    fn test_parse_too_large() {
        let padding = "x".repeat(64);
        let json = format!(r#"{{"jsonrpc":"2.0","method":"{}","id":1}}"#, padding);
        match parse_request(&json, 32) {
            Err(ParseFailure::TooLarge { len, max }) => {
                assert_eq!(len, json.len());
                assert_eq!(max, 32);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_maps_to_parse_error() {
        let response = ParseFailure::Method.to_response();
        assert_eq!(response.error.code, -32700);
        assert_eq!(response.id, None);
    }
}
