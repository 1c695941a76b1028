use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub result: Value,
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    pub fn new(id: Option<RequestId>, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            result,
            id,
        }
    }
}

/// Why a reply text could not be accepted as a response
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplyError {
    #[error("reply is not valid JSON: {0}")]
    Unparsable(String),

    #[error("reply is not a JSON object")]
    NotAnObject,

    #[error("reply has a missing or unsupported jsonrpc version")]
    Version,

    #[error("reply id must be a string, a number or null")]
    Id,

    #[error("reply carries neither result nor error")]
    MissingPayload,

    #[error("reply carries both result and error")]
    BothPayloads,

    #[error("reply error object is malformed: {0}")]
    MalformedError(String),
}

/// A reply that failed validation.
///
/// `has_error_field` records whether the text contained an `error` member,
/// so a bad-version error reply is still told apart from a real one.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidResponse {
    pub reason: ReplyError,
    pub has_error_field: bool,
}

/// A finalized response: exactly one of result or error, or a reply that
/// could not be validated.
///
/// `set_result` and `set_error` replace the whole value; there is no
/// partially built state.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    Success(JsonRpcResponse),
    Failure(JsonRpcError),
    Invalid(InvalidResponse),
}

impl RpcResponse {
    /// Success response
    pub fn result(result: Value, id: Option<RequestId>) -> Self {
        Self::Success(JsonRpcResponse::new(id, result))
    }

    /// Error response with an explicit message
    pub fn error(code: JsonRpcErrorCode, message: impl Into<String>, id: Option<RequestId>) -> Self {
        Self::Failure(JsonRpcError::new(
            id,
            JsonRpcErrorObject::new(code, Some(message.into())),
        ))
    }

    pub fn set_result(&mut self, result: Value, id: Option<RequestId>) {
        *self = Self::result(result, id);
    }

    pub fn set_error(&mut self, code: JsonRpcErrorCode, message: impl Into<String>, id: Option<RequestId>) {
        *self = Self::error(code, message, id);
    }

    fn invalid(reason: ReplyError, has_error_field: bool) -> Self {
        debug!(%reason, "rejected reply");
        Self::Invalid(InvalidResponse {
            reason,
            has_error_field,
        })
    }

    /// Parse reply text. Never fails: anything unacceptable becomes `Invalid`.
    pub fn parse(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text.trim()) {
            Ok(value) => value,
            Err(e) => return Self::invalid(ReplyError::Unparsable(e.to_string()), false),
        };
        let Value::Object(mut obj) = value else {
            return Self::invalid(ReplyError::NotAnObject, false);
        };

        let has_error_field = obj.contains_key("error");
        match obj.get("jsonrpc") {
            Some(Value::String(v)) if v == JsonRpcVersion::V2_0.as_str() => {}
            _ => return Self::invalid(ReplyError::Version, has_error_field),
        }

        let id = match obj.get("id") {
            Some(raw) => match RequestId::from_json(raw) {
                Ok(id) => id,
                Err(()) => return Self::invalid(ReplyError::Id, has_error_field),
            },
            None => None,
        };

        match (obj.remove("result"), obj.remove("error")) {
            (Some(_), Some(_)) => Self::invalid(ReplyError::BothPayloads, true),
            (None, None) => Self::invalid(ReplyError::MissingPayload, false),
            (Some(result), None) => Self::result(result, id),
            (None, Some(error)) => match serde_json::from_value::<JsonRpcErrorObject>(error) {
                Ok(error) => Self::Failure(JsonRpcError::new(id, error)),
                Err(e) => Self::invalid(ReplyError::MalformedError(e.to_string()), true),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn has_error(&self) -> bool {
        match self {
            Self::Success(_) => false,
            Self::Failure(_) => true,
            Self::Invalid(invalid) => invalid.has_error_field,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }

    pub fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Success(resp) => resp.id.as_ref(),
            Self::Failure(err) => err.id.as_ref(),
            Self::Invalid(_) => None,
        }
    }

    pub fn result_value(&self) -> Option<&Value> {
        match self {
            Self::Success(resp) => Some(&resp.result),
            _ => None,
        }
    }

    /// Deserialize the result into `T`; `None` for errors or a mismatched shape
    pub fn result_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.result_value()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn error_object(&self) -> Option<&JsonRpcErrorObject> {
        match self {
            Self::Failure(err) => Some(&err.error),
            _ => None,
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        self.error_object().map(|e| e.code)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_object().map(|e| e.message.as_str())
    }

    pub fn invalid_reason(&self) -> Option<&ReplyError> {
        match self {
            Self::Invalid(invalid) => Some(&invalid.reason),
            _ => None,
        }
    }

    /// Serialize a finalized response; invalid responses have no wire form
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for RpcResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success(resp) => resp.serialize(serializer),
            Self::Failure(err) => err.serialize(serializer),
            Self::Invalid(invalid) => Err(serde::ser::Error::custom(format!(
                "cannot serialize an invalid response: {}",
                invalid.reason
            ))),
        }
    }
}

impl From<JsonRpcResponse> for RpcResponse {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Success(response)
    }
}

impl From<JsonRpcError> for RpcResponse {
    fn from(error: JsonRpcError) -> Self {
        Self::Failure(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_serialization() {
        let response = RpcResponse::result(json!("pong"), Some(RequestId::from(1)));
        assert_eq!(
            response.to_json_string().unwrap(),
            r#"{"jsonrpc":"2.0","result":"pong","id":1}"#
        );
    }

    #[test]
    fn test_error_serialization() {
        let response = RpcResponse::error(JsonRpcErrorCode::InternalError, "Internal error", None);
        assert_eq!(
            response.to_json_string().unwrap(),
            r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#
        );
    }

    #[test]
    fn test_set_overwrites_prior_state() {
        let mut response = RpcResponse::result(json!(1), Some(RequestId::from(1)));
        response.set_error(JsonRpcErrorCode::InvalidParams, "bad", Some(RequestId::from(2)));

        assert!(response.has_error());
        assert!(!response.is_success());
        assert_eq!(response.result_value(), None);
        assert_eq!(response.id(), Some(&RequestId::from(2)));

        response.set_result(json!({"ok": true}), Some(RequestId::from(3)));
        assert!(response.is_success());
        assert!(!response.has_error());
        assert_eq!(response.error_code(), None);
        assert_eq!(response.id(), Some(&RequestId::from(3)));
    }

    #[test]
    fn test_result_round_trip() {
        let original = RpcResponse::result(json!({"temp": 21.5}), Some(RequestId::from(9)));
        let parsed = RpcResponse::parse(&original.to_json_string().unwrap());

        assert!(parsed.is_success());
        assert!(parsed.is_valid());
        assert_eq!(parsed.id(), Some(&RequestId::from(9)));
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_error_reply() {
        let parsed = RpcResponse::parse(
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found: x"},"id":"a"}"#,
        );
        assert!(parsed.is_valid());
        assert!(parsed.has_error());
        assert_eq!(parsed.error_code(), Some(-32601));
        assert_eq!(parsed.error_message(), Some("Method not found: x"));
        assert_eq!(parsed.id(), Some(&RequestId::from("a")));
    }

    #[test]
    fn test_null_result_is_success() {
        let parsed = RpcResponse::parse(r#"{"jsonrpc":"2.0","result":null,"id":4}"#);
        assert!(parsed.is_success());
        assert_eq!(parsed.result_value(), Some(&Value::Null));
    }

    #[test]
    fn test_result_as() {
        let parsed = RpcResponse::parse(r#"{"jsonrpc":"2.0","result":[1,2,3],"id":4}"#);
        assert_eq!(parsed.result_as::<Vec<u8>>(), Some(vec![1, 2, 3]));
        assert_eq!(parsed.result_as::<String>(), None);
    }

    #[test]
    fn test_invalid_replies() {
        let garbage = RpcResponse::parse("not json");
        assert!(!garbage.is_valid());
        assert!(!garbage.is_success());
        assert!(!garbage.has_error());
        assert!(matches!(garbage.invalid_reason(), Some(ReplyError::Unparsable(_))));

        let neither = RpcResponse::parse(r#"{"jsonrpc":"2.0","id":1}"#);
        assert_eq!(neither.invalid_reason(), Some(&ReplyError::MissingPayload));

        let both = RpcResponse::parse(
            r#"{"jsonrpc":"2.0","result":1,"error":{"code":-32603,"message":"x"},"id":1}"#,
        );
        assert_eq!(both.invalid_reason(), Some(&ReplyError::BothPayloads));

        let malformed = RpcResponse::parse(r#"{"jsonrpc":"2.0","error":"boom","id":1}"#);
        assert!(matches!(
            malformed.invalid_reason(),
            Some(ReplyError::MalformedError(_))
        ));
    }

    #[test]
    fn test_bad_version_error_is_distinguishable() {
        let text = r#"{"jsonrpc":"1.0","error":{"code":-32603,"message":"x"},"id":1}"#;
        let parsed = RpcResponse::parse(text);

        assert!(!parsed.is_valid());
        assert!(parsed.has_error());
        assert_eq!(parsed.error_code(), None);
        assert_eq!(parsed.invalid_reason(), Some(&ReplyError::Version));
    }

    #[test]
    fn test_invalid_response_does_not_serialize() {
        let parsed = RpcResponse::parse("{}");
        assert!(parsed.to_json_string().is_err());
    }
}
