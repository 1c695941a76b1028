use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Identifier correlating a call with its response; a missing or `null`
/// id marks a notification.
///
/// Numbers are kept exactly as received, so a fractional or `u64` id is
/// echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
}

impl RequestId {
    /// Read a raw `id` member: `Ok(None)` for `null`, `Err(())` for
    /// booleans, arrays and objects.
    pub(crate) fn from_json(value: &Value) -> Result<Option<Self>, ()> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(Some(RequestId::Number(n.clone()))),
            Value::String(s) => Ok(Some(RequestId::String(s.clone()))),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => fmt::Display::fmt(n, f),
            RequestId::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<Number> for RequestId {
    fn from(n: Number) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

/// The `jsonrpc` member. Only `"2.0"` deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JsonRpcVersion {
    #[default]
    #[serde(rename = "2.0")]
    V2_0,
}

impl JsonRpcVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonRpcVersion::V2_0 => "2.0",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_serialization() {
        assert_eq!(serde_json::to_string(&RequestId::from("test")).unwrap(), r#""test""#);
        assert_eq!(serde_json::to_string(&RequestId::from(42)).unwrap(), "42");

        let id: RequestId = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(id.to_string(), "18446744073709551615");
    }

    #[test]
    fn test_request_id_from_json() {
        assert_eq!(RequestId::from_json(&json!(7)), Ok(Some(RequestId::from(7))));
        assert_eq!(
            RequestId::from_json(&json!("abc")),
            Ok(Some(RequestId::String("abc".to_string())))
        );
        assert_eq!(RequestId::from_json(&Value::Null), Ok(None));
        assert_eq!(
            RequestId::from_json(&json!(1.5)).unwrap().map(|id| id.to_string()),
            Some("1.5".to_string())
        );
        assert!(RequestId::from_json(&json!([1])).is_err());
        assert!(RequestId::from_json(&json!(true)).is_err());
        assert!(RequestId::from_json(&json!({"n": 1})).is_err());
    }

    #[test]
    fn test_json_rpc_version() {
        let version = JsonRpcVersion::V2_0;
        assert_eq!(version.as_str(), "2.0");
        assert_eq!(serde_json::to_string(&version).unwrap(), r#""2.0""#);
        assert!(serde_json::from_str::<JsonRpcVersion>(r#""1.0""#).is_err());
        assert!(serde_json::from_str::<JsonRpcVersion>("2.0").is_err());
    }
}
