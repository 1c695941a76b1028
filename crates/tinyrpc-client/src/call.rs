//! Pieces shared by the blocking and async clients: id allocation, request
//! encoding and reply acceptance.

use std::time::Duration;

use serde_json::Value;
use tinyrpc_protocol::{JsonRpcRequest, RequestId, RequestParams, RpcResponse};
use tracing::{debug, warn};

use crate::error::ClientResult;

/// Per-client request id counter. Starts at 1 and never yields 0.
#[derive(Debug, Clone)]
pub(crate) struct IdSequence {
    next: i64,
}

impl IdSequence {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn next_id(&mut self) -> RequestId {
        let id = self.next;
        self.next = if id == i64::MAX { 1 } else { id + 1 };
        RequestId::from(id)
    }
}

/// Where a call stands while waiting for its reply
#[derive(Debug)]
pub(crate) enum CallState {
    /// Request written, nothing read yet
    Sent,
    /// A non-empty frame arrived
    Received(String),
    /// Deadline passed with nothing read
    TimedOut(Duration),
}

pub(crate) fn encode_call(id: RequestId, method: &str, params: Option<Value>) -> ClientResult<String> {
    let request = JsonRpcRequest::call(id, method, params.and_then(RequestParams::from_value));
    Ok(serde_json::to_string(&request)?)
}

pub(crate) fn encode_notification(method: &str, params: Option<Value>) -> ClientResult<String> {
    let request = JsonRpcRequest::notification(method, params.and_then(RequestParams::from_value));
    Ok(serde_json::to_string(&request)?)
}

/// How long to sleep before the next poll
pub(crate) fn poll_delay(poll_interval: Duration, timeout: Duration, elapsed: Duration) -> Duration {
    poll_interval.min(timeout.saturating_sub(elapsed))
}

/// Parse the reply frame. A reply for some other id is still returned, since
/// only one call is ever in flight; it is logged so the mismatch is visible.
pub(crate) fn accept_reply(text: &str, expected: &RequestId) -> RpcResponse {
    let response = RpcResponse::parse(text);
    if response.is_valid() && response.id() != Some(expected) {
        warn!(expected = %expected, got = ?response.id(), "Reply id does not match request id");
    }
    if let Some(error) = response.error_object() {
        debug!(id = %expected, code = error.code, kind = ?error.kind(), "Call answered with an error");
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_start_at_one() {
        let mut ids = IdSequence::new();
        assert_eq!(ids.next_id(), RequestId::from(1));
        assert_eq!(ids.next_id(), RequestId::from(2));
    }

    #[test]
    fn test_ids_wrap_past_zero() {
        let mut ids = IdSequence { next: i64::MAX };
        assert_eq!(ids.next_id(), RequestId::from(i64::MAX));
        assert_eq!(ids.next_id(), RequestId::from(1));
    }

    #[test]
    fn test_encoding() {
        let call = encode_call(RequestId::from(7), "add", Some(json!([1, 2]))).unwrap();
        assert_eq!(call, r#"{"jsonrpc":"2.0","method":"add","params":[1,2],"id":7}"#);

        let call = encode_call(RequestId::from(8), "ping", None).unwrap();
        assert_eq!(call, r#"{"jsonrpc":"2.0","method":"ping","id":8}"#);

        let note = encode_notification("led", Some(json!({"on": true}))).unwrap();
        assert_eq!(note, r#"{"jsonrpc":"2.0","method":"led","params":{"on":true}}"#);
    }

    #[test]
    fn test_poll_delay_never_overshoots() {
        let poll = Duration::from_millis(10);
        let timeout = Duration::from_millis(25);
        assert_eq!(poll_delay(poll, timeout, Duration::ZERO), poll);
        assert_eq!(poll_delay(poll, timeout, Duration::from_millis(20)), Duration::from_millis(5));
        assert_eq!(poll_delay(poll, timeout, Duration::from_millis(30)), Duration::ZERO);
    }
}
