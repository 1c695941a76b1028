//! Error types for client operations

use std::time::Duration;

use thiserror::Error;
use tinyrpc_protocol::{JsonRpcError, RpcResponse, TransportError};

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Why a call produced no reply
#[derive(Error, Debug)]
pub enum ClientError {
    /// The transport refused the request frame
    #[error("Failed to send request: {0}")]
    Send(#[from] TransportError),

    /// No reply arrived before the deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// The generic server error a caller of `call` receives instead.
    ///
    /// The id is null: the reply never arrived, so there is nothing to echo.
    pub fn to_response(&self) -> RpcResponse {
        let message = match self {
            ClientError::Timeout(_) => "Request timeout",
            ClientError::Send(_) | ClientError::Serialization(_) => "Failed to send request",
        };
        JsonRpcError::server_error(None, message).into()
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let timeout = ClientError::Timeout(Duration::from_millis(100)).to_response();
        assert_eq!(timeout.error_code(), Some(-32000));
        assert_eq!(timeout.error_message(), Some("Request timeout"));
        assert_eq!(timeout.id(), None);

        let send = ClientError::Send(TransportError::Closed).to_response();
        assert_eq!(send.error_code(), Some(-32000));
        assert_eq!(send.error_message(), Some("Failed to send request"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ClientError::Send(TransportError::Closed).to_string(),
            "Failed to send request: Transport closed"
        );
        assert!(ClientError::Timeout(Duration::from_millis(5)).is_timeout());
    }
}
