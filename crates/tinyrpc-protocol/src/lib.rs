//! # JSON-RPC 2.0 Protocol Core
//!
//! The data model shared by the tinyrpc server and client engines, plus the
//! contract a byte channel has to satisfy to carry JSON-RPC frames.
//! Nothing in this crate performs I/O on its own.
//!
//! ## Features
//! - Request, response and error representations with parse-time validation
//! - Bounded request parsing (oversized or malformed frames become parse failures)
//! - Reply parsing that never fails: bad replies are flagged as invalid responses
//! - The `Transport` contract and an in-memory transport for tests and demos
//! - `AsyncTransport` with the `async` feature

pub mod error;
pub mod parse;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub mod prelude;

// Re-export main types
pub use error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
pub use parse::{ParseFailure, parse_request};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcResponse, ReplyError, RpcResponse};
pub use transport::{MemoryTransport, Transport, TransportError};
pub use types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use transport::AsyncTransport;

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Namespace reserved for the engine's built-in methods
pub const RESERVED_PREFIX: &str = "__rpc.";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const SERVER_ERROR: i64 = -32000;
}

/// Returns true if `method` belongs to the reserved `__rpc.` namespace
pub fn is_reserved_method(method: &str) -> bool {
    method.starts_with(RESERVED_PREFIX)
}
