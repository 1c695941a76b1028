//! # Protocol Prelude
//!
//! Convenient re-exports of the most commonly used protocol types.
//!
//! ```rust
//! use tinyrpc_protocol::prelude::*;
//! ```

pub use crate::error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
pub use crate::parse::{ParseFailure, parse_request};
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcResponse, ReplyError, RpcResponse};
pub use crate::transport::{MemoryTransport, Transport, TransportError};
pub use crate::types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use crate::transport::AsyncTransport;

// Standard error codes
pub use crate::error_codes::*;
