//! Common imports for client code.
//!
//! ```rust
//! use tinyrpc_client::prelude::*;
//! ```

#[cfg(feature = "async")]
pub use crate::async_client::AsyncRpcClient;
pub use crate::client::RpcClient;
pub use crate::config::ClientConfig;
pub use crate::error::{ClientError, ClientResult};

pub use tinyrpc_protocol::{MemoryTransport, RequestId, RpcResponse, Transport, TransportError};
#[cfg(feature = "async")]
pub use tinyrpc_protocol::AsyncTransport;
