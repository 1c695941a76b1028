//! Everything needed to register methods and serve requests.
//!
//! ```rust
//! use tinyrpc_server::prelude::*;
//! ```

pub use crate::config::{FeatureFlags, ServerConfig};
pub use crate::error::RegistrationError;
pub use crate::handler::{HandlerError, HandlerResult, MethodHandler, simple};
pub use crate::server::RpcServer;

pub use tinyrpc_protocol::{JsonRpcRequest, RequestId, RequestParams, RpcResponse, Transport};
