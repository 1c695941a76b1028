//! # tinyrpc Server Engine
//!
//! A JSON-RPC 2.0 dispatcher sized for devices with a few kilobytes to spare.
//! Methods live in a fixed-capacity table chosen at compile time, every
//! request is handled to completion on the caller's thread, and no request
//! ever goes unanswered: malformed frames, unknown methods and failing (or
//! panicking) handlers all become well-formed error responses.
//!
//! ## Built-in methods
//! - `__rpc.listMethods`: active method names in slot order
//! - `__rpc.version`: toolkit name, version and method count
//! - `__rpc.describe`: description of a method registered with `expose_schema`
//! - `__rpc.capabilities`: feature flags and table occupancy
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use tinyrpc_server::RpcServer;
//!
//! let mut server = RpcServer::new();
//! server.add_simple_method("ping", || Ok(json!("pong")));
//!
//! let reply = server.handle_request(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#);
//! assert_eq!(reply, r#"{"jsonrpc":"2.0","result":"pong","id":1}"#);
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod introspection;
pub mod registry;
pub mod server;

pub mod prelude;

#[cfg(test)]
mod tests;

pub use config::{FeatureFlags, ServerConfig};
pub use error::RegistrationError;
pub use handler::{HandlerError, HandlerResult, MethodHandler, SimpleHandler, simple};
pub use introspection::Builtin;
pub use registry::{MethodEntry, MethodRegistry};
pub use server::RpcServer;

// Re-export the protocol crate for handler authors
pub use tinyrpc_protocol;
