//! # tinyrpc Client
//!
//! Issues JSON-RPC 2.0 calls and notifications over any
//! [`Transport`](tinyrpc_protocol::Transport) and waits for replies by
//! polling it against a deadline.
//!
//! The client never raises on protocol trouble: a refused send or an expired
//! deadline comes back as a `-32000` error response, so callers always
//! inspect the returned [`RpcResponse`](tinyrpc_protocol::RpcResponse).
//!
//! ## Features
//! - `async` (default): [`AsyncRpcClient`] over an `AsyncTransport`, sleeping
//!   on tokio's timer between polls

#[cfg(feature = "async")]
pub mod async_client;
mod call;
pub mod client;
pub mod config;
pub mod error;

pub mod prelude;

#[cfg(feature = "async")]
pub use async_client::AsyncRpcClient;
pub use client::RpcClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

// Re-export the protocol crate so callers can name transports and responses
pub use tinyrpc_protocol;
