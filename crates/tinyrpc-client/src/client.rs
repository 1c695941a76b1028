//! Blocking client engine

use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tinyrpc_protocol::{RpcResponse, Transport};
use tracing::{debug, warn};

use crate::call::{CallState, IdSequence, accept_reply, encode_call, encode_notification, poll_delay};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// JSON-RPC client driving a single [`Transport`].
///
/// One call is in flight at a time: `call` writes the request and then
/// blocks, polling the transport, until a frame arrives or the deadline
/// passes. There is no correlation table; the first frame read is taken to
/// be the reply.
#[derive(Debug)]
pub struct RpcClient<T: Transport> {
    transport: T,
    config: ClientConfig,
    ids: IdSequence,
}

impl<T: Transport> RpcClient<T> {
    /// Create a client with the default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(mut transport: T, config: ClientConfig) -> Self {
        transport.set_timeout(config.timeout);
        Self {
            transport,
            config,
            ids: IdSequence::new(),
        }
    }

    /// Call `method` and wait for its reply.
    ///
    /// Never fails outright: a send failure or timeout comes back as a
    /// `-32000` error response, and an unreadable reply as an invalid one.
    /// Check [`RpcResponse::is_success`] before using the result.
    pub fn call(&mut self, method: &str, params: Option<Value>) -> RpcResponse {
        self.try_call(method, params)
            .unwrap_or_else(|e| e.to_response())
    }

    /// Like [`call`](Self::call), but reports send failures and timeouts as
    /// [`ClientError`] instead of folding them into a response
    pub fn try_call(&mut self, method: &str, params: Option<Value>) -> ClientResult<RpcResponse> {
        let id = self.ids.next_id();
        let frame = encode_call(id.clone(), method, params)?;

        debug!(method, id = %id, "Sending request");
        if let Err(e) = self.transport.write(&frame) {
            warn!(method, id = %id, error = %e, "Failed to send request");
            return Err(ClientError::Send(e));
        }

        match self.wait_for_reply() {
            Ok(text) => {
                debug!(method, id = %id, "Received reply");
                Ok(accept_reply(&text, &id))
            }
            Err(e) => {
                warn!(method, id = %id, error = %e, "No reply");
                Err(e)
            }
        }
    }

    /// Send a notification. Nothing is read back, whatever the peer does.
    pub fn notify(&mut self, method: &str, params: Option<Value>) -> ClientResult<()> {
        let frame = encode_notification(method, params)?;
        debug!(method, "Sending notification");
        self.transport.write(&frame)?;
        Ok(())
    }

    fn wait_for_reply(&mut self) -> ClientResult<String> {
        let started = Instant::now();
        let mut state = CallState::Sent;
        loop {
            state = match state {
                CallState::Sent => self.poll(started),
                CallState::Received(text) => return Ok(text),
                CallState::TimedOut(after) => return Err(ClientError::Timeout(after)),
            };
        }
    }

    fn poll(&mut self, started: Instant) -> CallState {
        if self.transport.available() {
            if let Some(text) = self.transport.read().filter(|t| !t.trim().is_empty()) {
                return CallState::Received(text);
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= self.config.timeout {
            return CallState::TimedOut(elapsed);
        }
        thread::sleep(poll_delay(self.config.poll_interval, self.config.timeout, elapsed));
        CallState::Sent
    }

    /// Change the reply deadline; the transport's own timeout follows
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
        self.transport.set_timeout(timeout);
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back
    pub fn into_inner(self) -> T {
        self.transport
    }
}
