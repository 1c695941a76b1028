//! Async client engine for tokio hosts

use std::time::Duration;

use serde_json::Value;
use tinyrpc_protocol::{AsyncTransport, RpcResponse};
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::call::{CallState, IdSequence, accept_reply, encode_call, encode_notification, poll_delay};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// [`RpcClient`](crate::RpcClient) over an [`AsyncTransport`], yielding to the
/// runtime between polls instead of blocking the thread
#[derive(Debug)]
pub struct AsyncRpcClient<T: AsyncTransport> {
    transport: T,
    config: ClientConfig,
    ids: IdSequence,
}

impl<T: AsyncTransport> AsyncRpcClient<T> {
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

    /// Call `method` and wait for its reply; failures come back as error responses
    pub async fn call(&mut self, method: &str, params: Option<Value>) -> RpcResponse {
        match self.try_call(method, params).await {
            Ok(response) => response,
            Err(e) => e.to_response(),
        }
    }

    pub async fn try_call(&mut self, method: &str, params: Option<Value>) -> ClientResult<RpcResponse> {
        let id = self.ids.next_id();
        let frame = encode_call(id.clone(), method, params)?;

        debug!(method, id = %id, "Sending request");
        if let Err(e) = self.transport.write(&frame).await {
            warn!(method, id = %id, error = %e, "Failed to send request");
            return Err(ClientError::Send(e));
        }

        let text = self.wait_for_reply().await.inspect_err(|e| {
            warn!(method, id = %id, error = %e, "No reply");
        })?;
        debug!(method, id = %id, "Received reply");
        Ok(accept_reply(&text, &id))
    }

    pub async fn notify(&mut self, method: &str, params: Option<Value>) -> ClientResult<()> {
        let frame = encode_notification(method, params)?;
        debug!(method, "Sending notification");
        self.transport.write(&frame).await?;
        Ok(())
    }

    async fn wait_for_reply(&mut self) -> ClientResult<String> {
        let started = Instant::now();
        let mut state = CallState::Sent;
        loop {
            state = match state {
                CallState::Sent => self.poll(started).await,
                CallState::Received(text) => return Ok(text),
                CallState::TimedOut(after) => return Err(ClientError::Timeout(after)),
            };
        }
    }

    async fn poll(&mut self, started: Instant) -> CallState {
        if self.transport.available().await {
            if let Some(text) = self.transport.read().await.filter(|t| !t.trim().is_empty()) {
                return CallState::Received(text);
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= self.config.timeout {
            return CallState::TimedOut(elapsed);
        }
        sleep(poll_delay(self.config.poll_interval, self.config.timeout, elapsed)).await;
        CallState::Sent
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
        self.transport.set_timeout(timeout);
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tinyrpc_protocol::{MemoryTransport, RequestId};

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_deadline() {
        let (link, _peer) = MemoryTransport::pair();
        let mut client = AsyncRpcClient::with_config(
            link,
            ClientConfig::default().with_timeout(Duration::from_millis(300)),
        );

        let started = Instant::now();
        let response = client.call("ping", None).await;
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(response.error_message(), Some("Request timeout"));
        assert_eq!(response.error_code(), Some(-32000));
    }

    #[tokio::test]
    async fn test_call_reads_queued_reply() {
        let (link, mut peer) = MemoryTransport::pair();
        AsyncTransport::write(&mut peer, r#"{"jsonrpc":"2.0","result":[1,2],"id":1}"#)
            .await
            .unwrap();

        let mut client = AsyncRpcClient::new(link);
        let response = client.call("pair", Some(json!({"n": 2}))).await;
        assert_eq!(response.result_as::<Vec<i64>>(), Some(vec![1, 2]));
        assert_eq!(response.id(), Some(&RequestId::from(1)));

        let sent = AsyncTransport::read(&mut peer).await.unwrap();
        assert_eq!(sent, r#"{"jsonrpc":"2.0","method":"pair","params":{"n":2},"id":1}"#);
    }

    #[tokio::test]
    async fn test_send_failure_when_peer_gone() {
        let (link, peer) = MemoryTransport::pair();
        drop(peer);

        let mut client = AsyncRpcClient::new(link);
        let response = client.call("ping", None).await;
        assert_eq!(response.error_message(), Some("Failed to send request"));
        assert!(client.notify("ping", None).await.is_err());
    }

    #[tokio::test]
    async fn test_set_timeout_reaches_transport() {
        let (link, _peer) = MemoryTransport::pair();
        let mut client = AsyncRpcClient::new(link);
        client.set_timeout(Duration::from_millis(75));
        assert_eq!(AsyncTransport::timeout(client.transport()), Duration::from_millis(75));
    }
}
