//! In-process transport backed by a pair of channels.
//!
//! Each endpoint's writes arrive, frame for frame, as the other endpoint's
//! reads. Endpoints are `Send`, so a server and a client can run on separate
//! threads and talk exactly as they would over a serial line.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

#[cfg(feature = "async")]
use async_trait::async_trait;
use tracing::trace;

use super::{DEFAULT_TRANSPORT_TIMEOUT, Transport, TransportError};

/// Largest frame accepted by default, matching the default request size
pub const DEFAULT_MAX_FRAME_SIZE: usize = 512;

/// One endpoint of an in-memory frame channel
#[derive(Debug)]
pub struct MemoryTransport {
    tx: Sender<String>,
    rx: Receiver<String>,
    /// Frame received by `available()` but not yet handed out by `read()`
    pending: Option<String>,
    timeout: Duration,
    max_frame_size: usize,
    peer_closed: bool,
}

impl MemoryTransport {
    /// Create two connected endpoints
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::channel();
        let (b_tx, a_rx) = mpsc::channel();
        (Self::endpoint(a_tx, a_rx), Self::endpoint(b_tx, b_rx))
    }

    fn endpoint(tx: Sender<String>, rx: Receiver<String>) -> Self {
        Self {
            tx,
            rx,
            pending: None,
            timeout: DEFAULT_TRANSPORT_TIMEOUT,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            peer_closed: false,
        }
    }

    /// Refuse outbound frames larger than `max` bytes
    pub fn with_max_frame_size(mut self, max: usize) -> Self {
        self.max_frame_size = max;
        self
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// True once the other endpoint has been dropped and every frame it sent was read
    pub fn is_closed(&mut self) -> bool {
        !self.fill() && self.peer_closed
    }

    fn fill(&mut self) -> bool {
        if self.pending.is_none() {
            match self.rx.try_recv() {
                Ok(frame) => self.pending = Some(frame),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.peer_closed = true,
            }
        }
        self.pending.is_some()
    }

    fn send(&mut self, frame: &str) -> Result<(), TransportError> {
        if frame.len() > self.max_frame_size {
            return Err(TransportError::FrameTooLarge {
                len: frame.len(),
                max: self.max_frame_size,
            });
        }
        trace!(len = frame.len(), "memory transport TX");
        self.tx
            .send(frame.to_string())
            .map_err(|_| TransportError::Closed)
    }
}

impl Transport for MemoryTransport {
    fn read(&mut self) -> Option<String> {
        self.fill();
        self.pending.take()
    }

    fn write(&mut self, frame: &str) -> Result<(), TransportError> {
        self.send(frame)
    }

    fn available(&mut self) -> bool {
        self.fill()
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(feature = "async")]
#[async_trait]
impl super::AsyncTransport for MemoryTransport {
    async fn read(&mut self) -> Option<String> {
        Transport::read(self)
    }

    async fn write(&mut self, frame: &str) -> Result<(), TransportError> {
        self.send(frame)
    }

    async fn available(&mut self) -> bool {
        self.fill()
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
