//! Transport contract
//!
//! A transport moves whole JSON-RPC text frames over some byte channel
//! (UART, TCP, radio link). The engines only ever see the four operations
//! below; framing, connection management and any internal blocking are the
//! transport's own business.

use std::time::Duration;

#[cfg(feature = "async")]
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryTransport;

/// Default read timeout handed to transports that are not configured otherwise
pub const DEFAULT_TRANSPORT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Transport-level errors (no protocol logic)
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Transport closed")]
    Closed,

    #[error("Frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

/// Capability set a byte channel must provide to carry JSON-RPC frames
pub trait Transport {
    /// Take the next complete frame, or `None` if nothing is available.
    /// Must not block indefinitely.
    fn read(&mut self) -> Option<String>;

    /// Hand a frame off to the channel. `Ok` means the bytes left our
    /// hands, not that the peer received them.
    fn write(&mut self, frame: &str) -> Result<(), TransportError>;

    /// Non-blocking readiness probe
    fn available(&mut self) -> bool;

    /// Configure the transport's own read timeout
    fn set_timeout(&mut self, timeout: Duration);

    fn timeout(&self) -> Duration;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read(&mut self) -> Option<String> {
        (**self).read()
    }

    fn write(&mut self, frame: &str) -> Result<(), TransportError> {
        (**self).write(frame)
    }

    fn available(&mut self) -> bool {
        (**self).available()
    }

    fn set_timeout(&mut self, timeout: Duration) {
        (**self).set_timeout(timeout)
    }

    fn timeout(&self) -> Duration {
        (**self).timeout()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self) -> Option<String> {
        (**self).read()
    }

    fn write(&mut self, frame: &str) -> Result<(), TransportError> {
        (**self).write(frame)
    }

    fn available(&mut self) -> bool {
        (**self).available()
    }

    fn set_timeout(&mut self, timeout: Duration) {
        (**self).set_timeout(timeout)
    }

    fn timeout(&self) -> Duration {
        (**self).timeout()
    }
}

/// Async flavour of [`Transport`] for tokio-based hosts
#[cfg(feature = "async")]
#[async_trait]
pub trait AsyncTransport: Send {
    /// Take the next complete frame, or `None` if nothing is available
    async fn read(&mut self) -> Option<String>;

    /// Hand a frame off to the channel
    async fn write(&mut self, frame: &str) -> Result<(), TransportError>;

    /// Readiness probe; must resolve promptly
    async fn available(&mut self) -> bool;

    fn set_timeout(&mut self, timeout: Duration);

    fn timeout(&self) -> Duration;
}
