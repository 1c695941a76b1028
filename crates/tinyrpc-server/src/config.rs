//! Server configuration
//!
//! Every limit here is fixed when the server is built; nothing grows at
//! runtime. Registry capacity is the `N` parameter of
//! [`RpcServer`](crate::RpcServer), not a field, so the slot table can be a
//! plain array.

use serde::{Deserialize, Serialize};

/// Default registry capacity
pub const DEFAULT_MAX_METHODS: usize = 8;

/// Default maximum request/response frame size in bytes
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 512;

/// Longest accepted method name, in bytes
pub const DEFAULT_MAX_METHOD_NAME_LEN: usize = 31;

/// Longest stored method description, in bytes
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 64;

/// Smallest response limit honoured; every fixed error reply fits within it
pub const MIN_RESPONSE_SIZE: usize = 128;

/// Identifier reported by `__rpc.version`
pub const TOOLKIT_NAME: &str = "tinyrpc";

/// Version reported by `__rpc.version`
pub const TOOLKIT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Longest accepted method name in bytes
    pub max_method_name_len: usize,

    /// Descriptions are truncated to this many bytes
    pub max_description_len: usize,

    /// Inbound frames above this size are parse failures
    pub max_request_size: usize,

    /// Outbound frames above this size are replaced by an internal error
    pub max_response_size: usize,

    /// Feature toggles
    pub features: FeatureFlags,
}

/// Feature toggles, reported verbatim by `__rpc.capabilities`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Advertised only: batch arrays are not dispatched
    pub batch: bool,

    /// Log every inbound and outbound frame at debug level
    pub logging: bool,

    /// Dispatch notifications; when off they are dropped unseen
    pub notifications: bool,

    /// Keep method descriptions and serve `__rpc.describe`
    pub schema_support: bool,

    /// Advertised only
    pub safe_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_method_name_len: DEFAULT_MAX_METHOD_NAME_LEN,
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
            max_request_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_response_size: DEFAULT_MAX_MESSAGE_SIZE,
            features: FeatureFlags::default(),
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            batch: true,
            logging: false,
            notifications: true,
            schema_support: true,
            safe_mode: false,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_method_name_len(mut self, len: usize) -> Self {
        self.max_method_name_len = len;
        self
    }

    pub fn with_max_description_len(mut self, len: usize) -> Self {
        self.max_description_len = len;
        self
    }

    /// Set both the request and response size limits
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_request_size = size;
        self.max_response_size = size.max(MIN_RESPONSE_SIZE);
        self
    }

    pub fn with_max_request_size(mut self, size: usize) -> Self {
        self.max_request_size = size;
        self
    }

    /// Limits below [`MIN_RESPONSE_SIZE`] are raised to it
    pub fn with_max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = size.max(MIN_RESPONSE_SIZE);
        self
    }

    /// The response limit actually enforced, covering configs that were
    /// deserialized rather than built
    pub fn response_limit(&self) -> usize {
        self.max_response_size.max(MIN_RESPONSE_SIZE)
    }

    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.features.logging = enabled;
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.features.notifications = enabled;
        self
    }

    pub fn with_schema_support(mut self, enabled: bool) -> Self {
        self.features.schema_support = enabled;
        self
    }
}
