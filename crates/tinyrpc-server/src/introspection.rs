//! Built-in `__rpc.*` methods answering questions about the engine itself.

use serde_json::{Value, json};
use tinyrpc_protocol::{JsonRpcError, JsonRpcRequest, RpcResponse, is_reserved_method};
use tracing::debug;

use crate::config::{ServerConfig, TOOLKIT_NAME, TOOLKIT_VERSION};
use crate::registry::MethodRegistry;

pub const LIST_METHODS: &str = "__rpc.listMethods";
pub const VERSION: &str = "__rpc.version";
pub const DESCRIBE: &str = "__rpc.describe";
pub const CAPABILITIES: &str = "__rpc.capabilities";

/// The reserved methods this engine answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    ListMethods,
    Version,
    Describe,
    Capabilities,
}

impl Builtin {
    /// Exact-match lookup. `__rpc.describe` only exists with schema support.
    pub fn lookup(method: &str, config: &ServerConfig) -> Option<Self> {
        match method {
            LIST_METHODS => Some(Builtin::ListMethods),
            VERSION => Some(Builtin::Version),
            DESCRIBE if config.features.schema_support => Some(Builtin::Describe),
            CAPABILITIES => Some(Builtin::Capabilities),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::ListMethods => LIST_METHODS,
            Builtin::Version => VERSION,
            Builtin::Describe => DESCRIBE,
            Builtin::Capabilities => CAPABILITIES,
        }
    }

    pub(crate) fn execute<const N: usize>(
        &self,
        registry: &MethodRegistry<N>,
        config: &ServerConfig,
        request: &JsonRpcRequest,
    ) -> RpcResponse {
        let id = request.id.clone();
        match self {
            Builtin::ListMethods => RpcResponse::result(list_methods(registry), id),
            Builtin::Version => RpcResponse::result(version(registry), id),
            Builtin::Capabilities => RpcResponse::result(capabilities(registry, config), id),
            Builtin::Describe => describe(registry, request),
        }
    }
}

fn list_methods<const N: usize>(registry: &MethodRegistry<N>) -> Value {
    Value::Array(
        registry
            .active_names()
            .map(|name| Value::String(name.to_string()))
            .collect(),
    )
}

fn version<const N: usize>(registry: &MethodRegistry<N>) -> Value {
    json!({
        "toolkit": TOOLKIT_NAME,
        "version": TOOLKIT_VERSION,
        "methodCount": registry.len(),
    })
}

fn capabilities<const N: usize>(registry: &MethodRegistry<N>, config: &ServerConfig) -> Value {
    let features = &config.features;
    json!({
        "batch": features.batch,
        "introspection": true,
        "safeMode": features.safe_mode,
        "notifications": features.notifications,
        "schemaSupport": features.schema_support,
        "methodCount": registry.len(),
        "maxMethods": registry.capacity(),
    })
}

fn describe<const N: usize>(registry: &MethodRegistry<N>, request: &JsonRpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let target = match request.params.as_ref().and_then(|p| p.get_str("method")) {
        Some(target) if !target.is_empty() => target,
        _ => return JsonRpcError::invalid_params(id, "Missing 'method' parameter").into(),
    };

    if is_reserved_method(target) {
        debug!(method = target, "describe refused for reserved method");
        return JsonRpcError::method_not_found(id, target).into();
    }

    match registry.find(target) {
        Some(entry) if entry.expose_schema() => RpcResponse::result(
            json!({
                "name": entry.name(),
                "description": entry.description().unwrap_or_default(),
                "exposeSchema": entry.expose_schema(),
            }),
            id,
        ),
        _ => JsonRpcError::method_not_found(id, target).into(),
    }
}
