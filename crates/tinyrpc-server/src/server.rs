//! The request/response cycle: parse, dispatch, serialize.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tinyrpc_protocol::{
    JsonRpcError, JsonRpcRequest, RequestId, RequestParams, RpcResponse, Transport,
    TransportError, is_reserved_method, parse_request,
};
use tracing::{debug, error, warn};

use crate::config::{DEFAULT_MAX_METHODS, ServerConfig};
use crate::error::RegistrationError;
use crate::handler::{HandlerResult, MethodHandler, SimpleHandler};
use crate::introspection::Builtin;
use crate::registry::{MethodEntry, MethodRegistry};

/// Sent if even the error response cannot be serialized
const FALLBACK_INTERNAL_ERROR: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#;

/// JSON-RPC server holding at most `N` methods.
///
/// Single-threaded by construction: the registry is owned outright and every
/// request is handled to completion before the next one is read.
pub struct RpcServer<const N: usize = DEFAULT_MAX_METHODS> {
    registry: MethodRegistry<N>,
    config: ServerConfig,
}

impl RpcServer {
    /// Server with the default capacity and configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }
}

impl<const N: usize> RpcServer<N> {
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            registry: MethodRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Register a method. Returns false, changing nothing, if the registry is
    /// full or the name is empty, too long or reserved.
    pub fn add_method<F>(&mut self, name: &str, handler: F) -> bool
    where
        F: Fn(Option<&RequestParams>) -> HandlerResult + Send + 'static,
    {
        self.add_handler(name, handler, None, false).is_ok()
    }

    /// Register a method with a description for `__rpc.describe`
    pub fn add_method_with_schema<F>(
        &mut self,
        name: &str,
        handler: F,
        description: &str,
        expose_schema: bool,
    ) -> bool
    where
        F: Fn(Option<&RequestParams>) -> HandlerResult + Send + 'static,
    {
        self.add_handler(name, handler, Some(description), expose_schema)
            .is_ok()
    }

    /// Register a method whose handler takes no parameters
    pub fn add_simple_method<F>(&mut self, name: &str, handler: F) -> bool
    where
        F: Fn() -> HandlerResult + Send + 'static,
    {
        self.add_handler(name, SimpleHandler(handler), None, false)
            .is_ok()
    }

    /// Register any [`MethodHandler`], reporting why registration failed.
    ///
    /// On success returns the slot the method now occupies.
    pub fn add_handler<H>(
        &mut self,
        name: &str,
        handler: H,
        description: Option<&str>,
        expose_schema: bool,
    ) -> Result<usize, RegistrationError>
    where
        H: MethodHandler + 'static,
    {
        if let Err(e) = self.validate_name(name) {
            warn!(method = name, error = %e, "Method registration rejected");
            return Err(e);
        }

        let description = description
            .filter(|_| self.config.features.schema_support)
            .map(|d| truncate(d, self.config.max_description_len).to_string());

        let entry = MethodEntry::new(name, Box::new(handler)).with_schema(description, expose_schema);
        match self.registry.insert(entry) {
            Ok(slot) => {
                debug!(method = name, slot, "Method registered");
                Ok(slot)
            }
            Err(e) => {
                warn!(method = name, error = %e, "Method registration rejected");
                Err(e)
            }
        }
    }

    fn validate_name(&self, name: &str) -> Result<(), RegistrationError> {
        if self.registry.is_full() {
            return Err(RegistrationError::Full { capacity: N });
        }
        if name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if name.len() > self.config.max_method_name_len {
            return Err(RegistrationError::NameTooLong {
                len: name.len(),
                max: self.config.max_method_name_len,
            });
        }
        if is_reserved_method(name) {
            return Err(RegistrationError::Reserved(name.to_string()));
        }
        Ok(())
    }

    /// Deactivate the first method registered under `name`
    pub fn remove_method(&mut self, name: &str) -> bool {
        match self.registry.remove(name) {
            Some(slot) => {
                debug!(method = name, slot, "Method removed");
                true
            }
            None => false,
        }
    }

    /// Number of active methods
    pub fn method_count(&self) -> usize {
        self.registry.len()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Active method names in slot order
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.registry.active_names()
    }

    /// Run one request/response cycle on a raw frame.
    ///
    /// Returns the serialized response, or an empty string when nothing must
    /// be sent back (notifications, whatever their outcome).
    pub fn handle_request(&self, text: &str) -> String {
        if self.config.features.logging {
            debug!(frame = text, "RX");
        }

        let request = match parse_request(text, self.config.max_request_size) {
            Ok(request) => request,
            Err(failure) => {
                debug!(%failure, "Rejected request frame");
                return self.encode(&failure.to_response().into());
            }
        };

        if request.is_notification() {
            self.handle_notification(&request);
            return String::new();
        }

        let response = self.dispatch(&request);
        self.encode(&response)
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        if !self.config.features.notifications {
            debug!(method = %request.method, "Notifications disabled, dropping");
            return;
        }
        let response = self.dispatch(request);
        if let Some(error) = response.error_object() {
            debug!(
                method = %request.method,
                code = error.code,
                kind = ?error.kind(),
                "Notification failed, no response sent"
            );
        }
    }

    /// Route a parsed request to a built-in or registered method.
    ///
    /// Never panics and never returns an unanswered request: every outcome,
    /// including a panicking handler, becomes a response.
    pub fn dispatch(&self, request: &JsonRpcRequest) -> RpcResponse {
        if is_reserved_method(&request.method) {
            return match Builtin::lookup(&request.method, &self.config) {
                Some(builtin) => builtin.execute(&self.registry, &self.config, request),
                None => JsonRpcError::method_not_found(request.id.clone(), &request.method).into(),
            };
        }

        match self.registry.find(&request.method) {
            Some(entry) => invoke(entry, request),
            None => {
                debug!(method = %request.method, "Method not found");
                JsonRpcError::method_not_found(request.id.clone(), &request.method).into()
            }
        }
    }

    /// Read one frame from `transport` and handle it; empty if nothing was read
    pub fn handle_transport<T: Transport>(&self, transport: &mut T) -> String {
        match transport.read() {
            Some(frame) if !frame.trim().is_empty() => self.handle_request(&frame),
            _ => String::new(),
        }
    }

    /// Read one frame, handle it and write back any reply.
    ///
    /// Returns `Ok(false)` if the transport had nothing to read.
    pub fn serve_once<T: Transport>(&self, transport: &mut T) -> Result<bool, TransportError> {
        let frame = match transport.read() {
            Some(frame) if !frame.trim().is_empty() => frame,
            _ => return Ok(false),
        };

        let reply = self.handle_request(&frame);
        if !reply.is_empty() {
            transport.write(&reply)?;
        }
        Ok(true)
    }

    fn encode(&self, response: &RpcResponse) -> String {
        let limit = self.config.response_limit();
        let text = match response.to_json_string() {
            Ok(text) if text.len() <= limit => text,
            Ok(text) => {
                warn!(
                    len = text.len(),
                    max = limit,
                    "Response too large, replacing with internal error"
                );
                let replacement = internal_error_text(response.id().cloned(), "Response too large");
                if replacement.len() <= limit {
                    replacement
                } else {
                    // the id alone does not fit
                    internal_error_text(None, "Response too large")
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                internal_error_text(response.id().cloned(), "Internal error")
            }
        };

        if self.config.features.logging {
            debug!(frame = %text, "TX");
        }
        text
    }
}

impl<const N: usize> Default for RpcServer<N> {
    fn default() -> Self {
        Self::with_config(ServerConfig::default())
    }
}

fn invoke(entry: &MethodEntry, request: &JsonRpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        entry.handler().handle(request.params.as_ref())
    }));

    match outcome {
        Ok(Ok(result)) => RpcResponse::result(result, id),
        Ok(Err(e)) => {
            warn!(method = entry.name(), error = %e, "Handler failed");
            JsonRpcError::internal_error(id, None).into()
        }
        Err(payload) => {
            error!(
                method = entry.name(),
                panic = panic_message(payload.as_ref()),
                "Handler panicked"
            );
            JsonRpcError::internal_error(id, None).into()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

fn internal_error_text(id: Option<RequestId>, message: &str) -> String {
    serde_json::to_string(&JsonRpcError::internal_error(id, Some(message.to_string())))
        .unwrap_or_else(|_| FALLBACK_INTERNAL_ERROR.to_string())
}

/// Longest prefix of `s` no longer than `max` bytes that ends on a char boundary
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
