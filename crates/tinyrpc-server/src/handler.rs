use serde_json::Value;
use thiserror::Error;
use tinyrpc_protocol::RequestParams;

/// Result type returned by method handlers
pub type HandlerResult = Result<Value, HandlerError>;

/// Failure signalled by a method handler.
///
/// Whatever the variant, the caller receives the same internal-error
/// response; the detail only reaches the log.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Anything callable with a request's params may be registered as a method
pub trait MethodHandler: Send {
    fn handle(&self, params: Option<&RequestParams>) -> HandlerResult;
}

impl<F> MethodHandler for F
where
    F: Fn(Option<&RequestParams>) -> HandlerResult + Send,
{
    fn handle(&self, params: Option<&RequestParams>) -> HandlerResult {
        self(params)
    }
}

/// Adapter for handlers that take no parameters
pub struct SimpleHandler<F>(pub F);

impl<F> MethodHandler for SimpleHandler<F>
where
    F: Fn() -> HandlerResult + Send,
{
    fn handle(&self, _params: Option<&RequestParams>) -> HandlerResult {
        (self.0)()
    }
}

/// Wrap a zero-argument closure so it ignores whatever params arrive
pub fn simple<F>(f: F) -> SimpleHandler<F>
where
    F: Fn() -> HandlerResult + Send,
{
    SimpleHandler(f)
}
