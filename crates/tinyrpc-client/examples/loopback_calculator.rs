//! Loopback Calculator Example
//!
//! A calculator server and a client talking JSON-RPC over an in-memory link,
//! each on its own thread, the way a host and a device would over a UART.
//!
//! Run with `RUST_LOG=debug` to see every frame.

use std::thread;
use std::time::Duration;

use serde_json::{Value, json};
use tinyrpc_client::RpcClient;
use tinyrpc_protocol::{MemoryTransport, RequestParams};
use tinyrpc_server::{HandlerError, HandlerResult, RpcServer, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn operands(params: Option<&RequestParams>) -> Result<(f64, f64), HandlerError> {
    let params = params.ok_or_else(|| HandlerError::failed("Missing parameters"))?;
    let a = params
        .get("a")
        .or_else(|| params.get_index(0))
        .and_then(Value::as_f64)
        .ok_or_else(|| HandlerError::failed("Parameter 'a' must be a number"))?;
    let b = params
        .get("b")
        .or_else(|| params.get_index(1))
        .and_then(Value::as_f64)
        .ok_or_else(|| HandlerError::failed("Parameter 'b' must be a number"))?;
    Ok((a, b))
}

fn add(params: Option<&RequestParams>) -> HandlerResult {
    let (a, b) = operands(params)?;
    Ok(json!(a + b))
}

fn divide(params: Option<&RequestParams>) -> HandlerResult {
    let (a, b) = operands(params)?;
    if b == 0.0 {
        return Err(HandlerError::failed("Division by zero"));
    }
    Ok(json!(a / b))
}

fn calculator() -> RpcServer {
    let mut server = RpcServer::with_config(ServerConfig::default().with_logging(true));
    server.add_method_with_schema("add", add, "Sum of a and b", true);
    server.add_method_with_schema("divide", divide, "Quotient of a and b", true);
    server.add_simple_method("ping", || Ok(json!("pong")));
    server.add_method("log", |params: Option<&RequestParams>| {
        info!(message = ?params.map(RequestParams::to_value), "Device log");
        Ok(Value::Null)
    });
    server
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (mut device, host) = MemoryTransport::pair();

    let server_thread = thread::spawn(move || -> anyhow::Result<()> {
        let server = calculator();
        while !device.is_closed() {
            if !server.serve_once(&mut device)? {
                thread::sleep(Duration::from_millis(1));
            }
        }
        Ok(())
    });

    let mut client = RpcClient::new(host);
    client.set_timeout(Duration::from_millis(500));

    let sum = client.call("add", Some(json!({"a": 2, "b": 3})));
    info!(result = ?sum.result_value(), "add(2, 3)");

    let quotient = client.call("divide", Some(json!([10, 4])));
    info!(result = ?quotient.result_value(), "divide(10, 4)");

    let failed = client.call("divide", Some(json!([1, 0])));
    info!(code = ?failed.error_code(), message = ?failed.error_message(), "divide(1, 0)");

    let methods = client.call("__rpc.listMethods", None);
    info!(methods = ?methods.result_value(), "Registered methods");

    let described = client.call("__rpc.describe", Some(json!({"method": "add"})));
    info!(schema = ?described.result_value(), "describe(add)");

    client.notify("log", Some(json!({"event": "demo finished"})))?;

    drop(client);
    server_thread
        .join()
        .map_err(|_| anyhow::anyhow!("server thread panicked"))??;
    Ok(())
}
