/// Background execution of tool calls
///
/// Every validated `tools/call` becomes a `PendingCall` that runs on its own
/// short-lived `tool_call` thread, sized by the caller's stack hint. The
/// thread emits the single reply for the call itself. An admission semaphore
/// bounds how many calls run at once; excess calls wait for a permit on the
/// runtime the executor was built with, never on the dispatcher.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use serde_json::json;
use tokio::runtime::Handle;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, error};

use crate::domain::{PropertyList, Tool};
use crate::mcp::protocol::{JsonRpcResponse, ToolCallResult};
use crate::mcp::transport::MessageSink;
use crate::mcp::McpError;

/// Stack size for a call that sends no `stackSize` hint
pub const DEFAULT_STACK_SIZE: usize = 256 * 1024;
pub const MIN_STACK_SIZE: usize = 64 * 1024;
pub const MAX_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Calls allowed to run at the same time
pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 8;

/// A validated call waiting to run
#[derive(Debug)]
pub struct PendingCall {
    pub id: i64,
    pub tool: Tool,
    pub arguments: PropertyList,
    pub stack_size: usize,
}

/// Runs pending calls off the request-processing path
pub struct CallExecutor {
    sink: Arc<dyn MessageSink>,
    permits: Arc<Semaphore>,
    default_stack_size: usize,
    runtime: Handle,
}

impl CallExecutor {
    /// `max_concurrent_calls` is clamped to `1..=Semaphore::MAX_PERMITS`
    pub fn new(
        sink: Arc<dyn MessageSink>,
        max_concurrent_calls: usize,
        default_stack_size: usize,
        runtime: Handle,
    ) -> Self {
        let permits = max_concurrent_calls.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            sink,
            permits: Arc::new(Semaphore::new(permits)),
            default_stack_size,
            runtime,
        }
    }

    pub fn default_stack_size(&self) -> usize {
        self.default_stack_size
    }

    /// Start a call and return immediately
    ///
    /// When no permit is free the call is parked on a task of the executor's
    /// runtime until one is released.
    pub fn execute(&self, call: PendingCall) {
        match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => spawn_call(call, Arc::clone(&self.sink), permit),
            Err(_) => {
                debug!("tools/call {}: waiting for a free execution slot", call.id);
                let permits = Arc::clone(&self.permits);
                let sink = Arc::clone(&self.sink);
                self.runtime.spawn(async move {
                    match permits.acquire_owned().await {
                        Ok(permit) => spawn_call(call, sink, permit),
                        Err(e) => {
                            error!("tools/call {}: {}", call.id, e);
                            sink.send_reply(&JsonRpcResponse::error(json!(call.id), e.to_string()));
                        }
                    }
                });
            }
        }
    }
}

fn clamp_stack_size(requested: usize) -> usize {
    requested.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE)
}

fn spawn_call(call: PendingCall, sink: Arc<dyn MessageSink>, permit: OwnedSemaphorePermit) {
    let id = call.id;
    let thread_sink = Arc::clone(&sink);

    let spawned = thread::Builder::new()
        .name("tool_call".to_string())
        .stack_size(clamp_stack_size(call.stack_size))
        .spawn(move || {
            let _permit = permit;
            let reply = run_call(&call);
            thread_sink.send_reply(&reply);
        });

    if let Err(e) = spawned {
        error!("tools/call {}: failed to start thread: {}", id, e);
        sink.send_reply(&JsonRpcResponse::error(json!(id), format!("Failed to start tool call: {}", e)));
    }
}

/// Invoke the capability and turn the outcome into the call's reply
fn run_call(call: &PendingCall) -> JsonRpcResponse {
    let id = json!(call.id);
    debug!("tools/call {}: running {}", call.id, call.tool.name());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| call.tool.call(&call.arguments)));
    let fault = match outcome {
        Ok(Ok(value)) => {
            return match serde_json::to_value(ToolCallResult::success(value.to_text())) {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::error(id, McpError::from(e).to_string()),
            };
        }
        Ok(Err(fault)) => McpError::ExecutionFault(fault.message),
        Err(payload) => McpError::ExecutionFault(panic_message(payload.as_ref())),
    };

    error!("tools/call: {}", fault);
    JsonRpcResponse::error(id, fault.to_string())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Tool call panicked".to_string()
    }
}
