/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the dispatcher that:
/// 1. Reads one JSON-RPC message at a time
/// 2. Validates the envelope and routes it by method
/// 3. Answers `initialize` and `tools/list` directly and hands `tools/call`
///    to the call executor, which replies later on its own

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::runtime::Handle;
use tracing::{debug, error, info};

use crate::domain::{bind_arguments, ToolRegistry};
use crate::mcp::capabilities::CapabilityRegistry;
use crate::mcp::executor::{CallExecutor, PendingCall};
use crate::mcp::pagination::{envelope_overhead, list_tools};
use crate::mcp::protocol::*;
use crate::mcp::transport::MessageSink;
use crate::mcp::McpError;
use crate::{ServerConfig, ServerError};

/// Outcome of envelope validation
#[derive(Debug, PartialEq)]
enum Inbound {
    Request(RequestEnvelope),
    Notification(String),
    Rejected { id: Value, error: McpError },
}

/// MCP server that handles communication with the orchestrator
pub struct McpServer {
    /// Read-only after composition
    registry: Arc<ToolRegistry>,
    capabilities: CapabilityRegistry,
    executor: CallExecutor,
    sink: Arc<dyn MessageSink>,
    server_name: String,
    server_version: String,
    payload_limit: usize,
}

impl McpServer {
    /// Create a new MCP server
    ///
    /// Calls that wait for an execution slot are parked on `runtime`, so
    /// `handle_message` itself may be called from any thread.
    pub fn new(
        registry: ToolRegistry,
        capabilities: CapabilityRegistry,
        sink: Arc<dyn MessageSink>,
        config: &ServerConfig,
        runtime: Handle,
    ) -> Self {
        let executor = CallExecutor::new(
            Arc::clone(&sink),
            config.max_concurrent_calls,
            config.default_stack_size,
            runtime,
        );
        Self {
            registry: Arc::new(registry),
            capabilities,
            executor,
            sink,
            server_name: config.server_name.clone(),
            server_version: config.server_version.clone(),
            payload_limit: config.payload_limit,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle line-delimited messages until the reader is exhausted
    pub async fn run<R>(&self, reader: R) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
    {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            self.handle_message(&line);
        }

        info!("MCP server shutting down (input closed)");
        Ok(())
    }

    /// Process one inbound message to completion
    ///
    /// Replies for `tools/call` are produced later by the executor; every
    /// other reply is sent before this returns.
    pub fn handle_message(&self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }

        debug!("Processing request: {}", message);

        let json: Value = match serde_json::from_str(message) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to parse MCP message: {}", e);
                return;
            }
        };
        let Some(object) = json.as_object() else {
            error!("Failed to parse MCP message: not a JSON object");
            return;
        };

        match parse_envelope(object) {
            Inbound::Request(request) => self.handle_request(request),
            Inbound::Notification(method) => debug!("Ignoring notification: {}", method),
            Inbound::Rejected { id, error: err } => {
                error!("Rejected message: {}", err);
                self.sink.send_reply(&JsonRpcResponse::error(id, err.to_string()));
            }
        }
    }

    fn handle_request(&self, request: RequestEnvelope) {
        let id = request.id;
        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params.as_ref()),
            "tools/list" => self.handle_tools_list(id, request.params.as_ref()),
            "tools/call" => match self.prepare_tool_call(id, request.params.as_ref()) {
                Ok(call) => {
                    self.executor.execute(call);
                    return;
                }
                Err(e) => Err(e),
            },
            _ => Err(McpError::MethodNotImplemented(request.method.clone())),
        };

        let reply = match result {
            Ok(value) => JsonRpcResponse::success(json!(id), value),
            Err(e) => {
                error!("{}: {}", request.method, e);
                JsonRpcResponse::error(json!(id), e.to_string())
            }
        };
        self.sink.send_reply(&reply);
    }

    /// Handle MCP initialization request
    fn handle_initialize(&self, params: Option<&Map<String, Value>>) -> Result<Value, McpError> {
        info!("MCP client connected");

        if let Some(capabilities) = params
            .and_then(|p| p.get("capabilities"))
            .and_then(Value::as_object)
        {
            self.capabilities.apply(capabilities);
        }

        let result = InitializeResult::new(&self.server_name, &self.server_version);
        Ok(serde_json::to_value(result)?)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: i64, params: Option<&Map<String, Value>>) -> Result<Value, McpError> {
        let cursor = params
            .and_then(|p| p.get("cursor"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        // The page budget is what remains of one message after the envelope
        let budget = self.payload_limit.saturating_sub(envelope_overhead(&json!(id))?);
        let page = list_tools(&self.registry, cursor, budget)?;
        debug!(
            "tools/list: {} tools, next cursor {:?}",
            page.tools.len(),
            page.next_cursor
        );
        Ok(serde_json::to_value(page)?)
    }

    /// Validate a tools/call request and bind its arguments
    fn prepare_tool_call(&self, id: i64, params: Option<&Map<String, Value>>) -> Result<PendingCall, McpError> {
        let params = params.ok_or(McpError::MissingParams)?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or(McpError::MissingOrInvalidToolName)?;

        let arguments = match params.get("arguments") {
            None => None,
            Some(Value::Object(arguments)) => Some(arguments),
            Some(_) => return Err(McpError::InvalidArguments),
        };

        let stack_size = match params.get("stackSize") {
            None => self.executor.default_stack_size(),
            Some(value) => numeric(value).ok_or(McpError::InvalidStackSize)?.max(0) as usize,
        };

        let tool = self
            .registry
            .lookup(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        let arguments = bind_arguments(tool.properties(), arguments)?;

        Ok(PendingCall {
            id,
            tool: tool.clone(),
            arguments,
            stack_size,
        })
    }
}

/// Integer value of a JSON number
///
/// Integral floats such as `3.0` are accepted. Fractions and values outside
/// the `i64` range are not, since a changed id could never be correlated.
fn numeric(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Validate the envelope fields in protocol order
fn parse_envelope(object: &Map<String, Value>) -> Inbound {
    // Errors found before the id check still answer a usable id
    let fallback_id = object
        .get("id")
        .and_then(numeric)
        .map(|id| json!(id))
        .unwrap_or(Value::Null);
    let reject = |error| Inbound::Rejected { id: fallback_id.clone(), error };

    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return reject(McpError::InvalidVersion);
    }

    let Some(method) = object.get("method").and_then(Value::as_str) else {
        return reject(McpError::MissingMethod);
    };

    if method.starts_with(NOTIFICATION_PREFIX) {
        return Inbound::Notification(method.to_string());
    }

    let params = match object.get("params") {
        None => None,
        Some(Value::Object(params)) => Some(params.clone()),
        Some(_) => return reject(McpError::InvalidParams),
    };

    let Some(id) = object.get("id").and_then(numeric) else {
        return Inbound::Rejected { id: Value::Null, error: McpError::InvalidId };
    };

    Inbound::Request(RequestEnvelope {
        id,
        method: method.to_string(),
        params,
    })
}
