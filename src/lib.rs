/// Public library interface for the device MCP server
///
/// This module exports the server, the tool model and the board
/// collaborator traits so other applications (or tests) can compose their
/// own set of device tools.

use std::sync::Arc;
use thiserror::Error;

// Internal modules
pub mod board;
pub mod domain;
pub mod mcp;
pub mod tools;

// Re-export public modules and types
pub use board::Board;
pub use domain::*;
pub use mcp::{ChannelSink, McpError, McpServer, MessageSink};

use mcp::capabilities::{CapabilityRegistry, VisionCapability};
use mcp::executor::{DEFAULT_MAX_CONCURRENT_CALLS, DEFAULT_STACK_SIZE};
use mcp::pagination::DEFAULT_PAYLOAD_LIMIT;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Tool schema error: {0}")]
    Schema(#[from] domain::SchemaError),

    #[error("Settings error: {0}")]
    Settings(#[from] board::SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runtime configuration of the server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Reported in `serverInfo.name`
    pub server_name: String,
    /// Reported in `serverInfo.version`
    pub server_version: String,
    /// Size ceiling of one outbound message, used to paginate `tools/list`
    pub payload_limit: usize,
    /// Tool calls allowed to run at once
    pub max_concurrent_calls: usize,
    /// Stack size for calls that send no `stackSize` hint
    pub default_stack_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: "device-mcp".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            payload_limit: DEFAULT_PAYLOAD_LIMIT,
            max_concurrent_calls: DEFAULT_MAX_CONCURRENT_CALLS,
            default_stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

/// Device server: a board, its composed tools and the MCP front end
///
/// Composition happens once in `new`; afterwards the tool set is fixed.
pub struct DeviceMcpServer {
    config: ServerConfig,
    registry: ToolRegistry,
    capabilities: CapabilityRegistry,
}

impl DeviceMcpServer {
    /// Compose the server for `board`
    ///
    /// `board_tools` are registered first; the common device tools are then
    /// placed ahead of them in listing order.
    pub fn new(config: ServerConfig, board: &Board, board_tools: Vec<Tool>) -> Result<Self, ServerError> {
        tracing::info!("Initializing device MCP server for board: {}", board.name);

        let mut registry = ToolRegistry::new();
        for tool in board_tools {
            registry.register(tool);
        }
        tools::add_common_tools(&mut registry, board)?;

        let mut capabilities = CapabilityRegistry::new();
        if let Some(camera) = &board.camera {
            capabilities.register("vision", Arc::new(VisionCapability::new(Arc::clone(camera))));
        }

        Ok(Self {
            config,
            registry,
            capabilities,
        })
    }

    /// Get a reference to the composed registry (useful for testing)
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the dispatcher, sending every reply through `sink`
    ///
    /// Calls waiting for an execution slot are parked on `runtime`.
    pub fn into_mcp_server(self, sink: Arc<dyn MessageSink>, runtime: tokio::runtime::Handle) -> McpServer {
        McpServer::new(self.registry, self.capabilities, sink, &self.config, runtime)
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns once stdin is closed and every in-flight call has replied.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server with {} tools", self.registry.len());

        let (sink, receiver) = ChannelSink::channel();
        let writer = tokio::spawn(mcp::transport::write_lines(receiver, tokio::io::stdout()));

        let server = self.into_mcp_server(Arc::new(sink), tokio::runtime::Handle::current());
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        server.run(stdin).await?;

        // The writer finishes when the last running call drops its sink
        drop(server);
        match writer.await {
            Ok(result) => result?,
            Err(e) => tracing::error!("Writer task failed: {}", e),
        }
        Ok(())
    }
}
