/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication: envelope
/// parsing and routing, paginated tool discovery, capability negotiation and
/// the background execution of tool calls.

pub mod protocol;
pub mod pagination;
pub mod capabilities;
pub mod executor;
pub mod transport;
pub mod server;

// Re-export main types
pub use capabilities::{CapabilityHandler, CapabilityRegistry, VisionCapability};
pub use executor::{CallExecutor, PendingCall};
pub use pagination::{list_tools, ToolsPage};
pub use server::McpServer;
pub use transport::{ChannelSink, MessageSink};

use thiserror::Error;
use crate::domain::BindError;

/// Errors answered with a JSON-RPC error reply
///
/// The `Display` text is exactly the `message` sent on the wire.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum McpError {
    #[error("Invalid JSON-RPC version")]
    InvalidVersion,

    #[error("Missing method")]
    MissingMethod,

    #[error("Invalid params")]
    InvalidParams,

    #[error("Invalid id")]
    InvalidId,

    #[error("Method not implemented: {0}")]
    MethodNotImplemented(String),

    #[error("Missing params")]
    MissingParams,

    #[error("Missing name")]
    MissingOrInvalidToolName,

    #[error("Invalid arguments")]
    InvalidArguments,

    #[error("Invalid stackSize")]
    InvalidStackSize,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Binding(#[from] BindError),

    #[error("Failed to add tool {0} because of payload size limit")]
    PayloadTooLarge(String),

    #[error("{0}")]
    ExecutionFault(String),

    #[error("Failed to serialize reply: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Serialization(err.to_string())
    }
}
