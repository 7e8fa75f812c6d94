/// Paginated tool discovery
///
/// `tools/list` replies must fit in a single transport message, so the
/// registry is walked in order and cut into pages under a payload budget.
/// The cursor handed back is the name of the first tool that did not fit.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::domain::{ToolDescriptor, ToolRegistry};
use crate::mcp::protocol::JsonRpcResponse;
use crate::mcp::McpError;

/// Practical message-size ceiling of the transport
pub const DEFAULT_PAYLOAD_LIMIT: usize = 8000;

const PAGE_PREFIX: &str = r#"{"tools":["#;
const PAGE_SUFFIX: &str = "}";
const CURSOR_FIELD: &str = r#","nextCursor":"#;

/// One page of the `tools/list` result
#[derive(Debug, Serialize)]
pub struct ToolsPage<'a> {
    pub tools: Vec<ToolDescriptor<'a>>,
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Bytes the JSON-RPC envelope adds around a result answering `id`
pub fn envelope_overhead(id: &Value) -> Result<usize, McpError> {
    let empty = serde_json::to_string(&JsonRpcResponse::success(id.clone(), Value::Null))?;
    Ok(empty.len() - "null".len())
}

/// Produce the page that starts at `cursor` (or at the first tool when empty)
///
/// `payload_limit` bounds the serialized page, `nextCursor` included. A tool
/// is only taken when the page still fits with the cursor that would follow
/// it, so a truncated page never outgrows the limit. A cursor naming no
/// registered tool yields an empty final page. A tool that cannot fit even
/// on a page of its own is reported as `PayloadTooLarge` instead of being
/// skipped.
pub fn list_tools<'a>(
    registry: &'a ToolRegistry,
    cursor: &str,
    payload_limit: usize,
) -> Result<ToolsPage<'a>, McpError> {
    let all = registry.all_in_order();
    let start = if cursor.is_empty() {
        0
    } else {
        match all.iter().position(|t| t.name() == cursor) {
            Some(start) => start,
            None => {
                debug!("tools/list: cursor {} matches no tool", cursor);
                return Ok(ToolsPage { tools: Vec::new(), next_cursor: None });
            }
        }
    };

    // Running size counts each descriptor with a trailing separator, which
    // also pays for the closing bracket of the array
    let mut size = PAGE_PREFIX.len() + PAGE_SUFFIX.len();
    let mut tools = Vec::new();
    let mut next_cursor = None;

    for (index, tool) in all.iter().enumerate().skip(start) {
        let descriptor = tool.descriptor();
        let tool_size = serde_json::to_string(&descriptor)?.len() + 1;
        let cursor_size = match all.get(index + 1) {
            Some(next) => cursor_field_size(next.name())?,
            None => 0,
        };

        if size + tool_size + cursor_size > payload_limit {
            if tools.is_empty() {
                error!("tools/list: Failed to add tool {} because of payload size limit", tool.name());
                return Err(McpError::PayloadTooLarge(tool.name().to_string()));
            }
            next_cursor = Some(tool.name().to_string());
            break;
        }

        size += tool_size;
        tools.push(descriptor);
    }

    Ok(ToolsPage { tools, next_cursor })
}

fn cursor_field_size(name: &str) -> Result<usize, McpError> {
    Ok(CURSOR_FIELD.len() + serde_json::to_string(name)?.len())
}
