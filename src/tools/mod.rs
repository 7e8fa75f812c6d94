/// Device tools exposed over MCP
///
/// This module is the composition layer: it builds the tools a board
/// supports and registers them, handing each tool explicit references to the
/// collaborators it drives.

pub mod motion;
pub mod device;
pub mod camera;

use crate::board::Board;
use crate::domain::{SchemaError, ToolRegistry};

/// Register the common device tools ahead of any tools already present
///
/// Tools registered earlier (board specific ones) are moved behind the
/// common batch so that discovery tools such as `self.get_device_status`
/// are listed first.
pub fn add_common_tools(registry: &mut ToolRegistry, board: &Board) -> Result<(), SchemaError> {
    let earlier_tools = registry.take_all();

    if let Some(link) = &board.motion {
        motion::register(registry, link)?;
    }
    device::register(registry, board)?;
    if let Some(camera) = &board.camera {
        camera::register(registry, camera)?;
    }

    for tool in earlier_tools {
        registry.register(tool);
    }
    Ok(())
}
