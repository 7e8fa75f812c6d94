/// Tool for taking and explaining photos
///
/// This module implements the `self.camera.take_photo` MCP tool.

use std::sync::Arc;

use serde_json::json;

use crate::board::Camera;
use crate::domain::{Property, PropertyList, PropertyType, SchemaError, Tool, ToolFault, ToolRegistry};

const TAKE_PHOTO_DESCRIPTION: &str = "Take a photo and explain it. Use this tool after the user asks you to see something.\n\
Args:\n  `question`: The question that you want to ask about the photo.\n\
Return:\n  A JSON object that provides the photo information.";

pub fn register(registry: &mut ToolRegistry, camera: &Arc<dyn Camera>) -> Result<(), SchemaError> {
    let camera = Arc::clone(camera);
    registry.register(Tool::new(
        "self.camera.take_photo",
        TAKE_PHOTO_DESCRIPTION,
        PropertyList::new(vec![Property::new("question", PropertyType::String)])?,
        move |args| {
            if !camera.capture() {
                return Ok(json!({"success": false, "message": "Failed to capture photo"})
                    .to_string()
                    .into());
            }
            let question = args.string("question").ok_or_else(|| ToolFault::new("question is not bound"))?;
            Ok(camera.explain(question)?.into())
        },
    ));
    Ok(())
}
