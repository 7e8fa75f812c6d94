/// Motion tools
///
/// Each tool sends one command byte to the motion controller.

use std::sync::Arc;

use crate::board::MotionLink;
use crate::domain::{PropertyList, SchemaError, Tool, ToolRegistry};

/// Tool name, description and the command byte it sends
///
/// Names are the ones deployed clients already call, mixed casing included.
const MOTION_COMMANDS: [(&str, &str, u8); 10] = [
    ("move_forward", "Move the robot forward.", b'1'),
    ("move_backward", "Move the robot backward.", b'2'),
    ("move_Left", "Turn the robot to the left.", b'3'),
    ("move_Right", "Turn the robot to the right.", b'4'),
    ("STOP", "Stop any movement.", b'0'),
    ("nod_head", "Nod the head.", b'6'),
    ("shake_head", "Shake the head.", b'5'),
    ("move_LeftEar", "Wiggle the left ear once.", b'8'),
    ("move_RightEar", "Wiggle the right ear once.", b'9'),
    ("动两个耳朵", "Wiggle both ears once.", b'7'),
];

pub fn register(registry: &mut ToolRegistry, link: &Arc<dyn MotionLink>) -> Result<(), SchemaError> {
    for (name, description, command) in MOTION_COMMANDS {
        let link = Arc::clone(link);
        registry.register(Tool::new(name, description, PropertyList::empty(), move |_| {
            link.send_command(command)?;
            Ok(true.into())
        }));
    }
    Ok(())
}
