/// Device status, speaker and screen tools
///
/// This module implements `self.get_device_status` and the setters for
/// volume, brightness and theme.

use std::sync::Arc;

use crate::board::Board;
use crate::domain::{Property, PropertyList, PropertyType, SchemaError, Tool, ToolFault, ToolRegistry};

const STATUS_DESCRIPTION: &str = "Provides the real-time information of the device, including the current status of the audio speaker, screen, battery, network, etc.\n\
Use this tool for: \n\
1. Answering questions about current condition (e.g. what is the current volume of the audio speaker?)\n\
2. As the first step to control the device (e.g. turn up / down the volume of the audio speaker, etc.)";

pub fn register(registry: &mut ToolRegistry, board: &Board) -> Result<(), SchemaError> {
    let status = Arc::clone(&board.status);
    registry.register(Tool::new(
        "self.get_device_status",
        STATUS_DESCRIPTION,
        PropertyList::empty(),
        move |_| Ok(status.status_json().into()),
    ));

    let audio = Arc::clone(&board.audio);
    registry.register(Tool::new(
        "self.audio_speaker.set_volume",
        "Set the volume of the audio speaker. If the current volume is unknown, you must call `self.get_device_status` tool first and then call this tool.",
        PropertyList::new(vec![Property::ranged("volume", 0, 100)?])?,
        move |args| {
            let volume = args.integer("volume").ok_or_else(|| ToolFault::new("volume is not bound"))?;
            audio.set_output_volume(volume);
            Ok(true.into())
        },
    ));

    if let Some(backlight) = &board.backlight {
        let backlight = Arc::clone(backlight);
        registry.register(Tool::new(
            "self.screen.set_brightness",
            "Set the brightness of the screen.",
            PropertyList::new(vec![Property::ranged("brightness", 0, 100)?])?,
            move |args| {
                let brightness = args
                    .integer("brightness")
                    .ok_or_else(|| ToolFault::new("brightness is not bound"))?;
                backlight.set_brightness(brightness);
                Ok(true.into())
            },
        ));
    }

    // Themes are only offered when the display reports one
    if let Some(display) = board.display.as_ref().filter(|d| !d.theme().is_empty()) {
        let display = Arc::clone(display);
        registry.register(Tool::new(
            "self.screen.set_theme",
            "Set the theme of the screen. The theme can be `light` or `dark`.",
            PropertyList::new(vec![Property::new("theme", PropertyType::String)])?,
            move |args| {
                let theme = args.string("theme").ok_or_else(|| ToolFault::new("theme is not bound"))?;
                display.set_theme(theme)?;
                Ok(true.into())
            },
        ));
    }

    Ok(())
}
