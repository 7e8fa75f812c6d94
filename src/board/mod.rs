/// Board-level collaborators used by the device tools
///
/// The MCP core never talks to hardware directly. Tools are composed with
/// explicit references to these traits, so a real board and the simulated
/// one below are interchangeable.

pub mod settings;
pub mod simulated;

pub use settings::{default_settings_path, Settings, SettingsError};
pub use simulated::*;

use std::sync::Arc;
use crate::domain::ToolFault;

/// Audio output (speaker) volume control, 0..=100
pub trait AudioCodec: Send + Sync {
    fn output_volume(&self) -> i64;
    fn set_output_volume(&self, volume: i64);
}

/// Screen backlight, 0..=100
pub trait Backlight: Send + Sync {
    fn brightness(&self) -> i64;
    fn set_brightness(&self, brightness: i64);
}

/// A display that supports themes
pub trait DisplayPanel: Send + Sync {
    /// Current theme name, empty when themes are unsupported
    fn theme(&self) -> String;
    fn set_theme(&self, theme: &str) -> Result<(), ToolFault>;
}

/// Camera with a remote "explain this picture" service
pub trait Camera: Send + Sync {
    /// Grab a frame; `false` when the sensor produced nothing
    fn capture(&self) -> bool;
    /// Ask the explain service about the last captured frame
    fn explain(&self, question: &str) -> Result<String, ToolFault>;
    fn set_explain_url(&self, url: &str, token: &str);
}

/// Source of the opaque device status payload
pub trait DeviceStatus: Send + Sync {
    fn status_json(&self) -> String;
}

/// Single-byte command link to the motion controller
pub trait MotionLink: Send + Sync {
    fn send_command(&self, command: u8) -> Result<(), ToolFault>;
}

/// The collaborators available on one board
#[derive(Clone)]
pub struct Board {
    pub name: String,
    pub audio: Arc<dyn AudioCodec>,
    pub status: Arc<dyn DeviceStatus>,
    pub backlight: Option<Arc<dyn Backlight>>,
    pub display: Option<Arc<dyn DisplayPanel>>,
    pub camera: Option<Arc<dyn Camera>>,
    pub motion: Option<Arc<dyn MotionLink>>,
}
