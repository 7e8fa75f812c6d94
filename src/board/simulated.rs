/// In-process board used when no real hardware is attached
///
/// Every collaborator keeps its state in memory (the theme goes through
/// `Settings`), which makes the server usable on a development host and in
/// tests.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::board::{AudioCodec, Backlight, Camera, DeviceStatus, DisplayPanel, MotionLink, Settings};
use crate::domain::ToolFault;

pub const DEFAULT_VOLUME: i64 = 70;
pub const DEFAULT_BRIGHTNESS: i64 = 80;
pub const DEFAULT_THEME: &str = "light";

/// Themes the display knows how to draw
pub const THEMES: [&str; 2] = ["light", "dark"];

#[derive(Debug)]
pub struct SimulatedAudio {
    volume: AtomicI64,
}

impl SimulatedAudio {
    pub fn new(volume: i64) -> Self {
        Self { volume: AtomicI64::new(volume) }
    }
}

impl AudioCodec for SimulatedAudio {
    fn output_volume(&self) -> i64 {
        self.volume.load(Ordering::SeqCst)
    }

    fn set_output_volume(&self, volume: i64) {
        info!("Speaker volume set to {}", volume);
        self.volume.store(volume, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct SimulatedBacklight {
    brightness: AtomicI64,
}

impl SimulatedBacklight {
    pub fn new(brightness: i64) -> Self {
        Self { brightness: AtomicI64::new(brightness) }
    }
}

impl Backlight for SimulatedBacklight {
    fn brightness(&self) -> i64 {
        self.brightness.load(Ordering::SeqCst)
    }

    fn set_brightness(&self, brightness: i64) {
        info!("Backlight brightness set to {}", brightness);
        self.brightness.store(brightness, Ordering::SeqCst);
    }
}

/// Display whose theme is persisted under the `theme` settings key
#[derive(Debug)]
pub struct SettingsDisplay {
    settings: Arc<Settings>,
}

impl SettingsDisplay {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl DisplayPanel for SettingsDisplay {
    fn theme(&self) -> String {
        self.settings.get_string("theme", DEFAULT_THEME)
    }

    fn set_theme(&self, theme: &str) -> Result<(), ToolFault> {
        if !THEMES.contains(&theme) {
            return Err(ToolFault::new(format!("Invalid theme: {}", theme)));
        }
        self.settings
            .set_string("theme", theme)
            .map_err(|e| ToolFault::new(e.to_string()))?;
        info!("Display theme set to {}", theme);
        Ok(())
    }
}

/// Camera that "captures" numbered frames and describes them locally
#[derive(Debug, Default)]
pub struct SimulatedCamera {
    frames: AtomicU64,
    endpoint: Mutex<Option<(String, String)>>,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explain service url and token, once configured
    pub fn explain_endpoint(&self) -> Option<(String, String)> {
        self.endpoint.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Camera for SimulatedCamera {
    fn capture(&self) -> bool {
        let frame = self.frames.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Captured frame {}", frame);
        true
    }

    fn explain(&self, question: &str) -> Result<String, ToolFault> {
        let (url, _token) = self
            .explain_endpoint()
            .ok_or_else(|| ToolFault::new("Image explain URL is not set"))?;
        let frame = self.frames.load(Ordering::SeqCst);
        if frame == 0 {
            return Err(ToolFault::new("No frame captured"));
        }

        Ok(json!({
            "success": true,
            "frame": frame,
            "question": question,
            "service": url,
            "result": "Simulated camera: no real image is available on this host",
        })
        .to_string())
    }

    fn set_explain_url(&self, url: &str, token: &str) {
        *self.endpoint.lock().unwrap_or_else(|e| e.into_inner()) = Some((url.to_string(), token.to_string()));
    }
}

/// Status payload built from the other collaborators
pub struct BoardStatus {
    audio: Arc<dyn AudioCodec>,
    backlight: Option<Arc<dyn Backlight>>,
    display: Option<Arc<dyn DisplayPanel>>,
    started: Instant,
}

impl BoardStatus {
    pub fn new(
        audio: Arc<dyn AudioCodec>,
        backlight: Option<Arc<dyn Backlight>>,
        display: Option<Arc<dyn DisplayPanel>>,
    ) -> Self {
        Self {
            audio,
            backlight,
            display,
            started: Instant::now(),
        }
    }
}

impl DeviceStatus for BoardStatus {
    fn status_json(&self) -> String {
        let mut screen = serde_json::Map::new();
        if let Some(backlight) = &self.backlight {
            screen.insert("brightness".to_string(), json!(backlight.brightness()));
        }
        if let Some(display) = &self.display {
            screen.insert("theme".to_string(), json!(display.theme()));
        }

        json!({
            "audio_speaker": {"volume": self.audio.output_volume()},
            "screen": screen,
            "uptime_seconds": self.started.elapsed().as_secs(),
            "timestamp": Utc::now().to_rfc3339(),
        })
        .to_string()
    }
}

/// Motion link writing command bytes to a serial device (or any file)
#[derive(Debug)]
pub struct SerialMotionLink {
    path: PathBuf,
    device: Mutex<File>,
}

impl SerialMotionLink {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let device = OpenOptions::new().write(true).create(true).append(true).open(&path)?;
        info!("Motion link opened on {}", path.display());
        Ok(Self {
            path,
            device: Mutex::new(device),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MotionLink for SerialMotionLink {
    fn send_command(&self, command: u8) -> Result<(), ToolFault> {
        let mut device = self.device.lock().unwrap_or_else(|e| e.into_inner());
        device.write_all(&[command])?;
        device.flush()?;
        debug!("Motion command sent: {}", command as char);
        Ok(())
    }
}

/// Motion link that only logs commands
#[derive(Debug, Default)]
pub struct LoggingMotionLink {
    sent: Mutex<Vec<u8>>,
}

impl LoggingMotionLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands sent so far, oldest first
    pub fn sent(&self) -> Vec<u8> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl MotionLink for LoggingMotionLink {
    fn send_command(&self, command: u8) -> Result<(), ToolFault> {
        info!("Motion command: {}", command as char);
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(command);
        Ok(())
    }
}
