/// Shared fixtures: a simulated board wired to a dispatcher whose replies
/// are collected from a channel
use device_mcp::board::{
    Board, BoardStatus, LoggingMotionLink, Settings, SettingsDisplay, SimulatedAudio,
    SimulatedBacklight, SimulatedCamera,
};
use device_mcp::*;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

pub struct Harness {
    pub server: McpServer,
    pub receiver: UnboundedReceiver<String>,
    pub audio: Arc<SimulatedAudio>,
    pub motion: Arc<LoggingMotionLink>,
    pub camera: Arc<SimulatedCamera>,
    _settings_dir: TempDir,
}

pub fn board() -> (Board, Arc<SimulatedAudio>, Arc<LoggingMotionLink>, Arc<SimulatedCamera>, TempDir) {
    let settings_dir = TempDir::new().expect("Failed to create temp dir");
    let settings = Arc::new(
        Settings::load(settings_dir.path().join("settings.json")).expect("Failed to load settings"),
    );

    let audio = Arc::new(SimulatedAudio::new(70));
    let backlight = Arc::new(SimulatedBacklight::new(80));
    let display = Arc::new(SettingsDisplay::new(settings));
    let motion = Arc::new(LoggingMotionLink::new());
    let camera = Arc::new(SimulatedCamera::new());

    let board = Board {
        name: "test-board".to_string(),
        audio: audio.clone(),
        status: Arc::new(BoardStatus::new(audio.clone(), Some(backlight.clone()), Some(display.clone()))),
        backlight: Some(backlight),
        display: Some(display),
        camera: Some(camera.clone()),
        motion: Some(motion.clone()),
    };
    (board, audio, motion, camera, settings_dir)
}

/// Must be called from within a tokio runtime
pub fn harness(config: ServerConfig, board_tools: Vec<Tool>) -> Harness {
    let (board, audio, motion, camera, settings_dir) = board();
    let device = DeviceMcpServer::new(config, &board, board_tools).expect("Failed to compose server");

    let (sink, receiver) = ChannelSink::channel();
    Harness {
        server: device.into_mcp_server(Arc::new(sink), Handle::current()),
        receiver,
        audio,
        motion,
        camera,
        _settings_dir: settings_dir,
    }
}

impl Harness {
    pub fn send(&self, message: Value) {
        self.server.handle_message(&message.to_string());
    }

    pub async fn reply(&mut self) -> Value {
        let message = self.raw_reply().await;
        serde_json::from_str(&message).expect("reply is not JSON")
    }

    /// Next reply exactly as written to the transport
    pub async fn raw_reply(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(5), self.receiver.recv())
            .await
            .expect("timed out waiting for reply")
            .expect("reply channel closed")
    }

    /// True when nothing has been sent so far
    pub fn is_silent(&mut self) -> bool {
        self.receiver.try_recv().is_err()
    }
}

pub fn error_message(reply: &Value) -> &str {
    reply["error"]["message"].as_str().unwrap_or_default()
}

pub fn result_text(reply: &Value) -> &str {
    reply["result"]["content"][0]["text"].as_str().unwrap_or_default()
}
