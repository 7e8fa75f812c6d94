/// Main entry point for the device MCP server
///
/// This file sets up logging, parses command line arguments, assembles the
/// simulated board and starts the MCP server. The server listens for JSON-RPC
/// requests over stdin and answers on stdout.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use device_mcp::board::{
    default_settings_path, Backlight, Board, BoardStatus, Camera, DisplayPanel, LoggingMotionLink,
    MotionLink, SerialMotionLink, Settings, SettingsDisplay, SimulatedAudio, SimulatedBacklight,
    SimulatedCamera, DEFAULT_BRIGHTNESS, DEFAULT_VOLUME,
};
use device_mcp::mcp::executor::{DEFAULT_MAX_CONCURRENT_CALLS, DEFAULT_STACK_SIZE};
use device_mcp::mcp::pagination::DEFAULT_PAYLOAD_LIMIT;
use device_mcp::{DeviceMcpServer, ServerConfig};

/// Command line arguments for the device MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Name reported to clients in serverInfo
    #[arg(long, default_value = "device-mcp")]
    server_name: String,

    /// Maximum size in bytes of one outbound message
    #[arg(long, default_value_t = DEFAULT_PAYLOAD_LIMIT)]
    payload_limit: usize,

    /// Maximum number of tool calls running at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_CALLS)]
    max_concurrent_calls: usize,

    /// Stack size in bytes for tool calls without a stackSize hint
    #[arg(long, default_value_t = DEFAULT_STACK_SIZE)]
    default_stack_size: usize,

    /// Serial device (or file) receiving motion commands
    /// If not provided, motion commands are only logged
    #[arg(long)]
    serial_device: Option<PathBuf>,

    /// Path to the settings file
    /// If not provided, uses a default location in the user's config directory
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Expose the simulated camera
    #[arg(long)]
    camera: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("device_mcp={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    info!("Starting device MCP server");

    let settings_path = match args.settings {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => default_settings_path()?,
    };
    info!("Using settings at: {}", settings_path.display());
    let settings = Arc::new(Settings::load(settings_path)?);

    let motion: Arc<dyn MotionLink> = match &args.serial_device {
        Some(path) => Arc::new(SerialMotionLink::open(path)?),
        None => Arc::new(LoggingMotionLink::new()),
    };

    let audio = Arc::new(SimulatedAudio::new(DEFAULT_VOLUME));
    let backlight: Arc<dyn Backlight> = Arc::new(SimulatedBacklight::new(DEFAULT_BRIGHTNESS));
    let display: Arc<dyn DisplayPanel> = Arc::new(SettingsDisplay::new(settings));
    let camera = if args.camera {
        Some(Arc::new(SimulatedCamera::new()) as Arc<dyn Camera>)
    } else {
        None
    };

    let board = Board {
        name: args.server_name.clone(),
        audio: audio.clone(),
        status: Arc::new(BoardStatus::new(audio, Some(backlight.clone()), Some(display.clone()))),
        backlight: Some(backlight),
        display: Some(display),
        camera,
        motion: Some(motion),
    };

    let config = ServerConfig {
        server_name: args.server_name,
        payload_limit: args.payload_limit,
        max_concurrent_calls: args.max_concurrent_calls,
        default_stack_size: args.default_stack_size,
        ..ServerConfig::default()
    };

    // Create and start the server
    let server = DeviceMcpServer::new(config, &board, Vec::new())?;

    // Run the MCP server - this will handle JSON-RPC communication over stdin/stdout
    server.run().await?;

    info!("Device MCP server shutdown complete");
    Ok(())
}
