/// Persistent key-value settings stored as a JSON file
///
/// Used for values that must survive a restart, like the screen theme.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings file must contain a JSON object")]
    NotAnObject,
}

#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl Settings {
    /// Load settings from `path`; a missing file means no settings yet
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => match serde_json::from_str(&text)? {
                Value::Object(map) => map,
                _ => return Err(SettingsError::NotAnObject),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Store a value and write the whole file back
    pub fn set_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), Value::String(value.to_string()));
        let text = serde_json::to_string_pretty(&*values)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Default settings file location, trying writable directories in order
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    let potential_paths = [
        // 1. User's config directory (preferred)
        dirs::config_dir().map(|mut p| {
            p.push("device_mcp");
            p
        }),
        // 2. User's home directory
        dirs::home_dir().map(|mut p| {
            p.push(".device_mcp");
            p
        }),
        // 3. Current working directory
        std::env::current_dir().ok().map(|mut p| {
            p.push(".device_mcp");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("settings.json"));
            }
        }
    }

    // Last resort: a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("device_mcp");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("settings.json");

    tracing::warn!("Using temporary directory for settings: {}", temp_path.display());
    Ok(temp_path)
}
