/// Capability negotiation for `initialize`
///
/// The client may describe extra capabilities (for example a vision service
/// the camera should use). Each capability name maps to a handler registered
/// at composition time; the server never needs to know the concrete kinds.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::Camera;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    #[error("Invalid {capability} capability: {reason}")]
    Invalid { capability: String, reason: String },
}

/// Consumes the configuration object of one client capability
pub trait CapabilityHandler: Send + Sync {
    fn configure(&self, config: &Value) -> Result<(), CapabilityError>;
}

/// Capability name to handler mapping
#[derive(Default, Clone)]
pub struct CapabilityRegistry {
    handlers: HashMap<String, Arc<dyn CapabilityHandler>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn CapabilityHandler>) {
        let name = name.into();
        info!("Add capability handler: {}", name);
        self.handlers.insert(name, handler);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Forward each known capability to its handler
    ///
    /// Unknown capabilities are skipped and handler failures are logged; the
    /// handshake itself never fails because of them.
    pub fn apply(&self, capabilities: &Map<String, Value>) {
        for (name, config) in capabilities {
            match self.handlers.get(name) {
                Some(handler) => {
                    if let Err(e) = handler.configure(config) {
                        warn!("{}", e);
                    }
                }
                None => debug!("Ignoring unsupported capability: {}", name),
            }
        }
    }
}

/// `vision`: `{"url": <string>, "token": <string?>}` for the camera's explain service
pub struct VisionCapability {
    camera: Arc<dyn Camera>,
}

impl VisionCapability {
    pub fn new(camera: Arc<dyn Camera>) -> Self {
        Self { camera }
    }
}

impl CapabilityHandler for VisionCapability {
    fn configure(&self, config: &Value) -> Result<(), CapabilityError> {
        let invalid = |reason: &str| CapabilityError::Invalid {
            capability: "vision".to_string(),
            reason: reason.to_string(),
        };

        let config = config.as_object().ok_or_else(|| invalid("expected an object"))?;
        let url = config
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("missing url"))?;
        let token = config.get("token").and_then(Value::as_str).unwrap_or_default();

        info!("Vision explain url set to {}", url);
        self.camera.set_explain_url(url, token);
        Ok(())
    }
}
