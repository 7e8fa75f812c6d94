/// Domain module containing the tool model and its validation rules
///
/// This module defines the core entities (Property, Tool, ToolRegistry) and the
/// binding step that turns raw call arguments into typed values. These types
/// are independent of the wire protocol and of any device hardware.

pub mod property;
pub mod binding;
pub mod tool;
pub mod registry;

// Re-export public types for easy access
pub use property::*;
pub use binding::*;
pub use tool::*;
pub use registry::*;

use thiserror::Error;

/// Errors raised while declaring a tool schema
///
/// These only occur during startup composition, never while serving requests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Invalid range for property '{name}': minimum {min} is greater than maximum {max}")]
    InvalidRange { name: String, min: i64, max: i64 },

    #[error("Default value {value} for property '{name}' is outside [{min}, {max}]")]
    DefaultOutOfRange { name: String, value: i64, min: i64, max: i64 },

    #[error("Duplicate property name: {0}")]
    DuplicateProperty(String),
}

/// Errors raised while binding call arguments against a tool schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("Missing valid argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument: {name} ({reason})")]
    InvalidArgument { name: String, reason: String },
}

impl BindError {
    /// Name of the property that failed to bind
    pub fn property_name(&self) -> &str {
        match self {
            BindError::MissingArgument(name) => name,
            BindError::InvalidArgument { name, .. } => name,
        }
    }
}

/// A fault raised by a tool capability while it runs
///
/// Capabilities return this instead of panicking; the execution engine maps
/// it onto an error reply carrying the message.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ToolFault {
    pub message: String,
}

impl ToolFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<std::io::Error> for ToolFault {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}
