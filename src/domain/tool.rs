/// Tool entity: a named, schema-described capability
///
/// A tool couples a stable name and description with a `PropertyList` call
/// schema and the function that runs when the tool is invoked.

use std::fmt;
use std::sync::Arc;
use serde::Serialize;
use serde_json::Value;
use crate::domain::{PropertyList, ToolFault};

/// What a capability hands back on success
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl ReturnValue {
    /// Text form used in the `content` of a call result
    pub fn to_text(&self) -> String {
        match self {
            ReturnValue::Boolean(b) => b.to_string(),
            ReturnValue::Integer(i) => i.to_string(),
            ReturnValue::String(s) => s.clone(),
        }
    }
}

impl From<bool> for ReturnValue {
    fn from(value: bool) -> Self {
        ReturnValue::Boolean(value)
    }
}

impl From<i64> for ReturnValue {
    fn from(value: i64) -> Self {
        ReturnValue::Integer(value)
    }
}

impl From<String> for ReturnValue {
    fn from(value: String) -> Self {
        ReturnValue::String(value)
    }
}

impl From<&str> for ReturnValue {
    fn from(value: &str) -> Self {
        ReturnValue::String(value.to_string())
    }
}

/// The invocation capability of a tool
pub type ToolHandler = Arc<dyn Fn(&PropertyList) -> Result<ReturnValue, ToolFault> + Send + Sync>;

/// Descriptor emitted by `tools/list`
#[derive(Debug, Serialize)]
pub struct ToolDescriptor<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A remotely invocable tool
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    properties: PropertyList,
    handler: ToolHandler,
}

impl Tool {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        properties: PropertyList,
        handler: F,
    ) -> Self
    where
        F: Fn(&PropertyList) -> Result<ReturnValue, ToolFault> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            properties,
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn properties(&self) -> &PropertyList {
        &self.properties
    }

    pub fn descriptor(&self) -> ToolDescriptor<'_> {
        ToolDescriptor {
            name: &self.name,
            description: &self.description,
            input_schema: self.properties.to_input_schema(),
        }
    }

    /// Serialized descriptor, as it appears inside the `tools` array
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.descriptor())
    }

    /// Run the capability with already bound arguments
    pub fn call(&self, arguments: &PropertyList) -> Result<ReturnValue, ToolFault> {
        (self.handler)(arguments)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}
