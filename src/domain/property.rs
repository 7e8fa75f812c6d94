/// Typed, constrained argument descriptors for tools
///
/// A tool's call schema is a `PropertyList`: an ordered list of named
/// properties, each with a type, an optional default and (for integers) an
/// optional inclusive range. The same type carries the bound values once a
/// call's arguments have been validated.

use serde_json::{json, Map, Value};
use crate::domain::SchemaError;

/// The value types a property can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Boolean,
    Integer,
    String,
}

impl PropertyType {
    /// JSON schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Boolean => "boolean",
            PropertyType::Integer => "integer",
            PropertyType::String => "string",
        }
    }
}

/// A concrete property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl PropertyValue {
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyValue::Boolean(_) => PropertyType::Boolean,
            PropertyValue::Integer(_) => PropertyType::Integer,
            PropertyValue::String(_) => PropertyType::String,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Boolean(b) => Value::Bool(*b),
            PropertyValue::Integer(i) => json!(i),
            PropertyValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// A single named argument of a tool
///
/// `value` is empty in the registered schema and filled in on the private
/// copy produced for each call.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    property_type: PropertyType,
    default_value: Option<PropertyValue>,
    range: Option<Range>,
    value: Option<PropertyValue>,
}

impl Property {
    /// A required property with no default and no range
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            default_value: None,
            range: None,
            value: None,
        }
    }

    /// An optional property; its type follows the default value
    pub fn with_default(name: impl Into<String>, default_value: impl Into<PropertyValue>) -> Self {
        let default_value = default_value.into();
        Self {
            name: name.into(),
            property_type: default_value.property_type(),
            default_value: Some(default_value),
            range: None,
            value: None,
        }
    }

    /// A required integer property restricted to `[min, max]`
    pub fn ranged(name: impl Into<String>, min: i64, max: i64) -> Result<Self, SchemaError> {
        let name = name.into();
        if min > max {
            return Err(SchemaError::InvalidRange { name, min, max });
        }
        Ok(Self {
            name,
            property_type: PropertyType::Integer,
            default_value: None,
            range: Some(Range { min, max }),
            value: None,
        })
    }

    /// An optional integer property restricted to `[min, max]`
    pub fn ranged_with_default(
        name: impl Into<String>,
        default_value: i64,
        min: i64,
        max: i64,
    ) -> Result<Self, SchemaError> {
        let mut property = Self::ranged(name, min, max)?;
        if !(min..=max).contains(&default_value) {
            return Err(SchemaError::DefaultOutOfRange {
                name: property.name,
                value: default_value,
                min,
                max,
            });
        }
        property.default_value = Some(PropertyValue::Integer(default_value));
        Ok(property)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn default_value(&self) -> Option<&PropertyValue> {
        self.default_value.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    pub fn range(&self) -> Option<Range> {
        self.range
    }

    /// The bound value, if this property has been bound
    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    pub(crate) fn set_value(&mut self, value: PropertyValue) {
        self.value = Some(value);
    }

    /// Schema fragment describing this property
    pub fn to_json(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.property_type.as_str()));
        if let Some(default_value) = &self.default_value {
            schema.insert("default".to_string(), default_value.to_json());
        }
        if let Some(range) = self.range {
            schema.insert("minimum".to_string(), json!(range.min));
            schema.insert("maximum".to_string(), json!(range.max));
        }
        Value::Object(schema)
    }
}

/// Ordered list of properties, looked up by name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyList {
    properties: Vec<Property>,
}

impl PropertyList {
    /// Build a list, rejecting repeated names
    pub fn new(properties: Vec<Property>) -> Result<Self, SchemaError> {
        for (index, property) in properties.iter().enumerate() {
            if properties[..index].iter().any(|p| p.name == property.name) {
                return Err(SchemaError::DuplicateProperty(property.name.clone()));
            }
        }
        Ok(Self { properties })
    }

    /// An empty schema (tool takes no arguments)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.properties.iter_mut()
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name).and_then(Property::value)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.value(name) {
            Some(PropertyValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.value(name) {
            Some(PropertyValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.value(name) {
            Some(PropertyValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Names of the properties the caller must supply
    pub fn required(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| !p.has_default())
            .map(Property::name)
            .collect()
    }

    /// JSON schema object for a tool's `inputSchema`
    pub fn to_input_schema(&self) -> Value {
        let mut properties = Map::new();
        for property in &self.properties {
            properties.insert(property.name.clone(), property.to_json());
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        let required = self.required();
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }
        Value::Object(schema)
    }
}
