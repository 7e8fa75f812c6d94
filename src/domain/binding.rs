/// Argument binding for tool calls
///
/// Binding resolves the raw `arguments` object of a `tools/call` request
/// against a tool's `PropertyList`. It never touches the registered schema:
/// every call gets its own bound copy.

use serde_json::{Map, Value};
use crate::domain::{BindError, PropertyList, PropertyType, PropertyValue};

/// Bind raw call arguments to a tool schema
///
/// Returns a copy of `schema` where every property carries a value, or the
/// first property (in declaration order) that could not be bound.
pub fn bind_arguments(
    schema: &PropertyList,
    arguments: Option<&Map<String, Value>>,
) -> Result<PropertyList, BindError> {
    let mut bound = schema.clone();

    for property in bound.iter_mut() {
        let supplied = arguments.and_then(|args| args.get(property.name()));

        let value = match supplied {
            Some(raw) => coerce(property.name(), property.property_type(), raw)?,
            None => match property.default_value() {
                Some(default_value) => default_value.clone(),
                None => return Err(BindError::MissingArgument(property.name().to_string())),
            },
        };

        if let (Some(range), PropertyValue::Integer(v)) = (property.range(), &value) {
            if *v < range.min {
                return Err(BindError::InvalidArgument {
                    name: property.name().to_string(),
                    reason: format!("value {} is below minimum {}", v, range.min),
                });
            }
            if *v > range.max {
                return Err(BindError::InvalidArgument {
                    name: property.name().to_string(),
                    reason: format!("value {} is above maximum {}", v, range.max),
                });
            }
        }

        property.set_value(value);
    }

    Ok(bound)
}

/// Exact type match, no cross-type coercion
fn coerce(name: &str, expected: PropertyType, raw: &Value) -> Result<PropertyValue, BindError> {
    let value = match (expected, raw) {
        (PropertyType::Boolean, Value::Bool(b)) => Some(PropertyValue::Boolean(*b)),
        (PropertyType::Integer, Value::Number(n)) => n.as_i64().map(PropertyValue::Integer),
        (PropertyType::String, Value::String(s)) => Some(PropertyValue::String(s.clone())),
        _ => None,
    };

    value.ok_or_else(|| BindError::InvalidArgument {
        name: name.to_string(),
        reason: format!("expected {}", expected.as_str()),
    })
}
