//! Environment variables exported before templated tasks run.
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

/// An environment variable to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parse the `variables` mapping, keeping source order.
///
/// Values may be any scalar; `null` becomes the empty string.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedEntity`] for a non-string key or a nested value.
pub fn parse(mapping: &Mapping) -> Result<Vec<Variable>, ConfigError> {
    mapping
        .iter()
        .map(|(key, value)| {
            let name = scalar_to_string(key)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    ConfigError::malformed("variables", "variable names must be non-empty scalars")
                })?;
            let value = scalar_to_string(value).ok_or_else(|| {
                ConfigError::malformed(format!("variables.{name}"), "value must be a scalar")
            })?;
            Ok(Variable::new(name, value))
        })
        .collect()
}

/// Render a scalar YAML value as a string, or `None` for sequences and mappings.
pub(super) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
